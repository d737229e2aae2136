use sha2::Digest;

use crate::{Context, StatePrefix};

// separator == "/"
const DOMAIN_SEPARATOR: [u8; 1] = [47];

/// A unique identifier for a module or for one of its state containers.
///
/// Its bytes are `module_path/module_name/` for a module and
/// `module_path/module_name/storage_name/` for a container, so containers of
/// different modules, and different containers of one module, never share keys.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ModulePrefix {
    module_path: &'static str,
    module_name: &'static str,
    storage_name: Option<&'static str>,
}

impl ModulePrefix {
    pub fn new_storage(
        module_path: &'static str,
        module_name: &'static str,
        storage_name: &'static str,
    ) -> Self {
        Self {
            module_path,
            module_name,
            storage_name: Some(storage_name),
        }
    }

    pub fn new_module(module_path: &'static str, module_name: &'static str) -> Self {
        Self {
            module_path,
            module_name,
            storage_name: None,
        }
    }

    fn combine_prefix(&self) -> Vec<u8> {
        let parts = [Some(self.module_path), Some(self.module_name), self.storage_name];
        let mut combined_prefix = Vec::new();
        for part in parts.into_iter().flatten() {
            combined_prefix.extend_from_slice(part.as_bytes());
            combined_prefix.extend_from_slice(&DOMAIN_SEPARATOR);
        }
        combined_prefix
    }

    /// Hashes the prefix with the hasher of the context.
    pub fn hash<C: Context>(&self) -> [u8; 32] {
        let mut hasher = C::Hasher::new();
        hasher.update(self.combine_prefix());
        hasher.finalize().into()
    }
}

impl From<ModulePrefix> for StatePrefix {
    fn from(prefix: ModulePrefix) -> Self {
        StatePrefix::new(prefix.combine_prefix())
    }
}
