//! Configuration of the native storage.

use std::path::PathBuf;

/// Configuration for [`crate::NativeStorage`].
#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    /// Folder where the state snapshot is kept. The state lives only in memory when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
}
