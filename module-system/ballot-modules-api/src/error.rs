/// General error type in the module system.
///
/// Modules return their own error types through [`anyhow::Error`], so callers
/// can downcast back to them.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// Custom error thrown by a module.
    #[error(transparent)]
    ModuleError(#[from] anyhow::Error),
}

impl ModuleError {
    /// Returns the module error of type `E`, if that is what was thrown.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        match self {
            ModuleError::ModuleError(err) => err.downcast_ref::<E>(),
        }
    }
}
