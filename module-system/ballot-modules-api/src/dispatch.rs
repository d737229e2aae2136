use crate::{Context, Module, ModuleError, StorageOf, WorkingSet};

/// Methods from this trait should be called only once, when the chain starts.
pub trait Genesis {
    type Context: Context;

    /// Initial configuration for the module.
    type Config;

    /// Initializes the state of the module.
    fn genesis(
        &self,
        config: &Self::Config,
        working_set: &mut WorkingSet<StorageOf<Self::Context>>,
    ) -> Result<(), ModuleError>;
}

impl<T> Genesis for T
where
    T: Module,
{
    type Context = <Self as Module>::Context;

    type Config = <Self as Module>::Config;

    fn genesis(
        &self,
        config: &Self::Config,
        working_set: &mut WorkingSet<StorageOf<<Self as Genesis>::Context>>,
    ) -> Result<(), ModuleError> {
        <Self as Module>::genesis(self, config, working_set)
    }
}
