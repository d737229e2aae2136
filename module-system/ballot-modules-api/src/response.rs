/// Response type for the `Module::call` method.
///
/// Events are recorded in the working set, so that a reverted call drops them
/// together with its writes.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CallResponse {}
