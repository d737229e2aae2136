mod address;
mod bech32;
pub mod default_context;
mod dispatch;
mod error;
mod prefix;
mod response;
#[cfg(test)]
mod tests;

use core::fmt::Debug;

pub use ballot_state::{Prefix as StatePrefix, StateMap, StateValue, Storage, WorkingSet};
use borsh::{BorshDeserialize, BorshSerialize};
use sha2::digest::consts::U32;
use sha2::Digest;

pub use crate::address::{Address, AddressTrait};
pub use crate::bech32::Bech32ParseError;
pub use crate::dispatch::Genesis;
pub use crate::error::ModuleError;
pub use crate::prefix::ModulePrefix;
pub use crate::response::CallResponse;

/// The `Spec` trait configures the primitives used by a particular instance of
/// the module system: how callers are identified, where state lives and which
/// hash function derives module addresses.
///
/// `Spec` is almost always implemented on a Context object. Since all modules
/// are generic over a Context, a different environment only needs a different
/// Context.
pub trait Spec {
    /// The identity of callers and modules.
    type Address: AddressTrait;

    /// State storage. Must be shareable, since every working set holds a handle to it.
    type Storage: Storage + Send + Sync;

    /// The hasher used to derive module addresses from their prefixes.
    type Hasher: Digest<OutputSize = U32>;
}

/// A context contains the information passed to modules during call
/// execution: the caller, as authenticated by the host, and the height of the
/// block being executed.
///
/// Modules never take the caller or the height from a call message.
pub trait Context: Spec + Clone + Debug + PartialEq {
    /// Sender of the call.
    fn sender(&self) -> &Self::Address;

    /// Height of the block the call is executed in.
    fn block_height(&self) -> u64;

    /// Constructor for the Context.
    fn new(sender: Self::Address, block_height: u64) -> Self;
}

/// The storage type selected by the context of a module.
pub type StorageOf<C> = <C as Spec>::Storage;

/// A module of the system. State changes happen only through [`Module::genesis`]
/// and [`Module::call`], both of which write into a revertable [`WorkingSet`]:
/// the host keeps the writes when they return `Ok` and discards them otherwise.
pub trait Module {
    /// Execution context.
    type Context: Context;

    /// Configuration for the genesis method.
    type Config;

    /// Module defined argument to the call method.
    type CallMessage: Debug + BorshSerialize + BorshDeserialize;

    /// Genesis is called once, when the chain starts, and sets the initial state of the module.
    fn genesis(
        &self,
        _config: &Self::Config,
        _working_set: &mut WorkingSet<StorageOf<Self::Context>>,
    ) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Call allows interaction with the module and invokes state changes.
    /// It takes a module defined message and a context as parameters.
    fn call(
        &self,
        message: Self::CallMessage,
        context: &Self::Context,
        working_set: &mut WorkingSet<StorageOf<Self::Context>>,
    ) -> Result<CallResponse, ModuleError>;
}

/// Every module has to implement this trait.
pub trait ModuleInfo: Default {
    /// Execution context.
    type Context: Context;

    /// Returns the address of the module.
    fn address(&self) -> &<Self::Context as Spec>::Address;

    /// Returns the prefix every state container of the module starts with.
    fn prefix(&self) -> ModulePrefix;
}
