use ballot_state::NativeStorage;
use serde::{Deserialize, Serialize};

use crate::{Address, Context, Spec};

/// The context used by native execution: SHA-256 and [`NativeStorage`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefaultContext {
    pub sender: Address,
    pub block_height: u64,
}

impl Spec for DefaultContext {
    type Address = Address;
    type Storage = NativeStorage;
    type Hasher = sha2::Sha256;
}

impl Context for DefaultContext {
    fn sender(&self) -> &Self::Address {
        &self.sender
    }

    fn block_height(&self) -> u64 {
        self.block_height
    }

    fn new(sender: Self::Address, block_height: u64) -> Self {
        Self {
            sender,
            block_height,
        }
    }
}
