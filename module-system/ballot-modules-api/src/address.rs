use core::fmt::{self, Debug, Display};
use core::hash::Hash;
use core::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::bech32::{bech32m_to_decoded_vec, vec_to_bech32m, Bech32ParseError};

const ACCOUNT_HRP: &str = "acct";
const CONTRACT_HRP: &str = "ctrt";

/// Operations the module system needs from an address type.
pub trait AddressTrait:
    Clone
    + Debug
    + Display
    + Eq
    + Hash
    + BorshSerialize
    + BorshDeserialize
    + Send
    + Sync
    + 'static
{
    /// Builds the address of a contract (such as a module) from its 32 byte identifier.
    fn contract(id: [u8; 32]) -> Self;
}

/// The identity of a caller.
///
/// Accounts and contracts are distinct even when they carry the same bytes.
/// Addresses are displayed and parsed as bech32m strings, with the `acct` or
/// `ctrt` human readable part.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Address {
    /// An externally owned account.
    Account([u8; 32]),
    /// A contract.
    Contract([u8; 32]),
}

impl Address {
    /// Returns the raw identifier, without the account/contract tag.
    pub fn as_bytes(&self) -> &[u8; 32] {
        match self {
            Address::Account(bytes) | Address::Contract(bytes) => bytes,
        }
    }

    /// Returns `true` for [`Address::Account`].
    pub fn is_account(&self) -> bool {
        matches!(self, Address::Account(_))
    }

    fn hrp(&self) -> &'static str {
        match self {
            Address::Account(_) => ACCOUNT_HRP,
            Address::Contract(_) => CONTRACT_HRP,
        }
    }
}

impl AddressTrait for Address {
    fn contract(id: [u8; 32]) -> Self {
        Address::Contract(id)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = vec_to_bech32m(self.as_bytes(), self.hrp()).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for Address {
    type Err = Bech32ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hrp, data) = bech32m_to_decoded_vec(s)?;

        let bytes: [u8; 32] = data
            .as_slice()
            .try_into()
            .map_err(|_| Bech32ParseError::InvalidLength(data.len()))?;

        match hrp.as_str() {
            ACCOUNT_HRP => Ok(Address::Account(bytes)),
            CONTRACT_HRP => Ok(Address::Contract(bytes)),
            _ => Err(Bech32ParseError::WrongHrp(hrp)),
        }
    }
}

impl TryFrom<String> for Address {
    type Error = Bech32ParseError;

    fn try_from(addr: String) -> Result<Self, Self::Error> {
        Address::from_str(&addr)
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_string()
    }
}
