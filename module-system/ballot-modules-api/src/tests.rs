use std::str::FromStr;

use ballot_state::{NativeStorage, StateValue, WorkingSet};
use proptest::prelude::*;

use crate::default_context::DefaultContext;
use crate::{
    Address, AddressTrait, Bech32ParseError, CallResponse, Context, Genesis, Module, ModuleError,
    ModuleInfo, ModulePrefix, StatePrefix,
};

#[test]
fn test_account_bech32m_display() {
    let bytes: Vec<u8> = (1..=32).collect();
    let account = Address::Account(bytes.try_into().unwrap());
    let displayed = account.to_string();

    assert!(displayed.starts_with("acct1"));
    assert_eq!(Address::from_str(&displayed).unwrap(), account);
}

#[test]
fn test_account_and_contract_differ() {
    let account = Address::Account([7; 32]);
    let contract = Address::Contract([7; 32]);

    assert_ne!(account, contract);
    assert_ne!(account.to_string(), contract.to_string());
    assert!(contract.to_string().starts_with("ctrt1"));
    assert_eq!(account.as_bytes(), contract.as_bytes());
    assert!(account.is_account());
    assert!(!contract.is_account());
}

#[test]
fn test_parse_rejects_foreign_hrp() {
    let foreign = bech32::encode(
        "sov",
        bech32::ToBase32::to_base32(&[1u8; 32]),
        bech32::Variant::Bech32m,
    )
    .unwrap();

    assert!(matches!(
        Address::from_str(&foreign),
        Err(Bech32ParseError::WrongHrp(hrp)) if hrp == "sov"
    ));
}

#[test]
fn test_parse_rejects_wrong_length() {
    let short = bech32::encode(
        "acct",
        bech32::ToBase32::to_base32(&[1u8; 20]),
        bech32::Variant::Bech32m,
    )
    .unwrap();

    assert!(matches!(
        Address::from_str(&short),
        Err(Bech32ParseError::InvalidLength(20))
    ));
    assert!(Address::from_str("not an address").is_err());
}

#[test]
fn test_address_serde_as_string() {
    let account = Address::Account([3; 32]);
    let json = serde_json::to_string(&account).unwrap();

    assert_eq!(json, format!("\"{}\"", account));
    assert_eq!(serde_json::from_str::<Address>(&json).unwrap(), account);
}

#[test]
fn test_module_prefix_layout() {
    let storage = ModulePrefix::new_storage("ballot_election", "Election", "voters");
    let module = ModulePrefix::new_module("ballot_election", "Election");

    assert_eq!(
        StatePrefix::from(storage).as_bytes(),
        b"ballot_election/Election/voters/"
    );
    assert_eq!(
        StatePrefix::from(module).as_bytes(),
        b"ballot_election/Election/"
    );
    assert_ne!(module.hash::<DefaultContext>(), storage.hash::<DefaultContext>());
}

#[derive(Debug, thiserror::Error)]
#[error("counter is frozen")]
struct Frozen;

struct Counter {
    address: Address,
    count: StateValue<u64>,
}

impl Default for Counter {
    fn default() -> Self {
        Self {
            address: Address::contract(
                ModulePrefix::new_module("tests", "Counter").hash::<DefaultContext>(),
            ),
            count: StateValue::new(
                ModulePrefix::new_storage("tests", "Counter", "count").into(),
            ),
        }
    }
}

impl ModuleInfo for Counter {
    type Context = DefaultContext;

    fn address(&self) -> &Address {
        &self.address
    }

    fn prefix(&self) -> ModulePrefix {
        ModulePrefix::new_module("tests", "Counter")
    }
}

impl Module for Counter {
    type Context = DefaultContext;
    type Config = u64;
    type CallMessage = u64;

    fn genesis(
        &self,
        config: &Self::Config,
        working_set: &mut WorkingSet<NativeStorage>,
    ) -> Result<(), ModuleError> {
        self.count.set(config, working_set);
        Ok(())
    }

    fn call(
        &self,
        message: Self::CallMessage,
        _context: &DefaultContext,
        working_set: &mut WorkingSet<NativeStorage>,
    ) -> Result<CallResponse, ModuleError> {
        let count = self.count.get_or_err(working_set).map_err(anyhow::Error::from)?;
        if message == 0 {
            return Err(anyhow::Error::new(Frozen).into());
        }
        self.count.set(&(count + message), working_set);
        Ok(CallResponse::default())
    }
}

#[test]
fn test_module_genesis_and_call() {
    let counter = Counter::default();
    let context = DefaultContext::new(Address::Account([1; 32]), 5);
    let mut working_set = WorkingSet::new(NativeStorage::temporary());

    Genesis::genesis(&counter, &10, &mut working_set).unwrap();
    counter.call(5, &context, &mut working_set).unwrap();
    assert_eq!(counter.count.get(&mut working_set).unwrap(), Some(15));

    let err = counter.call(0, &context, &mut working_set).unwrap_err();
    assert!(err.downcast_ref::<Frozen>().is_some());
    assert_eq!(context.block_height(), 5);
    assert!(matches!(counter.address(), Address::Contract(_)));
}

proptest! {
    #[test]
    fn test_address_display_round_trips(bytes in any::<[u8; 32]>(), account in any::<bool>()) {
        let address = if account { Address::Account(bytes) } else { Address::Contract(bytes) };
        prop_assert_eq!(Address::from_str(&address.to_string()).unwrap(), address);
    }
}
