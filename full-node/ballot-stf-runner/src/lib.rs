#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

mod app_template;
mod config;
mod node;
mod transaction;

pub use app_template::AppTemplate;
pub use config::{from_json_path, from_toml_path, RunnerConfig, StorageConfig};
pub use node::{load_transactions, run_election, ElectionApp, NodeReport};
pub use transaction::{BatchReceipt, Transaction, TxEffect, TxReceipt};
