#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::wildcard_imports
)]

pub mod app;
pub mod client;
pub mod config;
pub mod contracts;
pub mod error;
pub mod event_manager;
pub mod wallet;

pub use app::Dapp;
pub use client::{DataSavedStream, DataStore, DataStoreContract};
pub use config::{Config, ContractConfig, EventConfig, NetworkConfig, WalletConfig};
pub use error::{DappError, Result};
pub use event_manager::{EventSubscription, SharedState};
pub use wallet::{AlloyWallet, WalletProvider};

pub use dapp_lib;

#[cfg(test)]
mod test_utils;
