use dapp_lib::{InputError, StateError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DappError>;

#[derive(Error, Debug)]
pub enum DappError {
    #[error("Provider error: {0}")]
    Provider(#[from] alloy_transport::TransportError),

    #[error("Wallet permission denied: {0}")]
    WalletPermissionDenied(String),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("Contract call rejected: {0}")]
    ContractCallRejected(#[from] alloy_contract::Error),

    #[error("Event decode error: {0}")]
    EventDecode(#[from] alloy_sol_types::Error),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Wrong network: expected chain {expected}, wallet is on chain {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    #[error("Not connected: {0}")]
    NotConnected(String),

    #[error("Signer error: {0}")]
    Signer(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    #[error("Array conversion error: {0}")]
    ArrayConversion(#[from] std::array::TryFromSliceError),
}

impl DappError {
    /// Errors raised before any call reached the chain.
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::State(_) | Self::NotConnected(_) | Self::Config(_)
        )
    }
}
