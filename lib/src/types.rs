use alloy_primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// An established wallet connection. Replaced wholesale on every connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub address: Address,
    pub balance_wei: U256,
    /// Balance in ether, formatted for display.
    pub balance: String,
}

/// The `(message, value)` tuple returned by `getData`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredData {
    pub message: String,
    pub value: U256,
}

impl StoredData {
    pub fn new(message: impl Into<String>, value: impl Into<U256>) -> Self {
        Self {
            message: message.into(),
            value: value.into(),
        }
    }

    /// JSON form of the tuple, as shown in the data tree.
    ///
    /// Values that fit a `u64` stay numeric; larger ones are kept as decimal
    /// strings so no precision is lost.
    pub fn to_json(&self) -> Value {
        let value = u64::try_from(self.value)
            .map_or_else(|_| json!(self.value.to_string()), |value| json!(value));
        json!([self.message, value])
    }
}

/// One `DataSaved` notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSavedEvent {
    pub message: String,
    pub value: U256,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<TxHash>,
}

impl DataSavedEvent {
    pub fn new(message: impl Into<String>, value: impl Into<U256>) -> Self {
        Self {
            message: message.into(),
            value: value.into(),
            block_number: None,
            transaction_hash: None,
        }
    }
}
