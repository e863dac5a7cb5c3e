use alloy_primitives::{Address, U256};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("no contract address configured")]
    MissingContractAddress,

    #[error("message is empty")]
    EmptyMessage,

    #[error("value is empty")]
    EmptyValue,

    #[error("value is not an unsigned integer: {0}")]
    NonNumericValue(String),
}

/// Arguments for a `setData` call that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub address: Address,
    pub message: String,
    pub value: U256,
}

/// Checks the save form before any call is issued.
pub fn validate_save(
    address: Option<Address>,
    message: &str,
    value: &str,
) -> Result<SaveRequest, InputError> {
    let address = address.ok_or(InputError::MissingContractAddress)?;

    if message.is_empty() {
        return Err(InputError::EmptyMessage);
    }

    let value = value.trim();
    if value.is_empty() {
        return Err(InputError::EmptyValue);
    }

    // uint256 only: no sign, no fraction, no exponent.
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::NonNumericValue(value.to_string()));
    }
    let value = U256::from_str_radix(value, 10)
        .map_err(|_| InputError::NonNumericValue(value.to_string()))?;

    Ok(SaveRequest {
        address,
        message: message.to_string(),
        value,
    })
}

/// `getData` takes no arguments; only the contract address is required.
pub fn validate_get(address: Option<Address>) -> Result<Address, InputError> {
    address.ok_or(InputError::MissingContractAddress)
}
