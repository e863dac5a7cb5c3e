use alloy_primitives::{address, Address};
use alloy_sol_types::sol;

/// Deployment the dApp talks to unless configured otherwise.
pub const DEFAULT_DATA_STORE_ADDRESS: Address = address!("48741D09A695c90174084925492a2a65e7CCe4d4");

sol! {
    #[sol(rpc)]
    interface IDataStore {
        function setMessage(string calldata _message) external;

        function getMessage() external view returns (string memory);

        function setData(string calldata _message, uint256 _value) external;

        function getData() external view returns (string memory message, uint256 value);

        #[derive(Debug, PartialEq, Eq)]
        event MessageSaved(string message);

        #[derive(Debug, PartialEq, Eq)]
        event DataSaved(string message, uint256 value);
    }
}

pub use IDataStore::IDataStoreInstance;
