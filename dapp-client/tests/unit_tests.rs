#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};
    use alloy_sol_types::{SolCall, SolEvent};
    use dapp_client::{
        contracts::{IDataStore, DEFAULT_DATA_STORE_ADDRESS},
        wallet::{is_user_rejection, USER_REJECTED_REQUEST},
        AlloyWallet, Config, DappError, DataStore, WalletProvider,
    };
    use dapp_lib::InputError;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.network.chain_id, Some(31337));
        assert_eq!(config.contract.data_store, Some(DEFAULT_DATA_STORE_ADDRESS));
    }

    #[test]
    fn test_config_rejects_zero_contract() {
        let mut config = Config::default();
        config.contract.data_store = Some(Address::ZERO);
        assert!(matches!(config.validate(), Err(DappError::Config(_))));
    }

    #[test]
    fn test_private_key_is_not_serialized() {
        let mut config = Config::default();
        config.wallet.private_key = Some("secret".to_string());

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_default_contract_address() {
        assert_eq!(
            DEFAULT_DATA_STORE_ADDRESS,
            "0x48741D09A695c90174084925492a2a65e7CCe4d4"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[test]
    fn test_abi_signatures() {
        assert_eq!(IDataStore::setDataCall::SIGNATURE, "setData(string,uint256)");
        assert_eq!(IDataStore::getDataCall::SIGNATURE, "getData()");
        assert_eq!(IDataStore::setMessageCall::SIGNATURE, "setMessage(string)");
        assert_eq!(IDataStore::getMessageCall::SIGNATURE, "getMessage()");
        assert_eq!(IDataStore::DataSaved::SIGNATURE, "DataSaved(string,uint256)");
        assert_eq!(IDataStore::MessageSaved::SIGNATURE, "MessageSaved(string)");
    }

    #[test]
    fn test_set_data_encoding() {
        let call = IDataStore::setDataCall {
            _message: "hi".to_string(),
            _value: U256::from(5),
        };
        let encoded = call.abi_encode();

        assert_eq!(&encoded[..4], IDataStore::setDataCall::SELECTOR.as_slice());
        let decoded = IDataStore::setDataCall::abi_decode(&encoded).unwrap();
        assert_eq!(decoded._message, "hi");
        assert_eq!(decoded._value, U256::from(5));
    }

    #[test]
    fn test_error_types() {
        let denied = DappError::WalletPermissionDenied("User rejected the request.".to_string());
        assert!(denied.to_string().contains("Wallet permission denied"));
        assert!(!denied.is_local());

        let invalid = DappError::from(InputError::EmptyMessage);
        assert!(matches!(invalid, DappError::InvalidInput(InputError::EmptyMessage)));
        assert!(invalid.is_local());

        let wrong_chain = DappError::ChainMismatch {
            expected: 1,
            actual: 31337,
        };
        assert!(wrong_chain.to_string().contains("expected chain 1"));
        assert!(!wrong_chain.is_local());

        let config_error = DappError::Config("test error".to_string());
        assert!(format!("{config_error}").contains("Configuration error"));
    }

    #[test]
    fn test_user_rejection_code() {
        let payload: alloy_json_rpc::ErrorPayload = serde_json::from_value(serde_json::json!({
            "code": USER_REJECTED_REQUEST,
            "message": "User rejected the request."
        }))
        .unwrap();
        assert!(is_user_rejection(&payload));

        let other: alloy_json_rpc::ErrorPayload = serde_json::from_value(serde_json::json!({
            "code": -32000,
            "message": "execution reverted"
        }))
        .unwrap();
        assert!(!is_user_rejection(&other));
    }

    #[tokio::test]
    async fn test_local_signer_account_needs_no_rpc() {
        let mut config = Config::default();
        // Nothing listens here; the local account must not touch the network.
        config.network.rpc_url = "http://127.0.0.1:9".parse().unwrap();
        config.wallet.private_key =
            Some("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".to_string());

        let wallet = AlloyWallet::new(&config).unwrap();
        let account = wallet.request_accounts().await.unwrap();
        assert_eq!(
            account,
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                .parse::<Address>()
                .unwrap()
        );

        let contract = wallet.bind_contract(DEFAULT_DATA_STORE_ADDRESS, account);
        assert_eq!(contract.address(), DEFAULT_DATA_STORE_ADDRESS);
        assert_eq!(contract.account(), account);
    }
}
