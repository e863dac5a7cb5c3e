use crate::{
    client::{DataStore, DataStoreContract},
    config::Config,
    contracts::IDataStore,
    error::{DappError, Result},
};
use alloy_json_rpc::ErrorPayload;
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use std::{future::Future, time::Duration};
use tracing::{debug, info};

/// EIP-1193 "User Rejected Request".
pub const USER_REJECTED_REQUEST: i64 = 4001;

/// Grants access to one account and builds contract handles authorized as it.
pub trait WalletProvider: Send + Sync + 'static {
    type Contract: DataStore;

    /// Asks for account permission and returns the active account.
    fn request_accounts(&self) -> impl Future<Output = Result<Address>> + Send;

    /// Chain the wallet is currently connected to.
    fn chain_id(&self) -> impl Future<Output = Result<u64>> + Send;

    /// Native balance of `account`, in wei.
    fn get_balance(&self, account: Address) -> impl Future<Output = Result<U256>> + Send;

    /// Builds a handle to `contract` that sends as `account`. No I/O.
    fn bind_contract(&self, contract: Address, account: Address) -> Self::Contract;
}

/// Wallet over a JSON-RPC endpoint.
///
/// With a configured private key the provider signs locally and the key's
/// address is the only account. Without one, accounts come from the node's
/// `eth_requestAccounts` and the node signs.
pub struct AlloyWallet {
    provider: DynProvider,
    local_account: Option<Address>,
    poll_interval: Duration,
}

impl AlloyWallet {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let rpc_url = config.network.rpc_url.clone();
        let (provider, local_account) = match &config.wallet.private_key {
            Some(key) => {
                let signer = Config::parse_private_key(key)?;
                let account = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer))
                    .connect_http(rpc_url)
                    .erased();
                (provider, Some(account))
            }
            None => (ProviderBuilder::new().connect_http(rpc_url).erased(), None),
        };

        info!(
            network = %config.network.name,
            rpc_url = %config.network.rpc_url,
            local_signer = local_account.is_some(),
            "wallet provider ready"
        );

        Ok(Self {
            provider,
            local_account,
            poll_interval: config.poll_interval(),
        })
    }
}

impl WalletProvider for AlloyWallet {
    type Contract = DataStoreContract;

    async fn request_accounts(&self) -> Result<Address> {
        if let Some(account) = self.local_account {
            return Ok(account);
        }

        debug!("requesting accounts from node");
        let accounts: Vec<Address> = self
            .provider
            .raw_request("eth_requestAccounts".into(), ())
            .await
            .map_err(|err| match err.as_error_resp() {
                Some(payload) if is_user_rejection(payload) => {
                    DappError::WalletPermissionDenied(payload.message.to_string())
                }
                _ => DappError::Provider(err),
            })?;

        accounts.first().copied().ok_or_else(|| {
            DappError::WalletPermissionDenied("no accounts exposed by the wallet".to_string())
        })
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }

    async fn get_balance(&self, account: Address) -> Result<U256> {
        Ok(self.provider.get_balance(account).await?)
    }

    fn bind_contract(&self, contract: Address, account: Address) -> DataStoreContract {
        DataStoreContract::new(
            IDataStore::new(contract, self.provider.clone()),
            account,
            self.poll_interval,
        )
    }
}

/// Whether a JSON-RPC error means the user declined the request.
pub fn is_user_rejection(payload: &ErrorPayload) -> bool {
    payload.code == USER_REJECTED_REQUEST
}
