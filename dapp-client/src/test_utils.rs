use crate::{
    client::{DataSavedStream, DataStore},
    error::{DappError, Result},
    wallet::WalletProvider,
};
use alloy_primitives::{Address, TxHash, U256};
use alloy_transport::TransportErrorKind;
use dapp_lib::{DataSavedEvent, StoredData};
use futures::{channel::mpsc, StreamExt};
use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};
use tokio::sync::Notify;

/// Chain-side state shared by a [`MockWallet`] and every contract it binds.
#[derive(Default)]
pub struct MockChain {
    pub reject_accounts: Mutex<bool>,
    pub chain_id: Mutex<u64>,
    pub balance: Mutex<U256>,
    pub fail_balance: Mutex<bool>,
    pub stored: Mutex<StoredData>,
    pub fail_calls: Mutex<bool>,
    pub set_calls: Mutex<Vec<(String, U256)>>,
    pub get_calls: Mutex<usize>,
    /// When set, calls wait for a permit before resolving.
    pub gate: Mutex<Option<Arc<Notify>>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<Result<DataSavedEvent>>>>,
}

impl MockChain {
    /// Delivers `event` to every live `DataSaved` subscription.
    pub fn emit(&self, event: DataSavedEvent) {
        self.subscribers
            .lock()
            .retain(|tx| tx.unbounded_send(Ok(event.clone())).is_ok());
    }

    pub fn emit_error(&self) {
        self.subscribers.lock().retain(|tx| {
            tx.unbounded_send(Err(DappError::Provider(TransportErrorKind::custom_str(
                "undecodable log",
            ))))
            .is_ok()
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().iter().filter(|tx| !tx.is_closed()).count()
    }

    pub fn hold_calls(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    async fn pass_gate(&self) {
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn call_outcome(&self) -> Result<()> {
        if *self.fail_calls.lock() {
            Err(DappError::Provider(TransportErrorKind::custom_str(
                "execution reverted",
            )))
        } else {
            Ok(())
        }
    }
}

pub struct MockWallet {
    pub account: Address,
    pub chain: Arc<MockChain>,
}

impl MockWallet {
    pub fn new(account: Address, balance: U256) -> Self {
        let chain = MockChain::default();
        *chain.chain_id.lock() = 31337;
        *chain.balance.lock() = balance;
        Self {
            account,
            chain: Arc::new(chain),
        }
    }
}

impl WalletProvider for MockWallet {
    type Contract = MockDataStore;

    async fn request_accounts(&self) -> Result<Address> {
        if *self.chain.reject_accounts.lock() {
            return Err(DappError::WalletPermissionDenied(
                "User rejected the request.".to_string(),
            ));
        }
        Ok(self.account)
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(*self.chain.chain_id.lock())
    }

    async fn get_balance(&self, _account: Address) -> Result<U256> {
        if *self.chain.fail_balance.lock() {
            return Err(DappError::Provider(TransportErrorKind::custom_str(
                "connection refused",
            )));
        }
        Ok(*self.chain.balance.lock())
    }

    fn bind_contract(&self, contract: Address, _account: Address) -> MockDataStore {
        MockDataStore {
            address: contract,
            chain: Arc::clone(&self.chain),
        }
    }
}

pub struct MockDataStore {
    address: Address,
    chain: Arc<MockChain>,
}

impl DataStore for MockDataStore {
    fn address(&self) -> Address {
        self.address
    }

    async fn set_data(&self, message: String, value: U256) -> Result<TxHash> {
        self.chain.set_calls.lock().push((message.clone(), value));
        self.chain.pass_gate().await;
        self.chain.call_outcome()?;
        *self.chain.stored.lock() = StoredData { message, value };
        Ok(TxHash::repeat_byte(0x11))
    }

    async fn get_data(&self) -> Result<StoredData> {
        *self.chain.get_calls.lock() += 1;
        self.chain.pass_gate().await;
        self.chain.call_outcome()?;
        Ok(self.chain.stored.lock().clone())
    }

    async fn watch_data_saved(&self) -> Result<DataSavedStream> {
        let (tx, rx) = mpsc::unbounded();
        self.chain.subscribers.lock().push(tx);
        Ok(rx.boxed())
    }
}

/// Polls `condition` until it holds, failing the test after two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}
