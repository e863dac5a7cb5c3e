use crate::{contracts::IDataStoreInstance, error::Result};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::DynProvider;
use dapp_lib::{DataSavedEvent, StoredData};
use futures::{stream::BoxStream, StreamExt};
use std::{future::Future, time::Duration};
use tracing::{debug, info};

/// Live `DataSaved` notifications, in arrival order.
pub type DataSavedStream = BoxStream<'static, Result<DataSavedEvent>>;

/// A handle to the data store contract, authorized as one account.
pub trait DataStore: Send + Sync + 'static {
    fn address(&self) -> Address;

    /// Submits `setData`. Resolves once the transaction is accepted by the
    /// node; inclusion is not awaited.
    fn set_data(&self, message: String, value: U256) -> impl Future<Output = Result<TxHash>> + Send;

    fn get_data(&self) -> impl Future<Output = Result<StoredData>> + Send;

    fn watch_data_saved(&self) -> impl Future<Output = Result<DataSavedStream>> + Send;
}

/// [`DataStore`] backed by the generated `IDataStore` bindings.
pub struct DataStoreContract {
    instance: IDataStoreInstance<DynProvider>,
    account: Address,
    poll_interval: Duration,
}

impl DataStoreContract {
    /// Local construction only; nothing is sent to the node.
    #[must_use]
    pub const fn new(
        instance: IDataStoreInstance<DynProvider>,
        account: Address,
        poll_interval: Duration,
    ) -> Self {
        Self {
            instance,
            account,
            poll_interval,
        }
    }

    pub const fn account(&self) -> Address {
        self.account
    }
}

impl DataStore for DataStoreContract {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn set_data(&self, message: String, value: U256) -> Result<TxHash> {
        debug!(contract = %self.address(), %message, %value, "sending setData");
        let pending = self
            .instance
            .setData(message, value)
            .from(self.account)
            .send()
            .await?;

        let tx_hash = *pending.tx_hash();
        info!(%tx_hash, "setData submitted");
        Ok(tx_hash)
    }

    async fn get_data(&self) -> Result<StoredData> {
        debug!(contract = %self.address(), "calling getData");
        let data = self.instance.getData().from(self.account).call().await?;
        Ok(StoredData {
            message: data.message,
            value: data.value,
        })
    }

    async fn watch_data_saved(&self) -> Result<DataSavedStream> {
        let mut poller = self.instance.DataSaved_filter().watch().await?;
        poller.poller.set_poll_interval(self.poll_interval);
        info!(contract = %self.address(), "watching DataSaved events");

        let stream = poller.into_stream().map(|item| -> Result<DataSavedEvent> {
            let (event, log) = item?;
            Ok(DataSavedEvent {
                message: event.message,
                value: event.value,
                block_number: log.block_number,
                transaction_hash: log.transaction_hash,
            })
        });

        Ok(stream.boxed())
    }
}
