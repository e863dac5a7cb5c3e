use crate::{
    client::DataStore,
    error::{DappError, Result},
    event_manager::{EventSubscription, SharedState, EVENT_CHANNEL_CAPACITY},
    wallet::WalletProvider,
};
use alloy_primitives::Address;
use dapp_lib::{
    format_balance, render, validate_get, validate_save, Action, AppState, DataSavedEvent,
    Element, OperationKind, OperationStatus, Session,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// The dApp controller.
///
/// Owns the wallet, the UI state and, once connected, the bound contract and
/// its event subscription. Every state change goes through [`Action`]s
/// applied under the state lock; no lock is held across a network call.
pub struct Dapp<W: WalletProvider> {
    wallet: W,
    state: SharedState,
    contract: Mutex<Option<Arc<W::Contract>>>,
    subscription: Mutex<Option<EventSubscription>>,
    events: broadcast::Sender<DataSavedEvent>,
    monitor_events: bool,
    expected_chain_id: Option<u64>,
}

impl<W: WalletProvider> Dapp<W> {
    pub fn new(wallet: W, contract_address: Option<Address>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            wallet,
            state: Arc::new(Mutex::new(AppState::new(contract_address))),
            contract: Mutex::new(None),
            subscription: Mutex::new(None),
            events,
            monitor_events: true,
            expected_chain_id: None,
        }
    }

    #[must_use]
    pub const fn with_event_monitoring(mut self, enabled: bool) -> Self {
        self.monitor_events = enabled;
        self
    }

    /// Refuses to connect unless the wallet reports this chain.
    #[must_use]
    pub const fn with_expected_chain_id(mut self, chain_id: Option<u64>) -> Self {
        self.expected_chain_id = chain_id;
        self
    }

    /// Requests account access, reads the balance and replaces the session,
    /// then binds the contract for the new account.
    ///
    /// On failure the previous session (if any) is kept and `connect` can be
    /// called again.
    pub async fn connect(&self) -> Result<Session> {
        info!("Connecting to wallet...");

        if let Some(expected) = self.expected_chain_id {
            let actual = self.wallet.chain_id().await.inspect_err(|e| {
                warn!(error = %e, "wallet connection failed");
            })?;
            if actual != expected {
                warn!(expected, actual, "wallet connection failed: wrong network");
                return Err(DappError::ChainMismatch { expected, actual });
            }
        }

        let address = self.wallet.request_accounts().await.inspect_err(|e| {
            warn!(error = %e, "wallet connection failed");
        })?;
        let balance_wei = self.wallet.get_balance(address).await.inspect_err(|e| {
            warn!(error = %e, %address, "balance query failed");
        })?;

        let session = Session {
            address,
            balance_wei,
            balance: format_balance(balance_wei),
        };
        self.state
            .lock()
            .apply(Action::SessionEstablished(session.clone()))?;
        info!(%address, balance = %session.balance, "✅ Wallet connected");

        self.bind_contract(address).await?;
        Ok(session)
    }

    /// Builds the contract handle for `account` and arms the event listener.
    async fn bind_contract(&self, account: Address) -> Result<()> {
        // Release the previous session's handle and listener first.
        self.subscription.lock().take();
        self.contract.lock().take();

        let address = {
            let mut state = self.state.lock();
            state.apply(Action::BindStarted)?;
            state.contract.address
        };

        let Some(address) = address else {
            warn!("No data store address configured; contract stays unbound");
            self.state
                .lock()
                .apply(Action::BindFinished { bound: false })?;
            return Ok(());
        };

        let contract = Arc::new(self.wallet.bind_contract(address, account));
        *self.contract.lock() = Some(Arc::clone(&contract));
        self.state
            .lock()
            .apply(Action::BindFinished { bound: true })?;
        info!(%address, %account, "Contract bound");

        if self.monitor_events {
            match contract.watch_data_saved().await {
                Ok(stream) => {
                    let subscription =
                        EventSubscription::spawn(stream, Arc::clone(&self.state), self.events.clone());
                    *self.subscription.lock() = Some(subscription);
                }
                Err(e) => warn!(error = %e, "could not subscribe to DataSaved events"),
            }
        }

        Ok(())
    }

    /// Ends the session and releases the contract handle and its listener.
    pub fn disconnect(&self) -> Result<()> {
        // Ended first so an event already in flight finds no bound contract.
        self.state.lock().apply(Action::SessionEnded)?;
        self.subscription.lock().take();
        self.contract.lock().take();
        info!("Wallet session ended");
        Ok(())
    }

    pub fn set_message_input(&self, message: impl Into<String>) -> Result<()> {
        Ok(self.state.lock().apply(Action::MessageInput(message.into()))?)
    }

    pub fn set_value_input(&self, value: impl Into<String>) -> Result<()> {
        Ok(self.state.lock().apply(Action::ValueInput(value.into()))?)
    }

    /// Writes the form's message and value with `setData`.
    ///
    /// Invalid input moves straight to `Fail` without a call. A rejected call
    /// also ends in `Fail`. Returns the final status; errors only when the
    /// save operation is not idle.
    pub async fn save(&self) -> Result<OperationStatus> {
        let bound = self.bound_contract();
        let (contract, request) = {
            let mut state = self.state.lock();
            let contract = &state.contract;
            let checked = validate_save(contract.address, &contract.message_input, &contract.value_input)
                .map_err(DappError::from)
                .and_then(|request| match bound {
                    Some(handle) => Ok((handle, request)),
                    None => Err(DappError::NotConnected("no contract bound".to_string())),
                });

            match checked {
                Ok(ready) => {
                    state.apply(Action::SaveStarted)?;
                    ready
                }
                Err(e) => {
                    state.apply(Action::SaveRejected)?;
                    warn!(error = %e, "Save rejected before sending");
                    return Ok(state.contract.saving);
                }
            }
        };

        info!(message = %request.message, value = %request.value, "Saving data to contract");
        let action = match contract.set_data(request.message, request.value).await {
            Ok(tx_hash) => {
                info!(%tx_hash, "✅ Saving success");
                Action::SaveSucceeded
            }
            Err(e) => {
                warn!(error = %e, "❌ Saving failed");
                Action::SaveFailed
            }
        };

        let mut state = self.state.lock();
        state.apply(action)?;
        Ok(state.contract.saving)
    }

    /// Reads `(message, value)` with `getData` into the fetched data slot.
    pub async fn get(&self) -> Result<OperationStatus> {
        let bound = self.bound_contract();
        let contract = {
            let mut state = self.state.lock();
            let checked = validate_get(state.contract.address)
                .map_err(DappError::from)
                .and_then(|_| {
                    bound.ok_or_else(|| DappError::NotConnected("no contract bound".to_string()))
                });

            match checked {
                Ok(contract) => {
                    state.apply(Action::GetStarted)?;
                    contract
                }
                Err(e) => {
                    state.apply(Action::GetRejected)?;
                    warn!(error = %e, "Get rejected before sending");
                    return Ok(state.contract.getting);
                }
            }
        };

        info!("Getting data from contract");
        let action = match contract.get_data().await {
            Ok(data) => {
                info!(message = %data.message, value = %data.value, "✅ Getting success");
                Action::GetSucceeded(data)
            }
            Err(e) => {
                warn!(error = %e, "❌ Getting failed");
                Action::GetFailed
            }
        };

        let mut state = self.state.lock();
        state.apply(action)?;
        Ok(state.contract.getting)
    }

    /// Acknowledges a finished operation, returning it to idle.
    pub fn dismiss(&self, kind: OperationKind) -> Result<()> {
        Ok(self.state.lock().apply(Action::Dismiss(kind))?)
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.state.lock().clone()
    }

    pub fn render(&self) -> Vec<Element> {
        render(&self.state.lock())
    }

    /// Receives every `DataSaved` event after it has been recorded in state.
    pub fn subscribe_events(&self) -> broadcast::Receiver<DataSavedEvent> {
        self.events.subscribe()
    }

    pub fn is_listening(&self) -> bool {
        self.subscription
            .lock()
            .as_ref()
            .is_some_and(EventSubscription::is_active)
    }

    pub const fn wallet(&self) -> &W {
        &self.wallet
    }

    fn bound_contract(&self) -> Option<Arc<W::Contract>> {
        self.contract.lock().clone()
    }
}
