use crate::client::DataSavedStream;
use dapp_lib::{Action, AppState, DataSavedEvent};
use futures::StreamExt;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info, warn};

pub type SharedState = Arc<Mutex<AppState>>;

/// Capacity of the broadcast channel front-ends listen on.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A running `DataSaved` listener.
///
/// The listener lives exactly as long as this value: dropping it aborts the
/// task, so a session's subscription ends with the session.
pub struct EventSubscription {
    handle: JoinHandle<()>,
}

impl EventSubscription {
    /// Starts forwarding `stream` into `state`, newest first, and out on
    /// `notifier` for anyone redrawing on new events.
    #[must_use]
    pub fn spawn(
        stream: DataSavedStream,
        state: SharedState,
        notifier: broadcast::Sender<DataSavedEvent>,
    ) -> Self {
        let handle = tokio::spawn(Self::run(stream, state, notifier));
        Self { handle }
    }

    async fn run(
        mut stream: DataSavedStream,
        state: SharedState,
        notifier: broadcast::Sender<DataSavedEvent>,
    ) {
        info!("Starting DataSaved event processing loop");

        while let Some(item) = stream.next().await {
            match item {
                Ok(event) => {
                    debug!(message = %event.message, value = %event.value, "DataSaved received");
                    let applied = state.lock().apply(Action::EventReceived(event.clone()));
                    if let Err(e) = applied {
                        warn!(error = %e, "failed to record DataSaved event");
                        continue;
                    }
                    // No receivers is not an error.
                    let _ = notifier.send(event);
                }
                Err(e) => {
                    warn!(error = %e, "skipping undecodable DataSaved log");
                }
            }
        }

        info!("DataSaved event stream closed");
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
