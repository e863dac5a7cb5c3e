use crate::{
    status::{OperationKind, OperationStatus, StatusEvent, TransitionError},
    types::{DataSavedEvent, Session, StoredData},
};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("{kind} operation: {source}")]
    Transition {
        kind: OperationKind,
        #[source]
        source: TransitionError,
    },

    #[error("no wallet session")]
    NoSession,
}

/// Contract panel state: inputs, fetched data, event log and the two
/// operation statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractView {
    pub address: Option<Address>,
    pub message_input: String,
    pub value_input: String,
    /// A contract handle is bound to the current session.
    pub bound: bool,
    pub data: Option<StoredData>,
    /// Newest first.
    pub events: Vec<DataSavedEvent>,
    pub saving: OperationStatus,
    pub getting: OperationStatus,
    pub connecting: bool,
}

impl ContractView {
    pub fn new(address: Option<Address>) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }

    pub const fn status(&self, kind: OperationKind) -> OperationStatus {
        match kind {
            OperationKind::Save => self.saving,
            OperationKind::Get => self.getting,
        }
    }

    fn advance(&mut self, kind: OperationKind, event: StatusEvent) -> Result<(), StateError> {
        let slot = match kind {
            OperationKind::Save => &mut self.saving,
            OperationKind::Get => &mut self.getting,
        };
        *slot = slot
            .transition(event)
            .map_err(|source| StateError::Transition { kind, source })?;
        Ok(())
    }

    fn clear_inputs(&mut self) {
        self.message_input.clear();
        self.value_input.clear();
    }
}

/// Every state change the dApp can make. Each action touches only the fields
/// it names, except `SessionEnded`, which resets the whole panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SessionEstablished(Session),
    SessionEnded,
    BindStarted,
    BindFinished { bound: bool },
    MessageInput(String),
    ValueInput(String),
    SaveRejected,
    SaveStarted,
    SaveSucceeded,
    SaveFailed,
    GetRejected,
    GetStarted,
    GetSucceeded(StoredData),
    GetFailed,
    Dismiss(OperationKind),
    EventReceived(DataSavedEvent),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub session: Option<Session>,
    pub contract: ContractView,
}

impl AppState {
    pub fn new(contract_address: Option<Address>) -> Self {
        Self {
            session: None,
            contract: ContractView::new(contract_address),
        }
    }

    /// Applies one action. On error the state is left untouched.
    pub fn apply(&mut self, action: Action) -> Result<(), StateError> {
        debug!(?action, "applying action");
        let contract = &mut self.contract;

        match action {
            Action::SessionEstablished(session) => {
                self.session = Some(session);
            }
            Action::SessionEnded => {
                self.session = None;
                *contract = ContractView::new(contract.address);
            }
            Action::BindStarted => {
                if self.session.is_none() {
                    return Err(StateError::NoSession);
                }
                contract.connecting = true;
                contract.bound = false;
                contract.events.clear();
            }
            Action::BindFinished { bound } => {
                contract.connecting = false;
                contract.bound = bound;
            }
            Action::MessageInput(message) => contract.message_input = message,
            Action::ValueInput(value) => contract.value_input = value,
            Action::SaveRejected => {
                contract.advance(OperationKind::Save, StatusEvent::Reject)?;
                contract.clear_inputs();
            }
            Action::SaveStarted => contract.advance(OperationKind::Save, StatusEvent::Start)?,
            Action::SaveSucceeded => contract.advance(OperationKind::Save, StatusEvent::Resolve)?,
            Action::SaveFailed => contract.advance(OperationKind::Save, StatusEvent::CallFailed)?,
            Action::GetRejected => contract.advance(OperationKind::Get, StatusEvent::Reject)?,
            Action::GetStarted => contract.advance(OperationKind::Get, StatusEvent::Start)?,
            Action::GetSucceeded(data) => {
                contract.advance(OperationKind::Get, StatusEvent::Resolve)?;
                contract.data = Some(data);
            }
            Action::GetFailed => contract.advance(OperationKind::Get, StatusEvent::CallFailed)?,
            Action::Dismiss(kind) => {
                contract.advance(kind, StatusEvent::Dismiss)?;
                contract.clear_inputs();
                if kind == OperationKind::Get {
                    contract.data = None;
                }
            }
            Action::EventReceived(event) => {
                if contract.bound {
                    contract.events.insert(0, event);
                } else {
                    debug!(message = %event.message, "dropping event for a released contract");
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, U256};

    fn connected_state() -> AppState {
        let mut state = AppState::new(Some(address!("48741D09A695c90174084925492a2a65e7CCe4d4")));
        state
            .apply(Action::SessionEstablished(Session {
                address: address!("0000000000000000000000000000000000000abc"),
                balance_wei: U256::ZERO,
                balance: "0.0".to_string(),
            }))
            .unwrap();
        state
    }

    fn bound_state() -> AppState {
        let mut state = connected_state();
        state.apply(Action::BindStarted).unwrap();
        state.apply(Action::BindFinished { bound: true }).unwrap();
        state
    }

    #[test]
    fn test_events_are_prepended() {
        let mut state = bound_state();
        state.apply(Action::EventReceived(DataSavedEvent::new("A", U256::from(1u64)))).unwrap();
        state.apply(Action::EventReceived(DataSavedEvent::new("B", U256::from(2u64)))).unwrap();
        state.apply(Action::EventReceived(DataSavedEvent::new("B", U256::from(2u64)))).unwrap();

        let messages: Vec<_> = state.contract.events.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["B", "B", "A"]);
    }

    #[test]
    fn test_rejected_save_clears_inputs() {
        let mut state = connected_state();
        state.apply(Action::MessageInput("hi".to_string())).unwrap();
        state.apply(Action::ValueInput("abc".to_string())).unwrap();
        state.apply(Action::SaveRejected).unwrap();

        assert_eq!(state.contract.saving, OperationStatus::Fail);
        assert!(state.contract.message_input.is_empty());
        assert!(state.contract.value_input.is_empty());
    }

    #[test]
    fn test_started_save_keeps_inputs() {
        let mut state = connected_state();
        state.apply(Action::MessageInput("hi".to_string())).unwrap();
        state.apply(Action::SaveStarted).unwrap();
        assert_eq!(state.contract.saving, OperationStatus::Processing);
        assert_eq!(state.contract.message_input, "hi");
    }

    #[test]
    fn test_dismiss_get_clears_data_and_inputs() {
        let mut state = connected_state();
        state.apply(Action::GetStarted).unwrap();
        state.apply(Action::GetSucceeded(StoredData::new("hi", U256::from(5u64)))).unwrap();
        state.apply(Action::MessageInput("draft".to_string())).unwrap();
        assert_eq!(state.contract.data, Some(StoredData::new("hi", U256::from(5u64))));

        state.apply(Action::Dismiss(OperationKind::Get)).unwrap();
        assert_eq!(state.contract.getting, OperationStatus::Idle);
        assert_eq!(state.contract.data, None);
        assert!(state.contract.message_input.is_empty());
    }

    #[test]
    fn test_dismiss_save_keeps_fetched_data() {
        let mut state = connected_state();
        state.apply(Action::GetStarted).unwrap();
        state.apply(Action::GetSucceeded(StoredData::new("hi", U256::from(5u64)))).unwrap();
        state.apply(Action::SaveRejected).unwrap();

        state.apply(Action::Dismiss(OperationKind::Save)).unwrap();
        assert_eq!(state.contract.saving, OperationStatus::Idle);
        assert!(state.contract.data.is_some());
    }

    #[test]
    fn test_operations_are_independent() {
        let mut state = connected_state();
        state.apply(Action::SaveStarted).unwrap();
        state.apply(Action::GetStarted).unwrap();
        state.apply(Action::GetFailed).unwrap();

        assert_eq!(state.contract.saving, OperationStatus::Processing);
        assert_eq!(state.contract.getting, OperationStatus::Fail);
    }

    #[test]
    fn test_invalid_transition_leaves_state_untouched() {
        let mut state = connected_state();
        state.apply(Action::SaveStarted).unwrap();
        let before = state.clone();

        let err = state.apply(Action::SaveStarted).unwrap_err();
        assert!(matches!(
            err,
            StateError::Transition {
                kind: OperationKind::Save,
                ..
            }
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn test_bind_requires_session() {
        let mut state = AppState::new(None);
        assert_eq!(state.apply(Action::BindStarted), Err(StateError::NoSession));
        assert!(!state.contract.connecting);
    }

    #[test]
    fn test_session_end_resets_panel() {
        let mut state = bound_state();
        state.apply(Action::EventReceived(DataSavedEvent::new("A", U256::from(1u64)))).unwrap();
        state.apply(Action::GetStarted).unwrap();
        state.apply(Action::GetSucceeded(StoredData::new("hi", U256::from(5u64)))).unwrap();
        state.apply(Action::MessageInput("draft".to_string())).unwrap();
        state.apply(Action::SaveStarted).unwrap();

        state.apply(Action::SessionEnded).unwrap();
        assert!(state.session.is_none());
        assert_eq!(state.contract, ContractView::new(Some(address!("48741D09A695c90174084925492a2a65e7CCe4d4"))));
    }

    #[test]
    fn test_late_event_after_session_end_is_dropped() {
        let mut state = bound_state();
        state.apply(Action::SessionEnded).unwrap();
        state.apply(Action::EventReceived(DataSavedEvent::new("late", U256::from(1u64)))).unwrap();
        assert!(state.contract.events.is_empty());
    }

    #[test]
    fn test_rebind_starts_a_fresh_event_log() {
        let mut state = bound_state();
        state.apply(Action::EventReceived(DataSavedEvent::new("old", U256::from(1u64)))).unwrap();

        state.apply(Action::BindStarted).unwrap();
        assert!(state.contract.events.is_empty());
        state.apply(Action::EventReceived(DataSavedEvent::new("stale", U256::from(2u64)))).unwrap();
        assert!(state.contract.events.is_empty());

        state.apply(Action::BindFinished { bound: true }).unwrap();
        state.apply(Action::EventReceived(DataSavedEvent::new("new", U256::from(3u64)))).unwrap();
        assert_eq!(state.contract.events.len(), 1);
    }
}
