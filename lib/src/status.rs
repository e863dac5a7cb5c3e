use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which user-triggered contract operation a status belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Save,
    Get,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Save => write!(f, "save"),
            Self::Get => write!(f, "get"),
        }
    }
}

/// Lifecycle of one contract operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationStatus {
    #[default]
    Idle,
    Processing,
    Success,
    Fail,
}

/// Inputs that drive an [`OperationStatus`] forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusEvent {
    /// Preconditions held and the call was issued.
    Start,
    /// Preconditions failed; no call was issued.
    Reject,
    /// The in-flight call resolved.
    Resolve,
    /// The in-flight call was rejected by the provider or the chain.
    CallFailed,
    /// The user acknowledged a finished operation.
    Dismiss,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot apply {event:?} while {from:?}")]
    Invalid {
        from: OperationStatus,
        event: StatusEvent,
    },
}

impl OperationStatus {
    /// Applies `event`, returning the next status.
    ///
    /// Only `Idle` accepts `Start`/`Reject`, so at most one call of a given
    /// kind can be in flight at a time.
    pub const fn transition(self, event: StatusEvent) -> Result<Self, TransitionError> {
        match (self, event) {
            (Self::Idle, StatusEvent::Start) => Ok(Self::Processing),
            (Self::Idle, StatusEvent::Reject) | (Self::Processing, StatusEvent::CallFailed) => {
                Ok(Self::Fail)
            }
            (Self::Processing, StatusEvent::Resolve) => Ok(Self::Success),
            (Self::Success | Self::Fail, StatusEvent::Dismiss) => Ok(Self::Idle),
            (from, event) => Err(TransitionError::Invalid { from, event }),
        }
    }

    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Success | Self::Fail)
    }
}
