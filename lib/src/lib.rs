//! Core state of the data-store dApp.
//!
//! Everything in this crate is pure: no provider, no signer, no I/O. The
//! client crate drives these types from wallet and contract callbacks, and
//! front-ends project them with [`view::render`].

#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod format;
pub mod state;
pub mod status;
pub mod types;
pub mod validate;
pub mod view;

pub use format::format_balance;
pub use state::{Action, AppState, ContractView, StateError};
pub use status::{OperationKind, OperationStatus, StatusEvent, TransitionError};
pub use types::{DataSavedEvent, Session, StoredData};
pub use validate::{validate_get, validate_save, InputError, SaveRequest};
pub use view::{render, ButtonTone, Element, StatusButton, TreeNode};
