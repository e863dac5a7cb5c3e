//! Pure projection of [`AppState`] into UI elements.
//!
//! Front-ends decide how to draw an [`Element`]; the `Display` impls give a
//! plain-text rendering that terminal front-ends can use as is.

use crate::{
    state::AppState,
    status::{OperationKind, OperationStatus},
};
use alloy_primitives::Address;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonTone {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusButton {
    pub label: &'static str,
    pub enabled: bool,
    pub tone: ButtonTone,
    pub spinner: bool,
}

impl StatusButton {
    pub const fn for_status(kind: OperationKind, status: OperationStatus) -> Self {
        let (label, enabled, tone, spinner) = match (kind, status) {
            (_, OperationStatus::Processing) => ("Processing", false, ButtonTone::Secondary, true),
            (OperationKind::Save, OperationStatus::Idle) => {
                ("Save data to contract", true, ButtonTone::Primary, false)
            }
            (OperationKind::Save, OperationStatus::Success) => {
                ("Saving success", true, ButtonTone::Primary, false)
            }
            (OperationKind::Save, OperationStatus::Fail) => {
                ("Saving fail", true, ButtonTone::Secondary, false)
            }
            (OperationKind::Get, OperationStatus::Idle) => ("Start get", true, ButtonTone::Primary, false),
            (OperationKind::Get, OperationStatus::Success) => {
                ("Getting success", true, ButtonTone::Primary, false)
            }
            (OperationKind::Get, OperationStatus::Fail) => {
                ("Getting fail", true, ButtonTone::Secondary, false)
            }
        };

        Self {
            label,
            enabled,
            tone,
            spinner,
        }
    }
}

impl fmt::Display for StatusButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.enabled {
            write!(f, "[ {} ]", self.label)
        } else {
            write!(f, "( {} )", self.label)?;
            if self.spinner {
                write!(f, " ...")?;
            }
            Ok(())
        }
    }
}

/// Collapsible tree over a JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Branch { key: String, children: Vec<TreeNode> },
    Leaf { key: String, value: String },
}

impl TreeNode {
    pub fn from_json(key: impl Into<String>, value: &Value) -> Self {
        let key = key.into();
        match value {
            Value::Array(items) => Self::Branch {
                key,
                children: items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| Self::from_json(index.to_string(), item))
                    .collect(),
            },
            Value::Object(map) => Self::Branch {
                key,
                children: map.iter().map(|(k, v)| Self::from_json(k.clone(), v)).collect(),
            },
            leaf => Self::Leaf {
                key,
                value: leaf.to_string(),
            },
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Branch { children, .. } => children.iter().map(Self::leaf_count).sum(),
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            Self::Leaf { key, value } => writeln!(f, "{pad}{key}: {value}"),
            Self::Branch { key, children } => {
                writeln!(f, "{pad}{key} [{}]", children.len())?;
                for child in children {
                    child.write_indented(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    ConnectButton,
    Identity { address: Address, balance: String },
    Connected,
    ContractHeader { address: Address },
    SaveForm {
        message: String,
        value: String,
        button: StatusButton,
    },
    GetPanel {
        button: StatusButton,
        data: Option<TreeNode>,
    },
    EventLog(Vec<String>),
    Binding,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectButton => writeln!(f, "[ Connect wallet ]"),
            Self::Identity { address, balance } => {
                writeln!(f, "{address}")?;
                writeln!(f, "{balance} (eth)")
            }
            Self::Connected => writeln!(f, "( Connected )"),
            Self::ContractHeader { address } => {
                writeln!(f, "== Interact with contract ==")?;
                writeln!(f, "Contract address {address}")
            }
            Self::SaveForm {
                message,
                value,
                button,
            } => {
                writeln!(f, "-- Set data to contract --")?;
                writeln!(f, "Message: {message}")?;
                writeln!(f, "Value:   {value}")?;
                writeln!(f, "{button}")
            }
            Self::GetPanel { button, data } => {
                writeln!(f, "-- Get data from contract --")?;
                writeln!(f, "{button}")?;
                if let Some(tree) = data {
                    write!(f, "{tree}")?;
                }
                Ok(())
            }
            Self::EventLog(lines) => {
                writeln!(f, "-- Events of contract --")?;
                for line in lines {
                    writeln!(f, "{line}")?;
                }
                Ok(())
            }
            Self::Binding => writeln!(f, "( Connecting to contract ... )"),
        }
    }
}

/// Renders the whole screen for `state`.
pub fn render(state: &AppState) -> Vec<Element> {
    let mut elements = Vec::new();
    let contract = &state.contract;

    match &state.session {
        None => elements.push(Element::ConnectButton),
        Some(session) => {
            elements.push(Element::Identity {
                address: session.address,
                balance: session.balance.clone(),
            });
            elements.push(Element::Connected);
        }
    }

    if contract.bound {
        if let Some(address) = contract.address {
            elements.push(Element::ContractHeader { address });
        }
        elements.push(Element::SaveForm {
            message: contract.message_input.clone(),
            value: contract.value_input.clone(),
            button: StatusButton::for_status(OperationKind::Save, contract.saving),
        });
        elements.push(Element::GetPanel {
            button: StatusButton::for_status(OperationKind::Get, contract.getting),
            data: contract
                .data
                .as_ref()
                .map(|data| TreeNode::from_json("data", &data.to_json())),
        });
        elements.push(Element::EventLog(
            contract
                .events
                .iter()
                .map(|event| format!("DataSaved Event with message: {}", event.message))
                .collect(),
        ));
    }

    if contract.connecting {
        elements.push(Element::Binding);
    }

    elements
}
