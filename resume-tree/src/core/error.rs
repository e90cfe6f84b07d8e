//! Typed failures of the action engine.

use thiserror::Error;

use crate::core::action::ActionKind;
use crate::core::validator::ValidationIssue;

/// Why a single action could not be applied.
///
/// Every variant is local to one action: the tree it was applied to is left
/// untouched and the caller may retry with corrected input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("{kind}: invalid action: {}", join_issues(.issues))]
    Invalid {
        kind: ActionKind,
        issues: Vec<ValidationIssue>,
    },

    #[error("{kind}: address '{address}' not found")]
    NotFound { kind: ActionKind, address: String },

    #[error("{kind}: {reason}")]
    Structural { kind: ActionKind, reason: String },
}

impl ActionError {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionError::Invalid { kind, .. }
            | ActionError::NotFound { kind, .. }
            | ActionError::Structural { kind, .. } => *kind,
        }
    }

    /// The unresolved address, for `NotFound` errors.
    pub fn address(&self) -> Option<&str> {
        match self {
            ActionError::NotFound { address, .. } => Some(address),
            _ => None,
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
