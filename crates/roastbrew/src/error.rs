//! Service-level error taxonomy.
//!
//! Each store has its own error enum; [`StoreError`] folds them into the few
//! outcomes callers act on. The HTTP layer maps each variant to one status code.

use thiserror::Error;

use crate::account_actor::AccountError;
use crate::inbox_actor::InboxError;
use crate::inventory_actor::InventoryError;
use crate::ledger_actor::LedgerError;
use crate::notify::NotifyError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    InvalidInput(String),

    /// No customer session.
    #[error("{0}")]
    Unauthenticated(String),

    /// Credentials were presented but rejected.
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Notification failed: {0}")]
    NotificationFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        StoreError::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        StoreError::NotFound(msg.into())
    }
}

impl From<InventoryError> for StoreError {
    fn from(e: InventoryError) -> Self {
        match e {
            InventoryError::NotFound(_) => StoreError::not_found("Product not found"),
            InventoryError::DuplicateProduct(id) => {
                StoreError::Conflict(format!("Product already exists: {id}"))
            }
            InventoryError::InvalidStock(_) => StoreError::invalid("Invalid stock value provided."),
            InventoryError::ActorCommunicationError(msg) => StoreError::Internal(msg),
        }
    }
}

impl From<AccountError> for StoreError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::MissingField(_) => StoreError::invalid("All fields are required."),
            AccountError::EmailTaken(_) => StoreError::Conflict(e.to_string()),
            AccountError::NotFound(_) => StoreError::NotFound(e.to_string()),
            AccountError::WrongPassword => StoreError::Unauthorized(e.to_string()),
            AccountError::Hashing(msg) | AccountError::ActorCommunicationError(msg) => {
                StoreError::Internal(msg)
            }
        }
    }
}

impl From<LedgerError> for StoreError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::NotFound(_) => StoreError::not_found("Order not found"),
            LedgerError::DuplicateOrderId(_) => StoreError::Conflict(e.to_string()),
            LedgerError::EmptyOrder
            | LedgerError::TotalOverflow
            | LedgerError::InvalidTransition { .. } => {
                StoreError::InvalidInput(e.to_string())
            }
            // Totals are computed server-side, so a mismatch is a bug here.
            LedgerError::TotalMismatch { .. } => StoreError::Internal(e.to_string()),
            LedgerError::ActorCommunicationError(msg) => StoreError::Internal(msg),
        }
    }
}

impl From<InboxError> for StoreError {
    fn from(e: InboxError) -> Self {
        match e {
            InboxError::MissingField(_) => StoreError::invalid("All fields are required."),
            InboxError::ActorCommunicationError(msg) => StoreError::Internal(msg),
        }
    }
}

impl From<NotifyError> for StoreError {
    fn from(e: NotifyError) -> Self {
        StoreError::NotificationFailed(e.to_string())
    }
}
