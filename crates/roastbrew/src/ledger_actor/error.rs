//! Error types for the order ledger.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::OrderStatus;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Order id already in use: {0}")]
    DuplicateOrderId(String),

    /// The stored total must equal line items plus shipping.
    #[error("Order total {actual} does not match computed total {expected}")]
    TotalMismatch { expected: Decimal, actual: Decimal },

    #[error("Order total is too large.")]
    TotalOverflow,

    #[error("An order needs at least one line item")]
    EmptyOrder,

    #[error("Status cannot move from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for LedgerError {
    fn from(msg: String) -> Self {
        LedgerError::ActorCommunicationError(msg)
    }
}
