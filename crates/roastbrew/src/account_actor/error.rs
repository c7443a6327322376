//! Error types for the account actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccountError {
    /// A required registration or sign-in field was blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// An account with this email already exists.
    #[error("An account with this email already exists.")]
    EmailTaken(String),

    /// No account with this email.
    #[error("No account found with that email address.")]
    NotFound(String),

    /// Password verification failed.
    #[error("Incorrect password. Please try again.")]
    WrongPassword,

    /// Hashing or parsing a stored hash failed.
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for AccountError {
    fn from(msg: String) -> Self {
        AccountError::ActorCommunicationError(msg)
    }
}
