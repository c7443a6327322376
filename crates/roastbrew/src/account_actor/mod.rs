//! # Account Actor
//!
//! Registered customers keyed by normalised email. Key uniqueness in the actor
//! is what makes duplicate sign-ups fail, even when two arrive at once.
//!
//! Password hashing happens in [`AccountDirectory`](crate::clients::AccountDirectory)
//! on the blocking pool; the actor only ever sees the finished hash.

pub mod entity;
pub mod error;

pub use error::*;

use crate::model::Account;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new account actor and its client.
pub fn new() -> (ResourceActor<Account>, ResourceClient<Account>) {
    ResourceActor::new(32)
}
