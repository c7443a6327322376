//! # Order Ledger Actor
//!
//! Every order ever placed, keyed by order number. Orders are append-only; the
//! status is the one field that changes afterwards, through
//! [`LedgerAction::SetStatus`].
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`LedgerError`]
//! - [`actions`] - [`LedgerAction`] and [`StatusChange`]
//!
//! The actor is started with a [`StatusPolicy`](crate::model::StatusPolicy) as
//! its context:
//!
//! ```rust,ignore
//! let (ledger_actor, ledger_client) = ledger_actor::new();
//! tokio::spawn(ledger_actor.run(StatusPolicy::Strict));
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Order;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new ledger actor and its client.
pub fn new() -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(64)
}
