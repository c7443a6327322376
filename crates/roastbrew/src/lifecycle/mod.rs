//! # System Lifecycle & Orchestration
//!
//! [`OrderSystem`] creates every actor, hands each its context, seeds the
//! catalogue and starts the notification worker. [`OrderLifecycleService`] is
//! the cross-store API built on top of the resulting clients.
//!
//! ## Shutdown
//!
//! 1. Drop every service handle, which drops the actor clients and the queue
//! 2. The notification worker drains its backlog and exits
//! 3. Each actor sees its channel close and exits
//! 4. [`OrderSystem::shutdown`] awaits all of those tasks

pub mod checkout;
pub mod order_id;
pub mod service;
pub mod system;

pub use checkout::{CartItem, Checkout, CustomerSession, NotificationOutcome, PlacedOrder};
pub use order_id::OrderIdGenerator;
pub use service::{OrderLifecycleService, ServiceParts};
pub use system::OrderSystem;
