//! # Actor Framework
//!
//! Type-safe building blocks for actor-backed stores. Each resource type gets
//! one [`ResourceActor`] that owns its records and processes requests one at a
//! time, plus any number of cheap [`ResourceClient`] handles that talk to it.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]): the record, its payloads and hooks.
//! 2. **Runtime Layer** ([`ResourceActor`]): message loop and store.
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]): typed requests.
//!
//! Business rules live in the entity hooks, so they run inside the actor and are
//! serialised with every other mutation of the same store.
//!
//! ## Context Injection
//!
//! Dependencies are handed to [`ResourceActor::run`] rather than to the
//! constructor. All actors can therefore be created first and wired afterwards,
//! and a hook can consult run-time policy (e.g. which status transitions are
//! allowed) without global state.
//!
//! ## Keys
//!
//! Callers choose keys (a SKU, an email, an order number) and pass them with the
//! create request. The actor refuses duplicates with
//! [`FrameworkError::AlreadyExists`], which is how uniqueness constraints are
//! enforced.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers requests from scripted expectations, so client
//! wrappers and actors with dependencies can be tested in isolation.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Filter, ResourceRequest, Response};
