//! # ActorEntity Trait
//!
//! The contract every store record (product, account, order, contact message)
//! implements so a generic [`ResourceActor`](crate::ResourceActor) can own it.
//!
//! Associated types pin each actor to its own payloads: an order actor only
//! accepts order creation params, a product actor only product actions, and the
//! compiler rejects anything else.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`] runs after construction and before insertion.
//!   Returning an error aborts the insert, so it is the place for invariants.
//!
//! The default implementation does nothing (`Ok(())`).

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Async & Context
/// Hooks are `#[async_trait]` so they may await other actors. The `Context`
/// type is injected into every hook when the actor starts (`run(context)`),
/// which lets dependencies be wired after construction.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The key this entity is stored under (SKU, email, order number, ...).
    ///
    /// Keys are chosen by the caller and passed in with the create request;
    /// the actor only guarantees they stay unique.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Enum representing resource-specific operations (e.g. decrementing stock).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context injected into the actor. Use `()` if none is needed.
    type Context: Send + Sync;

    /// One error enum per actor.
    ///
    /// Errors travel back to clients boxed inside
    /// [`FrameworkError::EntityError`](crate::FrameworkError::EntityError);
    /// typed clients recover them with `downcast`, which is why the `'static`
    /// bound is required.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the entity from its key and payload.
    /// Called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction, before the entity is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
