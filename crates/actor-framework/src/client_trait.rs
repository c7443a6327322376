//! # ActorClient Trait
//!
//! Shared reads for resource-specific clients, built on a generic `ResourceClient`.
use crate::{ActorEntity, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the standard read operations.
///
/// Implementors supply the inner client and an error mapping; `get` and `list`
/// come for free.
///
/// # Example
///
/// ```rust
/// use actor_framework::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)]
/// struct Hop { id: String }
/// #[derive(Debug)] struct HopCreate;
/// #[derive(Debug)] struct HopUpdate;
/// #[derive(Debug)] enum HopAction {}
/// #[derive(Debug, thiserror::Error)]
/// #[error("{0}")]
/// struct HopError(String);
///
/// #[async_trait]
/// impl ActorEntity for Hop {
///     type Id = String;
///     type Create = HopCreate;
///     type Update = HopUpdate;
///     type Action = HopAction;
///     type ActionResult = ();
///     type Context = ();
///     type Error = HopError;
///
///     fn from_create_params(id: String, _: HopCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id })
///     }
///     async fn on_update(&mut self, _: HopUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, _: HopAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
/// }
///
/// struct HopClient {
///     inner: ResourceClient<Hop>,
/// }
///
/// #[async_trait]
/// impl ActorClient<Hop> for HopClient {
///     type Error = HopError;
///
///     fn inner(&self) -> &ResourceClient<Hop> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         HopError(e.to_string())
///     }
/// }
///
/// async fn usage(client: HopClient) {
///     let _ = client.get("cascade".to_string()).await;
///     let _ = client.list().await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Snapshot of every entity, oldest first.
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().query(Filter::all()).await.map_err(Self::map_error)
    }
}
