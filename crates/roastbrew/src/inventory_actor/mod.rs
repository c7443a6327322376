//! # Inventory Actor
//!
//! Owns the product catalogue and stock counters.
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Product`]
//! - [`error`] - [`InventoryError`]
//! - [`actions`] - [`InventoryAction`]
//!
//! Stock only moves through two paths: a clamped decrement at checkout and a
//! direct set from the admin dashboard. Products are never removed.
//!
//! ```rust
//! use roastbrew::inventory_actor;
//! use roastbrew::clients::InventoryStore;
//! use roastbrew::model::{ProductCreate, ProductId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = inventory_actor::new();
//!     let inventory = InventoryStore::new(generic_client);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = ProductId::new("P003");
//!     inventory
//!         .add_product(id.clone(), ProductCreate { name: "Sagada Amber".into(), stock: 1 })
//!         .await?;
//!     assert_eq!(inventory.decrement_stock_by_id(&id, 5).await?, Some(0));
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Product;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new inventory actor and its client.
pub fn new() -> (ResourceActor<Product>, ResourceClient<Product>) {
    ResourceActor::new(64)
}
