//! Plain data types for the storefront: products, accounts, orders and contact
//! messages. The actor modules implement [`ActorEntity`](actor_framework::ActorEntity)
//! for them.

pub mod account;
pub mod contact;
pub mod order;
pub mod product;

pub use account::*;
pub use contact::*;
pub use order::*;
pub use product::*;

/// Trims and lower-cases an email so it can be used as a key.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
