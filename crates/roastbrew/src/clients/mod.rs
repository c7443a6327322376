//! Typed wrappers around each store's [`ResourceClient`](actor_framework::ResourceClient).
//!
//! Each wrapper implements [`ActorClient`](actor_framework::ActorClient) for the
//! shared reads and adds the store's own operations. Framework errors are
//! mapped back to the store's error enum, recovering typed entity errors where
//! the actor produced one.

pub mod account_directory;
pub mod inbox;
pub mod inventory_store;
pub mod order_ledger;

pub use account_directory::AccountDirectory;
pub use inbox::Inbox;
pub use inventory_store::InventoryStore;
pub use order_ledger::OrderLedger;
