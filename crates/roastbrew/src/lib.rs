//! # Roast & Brew Order Service
//!
//! Order lifecycle for the Roast & Brew storefront: inventory, customer
//! accounts, the order ledger, contact messages and the mail that follows an
//! order from checkout to delivery.
//!
//! - **[model]**: plain data ([`Product`](model::Product), [`Account`](model::Account), [`Order`](model::Order), ...)
//! - **Actors**: one [`ResourceActor`](actor_framework::ResourceActor) per store
//!   ([`inventory_actor`], [`account_actor`], [`ledger_actor`], [`inbox_actor`])
//! - **[clients]**: typed APIs over each actor
//! - **[notify]**: templated mail, transports and the background queue
//! - **[lifecycle]**: [`OrderSystem`](lifecycle::OrderSystem) wiring and the
//!   [`OrderLifecycleService`](lifecycle::OrderLifecycleService)
//! - **[http]**: the axum JSON API
//! - **[config]**: environment configuration

pub mod account_actor;
pub mod clients;
pub mod config;
pub mod error;
pub mod http;
pub mod inbox_actor;
pub mod inventory_actor;
pub mod ledger_actor;
pub mod lifecycle;
pub mod model;
pub mod notify;
