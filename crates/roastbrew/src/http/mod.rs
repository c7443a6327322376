//! JSON API for the storefront and the admin dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET   /health                               - Liveness check
//!
//! POST  /api/signup                           - Create an account
//! POST  /api/signin                           - Check credentials
//! POST  /api/contact-message                  - Contact form
//! POST  /api/send-order-confirmation-email    - Checkout
//! GET   /api/my-orders/{email}                - Order history
//! GET   /api/track-order/{orderId}[?email=]   - Tracking lookup
//!
//! GET   /api/admin/orders                     - Orders table
//! PATCH /api/admin/orders/{orderId}           - Set order status
//! GET   /api/admin/products                   - Stock levels
//! PATCH /api/admin/products/{productId}       - Set stock level
//! GET   /api/admin/sales                      - Units sold per product
//! GET   /api/admin/messages                   - Contact messages
//! GET   /api/admin/dead-letters               - Undeliverable mail
//! ```

pub mod dto;
pub mod error;
pub mod handlers;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::lifecycle::OrderLifecycleService;

pub use error::ApiError;

/// Builds the full application router.
pub fn router(service: OrderLifecycleService) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes())
        .with_state(service)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<OrderLifecycleService> {
    Router::new()
        .route("/signup", post(handlers::signup))
        .route("/signin", post(handlers::signin))
        .route("/contact-message", post(handlers::contact_message))
        .route("/send-order-confirmation-email", post(handlers::place_order))
        .route("/my-orders", get(handlers::my_orders_without_email))
        .route("/my-orders/", get(handlers::my_orders_without_email))
        .route("/my-orders/{email}", get(handlers::my_orders))
        .route("/track-order/{order_id}", get(handlers::track_order))
        .nest("/admin", admin_routes())
}

fn admin_routes() -> Router<OrderLifecycleService> {
    Router::new()
        .route("/orders", get(handlers::admin_orders))
        .route("/orders/{order_id}", patch(handlers::update_order_status))
        .route("/products", get(handlers::admin_products))
        .route("/products/{product_id}", patch(handlers::update_stock))
        .route("/sales", get(handlers::admin_sales))
        .route("/messages", get(handlers::admin_messages))
        .route("/dead-letters", get(handlers::admin_dead_letters))
}
