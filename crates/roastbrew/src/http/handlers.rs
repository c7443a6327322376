//! Storefront and admin handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::warn;

use super::dto::{
    CheckoutRequest, ContactRequest, SigninRequest, SignupRequest, StatusRequest, StockRequest,
    TrackQuery,
};
use super::error::ApiError;
use crate::lifecycle::{NotificationOutcome, OrderLifecycleService};

type ApiResult<T> = Result<T, ApiError>;

/// Unwraps a JSON body, turning malformed input into a 400 with a message body.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    Ok(payload?.0)
}

pub async fn health() -> &'static str {
    "ok"
}

// --- Accounts ---

pub async fn signup(
    State(service): State<OrderLifecycleService>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let request = body(payload)?;
    let user = service
        .register_account(&request.full_name, &request.email, &request.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Sign-up successful!", "user": user })),
    ))
}

pub async fn signin(
    State(service): State<OrderLifecycleService>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let request = body(payload)?;
    let user = service.sign_in(&request.email, &request.password).await?;
    Ok(Json(json!({ "message": "Sign-in successful!", "user": user })))
}

// --- Contact form ---

pub async fn contact_message(
    State(service): State<OrderLifecycleService>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let request = body(payload)?;
    let (_, sent) = service
        .submit_contact_message(&request.name, &request.email, &request.message)
        .await?;

    Ok(match sent {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Thank you! Your message has been sent." })),
        ),
        Err(e) => {
            warn!(error = %e, "Contact message stored but mail failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Message stored, but failed to send email notification." })),
            )
        }
    })
}

// --- Orders ---

pub async fn place_order(
    State(service): State<OrderLifecycleService>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let request = body(payload)?;
    let session = service.customer_session(&request.customer_email).await?;
    let placed = service.place_order(&session, request.into_checkout()).await?;

    Ok(match placed.notification {
        NotificationOutcome::Queued => (
            StatusCode::OK,
            Json(json!({
                "message": "Order confirmed. A confirmation email is on its way.",
                "order": placed.order,
            })),
        ),
        NotificationOutcome::Failed(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "message": "Order placed, but failed to send confirmation email.",
                "error": error,
                "order": placed.order,
            })),
        ),
    })
}

pub async fn my_orders(
    State(service): State<OrderLifecycleService>,
    Path(email): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(service.list_orders_for_customer(&email).await?))
}

/// `/api/my-orders` without an email segment.
pub async fn my_orders_without_email() -> ApiError {
    ApiError::bad_request("Email parameter is required.")
}

pub async fn track_order(
    State(service): State<OrderLifecycleService>,
    Path(order_id): Path<String>,
    Query(query): Query<TrackQuery>,
) -> ApiResult<impl IntoResponse> {
    let require_email = query.email.as_deref().filter(|e| !e.trim().is_empty());
    Ok(Json(service.track_order(&order_id, require_email).await?))
}

// --- Admin ---

pub async fn admin_orders(State(service): State<OrderLifecycleService>) -> ApiResult<impl IntoResponse> {
    Ok(Json(service.admin_orders().await?))
}

pub async fn admin_products(State(service): State<OrderLifecycleService>) -> ApiResult<impl IntoResponse> {
    Ok(Json(service.list_products().await?))
}

pub async fn admin_sales(State(service): State<OrderLifecycleService>) -> ApiResult<impl IntoResponse> {
    Ok(Json(service.compute_monthly_sales().await?))
}

pub async fn admin_messages(State(service): State<OrderLifecycleService>) -> ApiResult<impl IntoResponse> {
    Ok(Json(service.contact_messages().await?))
}

pub async fn admin_dead_letters(State(service): State<OrderLifecycleService>) -> impl IntoResponse {
    Json(service.dead_letters())
}

pub async fn update_order_status(
    State(service): State<OrderLifecycleService>,
    Path(order_id): Path<String>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let request = body(payload)?;
    let order = service.update_status(&order_id, &request.status).await?;
    Ok(Json(json!({ "message": "Order status updated successfully.", "order": order })))
}

pub async fn update_stock(
    State(service): State<OrderLifecycleService>,
    Path(product_id): Path<String>,
    payload: Result<Json<StockRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let request = body(payload)?;
    let stock = request
        .whole_stock()
        .ok_or_else(|| ApiError::bad_request("Invalid stock value provided."))?;
    let product = service.set_stock(&product_id, stock).await?;
    Ok(Json(json!({ "message": "Stock updated successfully.", "product": product })))
}
