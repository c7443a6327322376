use std::sync::Arc;
use std::time::Duration;

use roastbrew::config::AppConfig;
use roastbrew::error::StoreError;
use roastbrew::lifecycle::{
    CartItem, Checkout, CustomerSession, NotificationOutcome, OrderLifecycleService, OrderSystem,
};
use roastbrew::model::{OrderStatus, ProductCreate, ProductId, ShippingAddress, StatusPolicy};
use roastbrew::notify::{MailKind, MemoryTransport};
use rust_decimal::Decimal;

fn config(policy: StatusPolicy) -> AppConfig {
    let mut config = AppConfig::default();
    config.orders.status_policy = policy;
    config.mail.max_attempts = 2;
    config.mail.retry_base = Duration::from_millis(1);
    config
}

fn catalog() -> Vec<(ProductId, ProductCreate)> {
    [("P001", "A", 10), ("P002", "B", 1), ("P003", "Ifugao IPA", 130)]
        .into_iter()
        .map(|(id, name, stock)| {
            (
                ProductId::new(id),
                ProductCreate {
                    name: name.to_string(),
                    stock,
                },
            )
        })
        .collect()
}

async fn start(policy: StatusPolicy, transport: &MemoryTransport) -> OrderSystem {
    OrderSystem::start_with(&config(policy), Arc::new(transport.clone()), catalog()).await
}

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Maria Clara".into(),
        address_line1: "12 Session Rd".into(),
        address_line2: None,
        city: "Baguio".into(),
        state: "Benguet".into(),
        zip: "2600".into(),
        country: "PH".into(),
    }
}

fn checkout(items: Vec<CartItem>) -> Checkout {
    Checkout {
        items,
        shipping_address: address(),
        payment_method: "E-Cash".into(),
    }
}

async fn customer(service: &OrderLifecycleService, email: &str) -> CustomerSession {
    service
        .register_account("Maria Clara", email, "kape-at-beer")
        .await
        .expect("Failed to register");
    service
        .customer_session(email)
        .await
        .expect("Failed to open session")
}

async fn stock_of(service: &OrderLifecycleService, name: &str) -> u32 {
    service
        .list_products()
        .await
        .expect("Failed to list products")
        .into_iter()
        .find(|p| p.name == name)
        .expect("Product not found")
        .stock
}

#[tokio::test]
async fn placing_an_order_prices_the_cart_and_takes_stock() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();
    let session = customer(&service, "maria@clara.ph").await;

    let placed = service
        .place_order(&session, checkout(vec![CartItem::new("A", Decimal::new(10, 0), 2)]))
        .await
        .expect("Failed to place order");

    assert_eq!(placed.notification, NotificationOutcome::Queued);
    assert_eq!(placed.order.subtotal, Decimal::new(20, 0));
    assert_eq!(placed.order.shipping_cost, Decimal::new(50, 0));
    assert_eq!(placed.order.total, Decimal::new(70, 0));
    assert_eq!(placed.order.status, OrderStatus::Placed);
    assert_eq!(placed.order.customer_email, "maria@clara.ph");
    assert!(placed.order.id.as_str().starts_with("RAB-"));
    assert_eq!(stock_of(&service, "A").await, 8);

    service.flush_notifications().await.expect("Failed to flush");
    let confirmations = transport.sent_of(MailKind::OrderConfirmation);
    assert_eq!(confirmations.len(), 1);
    assert_eq!(confirmations[0].to, "maria@clara.ph");
    assert!(confirmations[0].subject.contains(placed.order.id.as_str()));
}

#[tokio::test]
async fn stock_is_clamped_at_zero() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();
    let session = customer(&service, "maria@clara.ph").await;

    service
        .place_order(&session, checkout(vec![CartItem::new("B", Decimal::new(10, 0), 5)]))
        .await
        .expect("Failed to place order");
    assert_eq!(stock_of(&service, "B").await, 0);
}

#[tokio::test]
async fn line_items_with_a_product_id_decrement_by_id() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();
    let session = customer(&service, "maria@clara.ph").await;

    // The name is stale; the id still finds the product.
    let item = CartItem::new("Ifugao India Pale Ale", Decimal::new(150, 0), 3)
        .with_product_id(ProductId::new("P003"));
    service
        .place_order(&session, checkout(vec![item]))
        .await
        .expect("Failed to place order");
    assert_eq!(stock_of(&service, "Ifugao IPA").await, 127);
}

#[tokio::test]
async fn unknown_products_leave_stock_alone() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();
    let session = customer(&service, "maria@clara.ph").await;

    let placed = service
        .place_order(&session, checkout(vec![CartItem::new("Mystery Mead", Decimal::new(99, 0), 1)]))
        .await
        .expect("Failed to place order");
    assert_eq!(placed.order.total, Decimal::new(149, 0));
    assert_eq!(stock_of(&service, "A").await, 10);
}

#[tokio::test]
async fn back_to_back_orders_get_distinct_ids() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();
    let session = customer(&service, "maria@clara.ph").await;

    let first = service
        .place_order(&session, checkout(vec![CartItem::new("A", Decimal::ONE, 1)]))
        .await
        .expect("Failed to place first order");
    let second = service
        .place_order(&session, checkout(vec![CartItem::new("A", Decimal::ONE, 1)]))
        .await
        .expect("Failed to place second order");
    assert_ne!(first.order.id, second.order.id);

    let history = service
        .list_orders_for_customer("Maria@Clara.ph")
        .await
        .expect("Failed to list orders");
    let ids: Vec<_> = history.into_iter().map(|o| o.id).collect();
    assert_eq!(ids, [second.order.id, first.order.id]);
}

#[tokio::test]
async fn invalid_checkout_changes_nothing() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();
    let session = customer(&service, "maria@clara.ph").await;

    let result = service
        .place_order(
            &session,
            checkout(vec![
                CartItem::new("A", Decimal::new(10, 0), 2),
                CartItem::new("B", Decimal::new(10, 0), 0),
            ]),
        )
        .await;
    assert!(matches!(result, Err(StoreError::InvalidInput(_))));
    assert_eq!(stock_of(&service, "A").await, 10);
    assert!(service.admin_orders().await.expect("Failed to list").is_empty());
}

#[tokio::test]
async fn cart_too_large_to_price_is_rejected_before_stock_moves() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();
    let session = customer(&service, "maria@clara.ph").await;

    let result = service
        .place_order(
            &session,
            checkout(vec![CartItem::new("A", Decimal::MAX, 2)]),
        )
        .await;
    assert_eq!(
        result.err(),
        Some(StoreError::InvalidInput("Order total is too large.".into()))
    );
    assert_eq!(stock_of(&service, "A").await, 10);
    assert!(service.admin_orders().await.expect("Failed to list").is_empty());
}

#[tokio::test]
async fn checkout_requires_a_registered_customer() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();

    assert!(matches!(
        service.customer_session("stranger@b.ph").await,
        Err(StoreError::Unauthenticated(_))
    ));
    assert!(matches!(
        service.customer_session("  ").await,
        Err(StoreError::Unauthenticated(_))
    ));
}

#[tokio::test]
async fn repeated_status_update_sends_one_mail() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();
    let session = customer(&service, "maria@clara.ph").await;
    let placed = service
        .place_order(&session, checkout(vec![CartItem::new("A", Decimal::ONE, 1)]))
        .await
        .expect("Failed to place order");
    let id = placed.order.id.as_str();

    for _ in 0..2 {
        let order = service
            .update_status(id, "Out for Delivery")
            .await
            .expect("Failed to update status");
        assert_eq!(order.status, OrderStatus::OutForDelivery);
    }
    service
        .update_status(id, "Processing Brews")
        .await
        .expect("Failed to update status");
    service.flush_notifications().await.expect("Failed to flush");

    assert_eq!(transport.sent_of(MailKind::OutForDelivery).len(), 1);
    assert!(transport.sent_of(MailKind::Delivered).is_empty());
}

#[tokio::test]
async fn unknown_status_and_unknown_order_are_rejected() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();

    assert!(matches!(
        service.update_status("RAB-000000", "Shipped").await,
        Err(StoreError::InvalidInput(_))
    ));
    assert_eq!(
        service.update_status("RAB-000000", "Delivered").await.err(),
        Some(StoreError::not_found("Order not found"))
    );
}

#[tokio::test]
async fn strict_policy_refuses_backward_moves() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Strict, &transport).await;
    let service = system.service();
    let session = customer(&service, "maria@clara.ph").await;
    let placed = service
        .place_order(&session, checkout(vec![CartItem::new("A", Decimal::ONE, 1)]))
        .await
        .expect("Failed to place order");
    let id = placed.order.id.as_str();

    service.update_status(id, "Delivered").await.expect("Failed to deliver");
    let result = service.update_status(id, "Processing Brews").await;
    assert!(matches!(result, Err(StoreError::InvalidInput(_))));

    let tracked = service.track_order(id, None).await.expect("Failed to track");
    assert_eq!(tracked.status, OrderStatus::Delivered);
}

#[tokio::test]
async fn permissive_policy_allows_backward_moves_without_mail() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();
    let session = customer(&service, "maria@clara.ph").await;
    let placed = service
        .place_order(&session, checkout(vec![CartItem::new("A", Decimal::ONE, 1)]))
        .await
        .expect("Failed to place order");
    let id = placed.order.id.as_str();

    service.update_status(id, "Delivered").await.expect("Failed to deliver");
    let order = service
        .update_status(id, "Processing Brews")
        .await
        .expect("Failed to move back");
    assert_eq!(order.status, OrderStatus::ProcessingBrews);

    service.flush_notifications().await.expect("Failed to flush");
    assert_eq!(transport.sent_of(MailKind::Delivered).len(), 1);
}

#[tokio::test]
async fn tracking_with_email_hides_other_customers_orders() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();
    let session = customer(&service, "maria@clara.ph").await;
    let placed = service
        .place_order(&session, checkout(vec![CartItem::new("A", Decimal::ONE, 1)]))
        .await
        .expect("Failed to place order");
    let id = placed.order.id.as_str();

    assert_eq!(
        service.track_order(id, Some("x@y.com")).await.err(),
        Some(StoreError::not_found("Order not found"))
    );
    let tracked = service
        .track_order(id, Some("MARIA@clara.ph"))
        .await
        .expect("Failed to track");
    assert_eq!(tracked.email, "maria@clara.ph");
    assert_eq!(tracked.total, Decimal::new(51, 0));
}

#[tokio::test]
async fn accounts_register_once_and_check_passwords() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();

    let profile = service
        .register_account("Jose Rizal", "jose@calamba.ph", "noli-me-tangere")
        .await
        .expect("Failed to register");
    assert!(matches!(
        service
            .register_account("Impostor", "JOSE@calamba.ph", "x")
            .await,
        Err(StoreError::Conflict(_))
    ));
    assert!(matches!(
        service.sign_in("jose@calamba.ph", "el-filibusterismo").await,
        Err(StoreError::Unauthorized(_))
    ));
    assert!(matches!(
        service.sign_in("nobody@calamba.ph", "x").await,
        Err(StoreError::NotFound(_))
    ));
    assert_eq!(
        service
            .sign_in("jose@calamba.ph", "noli-me-tangere")
            .await
            .expect("Failed to sign in"),
        profile
    );

    service.flush_notifications().await.expect("Failed to flush");
    let welcome = transport.sent_of(MailKind::Welcome);
    assert_eq!(welcome.len(), 1);
    assert_eq!(welcome[0].subject, "Welcome to the Roast & Brew Family, Jose Rizal!");
}

#[tokio::test]
async fn monthly_sales_add_up_quantities_by_name() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();
    let session = customer(&service, "maria@clara.ph").await;

    for _ in 0..2 {
        service
            .place_order(&session, checkout(vec![CartItem::new("A", Decimal::new(10, 0), 3)]))
            .await
            .expect("Failed to place order");
    }

    let sales = service.compute_monthly_sales().await.expect("Failed to compute sales");
    assert_eq!(sales.len(), 1);
    assert_eq!(sales["A"], 6);
}

#[tokio::test]
async fn failing_mail_keeps_the_order_and_dead_letters_the_job() {
    let transport = MemoryTransport::new();
    transport.set_failing(true);
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();
    let session = customer(&service, "maria@clara.ph").await;

    let placed = service
        .place_order(&session, checkout(vec![CartItem::new("A", Decimal::ONE, 1)]))
        .await
        .expect("Failed to place order");
    service.flush_notifications().await.expect("Failed to flush");

    let stored = service
        .find_order(placed.order.id.as_str())
        .await
        .expect("Failed to read ledger");
    assert!(stored.is_some());

    let dead = service.dead_letters();
    // Welcome mail and order confirmation, both after two attempts.
    assert_eq!(dead.len(), 2);
    assert!(dead.iter().all(|d| d.attempts == 2));
    assert!(dead
        .iter()
        .any(|d| d.notification.contains(placed.order.id.as_str())));
}

#[tokio::test]
async fn contact_message_is_kept_when_mail_fails() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();

    let (_, sent) = service
        .submit_contact_message("Ben", "ben@b.ph", "Do you ship to Cebu?")
        .await
        .expect("Failed to submit");
    assert_eq!(sent, Ok(()));
    assert_eq!(transport.sent_of(MailKind::ContactAdminCopy).len(), 1);
    assert_eq!(transport.sent_of(MailKind::ContactAutoReply).len(), 1);

    transport.set_failing(true);
    let (_, sent) = service
        .submit_contact_message("Ana", "ana@b.ph", "Hello")
        .await
        .expect("Failed to submit");
    assert!(matches!(sent, Err(StoreError::NotificationFailed(_))));

    let messages = service.contact_messages().await.expect("Failed to list");
    let names: Vec<_> = messages.into_iter().map(|m| m.name).collect();
    assert_eq!(names, ["Ana", "Ben"]);
}

#[tokio::test]
async fn admin_rows_summarise_each_order() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();
    let session = customer(&service, "maria@clara.ph").await;

    service
        .place_order(
            &session,
            checkout(vec![
                CartItem::new("A", Decimal::ONE, 2),
                CartItem::new("Ifugao IPA", Decimal::ONE, 1),
            ]),
        )
        .await
        .expect("Failed to place order");

    let rows = service.admin_orders().await.expect("Failed to list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].customer_name, "Maria Clara");
    assert_eq!(rows[0].product, "A (x2), Ifugao IPA (x1)");
    assert_eq!(rows[0].quantity, 3);
}

#[tokio::test]
async fn admin_rows_count_huge_quantities_without_wrapping() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();
    let session = customer(&service, "maria@clara.ph").await;

    let most = i64::from(u32::MAX);
    service
        .place_order(
            &session,
            checkout(vec![
                CartItem::new("X", Decimal::new(1, 2), most),
                CartItem::new("Y", Decimal::new(1, 2), most),
            ]),
        )
        .await
        .expect("Failed to place order");

    let rows = service.admin_orders().await.expect("Failed to list");
    assert_eq!(rows[0].quantity, 2 * u64::from(u32::MAX));
}

#[tokio::test]
async fn shutdown_drains_and_stops_every_task() {
    let transport = MemoryTransport::new();
    let system = start(StatusPolicy::Permissive, &transport).await;
    let service = system.service();
    service
        .register_account("Ana", "ana@b.ph", "pw")
        .await
        .expect("Failed to register");
    drop(service);

    tokio::time::timeout(Duration::from_secs(5), system.shutdown())
        .await
        .expect("Shutdown timed out")
        .expect("Shutdown failed");
    assert_eq!(transport.sent_of(MailKind::Welcome).len(), 1);
}
