//! # Order Lifecycle Service
//!
//! The one entry point the HTTP layer talks to. It owns the rules that span
//! stores: pricing a checkout, taking stock, recording the order and queueing
//! the mail that follows each step.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use super::checkout::{Checkout, CustomerSession, NotificationOutcome, PlacedOrder};
use super::order_id::OrderIdGenerator;
use crate::clients::{AccountDirectory, Inbox, InventoryStore, OrderLedger};
use crate::error::StoreError;
use crate::ledger_actor::LedgerError;
use crate::model::{
    normalize_email, AdminOrderRow, ContactMessage, NewOrder, Order, OrderId, OrderStatus,
    OrderSummary, Product, ProductId, Profile, TrackedOrder,
};
use crate::notify::{DeadLetter, Notification, NotificationDispatcher, NotificationQueue};

/// How many fresh ids to try before giving up on a colliding order number.
const MAX_ID_ATTEMPTS: usize = 16;

/// Cheap to clone; every clone talks to the same stores.
#[derive(Clone)]
pub struct OrderLifecycleService {
    inventory: InventoryStore,
    accounts: AccountDirectory,
    ledger: OrderLedger,
    inbox: Inbox,
    dispatcher: NotificationDispatcher,
    notifications: NotificationQueue,
    order_ids: OrderIdGenerator,
    shipping_fee: Decimal,
}

/// Stores and collaborators the service is built from.
pub struct ServiceParts {
    pub inventory: InventoryStore,
    pub accounts: AccountDirectory,
    pub ledger: OrderLedger,
    pub inbox: Inbox,
    pub dispatcher: NotificationDispatcher,
    pub notifications: NotificationQueue,
    pub order_ids: OrderIdGenerator,
    pub shipping_fee: Decimal,
}

impl OrderLifecycleService {
    pub fn new(parts: ServiceParts) -> Self {
        Self {
            inventory: parts.inventory,
            accounts: parts.accounts,
            ledger: parts.ledger,
            inbox: parts.inbox,
            dispatcher: parts.dispatcher,
            notifications: parts.notifications,
            order_ids: parts.order_ids,
            shipping_fee: parts.shipping_fee,
        }
    }

    // --- Orders ---

    /// Places an order for a signed-in customer.
    ///
    /// Client-side totals are never trusted: the order is priced from the cart
    /// plus the configured shipping fee. Validation and pricing complete before
    /// anything is written, and the order is recorded before any stock moves.
    /// A confirmation that cannot be queued leaves the order in place and is
    /// reported through [`PlacedOrder::notification`].
    #[instrument(skip(self, session, checkout), fields(customer = %session.email()))]
    pub async fn place_order(
        &self,
        session: &CustomerSession,
        checkout: Checkout,
    ) -> Result<PlacedOrder, StoreError> {
        let valid = checkout.validate(self.shipping_fee)?;
        let new_order = valid.into_new_order(session.email().to_string(), Utc::now());
        let order = self.record_order(new_order).await?;
        info!(order_id = %order.id, total = %order.total, "Order placed");

        for item in &order.line_items {
            match &item.product_id {
                Some(product_id) => {
                    self.inventory
                        .decrement_stock_by_id(product_id, item.quantity)
                        .await?;
                }
                None => {
                    self.inventory
                        .decrement_stock(&item.product_name, item.quantity)
                        .await?;
                }
            }
        }

        let notification = match self
            .notifications
            .enqueue(Notification::OrderConfirmation(order.clone()))
        {
            Ok(()) => NotificationOutcome::Queued,
            Err(e) => {
                warn!(order_id = %order.id, error = %e, "Could not queue order confirmation");
                NotificationOutcome::Failed(e.to_string())
            }
        };

        Ok(PlacedOrder {
            order,
            notification,
        })
    }

    /// Appends under a fresh order id. Ids already in the ledger, including
    /// one taken between the lookup and the insert, are skipped.
    async fn record_order(&self, new_order: NewOrder) -> Result<Order, StoreError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.order_ids.next_id();
            if self.ledger.contains(&id).await? {
                warn!(order_id = %id, "Order id already taken; drawing another");
                continue;
            }
            match self.ledger.append(id.clone(), new_order.clone()).await {
                Ok(order) => return Ok(order),
                Err(LedgerError::DuplicateOrderId(_)) => {
                    warn!(order_id = %id, "Order id taken while recording; drawing another");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(StoreError::Internal(
            "Could not allocate a unique order id".to_string(),
        ))
    }

    /// Sets an order's status from its customer-facing label.
    ///
    /// Customers are mailed only when the status actually changes to
    /// `Out for Delivery` or `Delivered`; a failure to queue that mail is
    /// logged and does not affect the update.
    #[instrument(skip(self))]
    pub async fn update_status(&self, order_id: &str, status: &str) -> Result<Order, StoreError> {
        let status: OrderStatus = status
            .parse()
            .map_err(|_| StoreError::invalid(format!("Invalid status: {status}")))?;
        let change = self
            .ledger
            .update_status(&OrderId::new(order_id.trim()), status)
            .await?;
        info!(
            order_id,
            from = %change.previous,
            to = %status,
            "Order status updated"
        );

        if change.changed() && status.notifies_customer() {
            let notification = Notification::StatusUpdate {
                order: change.order.clone(),
                status,
            };
            if let Err(e) = self.notifications.enqueue(notification) {
                warn!(order_id, error = %e, "Could not queue status update mail");
            }
        }

        Ok(change.order)
    }

    /// Public tracking lookup. With `require_email`, an order owned by someone
    /// else is reported exactly like a missing one.
    #[instrument(skip(self))]
    pub async fn track_order(
        &self,
        order_id: &str,
        require_email: Option<&str>,
    ) -> Result<TrackedOrder, StoreError> {
        let order = self
            .ledger
            .find_by_id(&OrderId::new(order_id.trim()))
            .await?
            .ok_or_else(|| StoreError::not_found("Order not found"))?;

        if let Some(email) = require_email {
            if normalize_email(email) != order.customer_email {
                return Err(StoreError::not_found("Order not found"));
            }
        }
        Ok(order.tracking())
    }

    /// Order history for one customer, newest first.
    pub async fn list_orders_for_customer(&self, email: &str) -> Result<Vec<OrderSummary>, StoreError> {
        if email.trim().is_empty() {
            return Err(StoreError::invalid("Email parameter is required."));
        }
        let orders = self.ledger.find_by_email(email).await?;
        Ok(orders.iter().map(Order::summary).collect())
    }

    /// Units sold per product name across the whole ledger.
    pub async fn compute_monthly_sales(&self) -> Result<BTreeMap<String, u64>, StoreError> {
        let mut sales = BTreeMap::new();
        for order in self.ledger.all().await? {
            for item in &order.line_items {
                *sales.entry(item.product_name.clone()).or_insert(0) += u64::from(item.quantity);
            }
        }
        Ok(sales)
    }

    pub async fn admin_orders(&self) -> Result<Vec<AdminOrderRow>, StoreError> {
        let orders = self.ledger.all().await?;
        Ok(orders.iter().map(Order::admin_row).collect())
    }

    pub async fn find_order(&self, order_id: &str) -> Result<Option<Order>, StoreError> {
        Ok(self.ledger.find_by_id(&OrderId::new(order_id.trim())).await?)
    }

    // --- Accounts ---

    /// Creates an account and queues the welcome mail. A mail that cannot be
    /// queued is logged; the account stands.
    pub async fn register_account(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Profile, StoreError> {
        let profile = self.accounts.register(full_name, email, password).await?;
        if let Err(e) = self
            .notifications
            .enqueue(Notification::Welcome(profile.clone()))
        {
            warn!(email = %profile.email, error = %e, "Could not queue welcome mail");
        }
        Ok(profile)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Profile, StoreError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(StoreError::invalid("Email and password are required."));
        }
        Ok(self.accounts.authenticate(email, password).await?)
    }

    /// Resolves the customer placing an order. Blank or unregistered emails
    /// are [`StoreError::Unauthenticated`].
    pub async fn customer_session(&self, email: &str) -> Result<CustomerSession, StoreError> {
        match self.accounts.find(email).await? {
            Some(profile) => Ok(CustomerSession::new(profile)),
            None => Err(StoreError::Unauthenticated(
                "Please sign in before placing an order.".to_string(),
            )),
        }
    }

    // --- Catalogue ---

    pub async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.inventory.list_products().await?)
    }

    pub async fn set_stock(&self, product_id: &str, new_stock: i64) -> Result<Product, StoreError> {
        let product = self
            .inventory
            .set_stock(&ProductId::new(product_id.trim()), new_stock)
            .await?;
        info!(product = %product.id, stock = product.stock, "Stock updated");
        Ok(product)
    }

    // --- Contact form ---

    /// Stores the message, then sends the store copy and the auto-reply.
    ///
    /// The message is kept even when mail fails; the error is returned
    /// alongside it so the caller can report a partial success.
    #[instrument(skip(self, message))]
    pub async fn submit_contact_message(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<(ContactMessage, Result<(), StoreError>), StoreError> {
        let stored = self.inbox.record(name, email, message).await?;
        let sent = self
            .dispatcher
            .send_contact_copies(&stored)
            .await
            .map_err(StoreError::from);
        Ok((stored, sent))
    }

    pub async fn contact_messages(&self) -> Result<Vec<ContactMessage>, StoreError> {
        Ok(self.inbox.messages().await?)
    }

    // --- Notifications ---

    pub fn dead_letters(&self) -> Vec<DeadLetter> {
        self.notifications.dead_letters()
    }

    /// Waits for queued mail to be delivered or dead-lettered.
    pub async fn flush_notifications(&self) -> Result<(), StoreError> {
        Ok(self.notifications.flush().await?)
    }
}
