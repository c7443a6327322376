//! # Order Ledger Client
//!
//! Domain API over the ledger actor. The actor keeps orders oldest first; every
//! read here returns them newest first, which is how customers and staff
//! browse them.
use actor_framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::ledger_actor::{LedgerAction, LedgerError, StatusChange};
use crate::model::{normalize_email, NewOrder, Order, OrderId, OrderStatus};

#[derive(Clone)]
pub struct OrderLedger {
    inner: ResourceClient<Order>,
}

#[async_trait]
impl ActorClient<Order> for OrderLedger {
    type Error = LedgerError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<LedgerError>() {
            Ok(inner) => inner,
            Err(FrameworkError::NotFound(id)) => LedgerError::NotFound(id),
            Err(FrameworkError::AlreadyExists(id)) => LedgerError::DuplicateOrderId(id),
            Err(other) => LedgerError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl OrderLedger {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Records a new order under `id` with status `Order Placed`.
    #[instrument(skip(self, order), fields(customer = %order.customer_email))]
    pub async fn append(&self, id: OrderId, order: NewOrder) -> Result<Order, LedgerError> {
        let id = self.inner.create(id, order).await.map_err(Self::map_error)?;
        self.find_by_id(&id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    pub async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, LedgerError> {
        self.get(id.clone()).await
    }

    pub async fn contains(&self, id: &OrderId) -> Result<bool, LedgerError> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Orders placed by `email`, newest first.
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Vec<Order>, LedgerError> {
        let email = normalize_email(email);
        let mut orders = self
            .inner
            .query(Filter::new(move |o: &Order| o.customer_email == email))
            .await
            .map_err(Self::map_error)?;
        orders.reverse();
        debug!(count = orders.len(), "Orders for customer");
        Ok(orders)
    }

    /// Every order, newest first.
    pub async fn all(&self) -> Result<Vec<Order>, LedgerError> {
        let mut orders = self.list().await?;
        orders.reverse();
        Ok(orders)
    }

    /// Sets the status and reports what it was before.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<StatusChange, LedgerError> {
        self.inner
            .perform_action(id.clone(), LedgerAction::SetStatus(status))
            .await
            .map_err(Self::map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger_actor;
    use crate::model::{LineItem, PaymentMethod, ShippingAddress, StatusPolicy};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn ledger(policy: StatusPolicy) -> OrderLedger {
        let (actor, client) = ledger_actor::new();
        tokio::spawn(actor.run(policy));
        OrderLedger::new(client)
    }

    fn new_order(email: &str) -> NewOrder {
        NewOrder {
            customer_email: email.to_string(),
            line_items: vec![LineItem {
                product_id: None,
                product_name: "Sagada Amber".into(),
                unit_price: Decimal::new(120, 0),
                quantity: 1,
            }],
            subtotal: Decimal::new(120, 0),
            shipping_cost: Decimal::new(50, 0),
            total: Decimal::new(170, 0),
            shipping_address: ShippingAddress::default(),
            payment_method: PaymentMethod::ECash,
            placed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn reads_are_newest_first() {
        let ledger = ledger(StatusPolicy::Permissive);
        for (id, email) in [("RAB-000001", "a@b.ph"), ("RAB-000002", "c@d.ph"), ("RAB-000003", "a@b.ph")] {
            ledger.append(OrderId::new(id), new_order(email)).await.unwrap();
        }

        let ids: Vec<_> = ledger.all().await.unwrap().into_iter().map(|o| o.id.0).collect();
        assert_eq!(ids, ["RAB-000003", "RAB-000002", "RAB-000001"]);

        let mine: Vec<_> = ledger
            .find_by_email("A@B.ph")
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id.0)
            .collect();
        assert_eq!(mine, ["RAB-000003", "RAB-000001"]);
    }

    #[tokio::test]
    async fn duplicate_id_is_refused() {
        let ledger = ledger(StatusPolicy::Permissive);
        let id = OrderId::new("RAB-123456");
        ledger.append(id.clone(), new_order("a@b.ph")).await.unwrap();
        assert_eq!(
            ledger.append(id, new_order("x@y.ph")).await,
            Err(LedgerError::DuplicateOrderId("RAB-123456".into()))
        );
    }

    #[tokio::test]
    async fn inconsistent_total_is_refused() {
        let ledger = ledger(StatusPolicy::Permissive);
        let mut order = new_order("a@b.ph");
        order.total = Decimal::new(1, 0);
        let result = ledger.append(OrderId::new("RAB-000009"), order).await;
        assert!(matches!(result, Err(LedgerError::TotalMismatch { .. })));
        assert!(!ledger.contains(&OrderId::new("RAB-000009")).await.unwrap());
    }

    #[tokio::test]
    async fn overflowing_total_is_refused_and_ledger_keeps_running() {
        let ledger = ledger(StatusPolicy::Permissive);
        let mut order = new_order("a@b.ph");
        order.line_items[0].unit_price = Decimal::MAX;
        order.line_items[0].quantity = 2;

        let result = ledger.append(OrderId::new("RAB-000011"), order).await;
        assert_eq!(result, Err(LedgerError::TotalOverflow));

        ledger
            .append(OrderId::new("RAB-000012"), new_order("a@b.ph"))
            .await
            .unwrap();
        assert_eq!(ledger.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_status_reports_previous() {
        let ledger = ledger(StatusPolicy::Permissive);
        let id = OrderId::new("RAB-000010");
        ledger.append(id.clone(), new_order("a@b.ph")).await.unwrap();

        let change = ledger.update_status(&id, OrderStatus::OutForDelivery).await.unwrap();
        assert_eq!(change.previous, OrderStatus::Placed);
        assert_eq!(change.order.status, OrderStatus::OutForDelivery);
        assert!(change.changed());

        let again = ledger.update_status(&id, OrderStatus::OutForDelivery).await.unwrap();
        assert!(!again.changed());
    }

    #[tokio::test]
    async fn strict_ledger_refuses_backwards_moves() {
        let ledger = ledger(StatusPolicy::Strict);
        let id = OrderId::new("RAB-000011");
        ledger.append(id.clone(), new_order("a@b.ph")).await.unwrap();
        ledger.update_status(&id, OrderStatus::Delivered).await.unwrap();

        let result = ledger.update_status(&id, OrderStatus::ProcessingBrews).await;
        assert_eq!(
            result.unwrap_err(),
            LedgerError::InvalidTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::ProcessingBrews,
            }
        );
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let ledger = ledger(StatusPolicy::Permissive);
        let result = ledger
            .update_status(&OrderId::new("RAB-404404"), OrderStatus::Delivered)
            .await;
        assert_eq!(result.unwrap_err(), LedgerError::NotFound("RAB-404404".into()));
    }
}
