//! # Notification Dispatcher
//!
//! Turns order and account events into rendered mail and hands it to a
//! [`MailTransport`]. Every send is bounded by the configured timeout.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use super::error::NotifyError;
use super::templates::{self, Letterhead};
use super::transport::{MailTransport, OutboundMail};
use crate::model::{ContactMessage, Order, OrderStatus, Profile};

#[derive(Clone)]
pub struct NotificationDispatcher {
    transport: Arc<dyn MailTransport>,
    letterhead: Letterhead,
    send_timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn MailTransport>, letterhead: Letterhead, send_timeout: Duration) -> Self {
        Self {
            transport,
            letterhead,
            send_timeout,
        }
    }

    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn send_order_confirmation(&self, order: &Order) -> Result<(), NotifyError> {
        let mail = templates::order_confirmation(&self.letterhead, order)?;
        self.deliver(&mail).await
    }

    /// Mails the customer when `status` is one they are told about.
    ///
    /// Returns `Ok(false)` without sending anything for the other statuses.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn send_status_update(&self, order: &Order, status: OrderStatus) -> Result<bool, NotifyError> {
        match templates::status_update(&self.letterhead, order, status)? {
            Some(mail) => {
                self.deliver(&mail).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[instrument(skip(self, profile), fields(email = %profile.email))]
    pub async fn send_welcome(&self, profile: &Profile) -> Result<(), NotifyError> {
        let mail = templates::welcome(&self.letterhead, profile)?;
        self.deliver(&mail).await
    }

    /// Sends the store copy and the auto-reply concurrently.
    ///
    /// Fails if either one fails.
    #[instrument(skip(self, contact), fields(from = %contact.email))]
    pub async fn send_contact_copies(&self, contact: &ContactMessage) -> Result<(), NotifyError> {
        let admin_copy = templates::contact_admin_copy(&self.letterhead, contact)?;
        let auto_reply = templates::contact_auto_reply(&self.letterhead, contact)?;
        tokio::try_join!(self.deliver(&admin_copy), self.deliver(&auto_reply))?;
        Ok(())
    }

    async fn deliver(&self, mail: &OutboundMail) -> Result<(), NotifyError> {
        match tokio::time::timeout(self.send_timeout, self.transport.send(mail)).await {
            Ok(Ok(())) => {
                info!(kind = ?mail.kind, to = %mail.to, "Notification delivered");
                Ok(())
            }
            Ok(Err(e)) => {
                warn!(kind = ?mail.kind, to = %mail.to, error = %e, "Notification failed");
                Err(e)
            }
            Err(_) => {
                warn!(kind = ?mail.kind, to = %mail.to, "Notification timed out");
                Err(NotifyError::Timeout(self.send_timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LineItem, MessageId, OrderId, PaymentMethod, ShippingAddress};
    use crate::notify::transport::{MailKind, MemoryTransport};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn dispatcher(transport: &MemoryTransport, timeout: Duration) -> NotificationDispatcher {
        NotificationDispatcher::new(Arc::new(transport.clone()), Letterhead::default(), timeout)
    }

    fn order() -> Order {
        Order {
            id: OrderId::new("RAB-000001"),
            customer_email: "ana@b.ph".into(),
            line_items: vec![LineItem {
                product_id: None,
                product_name: "Ifugao IPA".into(),
                unit_price: Decimal::new(150, 0),
                quantity: 1,
            }],
            subtotal: Decimal::new(150, 0),
            shipping_cost: Decimal::new(50, 0),
            total: Decimal::new(200, 0),
            shipping_address: ShippingAddress::default(),
            payment_method: PaymentMethod::ECash,
            placed_at: Utc::now(),
            status: OrderStatus::Placed,
        }
    }

    #[tokio::test]
    async fn processing_status_sends_nothing() {
        let transport = MemoryTransport::new();
        let dispatcher = dispatcher(&transport, Duration::from_secs(1));

        let sent = dispatcher
            .send_status_update(&order(), OrderStatus::ProcessingBrews)
            .await
            .unwrap();
        assert!(!sent);
        assert_eq!(transport.attempts(), 0);

        assert!(dispatcher
            .send_status_update(&order(), OrderStatus::Delivered)
            .await
            .unwrap());
        assert_eq!(transport.sent_of(MailKind::Delivered).len(), 1);
    }

    #[tokio::test]
    async fn slow_transport_times_out() {
        let transport = MemoryTransport::new().with_delay(Duration::from_millis(200));
        let dispatcher = dispatcher(&transport, Duration::from_millis(20));

        let result = dispatcher.send_order_confirmation(&order()).await;
        assert!(matches!(result, Err(NotifyError::Timeout(_))));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn contact_copies_go_out_together() {
        let transport = MemoryTransport::new();
        let dispatcher = dispatcher(&transport, Duration::from_secs(1));
        let contact = ContactMessage {
            id: MessageId(1),
            name: "Ben".into(),
            email: "ben@b.ph".into(),
            message: "Hello".into(),
            received_at: Utc::now(),
        };

        dispatcher.send_contact_copies(&contact).await.unwrap();
        assert_eq!(transport.sent_of(MailKind::ContactAdminCopy).len(), 1);
        assert_eq!(transport.sent_of(MailKind::ContactAutoReply).len(), 1);

        transport.set_failing(true);
        assert!(dispatcher.send_contact_copies(&contact).await.is_err());
    }
}
