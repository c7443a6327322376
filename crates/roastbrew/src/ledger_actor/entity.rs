//! [`ActorEntity`] implementation for [`Order`].
//!
//! The status policy arrives as the actor's run-time context, so the same
//! entity code serves both the permissive and the forward-only configuration.

use std::convert::Infallible;

use actor_framework::ActorEntity;
use async_trait::async_trait;
use tracing::info;

use super::actions::{LedgerAction, StatusChange};
use super::error::LedgerError;
use crate::model::{subtotal_of, NewOrder, Order, OrderId, OrderStatus, StatusPolicy};

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = NewOrder;
    type Update = Infallible;
    type Action = LedgerAction;
    type ActionResult = StatusChange;
    type Context = StatusPolicy;
    type Error = LedgerError;

    fn from_create_params(id: OrderId, params: NewOrder) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            customer_email: params.customer_email,
            line_items: params.line_items,
            subtotal: params.subtotal,
            shipping_cost: params.shipping_cost,
            total: params.total,
            shipping_address: params.shipping_address,
            payment_method: params.payment_method,
            placed_at: params.placed_at,
            status: OrderStatus::Placed,
        })
    }

    async fn on_create(&mut self, _policy: &StatusPolicy) -> Result<(), Self::Error> {
        if self.line_items.is_empty() {
            return Err(LedgerError::EmptyOrder);
        }
        let expected = subtotal_of(&self.line_items)
            .and_then(|subtotal| subtotal.checked_add(self.shipping_cost))
            .ok_or(LedgerError::TotalOverflow)?;
        if self.total != expected || self.subtotal.checked_add(self.shipping_cost) != Some(expected) {
            return Err(LedgerError::TotalMismatch {
                expected,
                actual: self.total,
            });
        }
        Ok(())
    }

    async fn on_update(&mut self, update: Infallible, _policy: &StatusPolicy) -> Result<(), Self::Error> {
        match update {}
    }

    async fn handle_action(
        &mut self,
        action: LedgerAction,
        policy: &StatusPolicy,
    ) -> Result<StatusChange, Self::Error> {
        match action {
            LedgerAction::SetStatus(next) => {
                let previous = self.status;
                if !policy.allows(previous, next) {
                    return Err(LedgerError::InvalidTransition {
                        from: previous,
                        to: next,
                    });
                }
                self.status = next;
                if previous != next {
                    info!(order = %self.id, from = %previous, to = %next, "Status changed");
                }
                Ok(StatusChange {
                    previous,
                    order: self.clone(),
                })
            }
        }
    }
}
