use crate::model::{Order, OrderStatus};

#[derive(Debug, Clone, Copy)]
pub enum LedgerAction {
    /// Moves the order to a new status, subject to the ledger's [`StatusPolicy`](crate::model::StatusPolicy).
    SetStatus(OrderStatus),
}

/// Outcome of [`LedgerAction::SetStatus`].
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub previous: OrderStatus,
    pub order: Order,
}

impl StatusChange {
    /// True when the status actually moved.
    pub fn changed(&self) -> bool {
        self.previous != self.order.status
    }
}
