//! [`ActorEntity`] implementation for [`Product`].

use actor_framework::ActorEntity;
use async_trait::async_trait;
use tracing::debug;

use super::actions::InventoryAction;
use super::error::InventoryError;
use crate::model::{Product, ProductCreate, ProductId, StockUpdate};

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = StockUpdate;
    type Action = InventoryAction;
    type ActionResult = u32;
    type Context = ();
    type Error = InventoryError;

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            name: params.name,
            stock: params.stock,
        })
    }

    async fn on_update(&mut self, update: StockUpdate, _ctx: &()) -> Result<(), Self::Error> {
        debug!(product = %self.id, from = self.stock, to = update.stock, "Stock set");
        self.stock = update.stock;
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: InventoryAction,
        _ctx: &(),
    ) -> Result<u32, Self::Error> {
        match action {
            InventoryAction::Decrement(quantity) => {
                self.stock = self.stock.saturating_sub(quantity);
                Ok(self.stock)
            }
        }
    }
}
