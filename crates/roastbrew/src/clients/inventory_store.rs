//! # Inventory Store
//!
//! Domain API over the inventory actor.
use actor_framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::inventory_actor::{InventoryAction, InventoryError};
use crate::model::{Product, ProductCreate, ProductId, StockUpdate};

#[derive(Clone)]
pub struct InventoryStore {
    inner: ResourceClient<Product>,
}

#[async_trait]
impl ActorClient<Product> for InventoryStore {
    type Error = InventoryError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<InventoryError>() {
            Ok(inner) => inner,
            Err(FrameworkError::NotFound(id)) => InventoryError::NotFound(id),
            Err(FrameworkError::AlreadyExists(id)) => InventoryError::DuplicateProduct(id),
            Err(other) => InventoryError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl InventoryStore {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn add_product(
        &self,
        id: ProductId,
        params: ProductCreate,
    ) -> Result<ProductId, InventoryError> {
        self.inner.create(id, params).await.map_err(Self::map_error)
    }

    /// All products in catalogue order.
    pub async fn list_products(&self) -> Result<Vec<Product>, InventoryError> {
        self.list().await
    }

    /// Decrements the first product whose name matches exactly.
    ///
    /// An unknown name is not an error: the line item may describe a product
    /// that has since been renamed. Returns the new stock, or `None` when
    /// nothing matched.
    #[instrument(skip(self))]
    pub async fn decrement_stock(&self, name: &str, quantity: u32) -> Result<Option<u32>, InventoryError> {
        let wanted = name.to_string();
        let matches = self
            .inner
            .query(Filter::new(move |p: &Product| p.name == wanted))
            .await
            .map_err(Self::map_error)?;

        match matches.into_iter().next() {
            Some(product) => self.decrement_stock_by_id(&product.id, quantity).await,
            None => {
                warn!(product = name, "No product with this name; stock unchanged");
                Ok(None)
            }
        }
    }

    /// Decrements by stable id, clamping at zero. `None` when the id is unknown.
    #[instrument(skip(self))]
    pub async fn decrement_stock_by_id(
        &self,
        id: &ProductId,
        quantity: u32,
    ) -> Result<Option<u32>, InventoryError> {
        match self
            .inner
            .perform_action(id.clone(), InventoryAction::Decrement(quantity))
            .await
        {
            Ok(stock) => {
                debug!(product = %id, stock, "Stock decremented");
                Ok(Some(stock))
            }
            Err(FrameworkError::NotFound(_)) => {
                warn!(product = %id, "Unknown product id; stock unchanged");
                Ok(None)
            }
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Replaces the stock level of a product.
    ///
    /// `new_stock` arrives as a signed number from the admin form; negative
    /// values and values beyond `u32::MAX` are rejected before touching the store.
    #[instrument(skip(self))]
    pub async fn set_stock(&self, id: &ProductId, new_stock: i64) -> Result<Product, InventoryError> {
        let stock = u32::try_from(new_stock).map_err(|_| InventoryError::InvalidStock(new_stock))?;
        self.inner
            .update(id.clone(), StockUpdate { stock })
            .await
            .map_err(Self::map_error)
    }
}
