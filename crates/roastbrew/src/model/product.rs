use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable catalogue key such as `P001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub stock: u32,
}

/// Payload for creating a product.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub stock: u32,
}

/// Replaces a product's stock level.
#[derive(Debug, Clone, Copy)]
pub struct StockUpdate {
    pub stock: u32,
}

/// The brewery's standing catalogue, loaded into the inventory at start-up.
pub fn house_catalog() -> Vec<(ProductId, ProductCreate)> {
    [
        ("P001", "Cordillera Stout", 150),
        ("P002", "Benguet Blond Ale", 200),
        ("P003", "Sagada Amber", 120),
        ("P004", "Kalinga Coffee Porter", 180),
        ("P005", "Apayao Honey Wheat", 160),
        ("P006", "La Trinidad Strawberry Ale", 100),
        ("P007", "Ifugao IPA", 130),
    ]
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
