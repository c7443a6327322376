//! Request bodies.
//!
//! Every field defaults when absent so that a half-filled form reaches the
//! service and gets its proper validation message rather than a
//! deserialisation error.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::lifecycle::{CartItem, Checkout};
use crate::model::{ProductId, ShippingAddress};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CartItemRequest {
    #[serde(alias = "productId")]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: i64,
}

/// Checkout form. `orderId` and the amount fields are accepted for
/// compatibility with older storefront builds and ignored: the server assigns
/// the id and prices the cart itself.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutRequest {
    pub customer_email: String,
    pub order_id: Option<Value>,
    pub items: Vec<CartItemRequest>,
    pub subtotal_amount: Option<Value>,
    pub shipping_cost_amount: Option<Value>,
    pub total_amount: Option<Value>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
}

impl CheckoutRequest {
    pub fn into_checkout(self) -> Checkout {
        Checkout {
            items: self
                .items
                .into_iter()
                .map(|item| CartItem {
                    product_id: item.id,
                    name: item.name,
                    price: item.price,
                    quantity: item.quantity,
                })
                .collect(),
            shipping_address: self.shipping_address,
            payment_method: self.payment_method,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusRequest {
    pub status: String,
}

/// The admin form sends stock as a number or a numeric string.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StockRequest {
    pub stock: Option<Value>,
}

impl StockRequest {
    /// The requested level as a whole number, if it is one.
    pub fn whole_stock(&self) -> Option<i64> {
        match self.stock.as_ref()? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 9e15).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TrackQuery {
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn checkout_ignores_client_totals() {
        let body = json!({
            "customerEmail": "ana@b.ph",
            "orderId": "RAB-CLIENT",
            "items": [{ "id": "P003", "name": "Sagada Amber", "price": 120.5, "quantity": 2 }],
            "totalAmount": 1,
            "shippingAddress": { "fullName": "Ana", "city": "Baguio" },
            "paymentMethod": "E-Cash"
        });
        let request: CheckoutRequest = serde_json::from_value(body).unwrap();
        let checkout = request.into_checkout();
        assert_eq!(checkout.items[0].product_id, Some(ProductId::new("P003")));
        assert_eq!(checkout.items[0].price, Decimal::new(1205, 1));
        assert_eq!(checkout.shipping_address.city, "Baguio");
        assert!(checkout.shipping_address.zip.is_empty());
    }

    #[test]
    fn stock_accepts_numbers_and_numeric_strings() {
        let parse = |v: Value| StockRequest { stock: Some(v) }.whole_stock();
        assert_eq!(parse(json!(12)), Some(12));
        assert_eq!(parse(json!(-4)), Some(-4));
        assert_eq!(parse(json!(" 30 ")), Some(30));
        assert_eq!(parse(json!(7.0)), Some(7));
        assert_eq!(parse(json!(7.5)), None);
        assert_eq!(parse(json!("lots")), None);
        assert_eq!(parse(json!(null)), None);
        assert_eq!(StockRequest::default().whole_stock(), None);
    }
}
