//! Checkout input and its validation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::StoreError;
use crate::model::{
    subtotal_of, LineItem, NewOrder, Order, PaymentMethod, ProductId, Profile, ShippingAddress,
};

/// One cart line as submitted by the storefront.
///
/// Quantity is signed so that nonsense like `-2` reaches validation instead of
/// failing deserialisation with an unhelpful message.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product_id: Option<ProductId>,
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
}

impl CartItem {
    pub fn new(name: &str, price: Decimal, quantity: i64) -> Self {
        Self {
            product_id: None,
            name: name.to_string(),
            price,
            quantity,
        }
    }

    pub fn with_product_id(mut self, id: ProductId) -> Self {
        self.product_id = Some(id);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Checkout {
    pub items: Vec<CartItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
}

/// A signed-in customer. Only [`OrderLifecycleService::customer_session`]
/// hands these out, so holding one means the account exists.
///
/// [`OrderLifecycleService::customer_session`]: super::OrderLifecycleService::customer_session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSession {
    profile: Profile,
}

impl CustomerSession {
    pub(crate) fn new(profile: Profile) -> Self {
        Self { profile }
    }

    pub fn email(&self) -> &str {
        &self.profile.email
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }
}

/// Whether the confirmation mail made it onto the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "error")]
pub enum NotificationOutcome {
    Queued,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub notification: NotificationOutcome,
}

/// A validated and priced checkout.
pub(crate) struct ValidCheckout {
    pub line_items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

impl ValidCheckout {
    pub(crate) fn into_new_order(self, customer_email: String, placed_at: DateTime<Utc>) -> NewOrder {
        NewOrder {
            customer_email,
            line_items: self.line_items,
            subtotal: self.subtotal,
            shipping_cost: self.shipping_cost,
            total: self.total,
            shipping_address: self.shipping_address,
            payment_method: self.payment_method,
            placed_at,
        }
    }
}

impl Checkout {
    /// Checks everything the customer typed and prices the cart with the
    /// flat `shipping_fee`. Nothing has been mutated yet when this fails.
    pub(crate) fn validate(self, shipping_fee: Decimal) -> Result<ValidCheckout, StoreError> {
        if self.items.is_empty() {
            return Err(StoreError::invalid("Your cart is empty."));
        }

        let line_items = self
            .items
            .into_iter()
            .map(|item| {
                let name = item.name.trim().to_string();
                if name.is_empty() {
                    return Err(StoreError::invalid("Every item needs a product name."));
                }
                if item.price <= Decimal::ZERO {
                    return Err(StoreError::invalid(format!("Invalid price for {name}.")));
                }
                let quantity = u32::try_from(item.quantity)
                    .ok()
                    .filter(|q| *q >= 1)
                    .ok_or_else(|| StoreError::invalid(format!("Invalid quantity for {name}.")))?;
                Ok(LineItem {
                    product_id: item.product_id,
                    product_name: name,
                    unit_price: item.price,
                    quantity,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(field) = self.shipping_address.missing_field() {
            return Err(StoreError::invalid(format!(
                "Shipping address is missing {field}."
            )));
        }

        let payment_method = self
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(StoreError::InvalidInput)?;

        let subtotal = subtotal_of(&line_items).ok_or_else(too_large)?;
        let total = subtotal.checked_add(shipping_fee).ok_or_else(too_large)?;

        Ok(ValidCheckout {
            line_items,
            subtotal,
            shipping_cost: shipping_fee,
            total,
            shipping_address: self.shipping_address,
            payment_method,
        })
    }
}

fn too_large() -> StoreError {
    StoreError::invalid("Order total is too large.")
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn fee() -> Decimal {
        Decimal::new(50, 0)
    }

    fn checkout(items: Vec<CartItem>) -> Checkout {
        Checkout {
            items,
            shipping_address: address(),
            payment_method: "COD".into(),
        }
    }

    #[test]
    fn valid_cart_becomes_line_items() {
        let valid = checkout(vec![CartItem::new(" Sagada Amber ", Decimal::new(120, 0), 2)])
            .validate(fee())
            .unwrap();
        assert_eq!(valid.line_items[0].product_name, "Sagada Amber");
        assert_eq!(valid.line_items[0].quantity, 2);
        assert_eq!(valid.payment_method, PaymentMethod::CashOnDelivery);
        assert_eq!(valid.subtotal, Decimal::new(240, 0));
        assert_eq!(valid.total, Decimal::new(290, 0));
    }

    #[test]
    fn cart_too_large_to_price_is_invalid_input() {
        let overflowing_line = checkout(vec![CartItem::new("A", Decimal::MAX, 2)]);
        assert_eq!(
            overflowing_line.validate(fee()).err(),
            Some(StoreError::invalid("Order total is too large."))
        );

        let overflowing_sum = checkout(vec![
            CartItem::new("A", Decimal::MAX, 1),
            CartItem::new("B", Decimal::MAX, 1),
        ]);
        assert!(matches!(
            overflowing_sum.validate(fee()),
            Err(StoreError::InvalidInput(_))
        ));

        let overflowing_shipping = checkout(vec![CartItem::new("A", Decimal::MAX, 1)]);
        assert!(matches!(
            overflowing_shipping.validate(fee()),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn bad_lines_are_invalid_input() {
        for item in [
            CartItem::new("A", Decimal::new(10, 0), 0),
            CartItem::new("A", Decimal::new(10, 0), -2),
            CartItem::new("A", Decimal::ZERO, 1),
            CartItem::new("A", Decimal::new(-5, 0), 1),
            CartItem::new("  ", Decimal::new(10, 0), 1),
        ] {
            assert!(matches!(
                checkout(vec![item]).validate(fee()),
                Err(StoreError::InvalidInput(_))
            ));
        }
        assert!(matches!(
            checkout(vec![]).validate(fee()),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn blank_address_and_unknown_payment_are_rejected() {
        let mut no_city = checkout(vec![CartItem::new("A", Decimal::ONE, 1)]);
        no_city.shipping_address.city.clear();
        assert_eq!(
            no_city.validate(fee()).err(),
            Some(StoreError::invalid("Shipping address is missing city."))
        );

        let mut barter = checkout(vec![CartItem::new("A", Decimal::ONE, 1)]);
        barter.payment_method = "barter".into();
        assert!(matches!(barter.validate(fee()), Err(StoreError::InvalidInput(_))));
    }
}
