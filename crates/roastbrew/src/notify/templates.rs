//! Renders storefront mail from askama templates under `templates/email/`.
//!
//! Every message has an HTML and a plain-text body. Money is formatted before
//! it reaches a template, so the templates never do arithmetic.

use askama::Template;
use rust_decimal::{Decimal, RoundingStrategy};

use super::error::NotifyError;
use super::transport::{MailKind, OutboundMail};
use crate::config::MailConfig;
use crate::model::{ContactMessage, Order, OrderStatus, Profile, ShippingAddress};

/// Sender, recipients and links shared by every message.
#[derive(Debug, Clone)]
pub struct Letterhead {
    pub from_address: String,
    pub store_email: String,
    pub frontend_url: String,
}

impl Letterhead {
    pub fn from_config(config: &MailConfig) -> Self {
        Self {
            from_address: config.from_address.clone(),
            store_email: config.store_email.clone(),
            frontend_url: config.frontend_url.clone(),
        }
    }

    fn shop_url(&self) -> String {
        format!("{}/shop.html", self.frontend_url)
    }

    fn track_url(&self) -> String {
        format!("{}/track.html", self.frontend_url)
    }

    fn mail(&self, kind: MailKind, to: &str, subject: String, text: String, html: String) -> OutboundMail {
        OutboundMail {
            kind,
            from: self.from_address.clone(),
            to: to.to_string(),
            subject,
            text,
            html,
        }
    }
}

impl Default for Letterhead {
    fn default() -> Self {
        Self::from_config(&MailConfig::default())
    }
}

/// Formats an amount in pesos, e.g. `₱ 1250.00`.
pub fn peso(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("₱ {rounded:.2}")
}

struct PricedLine {
    name: String,
    quantity: u32,
    amount: String,
}

#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    customer_name: &'a str,
    order_id: &'a str,
    lines: &'a [PricedLine],
    subtotal: &'a str,
    shipping: &'a str,
    total: &'a str,
    payment_method: &'a str,
    address_lines: &'a [String],
}

#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationText<'a> {
    customer_name: &'a str,
    order_id: &'a str,
    lines: &'a [PricedLine],
    subtotal: &'a str,
    shipping: &'a str,
    total: &'a str,
    payment_method: &'a str,
    address_lines: &'a [String],
}

#[derive(Template)]
#[template(path = "email/status_update.html")]
struct StatusUpdateHtml<'a> {
    customer_name: &'a str,
    order_id: &'a str,
    delivered: bool,
    track_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/status_update.txt")]
struct StatusUpdateText<'a> {
    customer_name: &'a str,
    order_id: &'a str,
    delivered: bool,
    track_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeHtml<'a> {
    name: &'a str,
    shop_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/welcome.txt")]
struct WelcomeText<'a> {
    name: &'a str,
    shop_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/contact_admin.html")]
struct ContactAdminHtml<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

#[derive(Template)]
#[template(path = "email/contact_admin.txt")]
struct ContactAdminText<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

#[derive(Template)]
#[template(path = "email/contact_reply.html")]
struct ContactReplyHtml<'a> {
    name: &'a str,
    message: &'a str,
}

#[derive(Template)]
#[template(path = "email/contact_reply.txt")]
struct ContactReplyText<'a> {
    name: &'a str,
    message: &'a str,
}

fn address_lines(address: &ShippingAddress) -> Vec<String> {
    let mut lines = vec![address.full_name.clone(), address.address_line1.clone()];
    if let Some(line2) = address.address_line2.as_deref().filter(|l| !l.trim().is_empty()) {
        lines.push(line2.to_string());
    }
    lines.push(format!("{}, {} {}", address.city, address.state, address.zip));
    lines.push(address.country.clone());
    lines
}

/// Receipt sent to the customer right after checkout.
pub fn order_confirmation(letterhead: &Letterhead, order: &Order) -> Result<OutboundMail, NotifyError> {
    let lines: Vec<PricedLine> = order
        .line_items
        .iter()
        .map(|item| PricedLine {
            name: item.product_name.clone(),
            quantity: item.quantity,
            amount: item.line_total().map(peso).unwrap_or_default(),
        })
        .collect();
    let subtotal = peso(order.subtotal);
    let shipping = peso(order.shipping_cost);
    let total = peso(order.total);
    let address_lines = address_lines(&order.shipping_address);
    let customer_name = order.shipping_address.full_name.as_str();
    let order_id = order.id.as_str();
    let payment_method = order.payment_method.as_str();

    let html = OrderConfirmationHtml {
        customer_name,
        order_id,
        lines: &lines,
        subtotal: &subtotal,
        shipping: &shipping,
        total: &total,
        payment_method,
        address_lines: &address_lines,
    }
    .render()?;
    let text = OrderConfirmationText {
        customer_name,
        order_id,
        lines: &lines,
        subtotal: &subtotal,
        shipping: &shipping,
        total: &total,
        payment_method,
        address_lines: &address_lines,
    }
    .render()?;

    Ok(letterhead.mail(
        MailKind::OrderConfirmation,
        &order.customer_email,
        format!("Your Roast & Brew Order Confirmation [{order_id}]"),
        text,
        html,
    ))
}

/// Status change notice. `None` for statuses customers are not told about.
pub fn status_update(
    letterhead: &Letterhead,
    order: &Order,
    status: OrderStatus,
) -> Result<Option<OutboundMail>, NotifyError> {
    let order_id = order.id.as_str();
    let (kind, subject, delivered) = match status {
        OrderStatus::OutForDelivery => (
            MailKind::OutForDelivery,
            format!("Your Roast & Brew Order [{order_id}] is Out for Delivery!"),
            false,
        ),
        OrderStatus::Delivered => (
            MailKind::Delivered,
            format!("Your Roast & Brew Order [{order_id}] Has Been Delivered!"),
            true,
        ),
        OrderStatus::Placed | OrderStatus::ProcessingBrews => return Ok(None),
    };

    let track_url = letterhead.track_url();
    let customer_name = order.shipping_address.full_name.as_str();
    let html = StatusUpdateHtml {
        customer_name,
        order_id,
        delivered,
        track_url: &track_url,
    }
    .render()?;
    let text = StatusUpdateText {
        customer_name,
        order_id,
        delivered,
        track_url: &track_url,
    }
    .render()?;

    Ok(Some(letterhead.mail(kind, &order.customer_email, subject, text, html)))
}

pub fn welcome(letterhead: &Letterhead, profile: &Profile) -> Result<OutboundMail, NotifyError> {
    let shop_url = letterhead.shop_url();
    let name = profile.full_name.as_str();
    let html = WelcomeHtml { name, shop_url: &shop_url }.render()?;
    let text = WelcomeText { name, shop_url: &shop_url }.render()?;

    Ok(letterhead.mail(
        MailKind::Welcome,
        &profile.email,
        format!("Welcome to the Roast & Brew Family, {name}!"),
        text,
        html,
    ))
}

/// Copy of a contact-form message for the store inbox.
pub fn contact_admin_copy(letterhead: &Letterhead, contact: &ContactMessage) -> Result<OutboundMail, NotifyError> {
    let html = ContactAdminHtml {
        name: &contact.name,
        email: &contact.email,
        message: &contact.message,
    }
    .render()?;
    let text = ContactAdminText {
        name: &contact.name,
        email: &contact.email,
        message: &contact.message,
    }
    .render()?;

    Ok(letterhead.mail(
        MailKind::ContactAdminCopy,
        &letterhead.store_email,
        format!("New Message from {}", contact.name),
        text,
        html,
    ))
}

/// Acknowledgement sent back to whoever filled in the contact form.
pub fn contact_auto_reply(letterhead: &Letterhead, contact: &ContactMessage) -> Result<OutboundMail, NotifyError> {
    let html = ContactReplyHtml {
        name: &contact.name,
        message: &contact.message,
    }
    .render()?;
    let text = ContactReplyText {
        name: &contact.name,
        message: &contact.message,
    }
    .render()?;

    Ok(letterhead.mail(
        MailKind::ContactAutoReply,
        &contact.email,
        "We've received your message!".to_string(),
        text,
        html,
    ))
}
