//! Checkout
//!
//! Serializes the session cart into the order message handed to the store's
//! WhatsApp number. Producing a well-formed deep-link URL is the whole
//! contract here; opening it belongs to the caller's platform.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rusty_money::{Money, iso};
use thiserror::Error;

use crate::{prices, products::Product};

/// The store's WhatsApp number, international format without `+`.
pub const STORE_PHONE: &str = "5571992293834";

const WHATSAPP_BASE: &str = "https://wa.me";

/// Characters kept verbatim in the deep-link payload (RFC 3986 unreserved).
const PAYLOAD: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Errors composing an order message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// The cart holds no lines; there is nothing to order.
    #[error("cart is empty; nothing to check out")]
    EmptyCart,
}

/// A composed order: the human-readable message plus its total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    message: String,
    total: u64,
}

impl OrderSummary {
    /// The order message, one line per cart line plus the total.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Order total in minor units.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Order total as a money value.
    #[must_use]
    pub fn total_money(&self) -> Money<'static, iso::Currency> {
        prices::money(self.total)
    }
}

/// Compose the order message for a set of resolved cart lines.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] when no lines are given: an empty cart
/// must surface to the customer, never open a blank conversation.
pub fn compose(lines: &[(&Product, u32)]) -> Result<OrderSummary, CheckoutError> {
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut message = String::from("Olá! Tenho interesse nos seguintes produtos:\n\n");
    let mut total: u64 = 0;

    for (product, quantity) in lines {
        message.push_str(&format!(
            "- {quantity}x {} ({}) - {} cada\n",
            product.name,
            product.brand,
            prices::format_brl(product.price),
        ));

        total = total.saturating_add(product.price.saturating_mul(u64::from(*quantity)));
    }

    message.push_str(&format!(
        "\n*Total do Pedido: {}*",
        prices::format_brl(total)
    ));
    message.push_str("\n\nAguardo para combinar a entrega.");

    Ok(OrderSummary { message, total })
}

/// Build the WhatsApp deep link carrying a composed order.
#[must_use]
pub fn checkout_url(summary: &OrderSummary) -> String {
    format!(
        "{WHATSAPP_BASE}/{STORE_PHONE}?text={}",
        utf8_percent_encode(summary.message(), PAYLOAD)
    )
}
