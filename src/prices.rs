//! Prices
//!
//! Normalization of stored price representations into canonical minor units
//! (centavos), discount derivation, and the store's `R$` display format.
//!
//! Normalization is the single ingress boundary for price data: everything
//! downstream of [`crate::products::Product::from_record`] operates on plain
//! integer minor units.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso};
use serde::{Deserialize, Serialize};

/// A price as it appears in a stored product document.
///
/// Older documents carry localized strings (`"R$ 103,92"`); newer ones store
/// plain numbers. Both forms are accepted on ingress and normalized once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    /// A plain numeric price in major units (reais).
    Number(f64),

    /// A localized price string: comma decimal separator, optional `R$` prefix
    /// and `.` thousands separators.
    Text(String),
}

impl From<f64> for RawPrice {
    fn from(value: f64) -> Self {
        RawPrice::Number(value)
    }
}

impl From<&str> for RawPrice {
    fn from(value: &str) -> Self {
        RawPrice::Text(value.to_string())
    }
}

/// Normalize a stored price into minor units.
///
/// Malformed or negative values yield `0` rather than an error: a bad price in
/// one document must never take down the whole catalog render.
#[must_use]
pub fn normalize(raw: &RawPrice) -> u64 {
    match raw {
        RawPrice::Number(value) => decimal_to_minor(Decimal::from_f64_retain(*value)),
        RawPrice::Text(text) => parse_localized(text),
    }
}

/// Parse a localized price string (`"R$ 1.234,56"`) into minor units.
///
/// The currency symbol and all whitespace are stripped, `.` is treated as a
/// removable thousands separator and `,` as the decimal separator. Unparseable
/// input yields `0`.
#[must_use]
pub fn parse_localized(text: &str) -> u64 {
    let cleaned: String = text
        .replace("R$", "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    decimal_to_minor(cleaned.parse::<Decimal>().ok())
}

/// Resolve the full (pre-discount) price for a record.
///
/// A missing or non-positive stored value defaults to the sale price itself,
/// preserving "no discount shown" semantics for admin-entered products.
#[must_use]
pub fn normalize_full(full: Option<&RawPrice>, price: u64) -> u64 {
    match full.map(normalize) {
        Some(minor) if minor > 0 => minor.max(price),
        _ => price,
    }
}

/// Derive the discount percentage from full and sale prices.
///
/// `round((full - price) / full * 100)` when `full > price > 0`, else `0`.
/// Never negative, never above 100.
#[must_use]
pub fn discount_percent(full_price: u64, price: u64) -> u8 {
    if full_price <= price || price == 0 {
        return 0;
    }

    let Some(saved) = Decimal::from_u64(full_price - price) else {
        return 0;
    };
    let Some(full) = Decimal::from_u64(full_price) else {
        return 0;
    };

    let percent = (saved / full * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    percent.to_u8().unwrap_or(0).min(100)
}

/// Format minor units in the store's currency convention: `R$ 1.234,56`.
#[must_use]
pub fn format_brl(minor: u64) -> String {
    format!("R$ {},{:02}", group_thousands(minor / 100), minor % 100)
}

/// Wrap minor units into a [`Money`] value in the store currency.
#[must_use]
pub fn money(minor: u64) -> Money<'static, iso::Currency> {
    Money::from_minor(i64::try_from(minor).unwrap_or(i64::MAX), iso::BRL)
}

/// Convert minor units back to a major-unit float for wire records.
#[must_use]
pub fn to_major(minor: u64) -> f64 {
    (Decimal::from(minor) / Decimal::ONE_HUNDRED)
        .to_f64()
        .unwrap_or(0.0)
}

/// Round a major-unit decimal to two places and convert to minor units.
fn decimal_to_minor(value: Option<Decimal>) -> u64 {
    let Some(value) = value else {
        return 0;
    };

    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    let Some(minor) = rounded.checked_mul(Decimal::ONE_HUNDRED) else {
        return 0;
    };

    minor.to_u64().unwrap_or(0)
}

/// Insert `.` thousands separators into an integer amount of reais.
fn group_thousands(reais: u64) -> String {
    let digits = reais.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    grouped
}
