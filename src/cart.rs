//! Cart
//!
//! The session shopping bag: an ordered ledger of (product identity, quantity)
//! pairs with stock-aware invariants. Every operation is total (bad input is
//! a no-op, never an error) and all clamping happens here so callers cannot
//! drift on the rules.
//!
//! Lines hold identities, not product copies: stock ceilings are taken from
//! the product resolved against the *current* catalog snapshot at call time.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso};

use crate::{
    prices,
    products::{Product, ProductId},
};

/// One (product, quantity) pair in the session cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    product: ProductId,
    quantity: u32,
}

impl CartLine {
    /// Identity of the product this line refers to.
    #[must_use]
    pub fn product(&self) -> &ProductId {
        &self.product
    }

    /// Units requested; always within `[1, stock]` at the time of the last
    /// mutation.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// The ordered session cart.
///
/// Owned exclusively by the storefront session and never persisted; a reload
/// starts empty by design.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Add units of a product to the bag.
    ///
    /// An existing line is incremented rather than duplicated; the result is
    /// clamped to the product's current stock ceiling. Adverts and zero-stock
    /// products add nothing (a zero ceiling also clears any stale line).
    pub fn add(&mut self, product: &Product, quantity: u32) {
        if product.is_advert() {
            return;
        }

        let ceiling = product.stock;

        if let Some(line) = self.lines.iter_mut().find(|l| l.product == product.id) {
            line.quantity = line.quantity.saturating_add(quantity).min(ceiling);
        } else {
            if ceiling == 0 {
                return;
            }
            self.lines.push(CartLine {
                product: product.id.clone(),
                quantity: quantity.clamp(1, ceiling),
            });
        }

        self.lines.retain(|l| l.quantity > 0);
    }

    /// Adjust a line's quantity by a signed delta.
    ///
    /// The result is clamped to the stock ceiling; dropping to zero or below
    /// removes the line. A missing line is a no-op.
    pub fn adjust(&mut self, product: &Product, delta: i64) {
        let Some(current) = self.quantity_of(&product.id) else {
            return;
        };

        let next = i64::from(current)
            .saturating_add(delta)
            .min(i64::from(product.stock));

        if next <= 0 {
            self.remove(&product.id);
        } else if let Some(line) = self.lines.iter_mut().find(|l| l.product == product.id) {
            line.quantity = u32::try_from(next).unwrap_or(current);
        }
    }

    /// Remove a line unconditionally; no-op if absent.
    pub fn remove(&mut self, product: &ProductId) {
        self.lines.retain(|l| &l.product != product);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Quantity currently held for a product, if any.
    #[must_use]
    pub fn quantity_of(&self, product: &ProductId) -> Option<u32> {
        self.lines
            .iter()
            .find(|l| &l.product == product)
            .map(CartLine::quantity)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines, used for the bag badge counter.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Resolve lines against a catalog snapshot.
    ///
    /// Lines whose product no longer exists in the snapshot are skipped; they
    /// stay in the ledger and resolve again once the product reappears.
    #[must_use]
    pub fn resolve<'a>(&self, catalog: &'a [Product]) -> Vec<(&'a Product, u32)> {
        self.lines
            .iter()
            .filter_map(|line| {
                catalog
                    .iter()
                    .find(|p| p.id == line.product)
                    .map(|p| (p, line.quantity))
            })
            .collect()
    }

    /// Compute the order summary figures against a catalog snapshot.
    #[must_use]
    pub fn totals(&self, catalog: &[Product]) -> CartTotals {
        let mut totals = CartTotals::default();

        for (product, quantity) in self.resolve(catalog) {
            let quantity = u64::from(quantity);

            totals.subtotal = totals
                .subtotal
                .saturating_add(product.price.saturating_mul(quantity));
            totals.full_total = totals
                .full_total
                .saturating_add(product.full_price.saturating_mul(quantity));

            // Only positive per-line markdowns count as savings.
            if product.full_price > product.price {
                totals.savings = totals
                    .savings
                    .saturating_add((product.full_price - product.price).saturating_mul(quantity));
            }
        }

        totals
    }
}

/// Order summary figures in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of sale price times quantity.
    pub subtotal: u64,

    /// Sum of full price times quantity.
    pub full_total: u64,

    /// Sum of positive per-line markdowns times quantity.
    pub savings: u64,
}

impl CartTotals {
    /// Subtotal as a money value.
    #[must_use]
    pub fn subtotal_money(&self) -> Money<'static, iso::Currency> {
        prices::money(self.subtotal)
    }

    /// Savings as a money value.
    #[must_use]
    pub fn savings_money(&self) -> Money<'static, iso::Currency> {
        prices::money(self.savings)
    }

    /// Savings relative to the full (pre-discount) total.
    #[must_use]
    pub fn savings_percent(&self) -> Percentage {
        if self.full_total == 0 {
            return Percentage::from(0.0);
        }

        Percentage::from(Decimal::from(self.savings) / Decimal::from(self.full_total))
    }
}
