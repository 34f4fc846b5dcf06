//! Products
//!
//! The catalog's domain entity, its enumerated tags, the stored document shape,
//! and the single ingress conversion between the two.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::prices::{self, RawPrice};

/// Stable string identifier of a catalog document (slug-derived or
/// store-generated).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        ProductId(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        ProductId::new(value)
    }
}

/// Brand tag grouping products by label.
///
/// Advertisement entries carry the distinct [`Brand::Announcement`] tag, which
/// is what keeps them out of brand-specific showcase views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Brand {
    /// Natura.
    #[serde(rename = "natura")]
    Natura,

    /// O Boticário.
    #[serde(rename = "boticario")]
    Boticario,

    /// Avon.
    #[serde(rename = "avon")]
    Avon,

    /// Eudora.
    #[serde(rename = "eudora")]
    Eudora,

    /// The reserved brand tag for advertisement entries.
    #[serde(rename = "Anúncio")]
    Announcement,
}

impl Brand {
    /// The brand label as stored (and as shown in order messages).
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Brand::Natura => "natura",
            Brand::Boticario => "boticario",
            Brand::Avon => "avon",
            Brand::Eudora => "eudora",
            Brand::Announcement => "Anúncio",
        }
    }

    /// SKU prefix for admin-generated product codes.
    #[must_use]
    pub fn sku_prefix(&self) -> &'static str {
        match self {
            Brand::Natura => "NAT",
            Brand::Boticario => "BOT",
            Brand::Avon => "AVO",
            Brand::Eudora => "EUD",
            Brand::Announcement => "AD",
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Optional category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Fragrances and colognes.
    #[serde(rename = "Perfumaria")]
    Perfumery,

    /// Facial and body skincare.
    #[serde(rename = "Skincare")]
    Skincare,

    /// Makeup.
    #[serde(rename = "Maquiagem")]
    Makeup,

    /// Hair care.
    #[serde(rename = "Cabelos")]
    Hair,

    /// Bath and body.
    #[serde(rename = "Corpo e Banho")]
    Body,
}

/// Lifecycle status of a catalog entry, stored with the original labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductStatus {
    /// In stock and purchasable.
    #[serde(rename = "Ativo")]
    Active,

    /// Listed but without stock.
    #[serde(rename = "Sem Estoque")]
    OutOfStock,

    /// Soft-deleted; hidden from the storefront.
    #[serde(rename = "Arquivado")]
    Archived,

    /// Display-and-link-only advertisement entry; never purchasable.
    #[serde(rename = "Anúncio")]
    Advert,
}

impl ProductStatus {
    /// The stored (display) label of this status.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ProductStatus::Active => "Ativo",
            ProductStatus::OutOfStock => "Sem Estoque",
            ProductStatus::Archived => "Arquivado",
            ProductStatus::Advert => "Anúncio",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derive the effective status of an entry from its stock count.
///
/// Advert and archived entries keep their explicit status; everything else is
/// decided by stock. Every call site that displays or branches on a status
/// goes through here, so the admin table and the storefront can never drift.
#[must_use]
pub fn derive_status(stock: u32, explicit: Option<ProductStatus>) -> ProductStatus {
    match explicit {
        Some(ProductStatus::Advert) => ProductStatus::Advert,
        Some(ProductStatus::Archived) => ProductStatus::Archived,
        _ if stock == 0 => ProductStatus::OutOfStock,
        _ => ProductStatus::Active,
    }
}

/// A normalized catalog entry. Prices are minor units (centavos); the discount
/// percentage is always derived, never trusted from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Document identity.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Brand tag.
    pub brand: Brand,

    /// Optional category tag.
    pub category: Option<Category>,

    /// Image URI.
    pub image: String,

    /// Sale price in minor units.
    pub price: u64,

    /// Pre-discount price in minor units; `>= price` always.
    pub full_price: u64,

    /// Derived discount percentage, 0–100.
    pub discount_percent: u8,

    /// Units available for immediate delivery.
    pub stock: u32,

    /// Effective lifecycle status.
    pub status: ProductStatus,

    /// Outbound link for adverts, public product page otherwise.
    pub link: Option<String>,

    /// Admin-facing product code.
    pub sku: String,

    /// URL slug.
    pub slug: String,

    /// Long description (may be empty).
    pub description: String,

    /// Optional usage instructions.
    pub how_to_use: Option<String>,

    /// Server-assigned creation timestamp.
    pub created_at: Option<Timestamp>,
}

impl Product {
    /// Whether this entry is a display-and-link-only advertisement.
    #[must_use]
    pub fn is_advert(&self) -> bool {
        self.status == ProductStatus::Advert
    }

    /// Whether the storefront may offer the add-to-bag control.
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        self.status == ProductStatus::Active && self.stock > 0
    }

    /// Normalize a stored document into a domain product.
    ///
    /// This is the single ingress boundary from the document store: prices are
    /// normalized, the full price defaulted, the discount derived, and the
    /// status re-derived from stock when the document carries none.
    #[must_use]
    pub fn from_record(id: ProductId, record: ProductRecord) -> Self {
        let price = prices::normalize(&record.price);
        let full_price = prices::normalize_full(record.full_price.as_ref(), price);
        let discount_percent = prices::discount_percent(full_price, price);
        let status = derive_status(record.stock, record.status);
        let slug = record
            .slug
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&record.name));

        Product {
            id,
            name: record.name,
            brand: record.brand,
            category: record.category,
            image: record.image,
            price,
            full_price,
            discount_percent,
            stock: record.stock,
            status,
            link: record.link,
            sku: record.sku.unwrap_or_default(),
            slug,
            description: record.description,
            how_to_use: record.how_to_use,
            created_at: record.created_at,
        }
    }

    /// Convert back into the wire shape for a store write.
    #[must_use]
    pub fn to_record(&self) -> ProductRecord {
        ProductRecord {
            name: self.name.clone(),
            brand: self.brand,
            category: self.category,
            image: self.image.clone(),
            price: RawPrice::Number(prices::to_major(self.price)),
            full_price: Some(RawPrice::Number(prices::to_major(self.full_price))),
            discount_percentage: Some(f64::from(self.discount_percent)),
            stock: self.stock,
            status: Some(self.status),
            link: self.link.clone(),
            sku: Some(self.sku.clone()),
            slug: Some(self.slug.clone()),
            description: self.description.clone(),
            how_to_use: self.how_to_use.clone(),
            created_at: self.created_at,
        }
    }
}

/// A product document as stored in the `products` collection.
///
/// Field names match the hosted collection; optional fields default so that
/// documents written by older client versions still parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Display name.
    pub name: String,

    /// Brand tag.
    pub brand: Brand,

    /// Optional category tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    /// Image URI.
    #[serde(default)]
    pub image: String,

    /// Sale price; number or localized string.
    pub price: RawPrice,

    /// Pre-discount price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_price: Option<RawPrice>,

    /// Stored discount percentage. Accepted on ingress but ignored: the
    /// percentage is always re-derived from the two prices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,

    /// Units in stock.
    #[serde(default)]
    pub stock: u32,

    /// Stored status; derived from stock when missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,

    /// Outbound or product-page link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Admin product code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    /// URL slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Long description.
    #[serde(default)]
    pub description: String,

    /// Usage instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_to_use: Option<String>,

    /// Server-assigned creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

/// Turn free text into a URL slug: lowercased, whitespace collapsed to `-`,
/// anything outside `[a-z0-9_-]` dropped.
#[must_use]
pub fn slugify(text: &str) -> String {
    let hyphenated = text
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");

    let mut slug = String::with_capacity(hyphenated.len());
    let mut last_hyphen = true;

    for c in hyphenated.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
            last_hyphen = false;
        } else if c == '-' && !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }

    slug.trim_end_matches('-').to_string()
}

/// Generate an admin product code: brand prefix plus the last four digits of
/// the creation timestamp.
#[must_use]
pub fn generate_sku(brand: Brand, at: Timestamp) -> String {
    format!("{}-{:04}", brand.sku_prefix(), at.as_millisecond().rem_euclid(10_000))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn record(price: RawPrice, full: Option<RawPrice>, stock: u32) -> ProductRecord {
        ProductRecord {
            name: "Malbec Desodorante Colônia".to_string(),
            brand: Brand::Boticario,
            category: None,
            image: "https://example.com/malbec.jpg".to_string(),
            price,
            full_price: full,
            discount_percentage: None,
            stock,
            status: None,
            link: None,
            sku: None,
            slug: None,
            description: String::new(),
            how_to_use: None,
            created_at: None,
        }
    }

    #[test]
    fn from_record_normalizes_string_price() {
        let product = Product::from_record(
            ProductId::from("malbec"),
            record(RawPrice::from("R$ 199,90"), None, 3),
        );

        assert_eq!(product.price, 199_90);
        assert_eq!(product.full_price, 199_90);
        assert_eq!(product.discount_percent, 0);
        assert_eq!(product.status, ProductStatus::Active);
    }

    #[test]
    fn from_record_derives_discount() {
        let product = Product::from_record(
            ProductId::from("lily"),
            record(RawPrice::Number(50.0), Some(RawPrice::Number(100.0)), 1),
        );

        assert_eq!(product.discount_percent, 50);
    }

    #[test]
    fn from_record_ignores_stored_discount() {
        let mut raw = record(RawPrice::Number(50.0), Some(RawPrice::Number(100.0)), 1);
        raw.discount_percentage = Some(7.0);

        let product = Product::from_record(ProductId::from("lily"), raw);

        assert_eq!(product.discount_percent, 50);
    }

    #[test]
    fn from_record_without_stock_is_out_of_stock() {
        let product =
            Product::from_record(ProductId::from("renew"), record(RawPrice::Number(89.9), None, 0));

        assert_eq!(product.status, ProductStatus::OutOfStock);
        assert!(!product.is_purchasable());
    }

    #[test]
    fn from_record_falls_back_to_generated_slug() {
        let product = Product::from_record(
            ProductId::from("malbec"),
            record(RawPrice::Number(199.9), None, 3),
        );

        assert_eq!(product.slug, "malbec-desodorante-colnia");
    }

    #[test]
    fn derive_status_keeps_advert_and_archived() {
        assert_eq!(
            derive_status(0, Some(ProductStatus::Advert)),
            ProductStatus::Advert
        );
        assert_eq!(
            derive_status(5, Some(ProductStatus::Archived)),
            ProductStatus::Archived
        );
    }

    #[test]
    fn derive_status_follows_stock() {
        assert_eq!(derive_status(0, None), ProductStatus::OutOfStock);
        assert_eq!(derive_status(0, Some(ProductStatus::Active)), ProductStatus::OutOfStock);
        assert_eq!(derive_status(2, None), ProductStatus::Active);
        assert_eq!(derive_status(2, Some(ProductStatus::OutOfStock)), ProductStatus::Active);
    }

    #[test]
    fn slugify_collapses_and_strips() {
        assert_eq!(slugify("  Lily Eau de Parfum  "), "lily-eau-de-parfum");
        assert_eq!(slugify("Power Stay!! Batom"), "power-stay-batom");
        assert_eq!(slugify("a---b"), "a-b");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn sku_uses_brand_prefix_and_four_digits() -> TestResult {
        let at = Timestamp::from_millisecond(1_700_000_001_234)?;

        assert_eq!(generate_sku(Brand::Natura, at), "NAT-1234");
        assert_eq!(generate_sku(Brand::Boticario, at), "BOT-1234");

        Ok(())
    }

    #[test]
    fn status_round_trips_stored_labels() -> TestResult {
        let json = serde_json::to_string(&ProductStatus::OutOfStock)?;
        assert_eq!(json, "\"Sem Estoque\"");

        let back: ProductStatus = serde_json::from_str("\"Arquivado\"")?;
        assert_eq!(back, ProductStatus::Archived);

        Ok(())
    }

    #[test]
    fn record_round_trips_camel_case_fields() -> TestResult {
        let product = Product::from_record(
            ProductId::from("lily"),
            record(RawPrice::Number(50.0), Some(RawPrice::Number(100.0)), 2),
        );

        let json = serde_json::to_string(&product.to_record())?;

        assert!(json.contains("\"fullPrice\""), "missing fullPrice in {json}");
        assert!(json.contains("\"discountPercentage\""), "missing discountPercentage in {json}");

        let back: ProductRecord = serde_json::from_str(&json)?;
        let reparsed = Product::from_record(ProductId::from("lily"), back);

        assert_eq!(reparsed.price, product.price);
        assert_eq!(reparsed.full_price, product.full_price);
        assert_eq!(reparsed.status, product.status);

        Ok(())
    }
}
