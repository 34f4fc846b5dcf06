//! Admin
//!
//! The dashboard's catalog management service: product creation with slug and
//! SKU assignment, edits with status re-derivation, the archive/restore
//! soft-delete path, hard deletion, the single-announcement rule, and the
//! admin table view.

use std::{fmt, sync::Arc};

use jiff::Timestamp;
use thiserror::Error;
use tracing::info;

use crate::{
    prices::{self, RawPrice},
    products::{
        Brand, Category, Product, ProductId, ProductRecord, ProductStatus, derive_status,
        generate_sku, slugify,
    },
    showcase::{BrandFilter, DisplayPage, page_count},
    store::{ProductStore, StoreError},
};

/// Base URL of the public product pages.
pub const PRODUCT_BASE_URL: &str = "https://redvitoria.pages.dev/produto";

/// Rows per admin table page.
pub const ADMIN_PAGE_SIZE: usize = 10;

/// Errors from the admin catalog service.
#[derive(Debug, Error)]
pub enum AdminError {
    /// A product needs a name.
    #[error("product name is required")]
    MissingName,

    /// A product needs an image link.
    #[error("product image link is required")]
    MissingImage,

    /// The full price must be positive.
    #[error("full price must be greater than zero")]
    InvalidFullPrice,

    /// The final price must be positive.
    #[error("final price must be greater than zero")]
    InvalidPrice,

    /// At most one announcement may exist at a time.
    #[error("only one announcement is allowed; archive the existing one first")]
    AnnouncementExists,

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Display name; required.
    pub name: String,

    /// Brand tag.
    pub brand: Brand,

    /// Optional category tag.
    pub category: Option<Category>,

    /// Image link; required.
    pub image: String,

    /// Initial stock; decides the initial status.
    pub stock: u32,

    /// Full (pre-discount) price in minor units; must be positive.
    pub full_price: u64,

    /// Final sale price in minor units; must be positive.
    pub price: u64,

    /// Long description.
    pub description: String,

    /// Explicit slug; generated from the name when omitted.
    pub slug: Option<String>,

    /// Optional usage instructions.
    pub how_to_use: Option<String>,
}

/// Input for editing a product.
#[derive(Debug, Clone)]
pub struct ProductEdit {
    /// Display name.
    pub name: String,

    /// Brand tag.
    pub brand: Brand,

    /// Optional category tag.
    pub category: Option<Category>,

    /// Image link.
    pub image: String,

    /// New stock count; feeds status re-derivation.
    pub stock: u32,

    /// Full price in minor units.
    pub full_price: u64,

    /// Sale price in minor units.
    pub price: u64,

    /// Long description.
    pub description: String,

    /// Explicit slug; regenerated from the name when omitted.
    pub slug: Option<String>,

    /// Custom outbound link; only meaningful for announcements.
    pub link: Option<String>,

    /// Optional usage instructions.
    pub how_to_use: Option<String>,

    /// The status the entry currently holds in the form.
    pub status: ProductStatus,
}

/// Catalog management over a [`ProductStore`].
#[derive(Clone)]
pub struct CatalogAdmin {
    store: Arc<dyn ProductStore>,
}

impl fmt::Debug for CatalogAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogAdmin").finish_non_exhaustive()
    }
}

impl CatalogAdmin {
    /// Wrap a product store.
    #[must_use]
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        CatalogAdmin { store }
    }

    /// Every catalog entry, normalized, newest first.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list(&self) -> Result<Vec<Product>, AdminError> {
        let documents = self.store.list_products().await?;

        Ok(documents
            .into_iter()
            .map(|(id, record)| Product::from_record(id, record))
            .collect())
    }

    /// Create a product document.
    ///
    /// The identity is the slug (name-derived unless given); a colliding slug
    /// gets a timestamp suffix rather than overwriting the existing document.
    ///
    /// # Errors
    ///
    /// Validation errors for missing name/image or non-positive prices, plus
    /// store failures.
    pub async fn create_product(&self, new: NewProduct) -> Result<Product, AdminError> {
        if new.name.trim().is_empty() {
            return Err(AdminError::MissingName);
        }
        if new.image.trim().is_empty() {
            return Err(AdminError::MissingImage);
        }
        if new.full_price == 0 {
            return Err(AdminError::InvalidFullPrice);
        }
        if new.price == 0 {
            return Err(AdminError::InvalidPrice);
        }

        let now = Timestamp::now();
        let slug = match new.slug.as_deref() {
            Some(explicit) if !explicit.trim().is_empty() => slugify(explicit),
            _ => slugify(&new.name),
        };

        let mut id = if slug.is_empty() {
            ProductId::new(now.as_millisecond().to_string())
        } else {
            ProductId::new(slug.clone())
        };

        if self.store.get_product(&id).await.is_ok() {
            id = ProductId::new(format!(
                "{id}-{:04}",
                now.as_millisecond().rem_euclid(10_000)
            ));
        }

        let record = ProductRecord {
            name: new.name,
            brand: new.brand,
            category: new.category,
            image: new.image,
            price: RawPrice::Number(prices::to_major(new.price)),
            full_price: Some(RawPrice::Number(prices::to_major(new.full_price))),
            discount_percentage: Some(f64::from(prices::discount_percent(
                new.full_price,
                new.price,
            ))),
            stock: new.stock,
            status: Some(derive_status(new.stock, None)),
            link: Some(format!("{PRODUCT_BASE_URL}/{id}")),
            sku: Some(generate_sku(new.brand, now)),
            slug: Some(slug),
            description: new.description,
            how_to_use: new.how_to_use,
            created_at: None,
        };

        self.store.put_product(&id, record).await?;
        info!(%id, "created product");

        let stored = self.store.get_product(&id).await?;

        Ok(Product::from_record(id, stored))
    }

    /// Create the placeholder announcement entry.
    ///
    /// # Errors
    ///
    /// [`AdminError::AnnouncementExists`] while another announcement document
    /// exists, plus store failures.
    pub async fn create_announcement(&self) -> Result<Product, AdminError> {
        let documents = self.store.list_products().await?;

        if documents
            .iter()
            .any(|(_, record)| record.status == Some(ProductStatus::Advert))
        {
            return Err(AdminError::AnnouncementExists);
        }

        let record = ProductRecord {
            name: "Novo Anúncio".to_string(),
            brand: Brand::Announcement,
            category: None,
            image: "https://via.placeholder.com/380x380.png?text=An%C3%BAncio".to_string(),
            price: RawPrice::Number(0.0),
            full_price: None,
            discount_percentage: None,
            stock: 0,
            status: Some(ProductStatus::Advert),
            link: None,
            sku: Some(format!(
                "AD-{:04}",
                Timestamp::now().as_millisecond().rem_euclid(10_000)
            )),
            slug: None,
            description: String::new(),
            how_to_use: None,
            created_at: None,
        };

        let id = self.store.insert_product(record).await?;
        info!(%id, "created announcement placeholder");

        let stored = self.store.get_product(&id).await?;

        Ok(Product::from_record(id, stored))
    }

    /// Update a product document.
    ///
    /// `publish` forces the status back to stock-derived (the "save and
    /// publish" button); otherwise the form's status is kept, still clamped to
    /// `Sem Estoque` when the stock hits zero. Announcements keep their
    /// status and custom outbound link.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] (wrapped) for an unknown identity, plus store
    /// failures.
    pub async fn update_product(
        &self,
        id: &ProductId,
        edit: ProductEdit,
        publish: bool,
    ) -> Result<Product, AdminError> {
        let existing = self.store.get_product(id).await?;

        let status = if edit.status == ProductStatus::Advert {
            ProductStatus::Advert
        } else if publish {
            derive_status(edit.stock, None)
        } else {
            derive_status(edit.stock, Some(edit.status))
        };

        let slug = match edit.slug.as_deref() {
            Some(explicit) if !explicit.trim().is_empty() => slugify(explicit),
            _ => slugify(&edit.name),
        };

        let link = if status == ProductStatus::Advert {
            edit.link
        } else {
            Some(format!("{PRODUCT_BASE_URL}/{slug}"))
        };

        let record = ProductRecord {
            name: edit.name,
            brand: edit.brand,
            category: edit.category,
            image: edit.image,
            price: RawPrice::Number(prices::to_major(edit.price)),
            full_price: Some(RawPrice::Number(prices::to_major(edit.full_price))),
            discount_percentage: Some(f64::from(prices::discount_percent(
                edit.full_price,
                edit.price,
            ))),
            stock: edit.stock,
            status: Some(status),
            link,
            sku: existing.sku,
            slug: Some(slug),
            description: edit.description,
            how_to_use: edit.how_to_use,
            created_at: existing.created_at,
        };

        self.store.put_product(id, record).await?;

        let stored = self.store.get_product(id).await?;

        Ok(Product::from_record(id.clone(), stored))
    }

    /// Soft-delete: mark the entry archived, hiding it from the storefront.
    ///
    /// # Errors
    ///
    /// Propagates store failures, including unknown identities.
    pub async fn archive(&self, id: &ProductId) -> Result<(), AdminError> {
        let mut record = self.store.get_product(id).await?;

        record.status = Some(ProductStatus::Archived);
        self.store.put_product(id, record).await?;
        info!(%id, "archived product");

        Ok(())
    }

    /// Bring an archived entry back; its status is re-derived from stock.
    ///
    /// # Errors
    ///
    /// Propagates store failures, including unknown identities.
    pub async fn restore(&self, id: &ProductId) -> Result<(), AdminError> {
        let mut record = self.store.get_product(id).await?;

        record.status = Some(derive_status(record.stock, None));
        self.store.put_product(id, record).await?;
        info!(%id, "restored product");

        Ok(())
    }

    /// Hard delete: the explicit, permanent removal path.
    ///
    /// # Errors
    ///
    /// Propagates store failures, including unknown identities.
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), AdminError> {
        self.store.delete_product(id).await?;
        info!(%id, "deleted product permanently");

        Ok(())
    }
}

/// Which side of the archive the admin table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminView {
    /// Everything not archived.
    #[default]
    Active,

    /// Archived entries only.
    Archived,
}

/// Admin table query: view, brand, free-text search, pagination.
#[derive(Debug, Clone)]
pub struct AdminQuery {
    /// Active or archived side.
    pub view: AdminView,

    /// Brand filter.
    pub brand: BrandFilter,

    /// Case-insensitive name-or-SKU fragment; blank matches everything.
    pub search: String,

    /// Requested page, 1-based.
    pub page: usize,

    /// Rows per page.
    pub page_size: usize,
}

impl Default for AdminQuery {
    fn default() -> Self {
        AdminQuery {
            view: AdminView::Active,
            brand: BrandFilter::All,
            search: String::new(),
            page: 1,
            page_size: ADMIN_PAGE_SIZE,
        }
    }
}

/// The admin table page for a query.
///
/// Unlike the storefront, the admin table clamps the requested page into range
/// so a shrinking filter never strands the view on an empty page.
#[must_use]
pub fn admin_page<'a>(products: &'a [Product], query: &AdminQuery) -> DisplayPage<'a> {
    let needle = query.search.trim().to_lowercase();

    let matching: Vec<&Product> = products
        .iter()
        .filter(|p| match query.view {
            AdminView::Active => p.status != ProductStatus::Archived,
            AdminView::Archived => p.status == ProductStatus::Archived,
        })
        .filter(|p| query.brand.matches(p))
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.sku.to_lowercase().contains(&needle)
        })
        .collect();

    let count = page_count(matching.len(), query.page_size);
    let page = query.page.clamp(1, count);

    let start = (page - 1).saturating_mul(query.page_size);
    let end = start.saturating_add(query.page_size).min(matching.len());

    DisplayPage {
        products: matching.get(start..end).unwrap_or_default().to_vec(),
        page,
        page_count: count,
    }
}
