//! Product store
//!
//! The boundary toward the hosted document database. The rest of the crate
//! only sees these traits; [`MemoryStore`] is the bundled reference
//! implementation and the unit under test.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::products::{Brand, ProductId, ProductRecord};

pub mod memory;

pub use memory::MemoryStore;

/// Errors surfaced by a document store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document under the requested identity.
    #[error("document not found")]
    NotFound,

    /// A document already exists under the requested identity.
    #[error("document already exists")]
    AlreadyExists,

    /// The backend could not be reached or rejected the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Query interface over the `products` collection.
///
/// Documents are keyed by [`ProductId`]; listings return identity/record pairs
/// ordered newest first (creation timestamp descending, untimestamped
/// documents last).
#[automock]
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Every document in the collection (the admin view).
    async fn list_products(&self) -> Result<Vec<(ProductId, ProductRecord)>, StoreError>;

    /// Every document whose status is not `Arquivado` (the storefront view).
    async fn list_unarchived(&self) -> Result<Vec<(ProductId, ProductRecord)>, StoreError>;

    /// A single document by identity.
    async fn get_product(&self, id: &ProductId) -> Result<ProductRecord, StoreError>;

    /// Active documents of the same brand, excluding one identity, newest
    /// first, at most `limit`: the product-detail "related items" query.
    async fn related_products(
        &self,
        brand: Brand,
        exclude: &ProductId,
        limit: usize,
    ) -> Result<Vec<(ProductId, ProductRecord)>, StoreError>;

    /// Write a document under a chosen identity, creating or replacing it.
    async fn put_product(&self, id: &ProductId, record: ProductRecord) -> Result<(), StoreError>;

    /// Write a document under a store-generated identity.
    async fn insert_product(&self, record: ProductRecord) -> Result<ProductId, StoreError>;

    /// Remove a document permanently.
    ///
    /// Returns [`StoreError::NotFound`] when no document exists under the
    /// identity.
    async fn delete_product(&self, id: &ProductId) -> Result<(), StoreError>;
}
