//! In-memory document store.
//!
//! The bundled [`ProductStore`]/[`MetricsStore`] backend: a pair of guarded
//! maps with the same observable semantics as the hosted store: identity
//! keyed documents, newest-first listings, and a counter document that must be
//! created before it can be incremented.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use jiff::Timestamp;
use rustc_hash::FxHashMap;
use tokio::sync::watch;
use uuid::Uuid;

use crate::{
    metrics::{InteractionCounts, Metric, MetricsStore},
    products::{Brand, ProductId, ProductRecord, ProductStatus},
    store::{ProductStore, StoreError},
};

/// In-memory reference store.
#[derive(Debug)]
pub struct MemoryStore {
    products: Mutex<FxHashMap<ProductId, ProductRecord>>,
    counters: Mutex<Option<InteractionCounts>>,
    counters_tx: watch::Sender<InteractionCounts>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        let (counters_tx, _) = watch::channel(InteractionCounts::default());

        MemoryStore {
            products: Mutex::new(FxHashMap::default()),
            counters: Mutex::new(None),
            counters_tx,
        }
    }

    /// A store pre-seeded with product documents.
    ///
    /// Documents without a creation timestamp are stamped on the way in, the
    /// way the hosted store assigns server timestamps.
    pub fn with_products(
        documents: impl IntoIterator<Item = (ProductId, ProductRecord)>,
    ) -> Self {
        let store = Self::new();

        {
            let mut products = store.lock_products();
            for (id, record) in documents {
                products.insert(id, stamped(record));
            }
        }

        store
    }

    fn lock_products(
        &self,
    ) -> std::sync::MutexGuard<'_, FxHashMap<ProductId, ProductRecord>> {
        self.products.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_counters(&self) -> std::sync::MutexGuard<'_, Option<InteractionCounts>> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listed(
        &self,
        keep: impl Fn(&ProductRecord) -> bool,
    ) -> Vec<(ProductId, ProductRecord)> {
        let mut listed: Vec<(ProductId, ProductRecord)> = self
            .lock_products()
            .iter()
            .filter(|(_, record)| keep(record))
            .map(|(id, record)| (id.clone(), record.clone()))
            .collect();

        sort_newest_first(&mut listed);

        listed
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<(ProductId, ProductRecord)>, StoreError> {
        Ok(self.listed(|_| true))
    }

    async fn list_unarchived(&self) -> Result<Vec<(ProductId, ProductRecord)>, StoreError> {
        Ok(self.listed(|record| record.status != Some(ProductStatus::Archived)))
    }

    async fn get_product(&self, id: &ProductId) -> Result<ProductRecord, StoreError> {
        self.lock_products()
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn related_products(
        &self,
        brand: Brand,
        exclude: &ProductId,
        limit: usize,
    ) -> Result<Vec<(ProductId, ProductRecord)>, StoreError> {
        let mut related = self.listed(|record| {
            record.brand == brand && record.status == Some(ProductStatus::Active)
        });

        related.retain(|(id, _)| id != exclude);
        related.truncate(limit);

        Ok(related)
    }

    async fn put_product(&self, id: &ProductId, record: ProductRecord) -> Result<(), StoreError> {
        self.lock_products().insert(id.clone(), stamped(record));
        Ok(())
    }

    async fn insert_product(&self, record: ProductRecord) -> Result<ProductId, StoreError> {
        let id = ProductId::new(Uuid::now_v7().simple().to_string());

        self.lock_products().insert(id.clone(), stamped(record));

        Ok(id)
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), StoreError> {
        self.lock_products()
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl MetricsStore for MemoryStore {
    async fn increment_counter(&self, metric: Metric) -> Result<(), StoreError> {
        let mut counters = self.lock_counters();

        let Some(counts) = counters.as_mut() else {
            return Err(StoreError::NotFound);
        };

        counts.bump(metric);
        self.counters_tx.send_replace(*counts);

        Ok(())
    }

    async fn create_counter(&self, metric: Metric) -> Result<(), StoreError> {
        let mut counters = self.lock_counters();

        let mut counts = InteractionCounts::default();
        counts.bump(metric);

        *counters = Some(counts);
        self.counters_tx.send_replace(counts);

        Ok(())
    }

    async fn read_counters(&self) -> Result<InteractionCounts, StoreError> {
        (*self.lock_counters()).ok_or(StoreError::NotFound)
    }

    fn watch_counters(&self) -> watch::Receiver<InteractionCounts> {
        self.counters_tx.subscribe()
    }
}

/// Assign the server creation timestamp when the document carries none.
fn stamped(mut record: ProductRecord) -> ProductRecord {
    if record.created_at.is_none() {
        record.created_at = Some(Timestamp::now());
    }

    record
}

/// Creation timestamp descending, untimestamped documents last, identity as
/// the tie breaker so listings are deterministic.
fn sort_newest_first(documents: &mut [(ProductId, ProductRecord)]) {
    documents.sort_by(|(a_id, a), (b_id, b)| {
        match (a.created_at, b.created_at) {
            (Some(a_at), Some(b_at)) => b_at.cmp(&a_at).then_with(|| a_id.cmp(b_id)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a_id.cmp(b_id),
        }
    });
}
