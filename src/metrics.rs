//! Metrics
//!
//! The interaction counters behind the admin dashboard: a single well-known
//! counter document incremented on specific storefront interactions, with
//! create-on-first-write semantics and a live subscription for the dashboard
//! view.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::warn;

use crate::store::StoreError;

/// A counted storefront interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// A product was added to the bag.
    AddToCart,

    /// A checkout conversation was opened.
    WhatsappClick,

    /// An advertisement card was clicked.
    AdCardClick,
}

impl Metric {
    /// The counter field name in the stored document.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Metric::AddToCart => "addToCartClicks",
            Metric::WhatsappClick => "whatsappClicks",
            Metric::AdCardClick => "adCardClicks",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// The counter document read back by the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionCounts {
    /// Add-to-bag clicks.
    #[serde(default)]
    pub add_to_cart_clicks: u64,

    /// Checkout (WhatsApp) clicks.
    #[serde(default)]
    pub whatsapp_clicks: u64,

    /// Advertisement card clicks.
    #[serde(default)]
    pub ad_card_clicks: u64,
}

impl InteractionCounts {
    /// Read one counter.
    #[must_use]
    pub fn get(&self, metric: Metric) -> u64 {
        match metric {
            Metric::AddToCart => self.add_to_cart_clicks,
            Metric::WhatsappClick => self.whatsapp_clicks,
            Metric::AdCardClick => self.ad_card_clicks,
        }
    }

    /// Increment one counter in place.
    pub fn bump(&mut self, metric: Metric) {
        let slot = match metric {
            Metric::AddToCart => &mut self.add_to_cart_clicks,
            Metric::WhatsappClick => &mut self.whatsapp_clicks,
            Metric::AdCardClick => &mut self.ad_card_clicks,
        };

        *slot = slot.saturating_add(1);
    }
}

/// Storage interface for the counter document.
///
/// Mirrors the hosted store's update-vs-create split: incrementing a counter
/// fails with [`StoreError::NotFound`] until the document has been created.
#[automock]
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Increment one field of the existing counter document.
    async fn increment_counter(&self, metric: Metric) -> Result<(), StoreError>;

    /// Create the counter document with the given field at 1.
    async fn create_counter(&self, metric: Metric) -> Result<(), StoreError>;

    /// Read the counter document.
    async fn read_counters(&self) -> Result<InteractionCounts, StoreError>;

    /// Subscribe to live counter updates. Dropping the receiver unsubscribes.
    fn watch_counters(&self) -> watch::Receiver<InteractionCounts>;
}

/// Fire-and-forget recorder over a [`MetricsStore`].
///
/// Recording must never surface into a customer flow: failures are logged and
/// swallowed.
#[derive(Clone)]
pub struct MetricsRecorder {
    store: Arc<dyn MetricsStore>,
}

impl fmt::Debug for MetricsRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsRecorder").finish_non_exhaustive()
    }
}

impl MetricsRecorder {
    /// Wrap a metrics store.
    #[must_use]
    pub fn new(store: Arc<dyn MetricsStore>) -> Self {
        MetricsRecorder { store }
    }

    /// Record one interaction.
    ///
    /// Falls back to creating the counter document when the increment reports
    /// it missing; any residual failure is logged and dropped.
    pub async fn record(&self, metric: Metric) {
        match self.store.increment_counter(metric).await {
            Ok(()) => {}
            Err(StoreError::NotFound) => {
                if let Err(error) = self.store.create_counter(metric).await {
                    warn!(%metric, "failed to create interaction counter: {error}");
                }
            }
            Err(error) => {
                warn!(%metric, "failed to record interaction: {error}");
            }
        }
    }

    /// Current counters; a missing document reads as all zeros.
    pub async fn counts(&self) -> InteractionCounts {
        match self.store.read_counters().await {
            Ok(counts) => counts,
            Err(StoreError::NotFound) => InteractionCounts::default(),
            Err(error) => {
                warn!("failed to read interaction counters: {error}");
                InteractionCounts::default()
            }
        }
    }

    /// Live counter subscription for a dashboard view.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<InteractionCounts> {
        self.store.watch_counters()
    }
}
