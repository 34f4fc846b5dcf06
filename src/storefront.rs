//! Storefront
//!
//! The customer session: the catalog snapshot, the showcase view state, and
//! the cart live here, owned by one object. All cart mutation flows through
//! the ledger operations; all catalog data enters through the normalization
//! boundary; interaction metrics are recorded fire-and-forget on the way.

use std::{fmt, sync::Arc};

use smallvec::SmallVec;
use tracing::{debug, error};

use crate::{
    cart::{Cart, CartTotals},
    checkout::{self, CheckoutError, OrderSummary},
    metrics::{Metric, MetricsRecorder, MetricsStore},
    products::{Product, ProductId},
    showcase::{
        BrandFilter, DisplayPage, PriceSort, STOREFRONT_PAGE_SIZE, ShowcaseView, display_page,
        page_count,
    },
    store::{ProductStore, StoreError},
};

/// How many related products the detail view shows.
const RELATED_LIMIT: usize = 3;

/// A product detail view: the product plus a few related entries of the same
/// brand.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    /// The product itself.
    pub product: Product,

    /// Related active products of the same brand, newest first.
    pub related: SmallVec<[Product; 3]>,
}

/// One customer session over the storefront.
pub struct Storefront {
    store: Arc<dyn ProductStore>,
    metrics: MetricsRecorder,
    catalog: Vec<Product>,
    cart: Cart,
    view: ShowcaseView,
}

impl fmt::Debug for Storefront {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storefront")
            .field("catalog", &self.catalog.len())
            .field("cart", &self.cart)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Open a session over a product store and metrics backend.
    ///
    /// The catalog starts empty; call [`Storefront::load_catalog`] to fetch
    /// the first snapshot.
    #[must_use]
    pub fn new(store: Arc<dyn ProductStore>, metrics: Arc<dyn MetricsStore>) -> Self {
        Storefront {
            store,
            metrics: MetricsRecorder::new(metrics),
            catalog: Vec::new(),
            cart: Cart::new(),
            view: ShowcaseView::new(),
        }
    }

    /// Fetch a fresh catalog snapshot (unarchived entries only), normalizing
    /// every document on the way in. The previous snapshot is replaced
    /// wholesale, never merged.
    ///
    /// # Errors
    ///
    /// Propagates store failures; the previous snapshot is kept in that case.
    pub async fn load_catalog(&mut self) -> Result<(), StoreError> {
        let documents = match self.store.list_unarchived().await {
            Ok(documents) => documents,
            Err(err) => {
                error!("failed to fetch the catalog: {err}");
                return Err(err);
            }
        };

        self.catalog = documents
            .into_iter()
            .map(|(id, record)| Product::from_record(id, record))
            .collect();

        debug!(products = self.catalog.len(), "catalog snapshot loaded");

        Ok(())
    }

    /// The current catalog snapshot.
    #[must_use]
    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    /// Look a product up in the current snapshot.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.catalog.iter().find(|p| &p.id == id)
    }

    /// The page of products to render for the current view settings.
    #[must_use]
    pub fn current_page(&self) -> DisplayPage<'_> {
        display_page(
            &self.catalog,
            self.view.brand(),
            self.view.sort(),
            self.view.page(),
            STOREFRONT_PAGE_SIZE,
        )
    }

    /// Select a brand filter; the view returns to page 1.
    pub fn set_brand(&mut self, brand: BrandFilter) {
        self.view.set_brand(brand);
    }

    /// Select a price ordering.
    pub fn set_sort(&mut self, sort: PriceSort) {
        self.view.set_sort(sort);
    }

    /// Navigate to a page; requests outside the valid range are no-ops.
    pub fn set_page(&mut self, page: usize) {
        let arranged_len = self
            .catalog
            .iter()
            .filter(|p| self.view.brand().matches(p))
            .count();

        self.view
            .set_page(page, page_count(arranged_len, STOREFRONT_PAGE_SIZE));
    }

    /// Current page number (1-based).
    #[must_use]
    pub fn page(&self) -> usize {
        self.view.page()
    }

    /// Add a product to the bag and count the interaction.
    ///
    /// Returns whether the bag changed: unknown identities and unpurchasable
    /// entries (adverts, zero stock) leave it untouched and record nothing.
    pub async fn add_to_cart(&mut self, id: &ProductId, quantity: u32) -> bool {
        let Some(product) = self.find(id).cloned() else {
            debug!(%id, "add to cart ignored; product not in snapshot");
            return false;
        };

        if !product.is_purchasable() {
            debug!(%id, "add to cart ignored; product not purchasable");
            return false;
        }

        self.cart.add(&product, quantity);
        self.metrics.record(Metric::AddToCart).await;

        true
    }

    /// Adjust a bag line by a signed delta, clamped to the product's current
    /// stock; dropping to zero removes the line.
    pub fn adjust_quantity(&mut self, id: &ProductId, delta: i64) {
        if let Some(product) = self.find(id).cloned() {
            self.cart.adjust(&product, delta);
        }
    }

    /// Remove a bag line unconditionally.
    pub fn remove_from_cart(&mut self, id: &ProductId) {
        self.cart.remove(id);
    }

    /// Empty the bag.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// The bag ledger.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Total units in the bag, used for the badge counter.
    #[must_use]
    pub fn cart_badge(&self) -> u32 {
        self.cart.item_count()
    }

    /// Order summary figures against the current snapshot.
    #[must_use]
    pub fn cart_totals(&self) -> CartTotals {
        self.cart.totals(&self.catalog)
    }

    /// Compose the order message for the current bag.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::EmptyCart`] when the bag is empty.
    pub fn order_summary(&self) -> Result<OrderSummary, CheckoutError> {
        checkout::compose(&self.cart.resolve(&self.catalog))
    }

    /// Compose the order and produce the WhatsApp deep link, counting the
    /// checkout interaction.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::EmptyCart`] when the bag is empty; nothing is counted
    /// in that case.
    pub async fn checkout(&self) -> Result<String, CheckoutError> {
        let summary = self.order_summary()?;

        self.metrics.record(Metric::WhatsappClick).await;

        Ok(checkout::checkout_url(&summary))
    }

    /// Fetch a product detail view: the document itself plus up to three
    /// related active products of the same brand.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] for an unknown identity, plus store failures.
    pub async fn product_detail(&self, id: &ProductId) -> Result<ProductDetail, StoreError> {
        let record = self.store.get_product(id).await?;
        let product = Product::from_record(id.clone(), record);

        let related = if product.is_advert() {
            SmallVec::new()
        } else {
            // Fetch one extra in case the product itself comes back.
            self.store
                .related_products(product.brand, id, RELATED_LIMIT + 1)
                .await?
                .into_iter()
                .map(|(related_id, related_record)| {
                    Product::from_record(related_id, related_record)
                })
                .take(RELATED_LIMIT)
                .collect()
        };

        Ok(ProductDetail { product, related })
    }

    /// Count a click on the announcement card and hand back its outbound
    /// link. Returns `None` for unknown identities and non-advert entries.
    pub async fn announcement_clicked(&self, id: &ProductId) -> Option<String> {
        let product = self.find(id)?;

        if !product.is_advert() {
            return None;
        }

        self.metrics.record(Metric::AdCardClick).await;

        product.link.clone()
    }

    /// Live metrics subscription (used by the dashboard home view).
    #[must_use]
    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }
}
