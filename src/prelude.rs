//! RedVitoria prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    admin::{
        AdminError, AdminQuery, AdminView, CatalogAdmin, NewProduct, ProductEdit, admin_page,
    },
    auth::{AdminGate, AuthError, AuthProvider, AuthUser},
    cart::{Cart, CartLine, CartTotals},
    checkout::{CheckoutError, OrderSummary, checkout_url, compose},
    metrics::{InteractionCounts, Metric, MetricsRecorder, MetricsStore},
    prices::RawPrice,
    products::{
        Brand, Category, Product, ProductId, ProductRecord, ProductStatus, derive_status,
    },
    showcase::{BrandFilter, DisplayPage, PriceSort, ShowcaseView, display_page},
    store::{MemoryStore, ProductStore, StoreError},
    storefront::{ProductDetail, Storefront},
};
