//! Showcase
//!
//! The storefront's display pipeline: brand filtering, price ordering,
//! pagination, and the ad-last rule. Everything here is a pure transformation
//! over a borrowed catalog snapshot; session state lives in
//! [`crate::storefront`].

use std::cmp::Ordering;

use crate::products::{Brand, Product};

/// Products per storefront page.
pub const STOREFRONT_PAGE_SIZE: usize = 12;

/// Brand selection for the showcase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrandFilter {
    /// Every brand, advertisement entries included.
    #[default]
    All,

    /// Only products carrying the given brand tag. Advertisement entries carry
    /// [`Brand::Announcement`], so they never match a real brand.
    Only(Brand),
}

impl BrandFilter {
    /// Whether a product passes this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            BrandFilter::All => true,
            BrandFilter::Only(brand) => product.brand == *brand,
        }
    }
}

/// Price ordering for the showcase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceSort {
    /// Keep the catalog's own order.
    #[default]
    Unsorted,

    /// Cheapest first.
    LowToHigh,

    /// Most expensive first.
    HighToLow,
}

/// One rendered page of the catalog.
#[derive(Debug)]
pub struct DisplayPage<'a> {
    /// The entries to render, in display order.
    pub products: Vec<&'a Product>,

    /// The page these entries belong to (1-based).
    pub page: usize,

    /// Total page count; at least 1 even for an empty list.
    pub page_count: usize,
}

/// Filter and order the catalog for display, without pagination.
///
/// Adverts are excluded from the price comparison: when a sort is active they
/// order after every regular product, and among themselves keep catalog order.
#[must_use]
pub fn arrange<'a>(products: &'a [Product], brand: BrandFilter, sort: PriceSort) -> Vec<&'a Product> {
    let mut arranged: Vec<&Product> = products.iter().filter(|p| brand.matches(p)).collect();

    match sort {
        PriceSort::Unsorted => {}
        PriceSort::LowToHigh => arranged.sort_by(|a, b| compare_prices(a, b)),
        PriceSort::HighToLow => arranged.sort_by(|a, b| compare_prices(b, a)),
    }

    arranged
}

/// Stable partition moving advertisement entries to the end of a rendered
/// list, preserving relative order otherwise. Idempotent.
#[must_use]
pub fn ads_last<'a>(entries: &[&'a Product]) -> Vec<&'a Product> {
    let (mut regular, adverts): (Vec<&Product>, Vec<&Product>) =
        entries.iter().copied().partition(|p| !p.is_advert());

    regular.extend(adverts);
    regular
}

/// Total page count for a list length; never zero, so pagination controls can
/// always render "page 1 of 1".
#[must_use]
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }

    len.div_ceil(page_size).max(1)
}

/// Produce the page to render for the given view settings.
///
/// The requested page is clamped into `[1, page_count]`; the ad-last rule is
/// applied to the rendered slice, so an advert always closes the page it
/// falls on.
#[must_use]
pub fn display_page<'a>(
    products: &'a [Product],
    brand: BrandFilter,
    sort: PriceSort,
    page: usize,
    page_size: usize,
) -> DisplayPage<'a> {
    let arranged = arrange(products, brand, sort);
    let count = page_count(arranged.len(), page_size);
    let page = page.clamp(1, count);

    let start = (page - 1).saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(arranged.len());
    let slice = arranged.get(start..end).unwrap_or_default();

    DisplayPage {
        products: ads_last(slice),
        page,
        page_count: count,
    }
}

/// Mutable view state for a paged, filtered showcase.
///
/// Holds the knobs the customer can turn; the catalog itself stays outside so
/// a refetched snapshot never invalidates the view.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowcaseView {
    brand: BrandFilter,
    sort: PriceSort,
    page: usize,
}

impl ShowcaseView {
    /// A fresh view: all brands, catalog order, page 1.
    #[must_use]
    pub fn new() -> Self {
        ShowcaseView {
            brand: BrandFilter::All,
            sort: PriceSort::Unsorted,
            page: 1,
        }
    }

    /// Active brand filter.
    #[must_use]
    pub fn brand(&self) -> BrandFilter {
        self.brand
    }

    /// Active price ordering.
    #[must_use]
    pub fn sort(&self) -> PriceSort {
        self.sort
    }

    /// Current page (1-based).
    #[must_use]
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Select a brand filter; resets the view to page 1.
    pub fn set_brand(&mut self, brand: BrandFilter) {
        self.brand = brand;
        self.page = 1;
    }

    /// Select a price ordering.
    pub fn set_sort(&mut self, sort: PriceSort) {
        self.sort = sort;
    }

    /// Navigate to a page. Requests outside `[1, page_count]` are no-ops: the
    /// current page stays unchanged.
    pub fn set_page(&mut self, page: usize, page_count: usize) {
        if page >= 1 && page <= page_count {
            self.page = page;
        }
    }
}

/// Price order with adverts pushed after every regular product.
fn compare_prices(a: &Product, b: &Product) -> Ordering {
    match (a.is_advert(), b.is_advert()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.price.cmp(&b.price),
    }
}

#[cfg(test)]
mod tests {
    use crate::products::{ProductId, ProductStatus};

    use super::*;

    fn product(id: &str, brand: Brand, price: u64) -> Product {
        Product {
            id: ProductId::from(id),
            name: id.to_string(),
            brand,
            category: None,
            image: String::new(),
            price,
            full_price: price,
            discount_percent: 0,
            stock: 10,
            status: ProductStatus::Active,
            link: None,
            sku: String::new(),
            slug: id.to_string(),
            description: String::new(),
            how_to_use: None,
            created_at: None,
        }
    }

    fn advert(id: &str) -> Product {
        Product {
            brand: Brand::Announcement,
            status: ProductStatus::Advert,
            stock: 0,
            price: 0,
            full_price: 0,
            link: Some("https://example.com/consultora".to_string()),
            ..product(id, Brand::Natura, 0)
        }
    }

    fn ids<'a>(page: &DisplayPage<'a>) -> Vec<&'a str> {
        page.products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn all_filter_passes_everything() {
        let catalog = [
            product("a", Brand::Natura, 10_00),
            product("b", Brand::Avon, 20_00),
            advert("ad"),
        ];

        let arranged = arrange(&catalog, BrandFilter::All, PriceSort::Unsorted);

        assert_eq!(arranged.len(), 3);
    }

    #[test]
    fn brand_filter_excludes_other_brands_and_adverts() {
        let catalog = [
            product("a", Brand::Natura, 10_00),
            product("b", Brand::Avon, 20_00),
            advert("ad"),
        ];

        let arranged = arrange(&catalog, BrandFilter::Only(Brand::Natura), PriceSort::Unsorted);

        assert_eq!(arranged.len(), 1);
        assert_eq!(arranged.first().map(|p| p.id.as_str()), Some("a"));
    }

    #[test]
    fn price_sort_orders_regular_products() {
        let catalog = [
            product("mid", Brand::Natura, 20_00),
            product("cheap", Brand::Avon, 10_00),
            product("dear", Brand::Avon, 30_00),
        ];

        let asc = arrange(&catalog, BrandFilter::All, PriceSort::LowToHigh);
        let desc = arrange(&catalog, BrandFilter::All, PriceSort::HighToLow);

        let asc_ids: Vec<&str> = asc.iter().map(|p| p.id.as_str()).collect();
        let desc_ids: Vec<&str> = desc.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(asc_ids, ["cheap", "mid", "dear"]);
        assert_eq!(desc_ids, ["dear", "mid", "cheap"]);
    }

    #[test]
    fn price_sort_is_stable_for_equal_prices() {
        let catalog = [
            product("first", Brand::Natura, 10_00),
            product("second", Brand::Avon, 10_00),
        ];

        let asc = arrange(&catalog, BrandFilter::All, PriceSort::LowToHigh);
        let asc_ids: Vec<&str> = asc.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(asc_ids, ["first", "second"]);
    }

    #[test]
    fn sorting_pushes_adverts_after_regular_products() {
        let catalog = [
            advert("ad"),
            product("dear", Brand::Natura, 30_00),
            product("cheap", Brand::Avon, 10_00),
        ];

        let asc = arrange(&catalog, BrandFilter::All, PriceSort::LowToHigh);
        let asc_ids: Vec<&str> = asc.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(asc_ids, ["cheap", "dear", "ad"]);
    }

    #[test]
    fn ads_last_is_stable_and_idempotent() {
        let catalog = [
            product("a", Brand::Natura, 10_00),
            advert("ad"),
            product("b", Brand::Avon, 20_00),
        ];
        let entries: Vec<&Product> = catalog.iter().collect();

        let once = ads_last(&entries);
        let twice = ads_last(&once);

        let once_ids: Vec<&str> = once.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(once_ids, ["a", "b", "ad"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn single_advert_is_last_for_any_filter_and_sort() {
        let catalog = [
            product("a", Brand::Natura, 30_00),
            advert("ad"),
            product("b", Brand::Natura, 10_00),
        ];

        for sort in [PriceSort::Unsorted, PriceSort::LowToHigh, PriceSort::HighToLow] {
            let page = display_page(&catalog, BrandFilter::All, sort, 1, STOREFRONT_PAGE_SIZE);
            assert_eq!(
                page.products.last().map(|p| p.id.as_str()),
                Some("ad"),
                "advert not last under {sort:?}"
            );
        }
    }

    #[test]
    fn empty_catalog_yields_single_empty_page() {
        let page = display_page(&[], BrandFilter::All, PriceSort::Unsorted, 1, 12);

        assert_eq!(page.page_count, 1);
        assert_eq!(page.page, 1);
        assert!(page.products.is_empty());
    }

    #[test]
    fn page_count_never_zero() {
        assert_eq!(page_count(0, 12), 1);
        assert_eq!(page_count(12, 12), 1);
        assert_eq!(page_count(13, 12), 2);
        assert_eq!(page_count(5, 0), 1);
    }

    #[test]
    fn advert_closes_the_page_it_falls_on() {
        // 13 regular products with the advert mid-list: page 1 renders 11
        // regular entries plus the advert last, page 2 the remaining two.
        let mut catalog: Vec<Product> = (0..5)
            .map(|i| product(&format!("p{i}"), Brand::Natura, 10_00 + i))
            .collect();
        catalog.push(advert("ad"));
        catalog.extend((5..13).map(|i| product(&format!("p{i}"), Brand::Natura, 10_00 + i)));

        let first = display_page(&catalog, BrandFilter::All, PriceSort::Unsorted, 1, 12);
        let second = display_page(&catalog, BrandFilter::All, PriceSort::Unsorted, 2, 12);

        assert_eq!(first.page_count, 2);
        assert_eq!(
            ids(&first),
            ["p0", "p1", "p2", "p3", "p4", "p5", "p6", "p7", "p8", "p9", "p10", "ad"]
        );
        assert_eq!(ids(&second), ["p11", "p12"]);
    }

    #[test]
    fn view_set_page_out_of_range_is_noop() {
        let mut view = ShowcaseView::new();

        view.set_page(2, 3);
        assert_eq!(view.page(), 2);

        view.set_page(0, 3);
        assert_eq!(view.page(), 2);

        view.set_page(4, 3);
        assert_eq!(view.page(), 2);
    }

    #[test]
    fn view_brand_change_resets_page() {
        let mut view = ShowcaseView::new();
        view.set_page(3, 5);

        view.set_brand(BrandFilter::Only(Brand::Avon));

        assert_eq!(view.page(), 1);
        assert_eq!(view.brand(), BrandFilter::Only(Brand::Avon));
    }
}
