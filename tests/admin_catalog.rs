//! Integration tests for the admin flow.
//!
//! Covers the dashboard path end to end: the auth gate, product creation and
//! lifecycle against the shared store, and what the storefront sees after each
//! admin action.

use std::sync::Arc;

use testresult::TestResult;

use redvitoria::{
    admin::{AdminError, AdminQuery, AdminView, CatalogAdmin, NewProduct, ProductEdit, admin_page},
    auth::{AdminGate, AuthError, AuthUser, MockAuthProvider},
    products::{Brand, Category, ProductStatus},
    store::MemoryStore,
    storefront::Storefront,
};

fn lily() -> NewProduct {
    NewProduct {
        name: "Lily Eau de Parfum".to_string(),
        brand: Brand::Boticario,
        category: Some(Category::Perfumery),
        image: "https://example.com/lily.jpg".to_string(),
        stock: 2,
        full_price: 399_90,
        price: 299_90,
        description: "Original e lacrado. Pronta entrega.".to_string(),
        slug: None,
        how_to_use: None,
    }
}

fn edit_from(admin_product: &redvitoria::products::Product) -> ProductEdit {
    ProductEdit {
        name: admin_product.name.clone(),
        brand: admin_product.brand,
        category: admin_product.category,
        image: admin_product.image.clone(),
        stock: admin_product.stock,
        full_price: admin_product.full_price,
        price: admin_product.price,
        description: admin_product.description.clone(),
        slug: Some(admin_product.slug.clone()),
        link: admin_product.link.clone(),
        how_to_use: admin_product.how_to_use.clone(),
        status: admin_product.status,
    }
}

#[tokio::test]
async fn created_product_reaches_the_storefront() -> TestResult {
    let store = Arc::new(MemoryStore::new());
    let admin = CatalogAdmin::new(store.clone());

    let created = admin.create_product(lily()).await?;

    let mut session = Storefront::new(store.clone(), store);
    session.load_catalog().await?;

    let seen = session.find(&created.id).cloned();

    assert_eq!(seen.as_ref().map(|p| p.price), Some(299_90));
    assert_eq!(seen.as_ref().map(|p| p.discount_percent), Some(25));
    assert_eq!(seen.map(|p| p.status), Some(ProductStatus::Active));

    Ok(())
}

#[tokio::test]
async fn archive_hides_from_storefront_until_restored() -> TestResult {
    let store = Arc::new(MemoryStore::new());
    let admin = CatalogAdmin::new(store.clone());

    let created = admin.create_product(lily()).await?;

    admin.archive(&created.id).await?;

    let mut session = Storefront::new(store.clone(), store.clone());
    session.load_catalog().await?;
    assert!(session.find(&created.id).is_none(), "archived entries must not render");

    // The archived side of the admin table still lists it.
    let products = admin.list().await?;
    let archived_view = admin_page(
        &products,
        &AdminQuery {
            view: AdminView::Archived,
            ..AdminQuery::default()
        },
    );
    assert_eq!(archived_view.products.len(), 1);

    admin.restore(&created.id).await?;

    session.load_catalog().await?;
    assert!(session.find(&created.id).is_some(), "restored entries render again");

    Ok(())
}

#[tokio::test]
async fn hard_delete_removes_the_document_for_good() -> TestResult {
    let store = Arc::new(MemoryStore::new());
    let admin = CatalogAdmin::new(store.clone());

    let created = admin.create_product(lily()).await?;

    admin.delete_product(&created.id).await?;

    assert!(admin.list().await?.is_empty());

    let mut session = Storefront::new(store.clone(), store);
    session.load_catalog().await?;
    assert!(session.catalog().is_empty());

    Ok(())
}

#[tokio::test]
async fn selling_out_through_an_edit_disables_purchase() -> TestResult {
    let store = Arc::new(MemoryStore::new());
    let admin = CatalogAdmin::new(store.clone());

    let created = admin.create_product(lily()).await?;

    let mut sold_out = edit_from(&created);
    sold_out.stock = 0;
    admin.update_product(&created.id, sold_out, true).await?;

    let mut session = Storefront::new(store.clone(), store);
    session.load_catalog().await?;

    // Still rendered, but the bag rejects it.
    assert!(session.find(&created.id).is_some());
    assert!(!session.add_to_cart(&created.id, 1).await);
    assert_eq!(session.cart_badge(), 0);

    Ok(())
}

#[tokio::test]
async fn announcement_created_by_admin_renders_last() -> TestResult {
    let store = Arc::new(MemoryStore::new());
    let admin = CatalogAdmin::new(store.clone());

    // The announcement is created first, so a newest-first listing would put
    // the regular product above it even before the ad-last rule applies.
    let ad = admin.create_announcement().await?;
    admin.create_product(lily()).await?;

    let duplicate = admin.create_announcement().await;
    assert!(
        matches!(duplicate, Err(AdminError::AnnouncementExists)),
        "got {duplicate:?}"
    );

    let mut session = Storefront::new(store.clone(), store);
    session.load_catalog().await?;

    let page = session.current_page();

    assert_eq!(page.products.len(), 2);
    assert_eq!(
        page.products.last().map(|p| p.id.clone()),
        Some(ad.id.clone()),
        "the announcement renders last"
    );

    Ok(())
}

#[tokio::test]
async fn admin_search_spans_name_and_sku() -> TestResult {
    let store = Arc::new(MemoryStore::new());
    let admin = CatalogAdmin::new(store);

    let created = admin.create_product(lily()).await?;
    admin
        .create_product(NewProduct {
            name: "Malbec Desodorante Colônia".to_string(),
            slug: None,
            ..lily()
        })
        .await?;

    let products = admin.list().await?;

    let by_name = admin_page(
        &products,
        &AdminQuery {
            search: "lily".to_string(),
            ..AdminQuery::default()
        },
    );
    assert_eq!(by_name.products.len(), 1);

    let by_sku = admin_page(
        &products,
        &AdminQuery {
            search: created.sku.to_lowercase(),
            ..AdminQuery::default()
        },
    );
    assert!(
        !by_sku.products.is_empty(),
        "search by sku {} found nothing",
        created.sku
    );

    Ok(())
}

#[tokio::test]
async fn gate_admits_only_the_configured_account() -> TestResult {
    let gate = AdminGate::new("vitoria-uid");

    let mut allowed = MockAuthProvider::new();
    allowed.expect_sign_in().returning(|| {
        Ok(AuthUser {
            uid: "vitoria-uid".to_string(),
            display_name: Some("Vitória".to_string()),
        })
    });
    allowed.expect_sign_out().never();

    let admitted = gate.authorize(&allowed).await?;
    assert_eq!(admitted.uid, "vitoria-uid");

    let mut rejected = MockAuthProvider::new();
    rejected.expect_sign_in().returning(|| {
        Ok(AuthUser {
            uid: "someone-else".to_string(),
            display_name: None,
        })
    });
    rejected.expect_sign_out().times(1).returning(|| Ok(()));

    let result = gate.authorize(&rejected).await;
    assert!(matches!(result, Err(AuthError::AccessDenied)), "got {result:?}");

    Ok(())
}
