//! RedVitoria demo CLI.
//!
//! Runs the storefront engine against the bundled demo catalog: renders
//! showcase pages, simulates an order through the WhatsApp checkout, and shows
//! the admin table with the interaction counters.

use std::{error::Error, sync::Arc};

use tabled::{
    builder::Builder,
    settings::{Alignment, Color, Style, object::{Columns, Rows}},
};
use tracing_subscriber::EnvFilter;

use redvitoria::{
    admin::{AdminQuery, AdminView, CatalogAdmin, admin_page},
    config::{AdminArgs, Cli, Command, OrderArgs, ShowcaseArgs, parse_brand, parse_sort},
    fixtures,
    metrics::{Metric, MetricsRecorder},
    prices::format_brl,
    products::{Product, ProductId},
    showcase::DisplayPage,
    storefront::Storefront,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let cli = Cli::load();

    match cli.command {
        Command::Showcase(args) => showcase(args).await,
        Command::Order(args) => order(args).await,
        Command::Admin(args) => admin(args).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .init();
}

async fn showcase(args: ShowcaseArgs) -> Result<(), Box<dyn Error>> {
    let brand = parse_brand(&args.brand)
        .ok_or_else(|| format!("unknown brand filter: {}", args.brand))?;
    let sort =
        parse_sort(&args.sort).ok_or_else(|| format!("unknown price ordering: {}", args.sort))?;

    let store = Arc::new(fixtures::demo_store()?);
    let mut session = Storefront::new(store.clone(), store);

    session.load_catalog().await?;
    session.set_brand(brand);
    session.set_sort(sort);
    session.set_page(args.page);

    let page = session.current_page();

    println!("{}", showcase_table(&page));
    println!("Página {} de {}", page.page, page.page_count);

    Ok(())
}

async fn order(args: OrderArgs) -> Result<(), Box<dyn Error>> {
    let store = Arc::new(fixtures::demo_store()?);
    let mut session = Storefront::new(store.clone(), store);

    session.load_catalog().await?;

    for item in &args.items {
        let id = ProductId::new(item.clone());

        if !session.add_to_cart(&id, args.quantity).await {
            return Err(format!("product {item} is not available for purchase").into());
        }
    }

    let summary = session.order_summary()?;
    let url = session.checkout().await?;

    println!("{}", summary.message());
    println!();
    println!("{url}");

    Ok(())
}

async fn admin(args: AdminArgs) -> Result<(), Box<dyn Error>> {
    let store = Arc::new(fixtures::demo_store()?);
    let catalog_admin = CatalogAdmin::new(store.clone());

    let products = catalog_admin.list().await?;

    let query = AdminQuery {
        view: if args.archived {
            AdminView::Archived
        } else {
            AdminView::Active
        },
        search: args.search,
        page: args.page,
        ..AdminQuery::default()
    };

    let page = admin_page(&products, &query);

    println!("{}", admin_table(&page));
    println!("Página {} de {}", page.page, page.page_count);

    let counts = MetricsRecorder::new(store).counts().await;

    println!();
    println!("Adicionar à sacola: {}", counts.get(Metric::AddToCart));
    println!("Cliques no WhatsApp: {}", counts.get(Metric::WhatsappClick));
    println!("Cliques no anúncio: {}", counts.get(Metric::AdCardClick));

    Ok(())
}

fn showcase_table(page: &DisplayPage<'_>) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Produto", "Marca", "De", "Por", "Desconto", "Status"]);

    for product in &page.products {
        builder.push_record(showcase_row(product));
    }

    styled(builder, 2..5)
}

fn showcase_row(product: &Product) -> [String; 6] {
    if product.is_advert() {
        return [
            product.name.clone(),
            product.brand.to_string(),
            "—".to_string(),
            "—".to_string(),
            "—".to_string(),
            product.link.clone().unwrap_or_default(),
        ];
    }

    let full = if product.discount_percent > 0 {
        format_brl(product.full_price)
    } else {
        "—".to_string()
    };
    let discount = if product.discount_percent > 0 {
        format!("-{}%", product.discount_percent)
    } else {
        "—".to_string()
    };

    [
        product.name.clone(),
        product.brand.to_string(),
        full,
        format_brl(product.price),
        discount,
        product.status.to_string(),
    ]
}

fn admin_table(page: &DisplayPage<'_>) -> String {
    let mut builder = Builder::default();

    builder.push_record(["SKU", "Produto", "Marca", "Preço", "Estoque", "Status"]);

    for product in &page.products {
        builder.push_record([
            product.sku.clone(),
            product.name.clone(),
            product.brand.to_string(),
            format_brl(product.price),
            product.stock.to_string(),
            product.status.to_string(),
        ]);
    }

    styled(builder, 3..5)
}

fn styled(builder: Builder, right_aligned: std::ops::Range<usize>) -> String {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(right_aligned), Alignment::right());

    table.to_string()
}
