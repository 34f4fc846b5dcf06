//! Demo CLI configuration.

use clap::{Args, Parser, Subcommand};

use crate::{
    products::Brand,
    showcase::{BrandFilter, PriceSort},
};

/// RedVitoria storefront demo.
#[derive(Debug, Parser)]
#[command(name = "redvitoria", about = "RedVitoria storefront demo", long_about = None)]
pub struct Cli {
    /// What to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Load configuration from environment and CLI arguments.
    ///
    /// Loads `.env` first (missing files are ignored), then parses.
    #[must_use]
    pub fn load() -> Self {
        _ = dotenvy::dotenv();

        Self::parse()
    }
}

/// Demo subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a storefront showcase page from the demo catalog.
    Showcase(ShowcaseArgs),

    /// Simulate an order and print the WhatsApp checkout link.
    Order(OrderArgs),

    /// Render the admin product table and interaction counters.
    Admin(AdminArgs),
}

/// Arguments for the showcase view.
#[derive(Debug, Args)]
pub struct ShowcaseArgs {
    /// Brand filter: all, natura, boticario, avon or eudora.
    #[arg(short, long, default_value = "all", env = "REDVITORIA_BRAND")]
    pub brand: String,

    /// Price ordering: none, asc or desc.
    #[arg(short, long, default_value = "none")]
    pub sort: String,

    /// Page to render (1-based).
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,
}

/// Arguments for the simulated order.
#[derive(Debug, Args)]
pub struct OrderArgs {
    /// Product id to add; repeatable.
    #[arg(short, long = "item", required = true)]
    pub items: Vec<String>,

    /// Quantity added per item.
    #[arg(short, long, default_value_t = 1)]
    pub quantity: u32,
}

/// Arguments for the admin table.
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Show the archived side of the catalog.
    #[arg(long)]
    pub archived: bool,

    /// Name or SKU fragment to search for.
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Page to render (1-based).
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,
}

/// Parse a brand filter argument. `None` for unknown labels.
#[must_use]
pub fn parse_brand(value: &str) -> Option<BrandFilter> {
    match value.to_lowercase().as_str() {
        "all" | "todos" => Some(BrandFilter::All),
        "natura" => Some(BrandFilter::Only(Brand::Natura)),
        "boticario" => Some(BrandFilter::Only(Brand::Boticario)),
        "avon" => Some(BrandFilter::Only(Brand::Avon)),
        "eudora" => Some(BrandFilter::Only(Brand::Eudora)),
        _ => None,
    }
}

/// Parse a price ordering argument. `None` for unknown labels.
#[must_use]
pub fn parse_sort(value: &str) -> Option<PriceSort> {
    match value.to_lowercase().as_str() {
        "none" | "" => Some(PriceSort::Unsorted),
        "asc" | "low" => Some(PriceSort::LowToHigh),
        "desc" | "high" => Some(PriceSort::HighToLow),
        _ => None,
    }
}
