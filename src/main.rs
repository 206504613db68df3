use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use storefront_listing::catalog::{CatalogSource, HttpCatalog, InMemoryCatalog};
use storefront_listing::cli::Args;
use storefront_listing::config::Config;
use storefront_listing::filters::labels::condition_label;
use storefront_listing::filters::{Condition, EnglishFormatter};
use storefront_listing::listing::{DisplayState, Listing, EMPTY_MESSAGE};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(url) = &args.api_url {
        config.api_base_url = url.clone();
        config.validate()?;
    }

    let source: Arc<dyn CatalogSource> = if args.offline {
        Arc::new(InMemoryCatalog::sample())
    } else {
        Arc::new(HttpCatalog::new(&config)?)
    };
    info!(source = source.source_name(), api = %config.api_base_url, "Storefront listing starting");

    let filters = args.filters(config.initial_filters())?;
    let mut listing = Listing::new(source, filters);
    listing.load_categories().await;
    listing.refresh_products().await;

    let formatter = EnglishFormatter;

    // Filter panel
    match listing.categories() {
        DisplayState::Ready(_) => {
            for section in listing.panel(&formatter) {
                println!("{}", section.heading);
                for option in &section.options {
                    let mark = if option.selected { "x" } else { " " };
                    println!("  [{}] {} ({})", mark, option.label, option.id);
                }
            }
        }
        DisplayState::Error(message) => println!("Error... {}", message),
        DisplayState::Empty => println!("No categories"),
        DisplayState::Loading => println!("Loading..."),
    }
    let condition = listing
        .filters()
        .condition
        .map(|c| condition_label(&formatter, c))
        .unwrap_or_else(|| {
            Condition::ALL
                .iter()
                .map(|c| condition_label(&formatter, *c))
                .collect::<Vec<_>>()
                .join(" / ")
        });
    println!("Sort By: {}", listing.filters().sort_by);
    println!("Condition: {}", condition);
    println!();

    let page_url = listing.url(&config.listing_page_url()?);
    println!("{}", page_url);
    println!();

    // Results
    match listing.products() {
        DisplayState::Ready(results) => {
            println!("{}\n", results.page.summary());
            for (i, product) in results.page.data.iter().enumerate() {
                println!("{}. {} ({} $)", i + 1, product.title, product.price);
                println!("   {} · {}", product.brand, product.condition);
                println!("   ID: {}", product.id);
                println!();
            }

            if let Some(path) = &args.output {
                let json = serde_json::to_string_pretty(&results.page)?;
                tokio::fs::write(path, json)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!(path = %path.display(), "Saved product page");
            }
        }
        DisplayState::Empty => {
            println!("{}", EMPTY_MESSAGE);
            println!("Please try again with different keywords or filters");
        }
        DisplayState::Error(message) => println!("Error... {}", message),
        DisplayState::Loading => println!("Loading..."),
    }

    Ok(())
}
