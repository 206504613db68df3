//! Command-line argument definition and processing.

use crate::filters::{from_query_string, Condition, FilterEvent, FilterState, PriceBound, SortKey};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Browse a storefront's product listing from the terminal
#[derive(Parser, Debug)]
#[command(name = "storefront-listing")]
#[command(version)]
#[command(about = "Browse a storefront's product listing from the terminal", long_about = None)]
pub struct Args {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Storefront API root (overrides config and STOREFRONT_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Use the built-in sample catalog instead of the API
    #[arg(long)]
    pub offline: bool,

    /// Listing query string to start from, e.g. "page=2&category=c1"
    #[arg(short, long)]
    pub query: Option<String>,

    /// Select a category id (repeatable)
    #[arg(long = "category", value_name = "ID")]
    pub categories: Vec<String>,

    /// Sort order: "Title a_z", "Title z_a", "Price a_z", "Price z_a", "Newest", "Oldest"
    #[arg(short, long, value_parser = parse_sort)]
    pub sort: Option<SortKey>,

    /// Minimum price
    #[arg(long)]
    pub min_price: Option<String>,

    /// Maximum price
    #[arg(long)]
    pub max_price: Option<String>,

    /// Product condition
    #[arg(long, value_parser = parse_condition)]
    pub condition: Option<Condition>,

    /// Substring of the product title
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub page_size: Option<u32>,

    /// Save the product page as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable verbose output (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_sort(raw: &str) -> Result<SortKey, String> {
    raw.parse().map_err(|e: anyhow::Error| e.to_string())
}

fn parse_condition(raw: &str) -> Result<Condition, String> {
    raw.parse().map_err(|e: anyhow::Error| e.to_string())
}

impl Args {
    /// Filter events expressed by the flags, in panel order
    pub fn events(&self) -> Vec<FilterEvent> {
        let mut events: Vec<FilterEvent> = self
            .categories
            .iter()
            .map(|id| FilterEvent::Category {
                id: id.clone(),
                selected: true,
            })
            .collect();
        if let Some(sort) = self.sort {
            events.push(FilterEvent::Sort(sort));
        }
        if let Some(raw) = &self.min_price {
            events.push(FilterEvent::PriceInput {
                bound: PriceBound::Min,
                raw: raw.clone(),
            });
        }
        if let Some(raw) = &self.max_price {
            events.push(FilterEvent::PriceInput {
                bound: PriceBound::Max,
                raw: raw.clone(),
            });
        }
        if let Some(condition) = self.condition {
            events.push(FilterEvent::Condition(Some(condition)));
        }
        if let Some(name) = &self.name {
            events.push(FilterEvent::ProductName(name.clone()));
        }
        if let Some(size) = self.page_size {
            events.push(FilterEvent::PageSize(size));
        }
        if let Some(page) = self.page {
            events.push(FilterEvent::Page(page));
        }
        events
    }

    /// Starting state: `--query` if given, else `defaults`, then the flags on top
    pub fn filters(&self, defaults: FilterState) -> Result<FilterState> {
        let mut state = match &self.query {
            Some(query) => from_query_string(query).context("Failed to read --query")?,
            None => defaults,
        };
        for event in self.events() {
            state.apply(event);
        }
        Ok(state)
    }
}
