use crate::filters::FilterState;
use crate::models::{Category, ProductPage};
use anyhow::Result;
use async_trait::async_trait;

/// Data source behind the product listing.
/// Implementations fetch the category list and one page of search results.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Every category the filter panel can offer
    async fn categories(&self) -> Result<Vec<Category>>;

    /// One page of products matching `filters`
    async fn products(&self, filters: &FilterState) -> Result<ProductPage>;

    /// Get the name of the catalog source
    fn source_name(&self) -> &'static str;
}
