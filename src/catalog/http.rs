use crate::catalog::traits::CatalogSource;
use crate::config::{with_path, Config};
use crate::filters::{listing_url, FilterState};
use crate::models::{Category, CategoryList, ProductPage};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

const API_PREFIX: [&str; 2] = ["api", "v1"];

/// Catalog backed by the storefront's REST API
pub struct HttpCatalog {
    client: Client,
    base_url: Url,
}

impl HttpCatalog {
    /// Create a client for the API described by `config`
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
        })
    }

    /// `{base}/api/v1/{resource}`
    fn endpoint(&self, resource: &str) -> Result<Url> {
        let [api, version] = API_PREFIX;
        with_path(&self.base_url, &[api, version, resource])
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", what))?;

        if !response.status().is_success() {
            warn!("API returned status {} for {}", response.status(), what);
            anyhow::bail!("Failed to fetch {}: {}", what, response.status());
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode {} response", what))
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn categories(&self) -> Result<Vec<Category>> {
        let url = self.endpoint("categories")?;
        let list: CategoryList = self.get_json(url, "categories").await?;
        info!(count = list.data.len(), "Fetched categories");
        Ok(list.data)
    }

    async fn products(&self, filters: &FilterState) -> Result<ProductPage> {
        let url = listing_url(&self.endpoint("products")?, filters);
        let page: ProductPage = self.get_json(url, "products").await?;
        info!(
            rows = page.total_rows,
            total = page.pagination.total_item,
            page = page.pagination.page,
            "Fetched products"
        );
        Ok(page)
    }

    fn source_name(&self) -> &'static str {
        "Storefront API"
    }
}
