use crate::catalog::traits::CatalogSource;
use crate::filters::{FilterState, SortKey};
use crate::models::{Category, Pagination, Product, ProductPage};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::cmp::Ordering;
use tracing::debug;

/// A product together with the time it was listed
#[derive(Debug, Clone)]
struct Listed {
    product: Product,
    listed_at: DateTime<Utc>,
}

/// Catalog held in memory, searched the way the storefront API searches
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    categories: Vec<Category>,
    products: Vec<Listed>,
}

impl InMemoryCatalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories,
            products: Vec::new(),
        }
    }

    /// Add a product listed at `listed_at`
    pub fn add_product(&mut self, product: Product, listed_at: DateTime<Utc>) {
        self.products.push(Listed { product, listed_at });
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn matches(listed: &Listed, filters: &FilterState) -> bool {
        let product = &listed.product;
        if !filters.categories.is_empty() && !filters.is_selected(&product.category_id) {
            return false;
        }
        if let Some(min) = filters.min_price() {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = filters.max_price() {
            if product.price > max {
                return false;
            }
        }
        if let Some(condition) = filters.condition {
            if product.condition != condition.as_str() {
                return false;
            }
        }
        // `title LIKE %name%`, case-sensitive
        if !filters.product_name.is_empty() && !product.title.contains(&filters.product_name) {
            return false;
        }
        true
    }

    fn compare(sort_by: SortKey, a: &Listed, b: &Listed) -> Ordering {
        match sort_by {
            SortKey::TitleAsc => a.product.title.cmp(&b.product.title),
            SortKey::TitleDesc => b.product.title.cmp(&a.product.title),
            SortKey::PriceAsc => a.product.price.cmp(&b.product.price),
            SortKey::PriceDesc => b.product.price.cmp(&a.product.price),
            SortKey::Newest => b.listed_at.cmp(&a.listed_at),
            SortKey::Oldest => a.listed_at.cmp(&b.listed_at),
        }
    }

    /// Filter, sort and slice one page
    pub fn search(&self, filters: &FilterState) -> ProductPage {
        let mut hits: Vec<&Listed> = self
            .products
            .iter()
            .filter(|listed| Self::matches(listed, filters))
            .collect();
        hits.sort_by(|a, b| Self::compare(filters.sort_by, a, b));

        let page = filters.page.max(1);
        let page_size = filters.page_size.max(1);
        let total = hits.len() as u64;
        let total_page = if total == 0 {
            1
        } else {
            total.div_ceil(u64::from(page_size))
        };

        let start = (page as usize - 1).saturating_mul(page_size as usize);
        let data: Vec<Product> = hits
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .map(|listed| listed.product.clone())
            .collect();

        debug!(total, shown = data.len(), page, "Searched in-memory catalog");

        ProductPage {
            total_rows: data.len() as u64,
            data,
            pagination: Pagination {
                page,
                page_size,
                total_item: total,
                total_page,
            },
        }
    }

    /// Small fixed catalog for offline runs
    pub fn sample() -> Self {
        let mut catalog = Self::new(vec![
            Category::new("c-men-shirt", "men", "shirts"),
            Category::new("c-women-dress", "women", "dresses"),
            Category::new("c-men-pants", "men", "pants"),
            Category::new("c-kids-shoe", "kids", "shoes"),
            Category::new("c-women-bag", "women", "bags"),
            Category::new("c-home-cushion", "home_decor", "cushions"),
        ]);

        let items: [(&str, &str, &str, u64, &str, &str); 10] = [
            ("p-01", "Oxford Shirt", "Harbor", 45, "c-men-shirt", "new"),
            ("p-02", "Linen Shirt", "Harbor", 38, "c-men-shirt", "used"),
            ("p-03", "Wrap Dress", "Alma", 79, "c-women-dress", "new"),
            ("p-04", "Slip Dress", "Alma", 52, "c-women-dress", "used"),
            ("p-05", "Chino Pants", "Northway", 60, "c-men-pants", "new"),
            ("p-06", "Cargo Pants", "Northway", 25, "c-men-pants", "used"),
            ("p-07", "Canvas Sneaker", "Kitfox", 30, "c-kids-shoe", "new"),
            ("p-08", "Leather Tote", "Alma", 120, "c-women-bag", "new"),
            ("p-09", "Crossbody Bag", "Alma", 65, "c-women-bag", "used"),
            ("p-10", "Velvet Cushion", "Homely", 18, "c-home-cushion", "new"),
        ];

        let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single().unwrap_or_default();
        for (i, (id, title, brand, price, category_id, condition)) in items.into_iter().enumerate() {
            catalog.add_product(
                Product {
                    id: id.to_string(),
                    title: title.to_string(),
                    brand: brand.to_string(),
                    product_detail: format!("{} by {}", title, brand),
                    price,
                    category_id: category_id.to_string(),
                    condition: condition.to_string(),
                    images: vec![format!("images/{}.png", id)],
                },
                epoch + Duration::days(i as i64),
            );
        }
        catalog
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }

    async fn products(&self, filters: &FilterState) -> Result<ProductPage> {
        Ok(self.search(filters))
    }

    fn source_name(&self) -> &'static str {
        "In-memory"
    }
}
