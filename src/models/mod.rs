use serde::{Deserialize, Serialize};

/// Category as returned by the category-list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub title: String,
    /// Grouping key, e.g. "men" or "women"
    #[serde(rename = "type")]
    pub kind: String,
}

impl Category {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: kind.into(),
        }
    }
}

/// Envelope of `GET /categories`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryList {
    pub data: Vec<Category>,
}

/// Product record in a search page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub product_detail: String,
    pub price: u64,
    pub category_id: String,
    pub condition: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Pagination metadata attached to a product page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_item: u64,
    pub total_page: u64,
}

/// Envelope of `GET /products`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductPage {
    pub data: Vec<Product>,
    pub total_rows: u64,
    pub pagination: Pagination,
}

impl ProductPage {
    /// An empty page for the given request window
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self {
            data: Vec::new(),
            total_rows: 0,
            pagination: Pagination {
                page,
                page_size,
                total_item: 0,
                total_page: 1,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// One-based inclusive range of the items shown, or `None` when empty
    pub fn showing_range(&self) -> Option<(u64, u64)> {
        if self.data.is_empty() {
            return None;
        }
        let page = u64::from(self.pagination.page.max(1));
        let size = u64::from(self.pagination.page_size.max(1));
        let start = (page - 1) * size + 1;
        let end = start + self.data.len() as u64 - 1;
        Some((start, end))
    }

    /// "Showing 1-20 of 100 results"
    pub fn summary(&self) -> String {
        match self.showing_range() {
            Some((start, end)) => format!(
                "Showing {}-{} of {} results",
                start, end, self.pagination.total_item
            ),
            None => "Showing 0 results".to_string(),
        }
    }
}
