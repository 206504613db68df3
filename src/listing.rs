use crate::catalog::CatalogSource;
use crate::filters::labels::{category_label, group_heading};
use crate::filters::{group_by_type, listing_url, CategoryGroups, FilterEvent, FilterState, TextFormatter};
use crate::models::ProductPage;
use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const EMPTY_MESSAGE: &str = "Oops! No product found";

/// What a section of the page shows after a fetch
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState<T> {
    Loading,
    /// The fetch failed; nothing from it is used
    Error(String),
    /// The fetch succeeded with no rows
    Empty,
    Ready(T),
}

impl<T> DisplayState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            DisplayState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DisplayState::Loading)
    }
}

/// A product page and when it arrived
#[derive(Debug, Clone, PartialEq)]
pub struct ProductResults {
    pub page: ProductPage,
    pub fetched_at: DateTime<Utc>,
}

/// One checkbox in the category panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub id: String,
    pub label: String,
    pub selected: bool,
}

/// A titled group of checkboxes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSection {
    pub kind: String,
    pub heading: String,
    pub options: Vec<CategoryOption>,
}

/// Identifies one product request; only the latest one may land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

pub struct Listing {
    source: Arc<dyn CatalogSource>,
    filters: FilterState,
    categories: DisplayState<CategoryGroups>,
    products: DisplayState<ProductResults>,
    latest: u64,
}

impl Listing {
    pub fn new(source: Arc<dyn CatalogSource>, filters: FilterState) -> Self {
        Self {
            source,
            filters,
            categories: DisplayState::Loading,
            products: DisplayState::Loading,
            latest: 0,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn categories(&self) -> &DisplayState<CategoryGroups> {
        &self.categories
    }

    pub fn products(&self) -> &DisplayState<ProductResults> {
        &self.products
    }

    /// Apply a filter event; returns whether the state changed
    pub fn dispatch(&mut self, event: FilterEvent) -> bool {
        let before = self.filters.clone();
        self.filters.apply(event);
        let changed = before != self.filters;
        debug!(changed, "Applied filter event");
        changed
    }

    /// Replace the whole state, e.g. when the URL changes under the view
    pub fn restore(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    /// Listing URL reflecting the current filters
    pub fn url(&self, base: &Url) -> Url {
        listing_url(base, &self.filters)
    }

    /// Fetch and group the category list
    pub async fn load_categories(&mut self) {
        self.categories = DisplayState::Loading;
        self.categories = match self.source.categories().await {
            Ok(list) if list.is_empty() => DisplayState::Empty,
            Ok(list) => {
                let groups = group_by_type(&list);
                info!(categories = list.len(), groups = groups.len(), "Loaded categories");
                DisplayState::Ready(groups)
            }
            Err(e) => {
                warn!(error = %e, source = self.source.source_name(), "Category fetch failed");
                DisplayState::Error(format!("{:#}", e))
            }
        };
    }

    /// Start a product request for the current filters
    pub fn begin_products(&mut self) -> (Ticket, FilterState) {
        self.latest += 1;
        self.products = DisplayState::Loading;
        (Ticket(self.latest), self.filters.clone())
    }

    /// Land a response; returns `false` when a newer request superseded it
    pub fn finish_products(&mut self, ticket: Ticket, result: Result<ProductPage>) -> bool {
        if ticket.0 != self.latest {
            debug!(ticket = ticket.0, latest = self.latest, "Discarding stale product response");
            return false;
        }
        self.products = match result {
            Ok(page) if page.is_empty() => DisplayState::Empty,
            Ok(page) => DisplayState::Ready(ProductResults {
                page,
                fetched_at: Utc::now(),
            }),
            Err(e) => {
                warn!(error = %e, source = self.source.source_name(), "Product fetch failed");
                DisplayState::Error(format!("{:#}", e))
            }
        };
        true
    }

    /// Fetch the product page for the current filters
    pub async fn refresh_products(&mut self) {
        let (ticket, filters) = self.begin_products();
        let result = self.source.products(&filters).await;
        self.finish_products(ticket, result);
    }

    /// Render-ready category sections with headings, labels and selection
    pub fn panel(&self, formatter: &dyn TextFormatter) -> Vec<PanelSection> {
        let Some(groups) = self.categories.ready() else {
            return Vec::new();
        };
        groups
            .iter()
            .map(|(kind, categories)| PanelSection {
                kind: kind.to_string(),
                heading: group_heading(formatter, kind),
                options: categories
                    .iter()
                    .map(|category| CategoryOption {
                        id: category.id.clone(),
                        label: category_label(formatter, &category.title),
                        selected: self.filters.is_selected(&category.id),
                    })
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::filters::{EnglishFormatter, SortKey};
    use crate::models::Category;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl CatalogSource for Unreachable {
        async fn categories(&self) -> Result<Vec<Category>> {
            anyhow::bail!("connection refused")
        }

        async fn products(&self, _filters: &FilterState) -> Result<ProductPage> {
            anyhow::bail!("connection refused")
        }

        fn source_name(&self) -> &'static str {
            "Unreachable"
        }
    }

    fn sample_listing() -> Listing {
        Listing::new(Arc::new(InMemoryCatalog::sample()), FilterState::default())
    }

    #[tokio::test]
    async fn loads_grouped_panel() {
        let mut listing = sample_listing();
        assert!(listing.categories().is_loading());
        listing.dispatch(FilterEvent::Category {
            id: "c-men-pants".to_string(),
            selected: true,
        });
        listing.load_categories().await;

        let panel = listing.panel(&EnglishFormatter);
        let headings: Vec<&str> = panel.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec!["Men", "Women", "Kids", "Home Decors"]);

        let men = &panel[0].options;
        assert_eq!(men[0].label, "Shirt");
        assert!(!men[0].selected);
        assert_eq!(men[1].label, "Pants");
        assert!(men[1].selected);
    }

    #[tokio::test]
    async fn fetch_errors_become_error_state() {
        let mut listing = Listing::new(Arc::new(Unreachable), FilterState::default());
        listing.load_categories().await;
        listing.refresh_products().await;

        assert!(matches!(listing.categories(), DisplayState::Error(msg) if msg.contains("refused")));
        assert!(matches!(listing.products(), DisplayState::Error(_)));
        assert!(listing.panel(&EnglishFormatter).is_empty());
    }

    #[tokio::test]
    async fn no_rows_is_empty_not_error() {
        let mut listing = sample_listing();
        listing.dispatch(FilterEvent::ProductName("submarine".to_string()));
        listing.refresh_products().await;
        assert_eq!(listing.products(), &DisplayState::Empty);

        let mut bare = Listing::new(Arc::new(InMemoryCatalog::new(vec![])), FilterState::default());
        bare.load_categories().await;
        assert_eq!(bare.categories(), &DisplayState::Empty);
    }

    #[tokio::test]
    async fn refresh_uses_current_filters() {
        let mut listing = sample_listing();
        listing.dispatch(FilterEvent::Sort(SortKey::PriceAsc));
        listing.refresh_products().await;

        let results = listing.products().ready().unwrap();
        assert_eq!(results.page.data[0].title, "Velvet Cushion");
        assert_eq!(results.page.summary(), "Showing 1-10 of 10 results");
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut listing = sample_listing();
        let catalog = InMemoryCatalog::sample();

        let (first, first_filters) = listing.begin_products();
        listing.dispatch(FilterEvent::Category {
            id: "c-kids-shoe".to_string(),
            selected: true,
        });
        let (second, second_filters) = listing.begin_products();

        assert!(listing.finish_products(second, Ok(catalog.search(&second_filters))));
        assert!(!listing.finish_products(first, Ok(catalog.search(&first_filters))));

        let results = listing.products().ready().unwrap();
        assert_eq!(results.page.data.len(), 1);
        assert_eq!(results.page.data[0].title, "Canvas Sneaker");
    }

    #[test]
    fn dispatch_reports_changes() {
        let mut listing = sample_listing();
        assert!(!listing.dispatch(FilterEvent::Sort(SortKey::TitleAsc)));
        assert!(listing.dispatch(FilterEvent::Sort(SortKey::Oldest)));
        assert!(!listing.dispatch(FilterEvent::Category {
            id: "absent".to_string(),
            selected: false,
        }));
    }

    #[test]
    fn url_tracks_filters() {
        let mut listing = sample_listing();
        listing.dispatch(FilterEvent::Condition(Some(crate::filters::Condition::Used)));
        let base = Url::parse("https://shop.example/product").unwrap();
        assert_eq!(
            listing.url(&base).as_str(),
            "https://shop.example/product?page=1&page_size=20&sort_by=Title+a_z&condition=used"
        );

        listing.restore(FilterState::default());
        assert!(listing.filters().condition.is_none());
    }
}
