use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Sort orders accepted by the product search endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortKey {
    #[default]
    TitleAsc,
    TitleDesc,
    PriceAsc,
    PriceDesc,
    Newest,
    Oldest,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::TitleAsc,
        SortKey::TitleDesc,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::Newest,
        SortKey::Oldest,
    ];

    /// Wire form used in `sort_by`
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::TitleAsc => "Title a_z",
            SortKey::TitleDesc => "Title z_a",
            SortKey::PriceAsc => "Price a_z",
            SortKey::PriceDesc => "Price z_a",
            SortKey::Newest => "Newest",
            SortKey::Oldest => "Oldest",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match SortKey::ALL.iter().find(|key| key.as_str() == s) {
            Some(key) => Ok(*key),
            None => bail!("Unknown sort key: {:?}", s),
        }
    }
}

impl TryFrom<String> for SortKey {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.as_str().to_string()
    }
}

/// Product condition filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    New,
    Used,
}

impl Condition {
    pub const ALL: [Condition; 2] = [Condition::New, Condition::Used];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::Used => "used",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "new" => Ok(Condition::New),
            "used" => Ok(Condition::Used),
            other => bail!("Unknown condition: {:?}", other),
        }
    }
}

/// Which end of the price range an update targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBound {
    Min,
    Max,
}

/// Filter, sort and pagination state of the product listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Selected category ids, in selection order, without duplicates
    pub categories: Vec<String>,
    pub page: u32,
    pub page_size: u32,
    pub sort_by: SortKey,
    /// (min, max); `None` is unbounded
    pub price_range: (Option<u64>, Option<u64>),
    pub condition: Option<Condition>,
    pub product_name: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: SortKey::default(),
            price_range: (None, None),
            condition: None,
            product_name: String::new(),
        }
    }
}

/// A single user interaction on the listing's filter panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    Category { id: String, selected: bool },
    Sort(SortKey),
    Price { bound: PriceBound, value: Option<u64> },
    /// Raw text from a price field; unparseable input is dropped
    PriceInput { bound: PriceBound, raw: String },
    Condition(Option<Condition>),
    ProductName(String),
    Page(u32),
    PageSize(u32),
    Reset,
}

impl FilterState {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.categories.iter().any(|c| c == id)
    }

    pub fn min_price(&self) -> Option<u64> {
        self.price_range.0
    }

    pub fn max_price(&self) -> Option<u64> {
        self.price_range.1
    }

    pub fn update_category(&mut self, id: &str, selected: bool) {
        if selected {
            if !self.is_selected(id) {
                self.categories.push(id.to_string());
            }
        } else {
            self.categories.retain(|c| c != id);
        }
    }

    pub fn update_sort(&mut self, sort_by: SortKey) {
        self.sort_by = sort_by;
    }

    pub fn update_price_bound(&mut self, bound: PriceBound, value: Option<u64>) {
        match bound {
            PriceBound::Min => self.price_range.0 = value,
            PriceBound::Max => self.price_range.1 = value,
        }
    }

    /// Blank input clears the bound, non-numeric input leaves state untouched
    pub fn update_price_input(&mut self, bound: PriceBound, raw: &str) {
        let raw = raw.trim();
        if raw.is_empty() {
            self.update_price_bound(bound, None);
            return;
        }
        match raw.parse::<u64>() {
            Ok(value) => self.update_price_bound(bound, Some(value)),
            Err(e) => debug!(?bound, raw, error = %e, "Ignoring non-numeric price input"),
        }
    }

    pub fn update_condition(&mut self, condition: Option<Condition>) {
        self.condition = condition;
    }

    pub fn update_product_name(&mut self, name: &str) {
        self.product_name = name.trim().to_string();
    }

    pub fn update_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn update_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
    }

    /// Apply one event in place
    pub fn apply(&mut self, event: FilterEvent) {
        match event {
            FilterEvent::Category { id, selected } => self.update_category(&id, selected),
            FilterEvent::Sort(key) => self.update_sort(key),
            FilterEvent::Price { bound, value } => self.update_price_bound(bound, value),
            FilterEvent::PriceInput { bound, raw } => self.update_price_input(bound, &raw),
            FilterEvent::Condition(condition) => self.update_condition(condition),
            FilterEvent::ProductName(name) => self.update_product_name(&name),
            FilterEvent::Page(page) => self.update_page(page),
            FilterEvent::PageSize(size) => self.update_page_size(size),
            FilterEvent::Reset => *self = FilterState::with_page_size(self.page_size),
        }
    }
}

/// Pure reducer: the state after `event`, leaving `state` untouched
pub fn reduce(state: &FilterState, event: FilterEvent) -> FilterState {
    let mut next = state.clone();
    next.apply(event);
    next
}
