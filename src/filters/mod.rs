pub mod group;
pub mod labels;
pub mod query;
pub mod state;

pub use group::{group_by_type, CategoryGroups};
pub use labels::{EnglishFormatter, TextFormatter};
pub use query::{from_query_pairs, from_query_string, from_url, listing_url, to_query_pairs};
pub use state::{reduce, Condition, FilterEvent, FilterState, PriceBound, SortKey};
