use super::state::{Condition, FilterState, SortKey, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use anyhow::{Context, Result};
use reqwest::Url;
use tracing::debug;

pub const PAGE: &str = "page";
pub const PAGE_SIZE: &str = "page_size";
pub const SORT_BY: &str = "sort_by";
pub const CATEGORY: &str = "category";
pub const PRICE: &str = "price";
pub const CONDITION: &str = "condition";
pub const PRODUCT_NAME: &str = "product_name";

/// Ordered `(key, value)` pairs for `state`.
///
/// A max without a min goes out as `price=0&price=<max>`.
pub fn to_query_pairs(state: &FilterState) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
        (PAGE, state.page.to_string()),
        (PAGE_SIZE, state.page_size.to_string()),
        (SORT_BY, state.sort_by.as_str().to_string()),
    ];

    pairs.extend(state.categories.iter().map(|id| (CATEGORY, id.clone())));

    // `price` is positional on the server: a lone value is a minimum
    let (min, max) = state.price_range;
    let min = if max.is_some() { min.or(Some(0)) } else { min };
    pairs.extend([min, max].into_iter().flatten().map(|p| (PRICE, p.to_string())));

    if let Some(condition) = state.condition {
        pairs.push((CONDITION, condition.as_str().to_string()));
    }
    if !state.product_name.is_empty() {
        pairs.push((PRODUCT_NAME, state.product_name.clone()));
    }

    pairs
}

/// Rebuild a [`FilterState`] from decoded query pairs.
///
/// Malformed values fall back to the field's default and unknown keys are
/// skipped, so any deep link yields a usable state.
pub fn from_query_pairs<I, K, V>(pairs: I) -> FilterState
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut state = FilterState::default();
    let mut prices: Vec<u64> = Vec::with_capacity(2);

    for (key, value) in pairs {
        let (key, value) = (key.as_ref(), value.as_ref());
        match key {
            PAGE => state.page = parse_positive(key, value).unwrap_or(DEFAULT_PAGE),
            PAGE_SIZE => state.page_size = parse_positive(key, value).unwrap_or(DEFAULT_PAGE_SIZE),
            SORT_BY => {
                state.sort_by = value.parse::<SortKey>().unwrap_or_else(|e| {
                    debug!(error = %e, "Falling back to default sort");
                    SortKey::default()
                })
            }
            CATEGORY if !value.is_empty() => state.update_category(value, true),
            CATEGORY => debug!("Ignoring empty category"),
            PRICE => match value.trim().parse::<u64>() {
                Ok(price) if prices.len() < 2 => prices.push(price),
                Ok(_) => debug!(value, "Ignoring extra price value"),
                Err(_) => debug!(value, "Ignoring non-numeric price value"),
            },
            CONDITION => match value.parse::<Condition>() {
                Ok(condition) => state.condition = Some(condition),
                Err(e) => debug!(error = %e, "Ignoring condition"),
            },
            PRODUCT_NAME => state.product_name = value.to_string(),
            _ => debug!(key, "Ignoring unknown query key"),
        }
    }

    state.price_range = match prices[..] {
        [] => (None, None),
        [min] => (Some(min), None),
        // a zero floor only accompanies a max
        [0, max, ..] => (None, Some(max)),
        [min, max, ..] => (Some(min), Some(max)),
    };
    state
}

/// Parse a raw query string such as `page=2&category=c1`, with or without `?`
pub fn from_query_string(query: &str) -> Result<FilterState> {
    let mut url = Url::parse("http://localhost/").context("Failed to build query parser")?;
    url.set_query(Some(query.trim_start_matches('?')));
    Ok(from_url(&url))
}

/// Read the filter state persisted in a listing URL
pub fn from_url(url: &Url) -> FilterState {
    from_query_pairs(url.query_pairs())
}

/// `base` with its query replaced by the serialized `state`
pub fn listing_url(base: &Url, state: &FilterState) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(to_query_pairs(state));
    url
}

fn parse_positive(key: &str, value: &str) -> Option<u32> {
    match value.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Some(n),
        _ => {
            debug!(key, value, "Ignoring invalid positive integer");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::state::PriceBound;

    fn owned(pairs: &[(&'static str, &str)]) -> Vec<(&'static str, String)> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    fn sample_state() -> FilterState {
        let mut state = FilterState::default();
        state.update_category("c1", true);
        state.update_category("c2", true);
        state.update_price_bound(PriceBound::Min, Some(10));
        state.update_condition(Some(Condition::New));
        state
    }

    #[test]
    fn serializes_in_fixed_order() {
        let pairs = to_query_pairs(&sample_state());
        assert_eq!(
            pairs,
            owned(&[
                ("page", "1"),
                ("page_size", "20"),
                ("sort_by", "Title a_z"),
                ("category", "c1"),
                ("category", "c2"),
                ("price", "10"),
                ("condition", "new"),
            ])
        );
    }

    #[test]
    fn serialization_is_deterministic() {
        let state = sample_state();
        assert_eq!(to_query_pairs(&state), to_query_pairs(&state));
    }

    #[test]
    fn defaults_emit_only_paging_and_sort() {
        let pairs = to_query_pairs(&FilterState::default());
        assert_eq!(
            pairs,
            owned(&[("page", "1"), ("page_size", "20"), ("sort_by", "Title a_z")])
        );
    }

    #[test]
    fn full_state_emits_name_last() {
        let mut state = sample_state();
        state.update_price_bound(PriceBound::Max, Some(90));
        state.update_product_name("linen shirt");
        state.update_sort(SortKey::PriceDesc);
        let pairs = to_query_pairs(&state);
        assert_eq!(&pairs[2], &("sort_by", "Price z_a".to_string()));
        assert_eq!(&pairs[5..7], &owned(&[("price", "10"), ("price", "90")])[..]);
        assert_eq!(pairs.last(), Some(&("product_name", "linen shirt".to_string())));
    }

    #[test]
    fn zero_price_is_emitted() {
        let mut state = FilterState::default();
        state.update_price_bound(PriceBound::Min, Some(0));
        assert!(to_query_pairs(&state).contains(&("price", "0".to_string())));
    }

    #[test]
    fn max_only_range_sends_zero_floor() {
        let mut state = FilterState::default();
        state.update_price_bound(PriceBound::Max, Some(40));
        let pairs = to_query_pairs(&state);
        assert_eq!(&pairs[3..], &owned(&[("price", "0"), ("price", "40")])[..]);
        assert_eq!(state.price_range, (None, Some(40)));
    }

    #[test]
    fn max_only_range_survives_round_trip() {
        let mut state = FilterState::default();
        state.update_price_bound(PriceBound::Max, Some(40));
        assert_eq!(from_query_pairs(to_query_pairs(&state)), state);

        let url = listing_url(&Url::parse("https://shop.example/product").unwrap(), &state);
        assert_eq!(from_url(&url).price_range, (None, Some(40)));
    }

    #[test]
    fn zero_floor_with_max_reads_as_unbounded_min() {
        let mut state = FilterState::default();
        state.update_price_bound(PriceBound::Min, Some(0));
        state.update_price_bound(PriceBound::Max, Some(75));
        let restored = from_query_pairs(to_query_pairs(&state));
        assert_eq!(restored.price_range, (None, Some(75)));

        let lone_zero = from_query_pairs([("price", "0")]);
        assert_eq!(lone_zero.price_range, (Some(0), None));
    }

    #[test]
    fn deserialize_inverts_serialize() {
        let mut state = sample_state();
        state.update_price_bound(PriceBound::Max, Some(250));
        state.update_product_name("jacket");
        state.update_page(3);
        state.update_page_size(48);
        state.update_sort(SortKey::Oldest);
        assert_eq!(from_query_pairs(to_query_pairs(&state)), state);
    }

    #[test]
    fn malformed_values_fall_back() {
        let state = from_query_pairs([
            ("page", "0"),
            ("page_size", "many"),
            ("sort_by", "Random"),
            ("price", "cheap"),
            ("price", "5"),
            ("condition", "broken"),
            ("utm_source", "mail"),
            ("category", ""),
        ]);
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 20);
        assert_eq!(state.sort_by, SortKey::TitleAsc);
        assert_eq!(state.price_range, (Some(5), None));
        assert!(state.condition.is_none());
        assert!(state.categories.is_empty());
    }

    #[test]
    fn repeated_categories_are_deduplicated() {
        let state = from_query_pairs([("category", "a"), ("category", "b"), ("category", "a")]);
        assert_eq!(state.categories, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn query_string_is_url_decoded() {
        let state =
            from_query_string("?page=2&sort_by=Title+z_a&category=c%201&product_name=red%20dress")
                .unwrap();
        assert_eq!(state.page, 2);
        assert_eq!(state.sort_by, SortKey::TitleDesc);
        assert_eq!(state.categories, vec!["c 1".to_string()]);
        assert_eq!(state.product_name, "red dress");
    }

    #[test]
    fn listing_url_replaces_existing_query() {
        let base = Url::parse("https://shop.example/products?stale=1").unwrap();
        let url = listing_url(&base, &sample_state());
        assert_eq!(url.path(), "/products");
        assert!(!url.as_str().contains("stale"));
        assert_eq!(from_url(&url), sample_state());
    }
}
