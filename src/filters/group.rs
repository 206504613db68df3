use crate::models::Category;
use std::collections::HashMap;

/// Categories keyed by type, in order of each type's first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryGroups {
    groups: Vec<(String, Vec<Category>)>,
}

impl CategoryGroups {
    pub fn get(&self, kind: &str) -> Option<&[Category]> {
        self.groups
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, categories)| categories.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Category])> {
        self.groups
            .iter()
            .map(|(kind, categories)| (kind.as_str(), categories.as_slice()))
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(kind, _)| kind.as_str())
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of categories across all groups
    pub fn total(&self) -> usize {
        self.groups.iter().map(|(_, c)| c.len()).sum()
    }

    /// Categories group by group
    pub fn flatten(&self) -> Vec<Category> {
        self.groups
            .iter()
            .flat_map(|(_, categories)| categories.iter().cloned())
            .collect()
    }
}

/// Group `categories` by type in a single pass
pub fn group_by_type(categories: &[Category]) -> CategoryGroups {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Category>)> = Vec::new();

    for category in categories {
        let slot = *positions.entry(category.kind.as_str()).or_insert_with(|| {
            groups.push((category.kind.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(category.clone());
    }

    CategoryGroups { groups }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(categories: &[Category]) -> Vec<&str> {
        categories.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn groups_by_first_occurrence() {
        let input = vec![
            Category::new("1", "men", "shirt"),
            Category::new("2", "women", "dress"),
            Category::new("3", "men", "pants"),
        ];
        let groups = group_by_type(&input);

        assert_eq!(groups.kinds().collect::<Vec<_>>(), vec!["men", "women"]);
        assert_eq!(titles(groups.get("men").unwrap()), vec!["shirt", "pants"]);
        assert_eq!(titles(groups.get("women").unwrap()), vec!["dress"]);
        assert!(groups.get("kids").is_none());
    }

    #[test]
    fn every_category_kept_once() {
        let input: Vec<Category> = (0..25)
            .map(|i| Category::new(i.to_string(), format!("type{}", i % 4), format!("t{}", i)))
            .collect();
        let groups = group_by_type(&input);

        assert_eq!(groups.len(), 4);
        assert_eq!(groups.total(), input.len());
        let mut ids: Vec<String> = groups.flatten().into_iter().map(|c| c.id).collect();
        ids.sort();
        let mut expected: Vec<String> = input.iter().map(|c| c.id.clone()).collect();
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn regrouping_is_stable() {
        let input = vec![
            Category::new("1", "kids", "sock"),
            Category::new("2", "men", "belt"),
            Category::new("3", "kids", "hat"),
            Category::new("4", "men", "tie"),
            Category::new("5", "kids", "scarf"),
        ];
        let once = group_by_type(&input);
        let twice = group_by_type(&once.flatten());
        assert_eq!(once, twice);
        assert_eq!(titles(twice.get("kids").unwrap()), vec!["sock", "hat", "scarf"]);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        let groups = group_by_type(&[]);
        assert!(groups.is_empty());
        assert_eq!(groups.total(), 0);
    }
}
