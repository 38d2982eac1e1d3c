//! Filtering of the in-memory item list.
//!
//! A filter is a set of five independent, optional predicates (group, status,
//! price range, name search) that combine with logical AND. An inactive
//! predicate passes every item, so a fully inactive filter returns the list
//! unchanged. Filtering is stable (input order is preserved) and idempotent.

use crate::{
    database_id::GroupId,
    item::{ItemStatus, ItemWithGroup},
};

/// The predicates used to narrow down the items list.
///
/// Each field is either active (`Some`) or inactive (`None`). The raw form
/// input on the items page is parsed with [ItemFilter::from_query], which
/// treats empty and malformed values as inactive rather than failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    /// Keep items belonging to this group.
    pub group_id: Option<GroupId>,
    /// Keep items with this status.
    pub status: Option<ItemStatus>,
    /// Keep items costing at least this much (inclusive).
    pub price_min: Option<f64>,
    /// Keep items costing at most this much (inclusive).
    pub price_max: Option<f64>,
    /// Keep items whose name contains this text (case-insensitive).
    pub search: Option<String>,
}

impl ItemFilter {
    /// Build a filter from raw query-string values.
    ///
    /// Empty strings deactivate a predicate. Values that do not parse (a
    /// non-numeric group ID or price bound, an unknown status) also
    /// deactivate their predicate instead of raising an error, so a typo in
    /// the price box never hides the whole list or crashes the page.
    pub fn from_query(
        group: Option<&str>,
        status: Option<&str>,
        price_min: Option<&str>,
        price_max: Option<&str>,
        search: Option<&str>,
    ) -> Self {
        Self {
            group_id: parse_active(group).and_then(|raw| raw.parse().ok()),
            status: parse_active(status).and_then(|raw| raw.parse().ok()),
            price_min: parse_price(price_min),
            price_max: parse_price(price_max),
            search: parse_active(search).map(|raw| raw.to_owned()),
        }
    }

    /// Whether any predicate is active.
    pub fn is_active(&self) -> bool {
        self.group_id.is_some()
            || self.status.is_some()
            || self.price_min.is_some()
            || self.price_max.is_some()
            || self.search.is_some()
    }

    /// The number of active predicates, shown on the filter toggle.
    pub fn active_count(&self) -> usize {
        [
            self.group_id.is_some(),
            self.status.is_some(),
            self.price_min.is_some(),
            self.price_max.is_some(),
            self.search.is_some(),
        ]
        .iter()
        .filter(|&&is_active| is_active)
        .count()
    }

    /// Whether `item` passes every active predicate.
    pub fn matches(&self, item: &ItemWithGroup) -> bool {
        let matches_group = match self.group_id {
            Some(group_id) => item.item.group_id == Some(group_id),
            None => true,
        };
        let matches_status = match self.status {
            Some(status) => item.item.status == status,
            None => true,
        };
        let matches_price_min = match self.price_min {
            Some(price_min) => item.item.price >= price_min,
            None => true,
        };
        let matches_price_max = match self.price_max {
            Some(price_max) => item.item.price <= price_max,
            None => true,
        };
        let matches_search = match &self.search {
            Some(search) => item
                .item
                .name
                .as_ref()
                .to_lowercase()
                .contains(&search.to_lowercase()),
            None => true,
        };

        matches_group && matches_status && matches_price_min && matches_price_max && matches_search
    }
}

/// Treat empty and whitespace-only strings as an inactive predicate.
fn parse_active(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

/// Parse a price bound, treating malformed input as inactive.
fn parse_price(raw: Option<&str>) -> Option<f64> {
    parse_active(raw)
        .and_then(|trimmed| trimmed.parse::<f64>().ok())
        .filter(|price| price.is_finite())
}

/// Return the items that pass every active predicate in `filter`, preserving
/// the input order.
pub fn filter_items<'a>(items: &'a [ItemWithGroup], filter: &ItemFilter) -> Vec<&'a ItemWithGroup> {
    items.iter().filter(|item| filter.matches(item)).collect()
}

#[cfg(test)]
mod filter_tests {
    use time::OffsetDateTime;

    use crate::{
        auth::UserID,
        item::{Item, ItemName, ItemStatus, ItemWithGroup},
    };

    use super::{ItemFilter, filter_items};

    fn test_item(name: &str, price: f64, status: ItemStatus, group_id: i64) -> ItemWithGroup {
        let now = OffsetDateTime::UNIX_EPOCH;

        ItemWithGroup {
            item: Item {
                id: group_id * 100 + price as i64,
                name: ItemName::new_unchecked(name),
                price,
                group_id: Some(group_id),
                status,
                created_by: UserID::new(1),
                gifted_by: None,
                created_at: now,
                updated_at: now,
            },
            group_name: format!("Group {group_id}"),
        }
    }

    fn test_items() -> Vec<ItemWithGroup> {
        vec![
            test_item("Reading lamp", 10.0, ItemStatus::Pending, 1),
            test_item("Floor Lamp", 55.0, ItemStatus::Purchased, 1),
            test_item("Couch", 450.0, ItemStatus::Pending, 2),
            test_item("Toaster", 25.0, ItemStatus::Gifted, 3),
        ]
    }

    fn names(filtered: &[&ItemWithGroup]) -> Vec<String> {
        filtered
            .iter()
            .map(|item| item.item.name.to_string())
            .collect()
    }

    #[test]
    fn inactive_filter_returns_all_items_in_order() {
        let items = test_items();
        let filter = ItemFilter::default();

        let filtered = filter_items(&items, &filter);

        assert_eq!(filtered.len(), items.len());
        assert_eq!(
            names(&filtered),
            vec!["Reading lamp", "Floor Lamp", "Couch", "Toaster"]
        );
    }

    #[test]
    fn group_filter_keeps_only_matching_group() {
        let items = test_items();
        let filter = ItemFilter {
            group_id: Some(1),
            ..Default::default()
        };

        let filtered = filter_items(&items, &filter);

        assert_eq!(names(&filtered), vec!["Reading lamp", "Floor Lamp"]);
    }

    #[test]
    fn status_filter_keeps_only_matching_status() {
        let items = test_items();
        let filter = ItemFilter {
            status: Some(ItemStatus::Pending),
            ..Default::default()
        };

        let filtered = filter_items(&items, &filter);

        assert_eq!(names(&filtered), vec!["Reading lamp", "Couch"]);
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let items = test_items();
        let filter = ItemFilter {
            price_min: Some(25.0),
            price_max: Some(55.0),
            ..Default::default()
        };

        let filtered = filter_items(&items, &filter);

        assert_eq!(names(&filtered), vec!["Floor Lamp", "Toaster"]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let items = test_items();
        let filter = ItemFilter {
            search: Some("LAMP".to_owned()),
            ..Default::default()
        };

        let filtered = filter_items(&items, &filter);

        assert_eq!(names(&filtered), vec!["Reading lamp", "Floor Lamp"]);
    }

    #[test]
    fn predicates_combine_with_and() {
        let items = test_items();
        let filter = ItemFilter {
            group_id: Some(1),
            status: Some(ItemStatus::Pending),
            search: Some("lamp".to_owned()),
            ..Default::default()
        };

        let filtered = filter_items(&items, &filter);

        assert_eq!(names(&filtered), vec!["Reading lamp"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let items = test_items();
        let filter = ItemFilter {
            status: Some(ItemStatus::Pending),
            price_max: Some(100.0),
            ..Default::default()
        };

        let once: Vec<_> = filter_items(&items, &filter)
            .into_iter()
            .cloned()
            .collect();
        let twice = filter_items(&once, &filter);

        assert_eq!(
            once.iter().collect::<Vec<_>>(),
            twice,
            "filtering an already-filtered list should change nothing"
        );
    }

    #[test]
    fn from_query_treats_empty_values_as_inactive() {
        let filter = ItemFilter::from_query(Some(""), Some(""), Some(""), Some(""), Some("  "));

        assert_eq!(filter, ItemFilter::default());
        assert!(!filter.is_active());
    }

    #[test]
    fn from_query_treats_malformed_numbers_as_inactive() {
        let items = test_items();

        let filter = ItemFilter::from_query(Some(""), Some(""), Some("abc"), Some(""), Some(""));

        assert_eq!(filter.price_min, None);
        let filtered = filter_items(&items, &filter);
        assert_eq!(filtered.len(), items.len(), "want the full set unchanged");
    }

    #[test]
    fn from_query_treats_unknown_status_as_inactive() {
        let filter = ItemFilter::from_query(None, Some("bought"), None, None, None);

        assert_eq!(filter.status, None);
    }

    #[test]
    fn from_query_parses_active_predicates() {
        let filter = ItemFilter::from_query(
            Some("3"),
            Some("pending"),
            Some("1.50"),
            Some("20"),
            Some("lamp"),
        );

        assert_eq!(filter.group_id, Some(3));
        assert_eq!(filter.status, Some(ItemStatus::Pending));
        assert_eq!(filter.price_min, Some(1.5));
        assert_eq!(filter.price_max, Some(20.0));
        assert_eq!(filter.search, Some("lamp".to_owned()));
        assert_eq!(filter.active_count(), 5);
    }

    #[test]
    fn from_query_ignores_non_finite_prices() {
        let filter = ItemFilter::from_query(None, None, Some("inf"), Some("NaN"), None);

        assert_eq!(filter.price_min, None);
        assert_eq!(filter.price_max, None);
    }
}
