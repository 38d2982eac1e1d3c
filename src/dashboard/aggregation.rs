//! Item data aggregation for the dashboard.
//!
//! Provides functions to summarize items by group and to calculate the
//! spent/pending/estimated totals shown in the stat cards. Both are pure
//! single-pass transformations over a snapshot of the item list.

use std::collections::HashMap;

use crate::{dashboard::item::ItemRecord, item::ItemStatus};

/// Aggregated figures for one group of items.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GroupSummary {
    /// The group's display name.
    pub group_name: String,
    /// How many items belong to the group.
    pub total_items: u32,
    /// How many of the group's items are still pending.
    pub pending_items: u32,
    /// The combined price of all the group's items, regardless of status.
    pub total_value: f64,
}

/// The headline totals shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct DashboardStats {
    /// The combined price of items that have been purchased or gifted.
    pub total_spent: f64,
    /// The combined price of items that are still pending.
    pub total_pending: f64,
    /// The combined price of every item: spent plus pending.
    pub total_estimated: f64,
}

/// Summarizes items per group.
///
/// Items are grouped by group *name*, not group ID: two groups sharing a
/// display name are merged into one summary row. This matches how the
/// dashboard presents groups, where the name is the aggregation key.
///
/// Groups appear in first-seen order, so the output is deterministic for a
/// given input order.
pub(super) fn summarize_by_group(items: &[ItemRecord]) -> Vec<GroupSummary> {
    let mut index_by_name: HashMap<&str, usize> = HashMap::new();
    let mut summaries: Vec<GroupSummary> = Vec::new();

    for item in items {
        let index = match index_by_name.get(item.group_name.as_str()) {
            Some(&index) => index,
            None => {
                summaries.push(GroupSummary {
                    group_name: item.group_name.clone(),
                    total_items: 0,
                    pending_items: 0,
                    total_value: 0.0,
                });
                index_by_name.insert(item.group_name.as_str(), summaries.len() - 1);
                summaries.len() - 1
            }
        };

        let summary = &mut summaries[index];
        summary.total_items += 1;
        summary.total_value += item.price;
        if item.status == ItemStatus::Pending {
            summary.pending_items += 1;
        }
    }

    summaries
}

/// Calculates the spent, pending and estimated totals.
///
/// Spent counts every item that is no longer pending (purchased or gifted),
/// pending counts the rest, and estimated is their sum. All three are zero
/// for an empty item list.
pub(super) fn compute_stats(items: &[ItemRecord]) -> DashboardStats {
    let mut stats = DashboardStats::default();

    for item in items {
        if item.status == ItemStatus::Pending {
            stats.total_pending += item.price;
        } else {
            stats.total_spent += item.price;
        }
    }

    stats.total_estimated = stats.total_spent + stats.total_pending;

    stats
}

#[cfg(test)]
mod tests {
    use crate::{
        dashboard::{
            aggregation::{compute_stats, summarize_by_group},
            item::ItemRecord,
        },
        item::ItemStatus,
    };

    fn create_test_item(price: f64, status: ItemStatus, group_name: &str) -> ItemRecord {
        ItemRecord {
            price,
            status,
            group_name: group_name.to_owned(),
        }
    }

    #[test]
    fn summarize_by_group_counts_and_sums() {
        let items = vec![
            create_test_item(10.0, ItemStatus::Pending, "Kitchen"),
            create_test_item(20.0, ItemStatus::Purchased, "Kitchen"),
            create_test_item(5.0, ItemStatus::Gifted, "Bedroom"),
        ];

        let summaries = summarize_by_group(&items);

        assert_eq!(summaries.len(), 2);

        assert_eq!(summaries[0].group_name, "Kitchen");
        assert_eq!(summaries[0].total_items, 2);
        assert_eq!(summaries[0].pending_items, 1);
        assert_eq!(summaries[0].total_value, 30.0);

        assert_eq!(summaries[1].group_name, "Bedroom");
        assert_eq!(summaries[1].total_items, 1);
        assert_eq!(summaries[1].pending_items, 0);
        assert_eq!(summaries[1].total_value, 5.0);
    }

    #[test]
    fn summarize_by_group_preserves_first_seen_order() {
        let items = vec![
            create_test_item(1.0, ItemStatus::Pending, "Zebra Room"),
            create_test_item(1.0, ItemStatus::Pending, "Attic"),
            create_test_item(1.0, ItemStatus::Pending, "Zebra Room"),
            create_test_item(1.0, ItemStatus::Pending, "Kitchen"),
        ];

        let summaries = summarize_by_group(&items);

        let names: Vec<&str> = summaries
            .iter()
            .map(|summary| summary.group_name.as_str())
            .collect();
        assert_eq!(names, vec!["Zebra Room", "Attic", "Kitchen"]);
    }

    #[test]
    fn summarize_by_group_merges_groups_sharing_a_name() {
        // Grouping is by display name, so duplicates collapse into one row.
        let items = vec![
            create_test_item(10.0, ItemStatus::Pending, "Kitchen"),
            create_test_item(15.0, ItemStatus::Purchased, "Kitchen"),
        ];

        let summaries = summarize_by_group(&items);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_value, 25.0);
    }

    #[test]
    fn summarize_by_group_handles_empty_input() {
        let summaries = summarize_by_group(&[]);

        assert!(summaries.is_empty());
    }

    #[test]
    fn summary_counts_add_up_to_item_count() {
        let items = vec![
            create_test_item(10.0, ItemStatus::Pending, "Kitchen"),
            create_test_item(20.0, ItemStatus::Purchased, "Bedroom"),
            create_test_item(5.0, ItemStatus::Gifted, "Kitchen"),
            create_test_item(7.5, ItemStatus::Pending, "Office"),
        ];

        let summaries = summarize_by_group(&items);

        let total_items: u32 = summaries.iter().map(|summary| summary.total_items).sum();
        let pending_items: u32 = summaries.iter().map(|summary| summary.pending_items).sum();
        assert_eq!(total_items as usize, items.len());
        assert_eq!(
            pending_items as usize,
            items
                .iter()
                .filter(|item| item.status == ItemStatus::Pending)
                .count()
        );
    }

    #[test]
    fn compute_stats_splits_spent_and_pending() {
        let items = vec![
            create_test_item(10.0, ItemStatus::Pending, "Kitchen"),
            create_test_item(20.0, ItemStatus::Purchased, "Kitchen"),
            create_test_item(5.0, ItemStatus::Gifted, "Bedroom"),
        ];

        let stats = compute_stats(&items);

        assert_eq!(stats.total_spent, 25.0);
        assert_eq!(stats.total_pending, 10.0);
        assert_eq!(stats.total_estimated, 35.0);
    }

    #[test]
    fn compute_stats_handles_empty_input() {
        let stats = compute_stats(&[]);

        assert_eq!(stats.total_spent, 0.0);
        assert_eq!(stats.total_pending, 0.0);
        assert_eq!(stats.total_estimated, 0.0);
    }

    #[test]
    fn estimated_equals_spent_plus_pending() {
        let items = vec![
            create_test_item(12.34, ItemStatus::Pending, "Kitchen"),
            create_test_item(56.78, ItemStatus::Purchased, "Bedroom"),
            create_test_item(0.0, ItemStatus::Gifted, "Office"),
            create_test_item(99.99, ItemStatus::Pending, "Laundry"),
        ];

        let stats = compute_stats(&items);

        assert_eq!(stats.total_estimated, stats.total_spent + stats.total_pending);
    }
}
