//! The stat cards shown at the top of the dashboard.

use maud::{Markup, html};

use crate::{dashboard::aggregation::DashboardStats, html::format_currency};

fn stat_card(title: &str, value: &str) -> Markup {
    html! {
        div class="rounded bg-white p-4 shadow-sm dark:bg-gray-800"
        {
            p class="text-sm font-medium text-gray-500 truncate dark:text-gray-400" { (title) }
            p class="mt-1 text-2xl sm:text-3xl font-semibold text-gray-900 dark:text-white"
            {
                (value)
            }
        }
    }
}

/// Renders the three headline totals: spent, pending and estimated.
pub(super) fn stat_cards_view(stats: &DashboardStats) -> Markup {
    html! {
        section
            id="stat-cards"
            class="grid grid-cols-1 gap-4 sm:grid-cols-2 lg:grid-cols-3 w-full mb-4"
        {
            (stat_card("Total Spent", &format_currency(stats.total_spent)))
            (stat_card("Total Pending", &format_currency(stats.total_pending)))
            (stat_card("Total Estimated", &format_currency(stats.total_estimated)))
        }
    }
}
