//! Table views for dashboard data display.

use maud::{Markup, html};

use crate::{
    dashboard::aggregation::GroupSummary,
    html::{GROUP_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
};

/// Renders a table with one row per group: item count, pending count and
/// total value.
pub(super) fn group_summary_table(summaries: &[GroupSummary]) -> Markup {
    html! {
        div class="w-full"
        {
            h3 class="text-xl font-semibold mb-4" { "Summary by Group" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Group" }
                            th scope="col" class="px-6 py-3 text-right" { "Items" }
                            th scope="col" class="px-6 py-3 text-right" { "Pending" }
                            th scope="col" class="px-6 py-3 text-right" { "Total Value" }
                        }
                    }

                    tbody
                    {
                        @for summary in summaries {
                            tr class=(TABLE_ROW_STYLE) data-group-summary=(summary.group_name)
                            {
                                td class=(TABLE_CELL_STYLE)
                                {
                                    span class=(GROUP_BADGE_STYLE) { (summary.group_name) }
                                }
                                td class="px-6 py-4 text-right tabular-nums"
                                {
                                    (summary.total_items)
                                }
                                td class="px-6 py-4 text-right tabular-nums"
                                {
                                    (summary.pending_items)
                                }
                                td class="px-6 py-4 text-right tabular-nums font-medium
                                    text-gray-900 dark:text-white"
                                {
                                    (format_currency(summary.total_value))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
