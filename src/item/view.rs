//! HTML rendering for the items page.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    auth::UserRole,
    endpoints,
    html::{
        GROUP_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        edit_delete_action_links, format_currency,
    },
    item::{ItemStatus, ItemWithGroup},
};

/// The max number of graphemes to display in the item table rows before
/// truncating and displaying ellipses.
const MAX_NAME_GRAPHEMES: usize = 32;

fn status_badge_class(status: ItemStatus) -> &'static str {
    match status {
        ItemStatus::Pending => {
            "inline-flex items-center px-2.5 py-0.5 text-xs font-semibold rounded-full \
            text-yellow-800 bg-yellow-100 dark:bg-yellow-900 dark:text-yellow-300"
        }
        ItemStatus::Purchased => {
            "inline-flex items-center px-2.5 py-0.5 text-xs font-semibold rounded-full \
            text-green-800 bg-green-100 dark:bg-green-900 dark:text-green-300"
        }
        ItemStatus::Gifted => {
            "inline-flex items-center px-2.5 py-0.5 text-xs font-semibold rounded-full \
            text-blue-800 bg-blue-100 dark:bg-blue-900 dark:text-blue-300"
        }
    }
}

fn status_button_class(is_current: bool) -> &'static str {
    if is_current {
        "px-3 py-1 rounded-md text-xs font-medium bg-blue-100 text-blue-800 \
        dark:bg-blue-900 dark:text-blue-300 cursor-default"
    } else {
        "px-3 py-1 rounded-md text-xs font-medium bg-gray-100 text-gray-600 \
        hover:bg-blue-50 hover:text-blue-700 dark:bg-gray-700 dark:text-gray-300 \
        cursor-pointer"
    }
}

pub(super) fn status_badge(status: ItemStatus) -> Markup {
    html! {
        span class=(status_badge_class(status)) data-status=(status) { (status.label()) }
    }
}

/// The status controls shown in each item row.
///
/// Residents get a button per status; visitors only get a gift button, and
/// only while the item is still pending.
fn status_controls(item: &ItemWithGroup, role: UserRole) -> Markup {
    let status_url = endpoints::format_endpoint(endpoints::ITEM_STATUS, item.item.id);

    match role {
        UserRole::Resident => html! {
            form
                hx-post=(status_url)
                hx-target-error="#alert-container"
                class="flex gap-2"
            {
                @for status in ItemStatus::ALL {
                    button
                        type="submit"
                        name="status"
                        value=(status)
                        disabled[status == item.item.status]
                        class=(status_button_class(status == item.item.status))
                    {
                        (status.label())
                    }
                }
            }
        },
        UserRole::Visitor => html! {
            @if item.item.status == ItemStatus::Pending {
                form
                    hx-post=(status_url)
                    hx-target-error="#alert-container"
                {
                    button
                        type="submit"
                        name="status"
                        value=(ItemStatus::Gifted)
                        class=(status_button_class(false))
                    {
                        "Gift this item"
                    }
                }
            }
        },
    }
}

fn item_row(item: &ItemWithGroup, role: UserRole) -> Markup {
    let (name, tooltip) = format_name(item.item.name.as_ref());
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_ITEM_VIEW, item.item.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_ITEM, item.item.id);
    let confirm_message = format!(
        "Are you sure you want to delete '{}'? This cannot be undone.",
        item.item.name
    );

    html! {
        tr class=(TABLE_ROW_STYLE) data-item-row="true"
        {
            td class=(TABLE_CELL_STYLE) title=[tooltip]
            {
                span class="font-medium text-gray-900 dark:text-white" { (name) }
            }
            td class="px-6 py-4 text-right tabular-nums"
            {
                (format_currency(item.item.price))
            }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(GROUP_BADGE_STYLE) { (item.group_name) }
            }
            td class=(TABLE_CELL_STYLE)
            {
                (status_badge(item.item.status))
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex flex-wrap items-center gap-4"
                {
                    (status_controls(item, role))

                    @if role == UserRole::Resident {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        }
    }
}

pub(super) fn items_table(items: &[&ItemWithGroup], role: UserRole) -> Markup {
    html! {
        table class="w-full my-2 text-sm text-left rtl:text-right
            text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                    th scope="col" class="px-6 py-3 text-right" { "Price" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Group" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                }
            }

            tbody
            {
                @for item in items {
                    (item_row(item, role))
                }

                @if items.is_empty() {
                    tr
                    {
                        td
                            colspan="5"
                            data-empty-state="true"
                            class="px-6 py-4 text-center"
                        {
                            "No items match the current filters."
                        }
                    }
                }
            }
        }
    }
}

fn format_name(name: &str) -> (String, Option<&str>) {
    let name_length = name.graphemes(true).count();

    if name_length <= MAX_NAME_GRAPHEMES {
        (name.to_owned(), None)
    } else {
        let truncated: String = name.graphemes(true).take(MAX_NAME_GRAPHEMES - 3).collect();
        let truncated = truncated + "...";
        (truncated, Some(name))
    }
}
