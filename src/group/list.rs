//! Groups listing page with an inline creation form.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{UserID, UserRole, get_user_by_id},
    endpoints,
    group::{Group, db::count_items_per_group, get_all_groups},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        GROUP_BADGE_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed for the groups listing page.
#[derive(Debug, Clone)]
pub struct GroupsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GroupsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A group with its item count for template rendering.
#[derive(Debug, Clone)]
struct GroupWithItemCount {
    pub group: Group,
    pub item_count: u32,
}

/// Render the groups listing page with item counts.
pub async fn get_groups_page(
    State(state): State<GroupsPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get user {user_id}: {error}"))?;

    let groups = get_all_groups(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve groups: {error}"))?;

    let items_per_group = count_items_per_group(&connection)
        .inspect_err(|error| tracing::error!("Could not count items per group: {error}"))?;

    let groups_with_counts = groups
        .into_iter()
        .map(|group| {
            let item_count = *items_per_group.get(&group.id).unwrap_or(&0);

            GroupWithItemCount { group, item_count }
        })
        .collect::<Vec<_>>();

    Ok(groups_view(&groups_with_counts, user.role).into_response())
}

fn groups_view(groups: &[GroupWithItemCount], role: UserRole) -> Markup {
    let nav_bar = NavBar::new(endpoints::GROUPS_VIEW).into_html();

    let table_row = |group_with_count: &GroupWithItemCount| {
        let delete_url =
            endpoints::format_endpoint(endpoints::DELETE_GROUP, group_with_count.group.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? Its {} item(s) will be moved to the Unknown group.",
            group_with_count.group.name, group_with_count.item_count
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    span class=(GROUP_BADGE_STYLE)
                    {
                        (group_with_count.group.name)
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (group_with_count.item_count)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    @if !group_with_count.group.is_custom {
                        span class="text-gray-400 dark:text-gray-500" { "System" }
                    } @else if role == UserRole::Resident {
                        button
                            hx-delete=(delete_url)
                            hx-confirm=(confirm_message)
                            hx-target="closest tr"
                            hx-swap="delete"
                            hx-target-error="#alert-container"
                            class=(BUTTON_DELETE_STYLE)
                        {
                            "Delete"
                        }
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Groups" }
                }

                @if role == UserRole::Resident {
                    form
                        hx-post=(endpoints::POST_GROUP)
                        hx-target-error="#alert-container"
                        class="flex items-end gap-4"
                    {
                        div class="grow"
                        {
                            label
                                for="name"
                                class=(FORM_LABEL_STYLE)
                            {
                                "Group Name"
                            }

                            input
                                id="name"
                                type="text"
                                name="name"
                                placeholder="Group Name"
                                required
                                class=(FORM_TEXT_INPUT_STYLE);
                        }

                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Group" }
                    }
                }

                section class="rounded bg-gray-50 dark:bg-gray-800 overflow-hidden"
                {
                    table class="w-full my-2 text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Group" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Items" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for group in groups {
                                (table_row(group))
                            }
                        }
                    }
                }
            }
        }
    );

    base("Groups", &[], &content)
}
