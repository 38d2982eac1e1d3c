//! The items page: the filterable list of everything the household wants to buy.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{UserID, UserRole, get_user_by_id},
    endpoints,
    group::{Group, get_all_groups},
    html::{
        BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, base,
    },
    item::{
        ItemStatus, ItemWithGroup,
        core::get_all_items,
        filter::{ItemFilter, filter_items},
        view::items_table,
    },
    navigation::NavBar,
};

/// The state needed for the items page.
#[derive(Debug, Clone)]
pub struct ItemsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ItemsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw filter values from the items page query string.
///
/// All fields are kept as strings so that whatever the user typed can be
/// round-tripped back into the form, even when it does not parse. Parsing
/// into an [ItemFilter] is lenient: blank or malformed values deactivate
/// the predicate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemsQuery {
    /// The selected group ID.
    pub group: Option<String>,
    /// The selected status.
    pub status: Option<String>,
    /// The minimum price bound.
    pub price_min: Option<String>,
    /// The maximum price bound.
    pub price_max: Option<String>,
    /// The name search text.
    pub search: Option<String>,
}

impl ItemsQuery {
    /// Parse the raw query values into filter predicates.
    pub fn to_filter(&self) -> ItemFilter {
        ItemFilter::from_query(
            self.group.as_deref(),
            self.status.as_deref(),
            self.price_min.as_deref(),
            self.price_max.as_deref(),
            self.search.as_deref(),
        )
    }
}

/// Display the filterable list of items.
pub async fn get_items_page(
    State(state): State<ItemsPageState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ItemsQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get user {user_id}: {error}"))?;

    let groups = get_all_groups(&connection)
        .inspect_err(|error| tracing::error!("could not get groups: {error}"))?;

    let items = get_all_items(&connection)
        .inspect_err(|error| tracing::error!("could not get items: {error}"))?;

    let filter = query.to_filter();
    let filtered_items = filter_items(&items, &filter);

    Ok(items_view(
        &filtered_items,
        items.len(),
        &groups,
        user.role,
        &query,
        &filter,
    )
    .into_response())
}

fn items_view(
    items: &[&ItemWithGroup],
    total_item_count: usize,
    groups: &[Group],
    role: UserRole,
    query: &ItemsQuery,
    filter: &ItemFilter,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::ITEMS_VIEW).into_html();
    let new_item_route = endpoints::NEW_ITEM_VIEW;

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Items" }

                    @if role == UserRole::Resident {
                        a href=(new_item_route) class=(LINK_STYLE)
                        {
                            "New Item"
                        }
                    }
                }

                (filter_panel(groups, query, filter))

                section class="rounded bg-gray-50 dark:bg-gray-800 overflow-hidden"
                {
                    @if filter.is_active() {
                        p class="px-6 pt-4 text-sm text-gray-500 dark:text-gray-400"
                        {
                            "Showing " (items.len()) " of " (total_item_count) " items"
                        }
                    }

                    (items_table(items, role))
                }
            }
        }
    };

    base("Items", &[], &content)
}

fn filter_panel(groups: &[Group], query: &ItemsQuery, filter: &ItemFilter) -> Markup {
    let active_count = filter.active_count();
    let summary_label = if active_count > 0 {
        format!("Filters ({active_count} active)")
    } else {
        "Filters".to_owned()
    };
    let raw_group = query.group.as_deref().unwrap_or("");
    let raw_status = query.status.as_deref().unwrap_or("");

    html! {
        details
            class="rounded bg-gray-50 dark:bg-gray-800"
            open[filter.is_active()]
        {
            summary
                class="list-none [&::-webkit-details-marker]:hidden px-6 py-3 cursor-pointer
                text-sm font-semibold text-blue-600 dark:text-blue-400"
            {
                (summary_label)
            }

            form
                method="get"
                action=(endpoints::ITEMS_VIEW)
                class="px-6 pb-4 space-y-4"
            {
                div
                {
                    label for="search" class=(FORM_LABEL_STYLE) { "Search items" }

                    input
                        type="text"
                        name="search"
                        id="search"
                        placeholder="Type an item name..."
                        value=[query.search.as_deref()]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="grid grid-cols-1 md:grid-cols-2 gap-4"
                {
                    div
                    {
                        label for="group" class=(FORM_LABEL_STYLE) { "Group" }

                        select name="group" id="group" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            option value="" { "All groups" }

                            @for group in groups {
                                @if raw_group == group.id.to_string() {
                                    option value=(group.id) selected { (group.name) }
                                } @else {
                                    option value=(group.id) { (group.name) }
                                }
                            }
                        }
                    }

                    div
                    {
                        label for="status" class=(FORM_LABEL_STYLE) { "Status" }

                        select name="status" id="status" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            option value="" { "All statuses" }

                            @for status in ItemStatus::ALL {
                                @if raw_status == status.as_str() {
                                    option value=(status) selected { (status.label()) }
                                } @else {
                                    option value=(status) { (status.label()) }
                                }
                            }
                        }
                    }
                }

                div class="grid grid-cols-2 gap-4"
                {
                    div
                    {
                        label for="price_min" class=(FORM_LABEL_STYLE) { "Minimum price" }

                        input
                            type="number"
                            step="0.01"
                            name="price_min"
                            id="price_min"
                            placeholder="0.00"
                            value=[query.price_min.as_deref()]
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="price_max" class=(FORM_LABEL_STYLE) { "Maximum price" }

                        input
                            type="number"
                            step="0.01"
                            name="price_max"
                            id="price_max"
                            placeholder="999.99"
                            value=[query.price_max.as_deref()]
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div class="flex gap-4"
                {
                    button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Apply Filters" }

                    @if filter.is_active() {
                        a
                            href=(endpoints::ITEMS_VIEW)
                            class={ "text-center " (BUTTON_SECONDARY_STYLE) }
                        {
                            "Clear Filters"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod items_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Query, State},
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        auth::{PasswordHash, UserID, UserRole, create_user},
        db::initialize,
        group::{GroupName, create_group},
        item::{Item, ItemName, ItemStatus, core::create_item, core::set_item_status},
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{ItemsPageState, ItemsQuery, get_items_page};

    fn get_state(role: UserRole) -> ItemsPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        create_user(
            "alice@example.com",
            role,
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        ItemsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn seed_items(state: &ItemsPageState) {
        let connection = state.db_connection.lock().unwrap();
        let group = create_group(
            GroupName::new_unchecked("Guest Room"),
            UserID::new(1),
            &connection,
        )
        .unwrap();

        create_item(
            Item::build(ItemName::new_unchecked("Reading lamp"), 10.0, UserID::new(1))
                .group_id(Some(group.id)),
            &connection,
        )
        .unwrap();
        let purchased = create_item(
            Item::build(ItemName::new_unchecked("Couch"), 450.0, UserID::new(1)),
            &connection,
        )
        .unwrap();
        set_item_status(
            purchased.id,
            ItemStatus::Purchased,
            UserID::new(1),
            &connection,
        )
        .unwrap();
    }

    fn count_item_rows(html: &Html) -> usize {
        let selector = Selector::parse("tr[data-item-row='true']").unwrap();
        html.select(&selector).count()
    }

    #[tokio::test]
    async fn shows_all_items_without_filters() {
        let state = get_state(UserRole::Resident);
        seed_items(&state);

        let response = get_items_page(
            State(state),
            Extension(UserID::new(1)),
            Query(ItemsQuery::default()),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(count_item_rows(&html), 2);
    }

    #[tokio::test]
    async fn status_filter_narrows_the_list() {
        let state = get_state(UserRole::Resident);
        seed_items(&state);

        let response = get_items_page(
            State(state),
            Extension(UserID::new(1)),
            Query(ItemsQuery {
                status: Some("pending".to_owned()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(count_item_rows(&html), 1);

        let badge_selector = Selector::parse("td [data-status]").unwrap();
        let statuses: Vec<_> = html
            .select(&badge_selector)
            .filter_map(|badge| badge.value().attr("data-status"))
            .collect();
        assert_eq!(statuses, vec!["pending"]);
    }

    #[tokio::test]
    async fn malformed_price_filter_shows_full_list() {
        let state = get_state(UserRole::Resident);
        seed_items(&state);

        let response = get_items_page(
            State(state),
            Extension(UserID::new(1)),
            Query(ItemsQuery {
                price_min: Some("abc".to_owned()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(
            count_item_rows(&html),
            2,
            "a malformed price bound should not filter anything out"
        );
    }

    #[tokio::test]
    async fn resident_sees_edit_links() {
        let state = get_state(UserRole::Resident);
        seed_items(&state);

        let response = get_items_page(
            State(state),
            Extension(UserID::new(1)),
            Query(ItemsQuery::default()),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        let edit_selector = Selector::parse("td a").unwrap();
        let edit_links = html
            .select(&edit_selector)
            .filter(|link| link.text().collect::<String>() == "Edit")
            .count();
        assert_eq!(edit_links, 2);
    }

    #[tokio::test]
    async fn visitor_sees_gift_button_only_for_pending_items() {
        let state = get_state(UserRole::Visitor);
        seed_items(&state);

        let response = get_items_page(
            State(state),
            Extension(UserID::new(1)),
            Query(ItemsQuery::default()),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;

        let edit_selector = Selector::parse("td a").unwrap();
        let edit_links = html
            .select(&edit_selector)
            .filter(|link| link.text().collect::<String>() == "Edit")
            .count();
        assert_eq!(edit_links, 0, "visitors should not see edit links");

        let button_selector = Selector::parse("td button[name='status']").unwrap();
        let gift_buttons = html.select(&button_selector).count();
        assert_eq!(
            gift_buttons, 1,
            "want a gift button for the pending item only"
        );
    }

    #[test]
    fn items_query_parses_from_query_string() {
        let query: ItemsQuery = serde_html_form::from_str(
            "group=3&status=pending&price_min=1.50&price_max=&search=lamp",
        )
        .unwrap();

        let filter = query.to_filter();

        assert_eq!(filter.group_id, Some(3));
        assert_eq!(filter.status, Some(ItemStatus::Pending));
        assert_eq!(filter.price_min, Some(1.5));
        assert_eq!(filter.price_max, None, "empty bound should be inactive");
        assert_eq!(filter.search, Some("lamp".to_owned()));
    }

    #[tokio::test]
    async fn empty_list_shows_empty_state() {
        let state = get_state(UserRole::Resident);

        let response = get_items_page(
            State(state),
            Extension(UserID::new(1)),
            Query(ItemsQuery::default()),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        let empty_selector = Selector::parse("td[data-empty-state='true']").unwrap();
        assert!(html.select(&empty_selector).next().is_some());
    }
}
