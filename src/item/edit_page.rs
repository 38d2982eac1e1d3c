//! The page for editing an existing item.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{UserID, UserRole, get_user_by_id},
    database_id::ItemId,
    endpoints,
    group::{Group, get_all_groups},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, dollar_input_styles},
    item::{
        Item,
        core::get_item,
        form::{ItemFormDefaults, item_form_fields},
    },
    navigation::NavBar,
};

/// The state needed for the edit item page.
#[derive(Debug, Clone)]
pub struct EditItemPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditItemPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the item edit page. Only residents can edit items.
pub async fn get_edit_item_page(
    State(state): State<EditItemPageState>,
    Extension(user_id): Extension<UserID>,
    Path(item_id): Path<ItemId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get user {user_id}: {error}"))?;

    if user.role != UserRole::Resident {
        return Err(Error::NotFound);
    }

    let item = get_item(item_id, &connection)
        .inspect_err(|error| tracing::error!("could not get item {item_id}: {error}"))?;

    let groups = get_all_groups(&connection)
        .inspect_err(|error| tracing::error!("could not get groups: {error}"))?;

    Ok(edit_item_view(&item, &groups).into_response())
}

fn edit_item_view(item: &Item, groups: &[Group]) -> Markup {
    let nav_bar = NavBar::new(endpoints::ITEMS_VIEW).into_html();
    let put_endpoint = endpoints::format_endpoint(endpoints::PUT_ITEM, item.id);
    let fields = item_form_fields(
        &ItemFormDefaults {
            name: Some(item.name.as_ref()),
            price: Some(item.price),
            group_id: item.group_id,
            autofocus_name: true,
        },
        groups,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold py-4" { "Edit Item" }

            form
                hx-put=(put_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (fields)

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Item" }
            }
        }
    };

    base("Edit Item", &[dollar_input_styles()], &content)
}
