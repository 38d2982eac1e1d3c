//! The page for adding a new item to the list.

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
    group::{Group, get_all_groups},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, dollar_input_styles,
    },
    item::form::{ItemFormDefaults, item_form_fields},
    navigation::NavBar,
};

/// The state needed for the new item page.
#[derive(Debug, Clone)]
pub struct NewItemPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NewItemPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the item creation page. Only residents can add items.
pub async fn get_new_item_page(
    State(state): State<NewItemPageState>,
    Extension(user_id): Extension<UserID>,
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

    let groups = get_all_groups(&connection)
        .inspect_err(|error| tracing::error!("could not get groups: {error}"))?;

    Ok(new_item_view(&groups).into_response())
}

fn new_item_view(groups: &[Group]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_ITEM_VIEW).into_html();
    let fields = item_form_fields(
        &ItemFormDefaults {
            name: None,
            price: None,
            group_id: None,
            autofocus_name: true,
        },
        groups,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold py-4" { "New Item" }

            form
                hx-post=(endpoints::POST_ITEM)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (fields)

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Item" }
            }
        }
    };

    base("New Item", &[dollar_input_styles()], &content)
}

#[cfg(test)]
mod new_item_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::{PasswordHash, UserID, UserRole, create_user},
        db::initialize,
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    use super::{NewItemPageState, get_new_item_page};

    fn get_state(role: UserRole) -> NewItemPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        create_user(
            "alice@example.com",
            role,
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        NewItemPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn render_page() {
        let state = get_state(UserRole::Resident);

        let response = get_new_item_page(State(state), Extension(UserID::new(1)))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_ITEM, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "price", "number");
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn page_is_hidden_from_visitors() {
        let state = get_state(UserRole::Visitor);

        let result = get_new_item_page(State(state), Extension(UserID::new(1))).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
