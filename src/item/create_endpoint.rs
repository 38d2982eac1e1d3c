//! Defines the endpoint for creating a new item.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{UserID, UserRole, get_user_by_id},
    database_id::GroupId,
    endpoints,
    item::{Item, ItemName, core::create_item},
};

/// The state needed to create an item.
#[derive(Debug, Clone)]
pub struct CreateItemState {
    /// The database connection for managing items.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateItemState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or editing an item.
#[derive(Debug, Deserialize)]
pub struct ItemForm {
    /// What the item is called.
    pub name: String,
    /// The price of the item in dollars.
    pub price: f64,
    /// The ID of the group the item belongs to.
    #[serde(default)]
    pub group_id: Option<GroupId>,
}

/// A route handler for creating a new item, redirects to the items view on success.
///
/// Only residents can create items.
pub async fn create_item_endpoint(
    State(state): State<CreateItemState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ItemForm>,
) -> Response {
    let name = match ItemName::new(&form.name) {
        Ok(name) => name,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match get_user_by_id(user_id, &connection) {
        Ok(user) if user.role == UserRole::Resident => {}
        Ok(_) => return Error::NotPermitted.into_alert_response(),
        Err(error) => {
            tracing::error!("could not get user {user_id}: {error}");
            return error.into_alert_response();
        }
    }

    let builder = Item::build(name, form.price, user_id).group_id(form.group_id);

    if let Err(error) = create_item(builder, &connection) {
        tracing::error!("could not create item: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::ITEMS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use rusqlite::Connection;

    use crate::{
        auth::{PasswordHash, UserID, UserRole, create_user},
        db::initialize,
        endpoints,
        group::{GroupName, create_group},
        item::{ItemStatus, core::get_item},
        test_utils::assert_hx_redirect,
    };

    use super::{CreateItemState, ItemForm, create_item_endpoint};

    fn get_test_state(role: UserRole) -> CreateItemState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_user(
            "alice@example.com",
            role,
            PasswordHash::new_unchecked("hunter2"),
            &conn,
        )
        .unwrap();

        CreateItemState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn can_create_item() {
        let state = get_test_state(UserRole::Resident);
        let group_id = {
            let connection = state.db_connection.lock().unwrap();
            create_group(
                GroupName::new_unchecked("Guest Room"),
                UserID::new(1),
                &connection,
            )
            .unwrap()
            .id
        };

        let form = ItemForm {
            name: "Reading lamp".to_string(),
            price: 12.3,
            group_id: Some(group_id),
        };

        let response = create_item_endpoint(State(state.clone()), Extension(UserID::new(1)), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::ITEMS_VIEW);

        // Verify the item was actually created by getting it by ID
        // We know the first item will have ID 1
        let connection = state.db_connection.lock().unwrap();
        let item = get_item(1, &connection).unwrap();
        assert_eq!(item.name.as_ref(), "Reading lamp");
        assert_eq!(item.price, 12.3);
        assert_eq!(item.group_id, Some(group_id));
        assert_eq!(item.status, ItemStatus::Pending);
        assert_eq!(item.created_by, UserID::new(1));
    }

    #[tokio::test]
    async fn visitor_cannot_create_item() {
        let state = get_test_state(UserRole::Visitor);

        let form = ItemForm {
            name: "Reading lamp".to_string(),
            price: 12.3,
            group_id: None,
        };

        let response = create_item_endpoint(State(state.clone()), Extension(UserID::new(1)), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let connection = state.db_connection.lock().unwrap();
        assert!(get_item(1, &connection).is_err());
    }

    #[tokio::test]
    async fn create_item_fails_on_invalid_group() {
        let state = get_test_state(UserRole::Resident);

        let form = ItemForm {
            name: "Reading lamp".to_string(),
            price: 12.3,
            group_id: Some(4242),
        };

        let response = create_item_endpoint(State(state), Extension(UserID::new(1)), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_item_fails_on_negative_price() {
        let state = get_test_state(UserRole::Resident);

        let form = ItemForm {
            name: "Reading lamp".to_string(),
            price: -5.0,
            group_id: None,
        };

        let response = create_item_endpoint(State(state), Extension(UserID::new(1)), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
