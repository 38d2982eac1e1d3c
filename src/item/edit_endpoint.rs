//! Defines the endpoint for updating an existing item.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{UserID, UserRole, get_user_by_id},
    database_id::ItemId,
    endpoints,
    item::{ItemName, core::update_item, create_endpoint::ItemForm},
};

/// The state needed to update an item.
#[derive(Debug, Clone)]
pub struct EditItemState {
    /// The database connection for managing items.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditItemState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating an item, redirects to the items view on success.
///
/// Only residents can edit items.
pub async fn edit_item_endpoint(
    State(state): State<EditItemState>,
    Extension(user_id): Extension<UserID>,
    Path(item_id): Path<ItemId>,
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

    if let Err(error) = update_item(item_id, name, form.price, form.group_id, &connection) {
        tracing::error!("could not update item {item_id}: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::ITEMS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
