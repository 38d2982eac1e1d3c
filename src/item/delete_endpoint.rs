//! Defines the endpoint for deleting an item.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{Html, IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{UserID, UserRole, get_user_by_id},
    database_id::ItemId,
    item::core::delete_item,
};

/// The state needed to delete an item.
#[derive(Debug, Clone)]
pub struct DeleteItemState {
    /// The database connection for managing items.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteItemState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an item. Only residents can delete items.
///
/// On success, responds with an empty fragment so HTMX removes the table row.
pub async fn delete_item_endpoint(
    State(state): State<DeleteItemState>,
    Extension(user_id): Extension<UserID>,
    Path(item_id): Path<ItemId>,
) -> Response {
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

    match delete_item(item_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => Html("").into_response(),
        Err(error) => {
            tracing::error!("Could not delete item {item_id}: {error}");
            error.into_alert_response()
        }
    }
}
