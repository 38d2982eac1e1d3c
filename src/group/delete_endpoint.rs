//! The endpoint for deleting a custom group.

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
    database_id::GroupId,
    group::db::delete_group,
};

/// The state needed to delete a group.
#[derive(Debug, Clone)]
pub struct DeleteGroupState {
    /// The database connection for managing groups.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteGroupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a group. Only residents can delete groups,
/// and only custom groups can be deleted.
///
/// On success, responds with an empty fragment so HTMX removes the table row.
pub async fn delete_group_endpoint(
    State(state): State<DeleteGroupState>,
    Extension(user_id): Extension<UserID>,
    Path(group_id): Path<GroupId>,
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

    match delete_group(group_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => Html("").into_response(),
        Err(error) => {
            tracing::error!("Could not delete group {group_id}: {error}");
            error.into_alert_response()
        }
    }
}
