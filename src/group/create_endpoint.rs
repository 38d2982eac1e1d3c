//! The endpoint for creating a custom group.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{UserID, UserRole, get_user_by_id},
    endpoints,
    group::{GroupName, create_group, domain::GroupFormData},
};

/// The state needed for creating a group.
#[derive(Debug, Clone)]
pub struct CreateGroupEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateGroupEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle group creation form submission. Only residents can create groups.
pub async fn create_group_endpoint(
    State(state): State<CreateGroupEndpointState>,
    Extension(user_id): Extension<UserID>,
    Form(new_group): Form<GroupFormData>,
) -> Response {
    let name = match GroupName::new(&new_group.name) {
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

    match create_group(name, user_id, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::GROUPS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a group: {error}");

            error.into_alert_response()
        }
    }
}
