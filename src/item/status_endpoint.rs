//! Defines the endpoint for changing an item's status.

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
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{User, UserID, UserRole, get_user_by_id},
    database_id::ItemId,
    endpoints,
    item::{
        ItemStatus,
        core::{Item, get_item, set_item_status},
    },
};

/// The state needed to change an item's status.
#[derive(Debug, Clone)]
pub struct ItemStatusState {
    /// The database connection for managing items.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ItemStatusState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for a status change.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    /// The status to move the item to.
    pub status: ItemStatus,
}

/// Whether `user` may move `item` to `new_status`.
///
/// Residents can set any status. Visitors can only gift an item that is
/// still pending, e.g. a guest buying a housewarming present.
fn is_status_change_allowed(user: &User, item: &Item, new_status: ItemStatus) -> bool {
    match user.role {
        UserRole::Resident => true,
        UserRole::Visitor => {
            item.status == ItemStatus::Pending && new_status == ItemStatus::Gifted
        }
    }
}

/// A route handler for changing an item's status, redirects to the items view
/// on success.
///
/// Marking an item as gifted records the current user as the gifter.
pub async fn item_status_endpoint(
    State(state): State<ItemStatusState>,
    Extension(user_id): Extension<UserID>,
    Path(item_id): Path<ItemId>,
    Form(form): Form<StatusForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let user = match get_user_by_id(user_id, &connection) {
        Ok(user) => user,
        Err(error) => {
            tracing::error!("could not get user {user_id}: {error}");
            return error.into_alert_response();
        }
    };

    let item = match get_item(item_id, &connection) {
        Ok(item) => item,
        Err(Error::NotFound) => return Error::UpdateMissingItem.into_alert_response(),
        Err(error) => {
            tracing::error!("could not get item {item_id}: {error}");
            return error.into_alert_response();
        }
    };

    if !is_status_change_allowed(&user, &item, form.status) {
        return Error::NotPermitted.into_alert_response();
    }

    if let Err(error) = set_item_status(item_id, form.status, user_id, &connection) {
        tracing::error!("could not set status of item {item_id}: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::ITEMS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
