//! Houselist is a web app for tracking a shared household shopping and gift
//! list: residents record items for each room of the house, visitors can
//! gift pending items, and everyone can see how the list is tracking on an
//! aggregate dashboard.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod group;
mod html;
mod internal_server_error;
mod item;
mod logging;
mod navigation;
mod not_found;
mod routing;
#[cfg(test)]
mod test_utils;
mod timezone;

pub use app_state::AppState;
pub use auth::{
    PasswordHash, User, UserID, UserRole, ValidatedPassword, get_user_by_email, get_user_by_id,
    set_user_password,
};
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;

use crate::{
    alert::AlertView, database_id::GroupId, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid email/password combination.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email used to register already belongs to another account.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// An empty string was used to create an item name.
    #[error("Item name cannot be empty")]
    EmptyItemName,

    /// An empty string was used to create a group name.
    #[error("Group name cannot be empty")]
    EmptyGroupName,

    /// The specified group name already exists in the database.
    #[error("the group \"{0}\" already exists in the database")]
    DuplicateGroupName(String),

    /// The group ID used to create or edit an item did not match a valid group.
    #[error("the group ID does not refer to a valid group")]
    InvalidGroup(Option<GroupId>),

    /// A negative or non-finite price was used to create or edit an item.
    ///
    /// Item prices record how much an item costs to buy, so they must be
    /// non-negative, finite numbers.
    #[error("{0} is not a valid item price")]
    InvalidPrice(f64),

    /// The user's role does not allow the attempted operation, e.g. a visitor
    /// tried to edit an item.
    #[error("the current user is not allowed to perform this operation")]
    NotPermitted,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JsonSerializationError(String),

    /// Tried to update an item that does not exist
    #[error("tried to update an item that is not in the database")]
    UpdateMissingItem,

    /// Tried to delete an item that does not exist
    #[error("tried to delete an item that is not in the database")]
    DeleteMissingItem,

    /// Tried to delete a group that does not exist
    #[error("tried to delete a group that is not in the database")]
    DeleteMissingGroup,

    /// Tried to delete one of the system-provided groups.
    ///
    /// The seeded room groups are shared by the whole household and cannot be
    /// removed, only user-created groups can.
    #[error("system groups cannot be deleted")]
    DeleteSystemGroup,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => AlertView::error(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                ),
            )
            .into_response(StatusCode::INTERNAL_SERVER_ERROR),
            Error::NotPermitted => AlertView::error(
                "Not allowed",
                "Your account does not have permission to do that. \
                Ask a resident of the household to make the change for you.",
            )
            .into_response(StatusCode::FORBIDDEN),
            Error::EmptyItemName => {
                AlertView::error("Invalid item name", "The item name cannot be empty.")
                    .into_response(StatusCode::BAD_REQUEST)
            }
            Error::EmptyGroupName => {
                AlertView::error("Invalid group name", "The group name cannot be empty.")
                    .into_response(StatusCode::BAD_REQUEST)
            }
            Error::InvalidGroup(group_id) => AlertView::error(
                "Invalid group ID",
                &format!("Could not find a group with the ID {group_id:?}"),
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::InvalidPrice(price) => AlertView::error(
                "Invalid price",
                &format!("{price} is not a valid price. Enter an amount of zero or more."),
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::UpdateMissingItem => {
                AlertView::error("Could not update item", "The item could not be found.")
                    .into_response(StatusCode::NOT_FOUND)
            }
            Error::DeleteMissingItem => AlertView::error(
                "Could not delete item",
                "The item could not be found. \
                Try refreshing the page to see if the item has already been deleted.",
            )
            .into_response(StatusCode::NOT_FOUND),
            Error::DeleteMissingGroup => AlertView::error(
                "Could not delete group",
                "The group could not be found. \
                Try refreshing the page to see if the group has already been deleted.",
            )
            .into_response(StatusCode::NOT_FOUND),
            Error::DeleteSystemGroup => AlertView::error(
                "Could not delete group",
                "This group is one of the built-in room groups and cannot be deleted.",
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::DuplicateGroupName(name) => AlertView::error(
                "Duplicate Group Name",
                &format!(
                    "The group {name} already exists. \
                    Choose a different group name, or delete the existing group.",
                ),
            )
            .into_response(StatusCode::BAD_REQUEST),
            _ => AlertView::error(
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.",
            )
            .into_response(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}
