//! Alert fragments for displaying success and error messages to users.
//!
//! Alerts are rendered into the `#alert-container` element via the htmx
//! response-targets extension, so endpoints can report failures without
//! replacing the page content.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Success,
    Error,
}

/// An alert message with a short summary and optional details.
#[derive(Debug, Clone)]
pub struct AlertView<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> AlertView<'a> {
    /// Create a new success alert
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }

    pub fn into_markup(self) -> Markup {
        let container_style = match self.alert_type {
            AlertType::Success => {
                "p-4 mb-4 rounded-lg border border-green-300 bg-green-50 \
                text-green-800 dark:border-green-800 dark:bg-gray-800 dark:text-green-400"
            }
            AlertType::Error => {
                "p-4 mb-4 rounded-lg border border-red-300 bg-red-50 \
                text-red-800 dark:border-red-800 dark:bg-gray-800 dark:text-red-400"
            }
        };

        html! {
            div class=(container_style) role="alert"
            {
                p class="font-medium" { (self.message) }

                @if !self.details.is_empty() {
                    p class="text-sm" { (self.details) }
                }

                button
                    type="button"
                    class="mt-2 text-sm font-medium underline cursor-pointer"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "Dismiss"
                }
            }
        }
    }

    /// Render the alert as a response with the given status code.
    pub fn into_response(self, status_code: StatusCode) -> Response {
        (status_code, self.into_markup()).into_response()
    }
}
