//! The registration page and endpoint for creating new accounts.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        PasswordHash, UserRole, invalidate_auth_cookie, set_auth_cookie, user::create_user,
    },
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, base, loading_spinner, log_in_register, password_input,
    },
    timezone::get_local_offset,
};

/// The minimum password length shown to the user on the registration form.
const MIN_PASSWORD_LENGTH: u8 = 8;

struct RegisterFormDefaults<'a> {
    email: &'a str,
    role: UserRole,
    email_error: Option<&'a str>,
    password_error: Option<&'a str>,
    confirm_password_error: Option<&'a str>,
}

impl Default for RegisterFormDefaults<'_> {
    fn default() -> Self {
        Self {
            email: "",
            role: UserRole::Resident,
            email_error: None,
            password_error: None,
            confirm_password_error: None,
        }
    }
}

fn register_form(defaults: &RegisterFormDefaults<'_>) -> Markup {
    let is_resident = defaults.role == UserRole::Resident;

    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #confirm_password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            div
            {
                label for="email" class=(FORM_LABEL_STYLE) { "Email" }

                input
                    type="email"
                    name="email"
                    id="email"
                    placeholder="you@example.com"
                    required
                    autofocus
                    value=(defaults.email)
                    class=(FORM_TEXT_INPUT_STYLE);

                @if let Some(error_message) = defaults.email_error
                {
                    p class="text-red-500 text-base" { (error_message) }
                }
            }

            fieldset class="space-y-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Role" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    div class="flex items-center gap-3"
                    {
                        input
                            name="role"
                            id="role-resident"
                            type="radio"
                            value="resident"
                            checked[is_resident]
                            required
                            tabindex="0"
                            class=(FORM_RADIO_INPUT_STYLE);

                        label
                            for="role-resident"
                            class=(FORM_RADIO_LABEL_STYLE)
                        {
                            "Resident — lives in the house and manages the list"
                        }
                    }

                    div class="flex items-center gap-3"
                    {
                        input
                            name="role"
                            id="role-visitor"
                            type="radio"
                            value="visitor"
                            checked[!is_resident]
                            required
                            tabindex="0"
                            class=(FORM_RADIO_INPUT_STYLE);

                        label
                            for="role-visitor"
                            class=(FORM_RADIO_LABEL_STYLE)
                        {
                            "Visitor — can gift pending items"
                        }
                    }
                }
            }

            (password_input("password", "Password", MIN_PASSWORD_LENGTH, defaults.password_error))
            (password_input(
                "confirm_password",
                "Confirm Password",
                MIN_PASSWORD_LENGTH,
                defaults.confirm_password_error,
            ))

            button
                type="submit" id="submit-button" tabindex="0"
                class="w-full px-4 py-2 bg-blue-500 dark:bg-blue-600 disabled:bg-blue-700
                    hover:enabled:bg-blue-600 hover:enabled:dark:bg-blue-700 text-white rounded"
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Register"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Already have an account? "
                a
                    href=(endpoints::LOG_IN_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let form = register_form(&RegisterFormDefaults::default());
    let content = log_in_register("Create an account", &form);
    base("Register", &[], &content).into_response()
}

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegisterUserState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for creating users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegisterUserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegisterUserState> for Key {
    fn from_ref(state: &RegisterUserState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the registration form.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    /// The email address to register with.
    pub email: String,
    /// Whether the new account is a resident or a visitor.
    pub role: UserRole,
    /// The chosen password.
    pub password: String,
    /// The chosen password, entered a second time.
    pub confirm_password: String,
}

/// Handler for registration requests via the POST method.
///
/// On success the new user is logged in (the auth cookie is set) and the
/// client is redirected to the dashboard page. Otherwise, the form is
/// returned with an error message explaining the problem.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn register_user(
    State(state): State<RegisterUserState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.confirm_password {
        return register_form(&RegisterFormDefaults {
            email: &form.email,
            role: form.role,
            confirm_password_error: Some("The passwords do not match."),
            ..Default::default()
        })
        .into_response();
    }

    let password_hash = match PasswordHash::from_raw_password(&form.password, PasswordHash::DEFAULT_COST)
    {
        Ok(password_hash) => password_hash,
        Err(Error::TooWeak(feedback)) => {
            let error_message = format!("The password is too easy to guess. {feedback}");
            return register_form(&RegisterFormDefaults {
                email: &form.email,
                role: form.role,
                password_error: Some(&error_message),
                ..Default::default()
            })
            .into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while hashing password: {error}");
            return error.into_response();
        }
    };

    let user = {
        let connection = state
            .db_connection
            .lock()
            .expect("Could not acquire lock to database connection");

        match create_user(&form.email, form.role, password_hash, &connection) {
            Ok(user) => user,
            Err(Error::DuplicateEmail) => {
                return register_form(&RegisterFormDefaults {
                    email: &form.email,
                    role: form.role,
                    email_error: Some("This email address is already registered."),
                    ..Default::default()
                })
                .into_response();
            }
            Err(error) => {
                tracing::error!("Could not create user: {error}");
                return error.into_response();
            }
        }
    };

    let local_timezone = match get_local_offset(&state.local_timezone) {
        Some(offset) => offset,
        None => return Error::InvalidTimezoneError(state.local_timezone).into_response(),
    };

    set_auth_cookie(jar.clone(), user.id, state.cookie_duration, local_timezone)
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error setting auth cookie: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
        })
        .into_response()
}

#[cfg(test)]
mod register_page_tests {
    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    use super::get_register_page;

    #[tokio::test]
    async fn register_page_displays_form() {
        let response = get_register_page().await;

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::USERS, "hx-post");
        assert_form_input(&form, "email", "email");
        assert_form_input(&form, "password", "password");
        assert_form_input(&form, "confirm_password", "password");
    }
}
