//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_forgot_password_page, get_log_in_page, get_log_out,
        get_register_page, post_log_in, register_user,
    },
    dashboard::get_dashboard_page,
    endpoints,
    group::{create_group_endpoint, delete_group_endpoint, get_groups_page},
    internal_server_error::get_internal_server_error_page,
    item::{
        create_item_endpoint, delete_item_endpoint, edit_item_endpoint, get_edit_item_page,
        get_items_page, get_new_item_page, item_status_endpoint,
    },
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(
            endpoints::FORGOT_PASSWORD_VIEW,
            get(get_forgot_password_page),
        )
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::ITEMS_VIEW, get(get_items_page))
        .route(endpoints::NEW_ITEM_VIEW, get(get_new_item_page))
        .route(endpoints::EDIT_ITEM_VIEW, get(get_edit_item_page))
        .route(endpoints::GROUPS_VIEW, get(get_groups_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::POST_ITEM, post(create_item_endpoint))
            .route(endpoints::PUT_ITEM, put(edit_item_endpoint))
            .route(endpoints::DELETE_ITEM, delete(delete_item_endpoint))
            .route(endpoints::ITEM_STATUS, post(item_status_endpoint))
            .route(endpoints::POST_GROUP, post(create_group_endpoint))
            .route(endpoints::DELETE_GROUP, delete(delete_group_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
