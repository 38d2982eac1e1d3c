//! The 404 Not Found page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

/// Route handler for the 404 fallback.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// Build the 404 Not Found response.
pub fn get_404_not_found_response() -> Response {
    let page = error_view(
        "Not Found",
        "404",
        "Sorry, we could not find that page.",
        "Check the address for typos, or head back to the dashboard.",
    );

    (StatusCode::NOT_FOUND, page).into_response()
}

#[cfg(test)]
mod not_found_tests {
    use axum::http::StatusCode;

    use crate::test_utils::{assert_valid_html, parse_html_document};

    use super::get_404_not_found;

    #[tokio::test]
    async fn returns_not_found_page() {
        let response = get_404_not_found().await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
    }
}
