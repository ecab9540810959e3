//! The 404 not found page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base},
};

/// The fallback route handler for unknown paths.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// Render the 404 page as a response.
pub fn get_404_not_found_response() -> Response {
    let content = html!(
        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-3xl font-bold" { "404 Not Found" }

            p class="py-4"
            {
                "The page or record you were looking for does not exist. \
                Head back to the "
                a href=(endpoints::PERSONS_VIEW) class=(LINK_STYLE) { "persons list" }
                "."
            }
        }
    );

    (StatusCode::NOT_FOUND, base("Not Found", &content)).into_response()
}

#[cfg(test)]
mod not_found_tests {
    use axum::http::StatusCode;
    use scraper::Selector;

    use crate::test_utils::{assert_valid_html, parse_html_document};

    use super::get_404_not_found;

    #[tokio::test]
    async fn renders_not_found_page() {
        let response = get_404_not_found().await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let heading_selector = Selector::parse("h1").unwrap();
        let heading = html
            .select(&heading_selector)
            .next()
            .expect("no heading found");
        assert_eq!(heading.text().collect::<String>(), "404 Not Found");
    }
}
