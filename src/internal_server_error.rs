//! The 500 internal server error page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::html::{PAGE_CONTAINER_STYLE, base};

/// Render the generic 500 page as a response.
pub fn render_internal_server_error() -> Response {
    let content = html!(
        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-3xl font-bold" { "500 Internal Server Error" }

            p class="py-4"
            {
                "Sorry, something went wrong. Try again later or check the \
                server logs."
            }
        }
    );

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        base("Internal Server Error", &content),
    )
        .into_response()
}
