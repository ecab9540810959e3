//! Alert fragments for reporting the outcome of htmx requests.
//!
//! Mutation endpoints respond with either a redirect or one of these
//! fragments. Status and error information always travels in the response
//! itself, never in ambient request-scoped state.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

const SUCCESS_STYLE: &str = "flex items-center gap-3 rounded border border-green-300 \
    bg-green-50 px-4 py-3 text-sm text-green-800 dark:border-green-800 \
    dark:bg-gray-800 dark:text-green-400";

const ERROR_STYLE: &str = "flex items-center gap-3 rounded border border-red-300 \
    bg-red-50 px-4 py-3 text-sm text-red-800 dark:border-red-800 \
    dark:bg-gray-800 dark:text-red-400";

/// An alert message rendered as an HTML fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The request succeeded.
    Success {
        /// A short summary shown in bold.
        message: String,
    },
    /// The request failed.
    Error {
        /// A short summary shown in bold.
        message: String,
        /// What went wrong and what the user can do about it.
        details: String,
    },
}

impl Alert {
    /// Build an error alert response with the given `status_code`.
    pub fn error(status_code: StatusCode, message: &str, details: &str) -> Response {
        (
            status_code,
            Alert::Error {
                message: message.to_owned(),
                details: details.to_owned(),
            }
            .into_html(),
        )
            .into_response()
    }

    /// Build a success alert response.
    pub fn success(message: &str) -> Response {
        Alert::Success {
            message: message.to_owned(),
        }
        .into_html()
        .into_response()
    }

    fn into_html(self) -> Markup {
        match self {
            Alert::Success { message } => html! {
                div class=(SUCCESS_STYLE) role="alert"
                {
                    span class="font-medium" { (message) }
                }
            },
            Alert::Error { message, details } => html! {
                div class=(ERROR_STYLE) role="alert"
                {
                    span class="font-medium" { (message) }
                    span { (details) }
                }
            },
        }
    }
}
