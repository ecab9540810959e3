//! Tally is a web app for managing persons, their accounts, and the
//! transactions posted against those accounts.
//!
//! This library serves HTML pages directly: list, detail, create, edit, and
//! delete pages for each record type, with search, sorting, and pagination.
//! The one piece of real business logic lives in the transaction ledger:
//! every transaction write keeps the owning account's cached outstanding
//! balance consistent, and closed accounts reject transaction mutation.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rust_decimal::Decimal;
use time::Date;
use tokio::signal;

mod account;
mod alert;
mod app_state;
mod currency;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod navigation;
mod not_found;
mod pagination;
mod person;
mod routing;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::{initialize as initialize_db, seed_demo_data};
pub use pagination::PaginationConfig;
pub use routing::build_router;

use crate::{
    alert::Alert, internal_server_error::render_internal_server_error,
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
    /// A date in the future was used for a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// A zero or negative amount was used for a transaction.
    #[error("{0} is not a valid transaction amount, the amount must be greater than zero")]
    NonPositiveAmount(Decimal),

    /// A required text field was submitted empty or over its length limit.
    #[error("the field '{0}' is required and must fit its length limit")]
    InvalidField(&'static str),

    /// An ID number was submitted that is not exactly 13 digits.
    #[error("an ID number must be exactly 13 digits")]
    InvalidIdNumber,

    /// An account was created with a negative opening balance.
    #[error("the opening balance of an account cannot be negative")]
    NegativeOpeningBalance,

    /// A transaction mutation was attempted against a closed account.
    #[error("the account is closed and does not accept transaction changes")]
    ClosedAccount,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A write collided with a concurrent write and was rolled back.
    ///
    /// The record still exists, so the caller may retry the operation. No
    /// retry happens automatically.
    #[error("the write conflicted with a concurrent write, try again")]
    ConcurrencyConflict,

    /// The specified ID number already belongs to another person.
    #[error("the ID number \"{0}\" already exists in the database")]
    DuplicateIdNumber(String),

    /// The specified account number already belongs to another account.
    #[error("the account number \"{0}\" already exists in the database")]
    DuplicateAccountNumber(String),

    /// Tried to delete a person that still owns accounts.
    #[error("the person still owns accounts and cannot be deleted")]
    PersonHasAccounts,

    /// Tried to delete an account that still has transactions.
    #[error("the account still has transactions and cannot be deleted")]
    AccountHasTransactions,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            rusqlite::Error::SqliteFailure(sql_error, _)
                if sql_error.code == rusqlite::ErrorCode::DatabaseBusy
                    || sql_error.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                Error::ConcurrencyConflict
            }
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
            Error::DatabaseLockError => render_internal_server_error(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::FutureDate(date) => Alert::error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid transaction date",
                &format!("{date} is a date in the future, which is not allowed."),
            ),
            Error::NonPositiveAmount(amount) => Alert::error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid transaction amount",
                &format!("{amount} is not a valid amount. The amount must be greater than zero."),
            ),
            Error::InvalidField(field) => Alert::error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid form input",
                &format!("The field '{field}' is required and must fit its length limit."),
            ),
            Error::InvalidIdNumber => Alert::error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid ID number",
                "An ID number must be exactly 13 digits.",
            ),
            Error::NegativeOpeningBalance => Alert::error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid opening balance",
                "The opening balance of an account cannot be negative.",
            ),
            Error::ClosedAccount => Alert::error(
                StatusCode::CONFLICT,
                "Account is closed",
                "Closed accounts do not accept new, changed, or deleted transactions.",
            ),
            Error::NotFound => Alert::error(
                StatusCode::NOT_FOUND,
                "Not found",
                "The record could not be found. \
                Try refreshing the page to see if it has already been deleted.",
            ),
            Error::ConcurrencyConflict => Alert::error(
                StatusCode::CONFLICT,
                "Write conflict",
                "The record was changed by someone else while saving. \
                Refresh the page and try again.",
            ),
            Error::DuplicateIdNumber(id_number) => Alert::error(
                StatusCode::CONFLICT,
                "Duplicate ID number",
                &format!("A person with the ID number {id_number} already exists in the database."),
            ),
            Error::DuplicateAccountNumber(account_number) => Alert::error(
                StatusCode::CONFLICT,
                "Duplicate account number",
                &format!(
                    "The account number {account_number} already exists in the database. \
                    Choose a different account number, or edit or delete the existing account.",
                ),
            ),
            Error::PersonHasAccounts => Alert::error(
                StatusCode::CONFLICT,
                "Person still owns accounts",
                "Delete or reassign the person's accounts first, then delete the person.",
            ),
            Error::AccountHasTransactions => Alert::error(
                StatusCode::CONFLICT,
                "Account still has transactions",
                "Delete the account's transactions first, then delete the account.",
            ),
            _ => Alert::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.",
            ),
        }
    }
}
