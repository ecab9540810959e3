//! Defines the route handler for the page for revising an existing
//! transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    account::get_account,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
    transaction::core::{DESCRIPTION_MAX_LENGTH, Transaction, get_transaction},
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for revising a transaction, prefilled with its current
/// details.
///
/// A transaction on a closed account gets a notice page instead of the form.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let (transaction, account_is_closed) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let transaction = get_transaction(transaction_id, &connection).inspect_err(|error| {
            tracing::error!("could not get transaction {transaction_id}: {error}")
        })?;
        let account = get_account(transaction.account_id, &connection).inspect_err(|error| {
            tracing::error!(
                "could not get account of transaction {transaction_id}: {error}"
            )
        })?;

        (transaction, account.is_closed)
    };

    if account_is_closed {
        return Ok(closed_account_view(&transaction).into_response());
    }

    let max_date = OffsetDateTime::now_utc().date();

    Ok(edit_transaction_view(&transaction, max_date).into_response())
}

fn edit_transaction_view(transaction: &Transaction, max_date: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let update_url = format_endpoint(endpoints::PUT_TRANSACTION, transaction.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Transaction" }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0.01"
                        value=(transaction.amount)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="transaction_date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        name="transaction_date"
                        id="transaction_date"
                        type="date"
                        max=(max_date)
                        value=(transaction.transaction_date)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                    input
                        name="description"
                        id="description"
                        type="text"
                        maxlength=(DESCRIPTION_MAX_LENGTH)
                        value=(transaction.description)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "Captured on " (transaction.capture_date.date()) ". The capture date does \
                    not change when a transaction is revised."
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Changes" }

                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base("Edit Transaction", &content)
}

fn closed_account_view(transaction: &Transaction) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let account_url = format_endpoint(endpoints::ACCOUNT_DETAIL_VIEW, transaction.account_id);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 text-center"
            {
                h1 class="text-xl font-bold" { "Account Closed" }

                p
                {
                    "This transaction belongs to a closed account and can no longer be revised."
                }

                a href=(account_url) class=(LINK_STYLE) { "Back to Account" }
            }
        }
    );

    base("Account Closed", &content)
}
