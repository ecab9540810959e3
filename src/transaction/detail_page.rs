//! Defines the route handler for the page showing one transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, get_account},
    currency::format_currency,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    transaction::core::{Transaction, get_transaction},
};

/// The state needed for the transaction detail page.
#[derive(Debug, Clone)]
pub struct TransactionDetailPageState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionDetailPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page showing a transaction's details.
pub async fn get_transaction_detail_page(
    State(state): State<TransactionDetailPageState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
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

    Ok(transaction_detail_view(&transaction, &account).into_response())
}

fn transaction_detail_view(transaction: &Transaction, account: &Account) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let account_url = format_endpoint(endpoints::ACCOUNT_DETAIL_VIEW, account.id);
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-3xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transaction Details" }

                    @if !account.is_closed {
                        a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                    }
                }

                dl class="grid grid-cols-2 gap-2"
                {
                    dt class="font-medium" { "Account" }
                    dd { a href=(account_url) class=(LINK_STYLE) { (account.account_number) } }

                    dt class="font-medium" { "Transaction Date" }
                    dd { (transaction.transaction_date) }

                    dt class="font-medium" { "Capture Date" }
                    dd { (transaction.capture_date.date()) }

                    dt class="font-medium" { "Amount" }
                    dd { (format_currency(transaction.amount)) }

                    dt class="font-medium" { "Description" }
                    dd { (transaction.description) }
                }

                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE)
                {
                    "Back to Transactions"
                }
            }
        }
    );

    base("Transaction Details", &content)
}
