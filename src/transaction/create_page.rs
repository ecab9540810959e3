//! Defines the route handler for the page for posting a new transaction
//! against an account.

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
    account::{Account, get_account},
    database_id::AccountId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
    transaction::core::DESCRIPTION_MAX_LENGTH,
};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct CreateTransactionPageState {
    /// The database connection for reading the target account.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for posting a transaction against `account_id`.
///
/// A closed account gets a notice page instead of the form.
pub async fn get_create_transaction_page(
    State(state): State<CreateTransactionPageState>,
    Path(account_id): Path<AccountId>,
) -> Result<Response, Error> {
    let account = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_account(account_id, &connection)
            .inspect_err(|error| tracing::error!("could not get account {account_id}: {error}"))?
    };

    if account.is_closed {
        return Ok(closed_account_view(&account).into_response());
    }

    let max_date = OffsetDateTime::now_utc().date();

    Ok(create_transaction_view(&account, max_date).into_response())
}

fn create_transaction_view(account: &Account, max_date: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_TRANSACTION)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Transaction for " (account.account_number) }

                input name="account_id" type="hidden" value=(account.id);

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0.01"
                        placeholder="0.00"
                        required
                        autofocus
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
                        value=(max_date)
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
                        placeholder="Description"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Post Transaction" }

                a href=(format_endpoint(endpoints::ACCOUNT_DETAIL_VIEW, account.id))
                    class=(LINK_STYLE)
                {
                    "Cancel"
                }
            }
        }
    };

    base("Create Transaction", &content)
}

fn closed_account_view(account: &Account) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let account_url = format_endpoint(endpoints::ACCOUNT_DETAIL_VIEW, account.id);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 text-center"
            {
                h1 class="text-xl font-bold" { "Account Closed" }

                p
                {
                    "Account " (account.account_number) " is closed and does not accept new \
                    transactions."
                }

                a href=(account_url) class=(LINK_STYLE) { "Back to Account" }
            }
        }
    );

    base("Account Closed", &content)
}
