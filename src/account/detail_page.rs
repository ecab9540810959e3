//! Defines the route handler for the page showing one account, its owner,
//! and its transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::core::{Account, get_account},
    currency::format_currency,
    database_id::AccountId,
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base,
    },
    navigation::NavBar,
    person::{Person, get_person},
    transaction::{Transaction, get_transactions_by_account},
};

/// The state needed for the account detail page.
#[derive(Debug, Clone)]
pub struct AccountDetailPageState {
    /// The database connection for reading accounts and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountDetailPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page showing an account's details, its owner, and its
/// transaction history.
pub async fn get_account_detail_page(
    State(state): State<AccountDetailPageState>,
    Path(account_id): Path<AccountId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account = get_account(account_id, &connection)
        .inspect_err(|error| tracing::error!("could not get account {account_id}: {error}"))?;
    let owner = get_person(account.person_id, &connection).inspect_err(|error| {
        tracing::error!("could not get owner of account {account_id}: {error}")
    })?;
    let transactions = get_transactions_by_account(account_id, &connection).inspect_err(
        |error| tracing::error!("could not get transactions for account {account_id}: {error}"),
    )?;

    Ok(account_detail_view(&account, &owner, &transactions).into_response())
}

fn account_detail_view(account: &Account, owner: &Person, transactions: &[Transaction]) -> Markup {
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();
    let owner_url = format_endpoint(endpoints::PERSON_DETAIL_VIEW, owner.id);
    let edit_url = format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account.id);
    let new_transaction_url = format_endpoint(endpoints::NEW_TRANSACTION_VIEW, account.id);

    let owner_name = match &owner.first_name {
        Some(first_name) => format!("{first_name} {}", owner.surname),
        None => owner.surname.clone(),
    };

    let transaction_row = |transaction: &Transaction| {
        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    a href=(format_endpoint(
                        endpoints::TRANSACTION_DETAIL_VIEW,
                        transaction.id,
                    )) class=(LINK_STYLE)
                    {
                        (transaction.transaction_date)
                    }
                }
                td class=(TABLE_CELL_STYLE) { (transaction.description) }
                td class="px-6 py-4 text-right" { (format_currency(transaction.amount)) }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-3xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Account " (account.account_number) }

                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                }

                dl class="grid grid-cols-2 gap-2"
                {
                    dt class="font-medium" { "Owner" }
                    dd { a href=(owner_url) class=(LINK_STYLE) { (owner_name) } }

                    dt class="font-medium" { "Outstanding Balance" }
                    dd { (format_currency(account.outstanding_balance)) }

                    dt class="font-medium" { "Status" }
                    dd { @if account.is_closed { "Closed" } @else { "Open" } }
                }

                header class="flex justify-between flex-wrap items-end"
                {
                    h2 class="text-lg font-bold" { "Transactions" }

                    @if !account.is_closed {
                        a href=(new_transaction_url) class=(LINK_STYLE) { "Add Transaction" }
                    }
                }

                section class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class="px-6 py-3 text-right" { "Amount" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row(transaction))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td colspan="3"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "This account has no transactions yet."
                                    }
                                }
                            }
                        }
                    }
                }

                a href=(endpoints::ACCOUNTS_VIEW) class=(LINK_STYLE) { "Back to Accounts" }
            }
        }
    );

    base("Account Details", &content)
}
