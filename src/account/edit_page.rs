//! Defines the route handler for the page for editing an existing account.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::core::{ACCOUNT_NUMBER_MAX_LENGTH, Account, get_account},
    currency::format_currency,
    database_id::AccountId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed for the edit account page.
#[derive(Debug, Clone)]
pub struct EditAccountPageState {
    /// The database connection for reading accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing an account.
///
/// The balance is shown read-only, only the transaction ledger changes
/// balances.
pub async fn get_edit_account_page(
    State(state): State<EditAccountPageState>,
    Path(account_id): Path<AccountId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account = get_account(account_id, &connection)
        .inspect_err(|error| tracing::error!("could not get account {account_id}: {error}"))?;

    Ok(edit_account_view(&account).into_response())
}

fn edit_account_view(account: &Account) -> Markup {
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();
    let update_url = format_endpoint(endpoints::PUT_ACCOUNT, account.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Account" }

                div
                {
                    label for="account_number" class=(FORM_LABEL_STYLE) { "Account Number" }

                    input
                        name="account_number"
                        id="account_number"
                        type="text"
                        maxlength=(ACCOUNT_NUMBER_MAX_LENGTH)
                        required
                        value=(account.account_number)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label class=(FORM_LABEL_STYLE) { "Outstanding Balance" }

                    p class="text-sm" { (format_currency(account.outstanding_balance)) }
                }

                div class="flex items-center gap-2"
                {
                    @if account.is_closed {
                        input
                            name="is_closed"
                            id="is_closed"
                            type="checkbox"
                            value="true"
                            checked;
                    } @else {
                        input
                            name="is_closed"
                            id="is_closed"
                            type="checkbox"
                            value="true";
                    }

                    label for="is_closed" class="text-sm font-medium" { "Account is closed" }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Changes" }

                a href=(endpoints::ACCOUNTS_VIEW) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base("Edit Account", &content)
}
