//! Defines the route handler for the page showing one person and their
//! accounts.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, get_accounts_by_person},
    currency::format_currency,
    database_id::PersonId,
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base,
    },
    navigation::NavBar,
    person::core::{Person, get_person},
};

/// The state needed for the person detail page.
#[derive(Debug, Clone)]
pub struct PersonDetailPageState {
    /// The database connection for reading persons and accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PersonDetailPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page showing a person's details and the accounts they own.
pub async fn get_person_detail_page(
    State(state): State<PersonDetailPageState>,
    Path(person_id): Path<PersonId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let person = get_person(person_id, &connection)
        .inspect_err(|error| tracing::error!("could not get person {person_id}: {error}"))?;
    let accounts = get_accounts_by_person(person_id, &connection).inspect_err(|error| {
        tracing::error!("could not get accounts for person {person_id}: {error}")
    })?;

    Ok(person_detail_view(&person, &accounts).into_response())
}

fn person_detail_view(person: &Person, accounts: &[Account]) -> Markup {
    let nav_bar = NavBar::new(endpoints::PERSONS_VIEW).into_html();
    let new_account_url = format!("{}?person={}", endpoints::NEW_ACCOUNT_VIEW, person.id);
    let edit_url = format_endpoint(endpoints::EDIT_PERSON_VIEW, person.id);

    let account_row = |account: &Account| {
        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    a href=(format_endpoint(endpoints::ACCOUNT_DETAIL_VIEW, account.id))
                        class=(LINK_STYLE)
                    {
                        (account.account_number)
                    }
                }
                td class="px-6 py-4 text-right" { (format_currency(account.outstanding_balance)) }
                td class=(TABLE_CELL_STYLE)
                {
                    @if account.is_closed { "Closed" } @else { "Open" }
                }
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
                    h1 class="text-xl font-bold"
                    {
                        @if let Some(first_name) = &person.first_name {
                            (first_name) " "
                        }
                        (person.surname)
                    }

                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                }

                dl class="grid grid-cols-2 gap-2"
                {
                    dt class="font-medium" { "ID Number" }
                    dd { (person.id_number) }
                }

                header class="flex justify-between flex-wrap items-end"
                {
                    h2 class="text-lg font-bold" { "Accounts" }

                    a href=(new_account_url) class=(LINK_STYLE) { "Add Account" }
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
                                th scope="col" class=(TABLE_CELL_STYLE) { "Account Number" }
                                th scope="col" class="px-6 py-3 text-right" { "Balance" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                            }
                        }

                        tbody
                        {
                            @for account in accounts {
                                (account_row(account))
                            }

                            @if accounts.is_empty() {
                                tr
                                {
                                    td colspan="3"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "This person has no accounts yet."
                                    }
                                }
                            }
                        }
                    }
                }

                a href=(endpoints::PERSONS_VIEW) class=(LINK_STYLE) { "Back to Persons" }
            }
        }
    );

    base("Person Details", &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        db::initialize,
        person::core::{PersonFields, create_person},
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{PersonDetailPageState, get_person_detail_page};

    fn get_test_state() -> PersonDetailPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        PersonDetailPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn shows_person_and_their_accounts() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_person(
                &PersonFields::new("John", "Doe", "8501015000089").unwrap(),
                &connection,
            )
            .unwrap();
            connection
                .execute(
                    "INSERT INTO account (person_id, account_number, outstanding_balance, is_closed)
                     VALUES (1, 'ACC10001', '1500.50', 0)",
                    [],
                )
                .unwrap();
        }

        let response = get_person_detail_page(State(state), Path(1)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let body_text = html.root_element().text().collect::<String>();
        assert!(body_text.contains("John Doe"));
        assert!(body_text.contains("8501015000089"));
        assert!(body_text.contains("ACC10001"));
        assert!(body_text.contains("$1,500.50"));

        let add_account_selector = Selector::parse("a[href='/accounts/new?person=1']").unwrap();
        assert!(html.select(&add_account_selector).next().is_some());
    }

    #[tokio::test]
    async fn missing_person_returns_not_found() {
        let state = get_test_state();

        let response = get_person_detail_page(State(state), Path(999))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
