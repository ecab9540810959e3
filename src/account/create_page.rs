//! Defines the route handler for the page for creating a new account.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    database_id::PersonId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, base,
    },
    navigation::NavBar,
    person::{Person, map_row_to_person},
};

use super::core::ACCOUNT_NUMBER_MAX_LENGTH;

/// The query parameters of the new account page.
#[derive(Debug, Default, Deserialize)]
pub struct NewAccountQuery {
    /// The ID of the person to preselect as the owner.
    pub person: Option<PersonId>,
}

/// The state needed for the create new account page.
#[derive(Debug, Clone)]
pub struct CreateAccountPageState {
    /// The database connection for listing candidate owners.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for creating an account.
///
/// The owner dropdown lists every person, with the `person` query parameter
/// preselected when given.
pub async fn get_create_account_page(
    State(state): State<CreateAccountPageState>,
    Query(query): Query<NewAccountQuery>,
) -> Result<Response, Error> {
    let persons = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_persons(&connection)
            .inspect_err(|error| tracing::error!("could not list persons: {error}"))?
    };

    Ok(create_account_view(&persons, query.person).into_response())
}

fn get_all_persons(connection: &Connection) -> Result<Vec<Person>, Error> {
    connection
        .prepare(
            "SELECT id, first_name, surname, id_number FROM person
             ORDER BY surname ASC, first_name ASC",
        )?
        .query_map([], map_row_to_person)?
        .map(|person_result| person_result.map_err(Error::from))
        .collect()
}

fn create_account_view(persons: &[Person], preselected_person: Option<PersonId>) -> Markup {
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();

    let person_label = |person: &Person| match &person.first_name {
        Some(first_name) => format!("{first_name} {} ({})", person.surname, person.id_number),
        None => format!("{} ({})", person.surname, person.id_number),
    };

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_ACCOUNT)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Account" }

                div
                {
                    label for="person_id" class=(FORM_LABEL_STYLE) { "Owner" }

                    select
                        name="person_id"
                        id="person_id"
                        required
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @if preselected_person.is_none() {
                            option value="" selected disabled { "Select a person" }
                        }

                        @for person in persons {
                            @if preselected_person == Some(person.id) {
                                option value=(person.id) selected { (person_label(person)) }
                            } @else {
                                option value=(person.id) { (person_label(person)) }
                            }
                        }
                    }
                }

                div
                {
                    label for="account_number" class=(FORM_LABEL_STYLE) { "Account Number" }

                    input
                        name="account_number"
                        id="account_number"
                        type="text"
                        maxlength=(ACCOUNT_NUMBER_MAX_LENGTH)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="outstanding_balance" class=(FORM_LABEL_STYLE) { "Opening Balance" }

                    input
                        name="outstanding_balance"
                        id="outstanding_balance"
                        type="number"
                        step="0.01"
                        min="0"
                        placeholder="0.00"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Account" }

                a href=(endpoints::ACCOUNTS_VIEW) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base("Create Account", &content)
}
