//! Defines the route handler for the page for editing an existing person.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::PersonId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, base,
    },
    navigation::NavBar,
    person::core::{NAME_MAX_LENGTH, Person, get_person},
};

/// The state needed for the edit person page.
#[derive(Debug, Clone)]
pub struct EditPersonPageState {
    /// The database connection for reading persons.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditPersonPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing a person, prefilled with their current
/// details.
pub async fn get_edit_person_page(
    State(state): State<EditPersonPageState>,
    Path(person_id): Path<PersonId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let person = get_person(person_id, &connection)
        .inspect_err(|error| tracing::error!("could not get person {person_id}: {error}"))?;

    Ok(edit_person_view(&person).into_response())
}

fn edit_person_view(person: &Person) -> Markup {
    let nav_bar = NavBar::new(endpoints::PERSONS_VIEW).into_html();
    let update_url = format_endpoint(endpoints::PUT_PERSON, person.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Person" }

                div
                {
                    label for="first_name" class=(FORM_LABEL_STYLE) { "First Name" }

                    input
                        name="first_name"
                        id="first_name"
                        type="text"
                        maxlength=(NAME_MAX_LENGTH)
                        value=(person.first_name.clone().unwrap_or_default())
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="surname" class=(FORM_LABEL_STYLE) { "Surname" }

                    input
                        name="surname"
                        id="surname"
                        type="text"
                        maxlength=(NAME_MAX_LENGTH)
                        required
                        value=(person.surname)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="id_number" class=(FORM_LABEL_STYLE) { "ID Number" }

                    input
                        name="id_number"
                        id="id_number"
                        type="text"
                        pattern="[0-9]{13}"
                        title="Exactly 13 digits"
                        required
                        value=(person.id_number)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Changes" }

                a href=(endpoints::PERSONS_VIEW) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base("Edit Person", &content)
}
