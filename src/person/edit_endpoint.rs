//! Defines the endpoint for updating an existing person.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::PersonId,
    endpoints,
    person::core::{PersonFields, update_person},
    person::create_endpoint::PersonForm,
};

/// The state needed to update a person.
#[derive(Debug, Clone)]
pub struct EditPersonState {
    /// The database connection for managing persons.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditPersonState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating a person, redirects to the persons view on
/// success.
pub async fn edit_person_endpoint(
    State(state): State<EditPersonState>,
    Path(person_id): Path<PersonId>,
    Form(form): Form<PersonForm>,
) -> Response {
    let fields = match PersonFields::new(&form.first_name, &form.surname, &form.id_number) {
        Ok(fields) => fields,
        Err(error) => {
            tracing::error!("invalid person form input: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_person(person_id, &fields, &connection) {
        Ok(0) => {
            tracing::error!("could not update person {person_id}: no such person");
            Error::NotFound.into_alert_response()
        }
        Ok(_) => (
            HxRedirect(endpoints::PERSONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not update person {person_id}: {error}");
            error.into_alert_response()
        }
    }
}
