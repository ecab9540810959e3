//! Defines the endpoint for creating a new person.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    person::core::{PersonFields, create_person},
};

/// The state needed to create a person.
#[derive(Debug, Clone)]
pub struct CreatePersonState {
    /// The database connection for managing persons.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreatePersonState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or updating a person.
#[derive(Debug, Deserialize)]
pub struct PersonForm {
    /// The person's first name. May be left blank.
    #[serde(default)]
    pub first_name: String,
    /// The person's surname.
    pub surname: String,
    /// The person's 13-digit ID number.
    pub id_number: String,
}

/// A route handler for creating a new person, redirects to the persons view
/// on success.
pub async fn create_person_endpoint(
    State(state): State<CreatePersonState>,
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

    if let Err(error) = create_person(&fields, &connection) {
        tracing::error!("could not create person: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::PERSONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
