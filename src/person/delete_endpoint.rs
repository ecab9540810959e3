//! Defines the endpoint for deleting a person.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::PersonId, person::core::delete_person,
};

/// The state needed to delete a person.
#[derive(Debug, Clone)]
pub struct DeletePersonState {
    /// The database connection for managing persons.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeletePersonState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a person.
///
/// A person who still owns accounts is not deleted and the handler responds
/// with an alert instead. The status code for a successful delete has to be
/// 200 OK or HTMX will not delete the table row.
pub async fn delete_person_endpoint(
    State(state): State<DeletePersonState>,
    Path(person_id): Path<PersonId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_person(person_id, &connection) {
        Ok(0) => {
            tracing::error!("could not delete person {person_id}: no such person");
            Error::NotFound.into_alert_response()
        }
        Ok(_) => ().into_response(),
        Err(error) => {
            tracing::error!("could not delete person {person_id}: {error}");
            error.into_alert_response()
        }
    }
}
