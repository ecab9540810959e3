//! Defines the endpoint for retracting a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::TransactionId, transaction::ledger::retract_transaction,
};

/// The state needed to retract a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for retracting a transaction, which deletes it and
/// subtracts its amount from the account balance.
///
/// The status code for a successful retraction has to be 200 OK or HTMX will
/// not delete the table row.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match retract_transaction(transaction_id, &mut connection) {
        Ok(()) => ().into_response(),
        Err(error) => {
            tracing::error!("could not retract transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
