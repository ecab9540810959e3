//! Defines the endpoint for deleting an account.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, account::core::delete_account, database_id::AccountId};

/// The state needed to delete an account.
#[derive(Debug, Clone)]
pub struct DeleteAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an account.
///
/// An account that still has transactions is not deleted and the handler
/// responds with an alert instead. The status code for a successful delete
/// has to be 200 OK or HTMX will not delete the table row.
pub async fn delete_account_endpoint(
    State(state): State<DeleteAccountState>,
    Path(account_id): Path<AccountId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_account(account_id, &connection) {
        Ok(0) => {
            tracing::error!("could not delete account {account_id}: no such account");
            Error::NotFound.into_alert_response()
        }
        Ok(_) => ().into_response(),
        Err(error) => {
            tracing::error!("could not delete account {account_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use rust_decimal_macros::dec;

    use crate::{
        Error,
        account::core::{AccountFields, create_account, get_account},
        db::initialize,
        person::core::{PersonFields, create_person},
    };

    use super::{DeleteAccountState, delete_account_endpoint};

    fn get_test_state() -> DeleteAccountState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        create_person(
            &PersonFields::new("John", "Doe", "8501015000089").unwrap(),
            &connection,
        )
        .unwrap();
        create_account(
            &AccountFields::new(1, "ACC10001", dec!(0)).unwrap(),
            &connection,
        )
        .unwrap();

        DeleteAccountState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_delete_account() {
        let state = get_test_state();

        let response = delete_account_endpoint(State(state.clone()), Path(1))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_account(1, &connection), Err(Error::NotFound));
    }

    #[tokio::test]
    async fn account_with_transactions_is_not_deleted() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            connection
                .execute(
                    "INSERT INTO \"transaction\"
                        (account_id, transaction_date, capture_date, amount, description)
                     VALUES (1, '2026-08-01', '2026-08-01T00:00:00Z', '50.00', 'Deposit')",
                    [],
                )
                .unwrap();
        }

        let response = delete_account_endpoint(State(state.clone()), Path(1))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let connection = state.db_connection.lock().unwrap();
        assert!(get_account(1, &connection).is_ok());
    }

    #[tokio::test]
    async fn missing_account_returns_not_found() {
        let state = get_test_state();

        let response = delete_account_endpoint(State(state), Path(999))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
