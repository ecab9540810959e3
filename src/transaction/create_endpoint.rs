//! Defines the endpoint for posting a new transaction.
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
use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    database_id::AccountId,
    endpoints,
    transaction::ledger::{TransactionInput, post_transaction},
};

/// The state needed to post a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for posting a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The ID of the account to post against.
    pub account_id: AccountId,
    /// The value of the transaction in dollars.
    pub amount: Decimal,
    /// The date when the transaction occurred.
    pub transaction_date: Date,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
}

/// A route handler for posting a new transaction, redirects to the
/// transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let input = TransactionInput {
        account_id: form.account_id,
        transaction_date: form.transaction_date,
        amount: form.amount,
        description: form.description,
    };

    if let Err(error) = post_transaction(input, &mut connection) {
        tracing::error!("could not post transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::{Duration, OffsetDateTime, macros::date};

    use crate::{
        account::core::{AccountFields, create_account, get_account},
        db::initialize,
        person::core::{PersonFields, create_person},
        test_utils::assert_hx_redirect,
        transaction::get_transaction,
    };

    use super::{CreateTransactionState, TransactionForm, create_transaction_endpoint};

    fn get_test_state() -> CreateTransactionState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        create_person(
            &PersonFields::new("John", "Doe", "8501015000089").unwrap(),
            &connection,
        )
        .unwrap();
        create_account(
            &AccountFields::new(1, "ACC10001", dec!(1500.50)).unwrap(),
            &connection,
        )
        .unwrap();

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn posting_updates_the_account_balance() {
        let state = get_test_state();
        let form = TransactionForm {
            account_id: 1,
            amount: dec!(100),
            transaction_date: date!(2026 - 08 - 01),
            description: "Salary Deposit".to_owned(),
        };

        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/transactions");

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.amount, dec!(100));
        assert_eq!(transaction.description, "Salary Deposit");
        assert_eq!(
            get_account(1, &connection).unwrap().outstanding_balance,
            dec!(1600.50)
        );
    }

    #[tokio::test]
    async fn future_date_returns_alert() {
        let state = get_test_state();
        let form = TransactionForm {
            account_id: 1,
            amount: dec!(100),
            transaction_date: OffsetDateTime::now_utc().date() + Duration::days(1),
            description: "Too soon".to_owned(),
        };

        let response = create_transaction_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn closed_account_returns_conflict() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            connection
                .execute("UPDATE account SET is_closed = 1 WHERE id = 1", [])
                .unwrap();
        }
        let form = TransactionForm {
            account_id: 1,
            amount: dec!(100),
            transaction_date: date!(2026 - 08 - 01),
            description: "Rejected".to_owned(),
        };

        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_account(1, &connection).unwrap().outstanding_balance,
            dec!(1500.50)
        );
    }
}
