//! Defines the endpoint for revising an existing transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    endpoints,
    transaction::ledger::{TransactionRevision, revise_transaction},
};

/// The state needed to revise a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for revising a transaction.
#[derive(Debug, Deserialize)]
pub struct EditTransactionForm {
    /// The new amount in dollars.
    pub amount: Decimal,
    /// The new transaction date.
    pub transaction_date: Date,
    /// The new description.
    #[serde(default)]
    pub description: String,
}

/// A route handler for revising a transaction, redirects to the transactions
/// view on success.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<EditTransactionForm>,
) -> Response {
    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let revision = TransactionRevision {
        transaction_date: form.transaction_date,
        amount: form.amount,
        description: form.description,
    };

    if let Err(error) = revise_transaction(transaction_id, revision, &mut connection) {
        tracing::error!("could not revise transaction {transaction_id}: {error}");

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

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        account::core::{AccountFields, create_account, get_account},
        db::initialize,
        person::core::{PersonFields, create_person},
        test_utils::assert_hx_redirect,
        transaction::{
            get_transaction,
            ledger::{TransactionInput, post_transaction},
        },
    };

    use super::{EditTransactionForm, EditTransactionState, edit_transaction_endpoint};

    fn get_test_state() -> EditTransactionState {
        let mut connection = Connection::open_in_memory().unwrap();
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
        post_transaction(
            TransactionInput {
                account_id: 1,
                transaction_date: date!(2026 - 08 - 01),
                amount: dec!(100),
                description: "Deposit".to_owned(),
            },
            &mut connection,
        )
        .unwrap();

        EditTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn revising_moves_the_balance_by_the_difference() {
        let state = get_test_state();
        let form = EditTransactionForm {
            amount: dec!(50),
            transaction_date: date!(2026 - 08 - 02),
            description: "Smaller deposit".to_owned(),
        };

        let response = edit_transaction_endpoint(State(state.clone()), Path(1), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/transactions");

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.amount, dec!(50));
        assert_eq!(transaction.description, "Smaller deposit");
        assert_eq!(
            get_account(1, &connection).unwrap().outstanding_balance,
            dec!(1550.50)
        );
    }

    #[tokio::test]
    async fn non_positive_amount_returns_alert() {
        let state = get_test_state();
        let form = EditTransactionForm {
            amount: dec!(0),
            transaction_date: date!(2026 - 08 - 01),
            description: "Deposit".to_owned(),
        };

        let response = edit_transaction_endpoint(State(state), Path(1), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn missing_transaction_returns_not_found() {
        let state = get_test_state();
        let form = EditTransactionForm {
            amount: dec!(10),
            transaction_date: date!(2026 - 08 - 01),
            description: "Deposit".to_owned(),
        };

        let response = edit_transaction_endpoint(State(state), Path(999), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
