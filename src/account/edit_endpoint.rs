//! Defines the endpoint for updating an existing account.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::core::{ACCOUNT_NUMBER_MAX_LENGTH, update_account},
    database_id::AccountId,
    endpoints,
};

/// The state needed to update an account.
#[derive(Debug, Clone)]
pub struct EditAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for updating an account.
#[derive(Debug, Deserialize)]
pub struct EditAccountForm {
    /// The account number.
    pub account_number: String,
    /// Whether the account is closed. Unchecked checkboxes are not submitted,
    /// so absence means open.
    #[serde(default)]
    pub is_closed: bool,
}

/// A route handler for updating an account's number and closed status,
/// redirects to the accounts view on success.
pub async fn edit_account_endpoint(
    State(state): State<EditAccountState>,
    Path(account_id): Path<AccountId>,
    Form(form): Form<EditAccountForm>,
) -> Response {
    let account_number = form.account_number.trim();

    if account_number.is_empty() || account_number.len() > ACCOUNT_NUMBER_MAX_LENGTH {
        return Error::InvalidField("account number").into_alert_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_account(account_id, account_number, form.is_closed, &connection) {
        Ok(0) => {
            tracing::error!("could not update account {account_id}: no such account");
            Error::NotFound.into_alert_response()
        }
        Ok(_) => (
            HxRedirect(endpoints::ACCOUNTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not update account {account_id}: {error}");
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
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use rust_decimal_macros::dec;

    use crate::{
        account::core::{AccountFields, create_account, get_account},
        db::initialize,
        person::core::{PersonFields, create_person},
        test_utils::assert_hx_redirect,
    };

    use super::{EditAccountForm, EditAccountState, edit_account_endpoint};

    fn get_test_state() -> EditAccountState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        create_person(
            &PersonFields::new("John", "Doe", "8501015000089").unwrap(),
            &connection,
        )
        .unwrap();
        create_account(
            &AccountFields::new(1, "ACC10001", dec!(100)).unwrap(),
            &connection,
        )
        .unwrap();

        EditAccountState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_close_account() {
        let state = get_test_state();
        let form = EditAccountForm {
            account_number: "ACC10001".to_owned(),
            is_closed: true,
        };

        let response = edit_account_endpoint(State(state.clone()), Path(1), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/accounts");

        let connection = state.db_connection.lock().unwrap();
        let account = get_account(1, &connection).unwrap();
        assert!(account.is_closed);
        assert_eq!(account.outstanding_balance, dec!(100));
    }

    #[tokio::test]
    async fn empty_account_number_returns_alert() {
        let state = get_test_state();
        let form = EditAccountForm {
            account_number: "  ".to_owned(),
            is_closed: false,
        };

        let response = edit_account_endpoint(State(state), Path(1), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn missing_account_returns_not_found() {
        let state = get_test_state();
        let form = EditAccountForm {
            account_number: "ACC10001".to_owned(),
            is_closed: false,
        };

        let response = edit_account_endpoint(State(state), Path(999), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
