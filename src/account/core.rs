//! Defines the account model and its database queries.
//!
//! Balances are exact decimal amounts stored as TEXT, see [crate::currency].

use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;

use crate::{
    Error,
    currency::{decimal_from_row, decimal_to_sql},
    database_id::{AccountId, PersonId},
    person::RowsAffected,
};

/// A bank account owned by a person.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The ID of the account.
    pub id: AccountId,
    /// The ID of the person who owns the account.
    pub person_id: PersonId,
    /// The account number, unique across all accounts.
    pub account_number: String,
    /// The current balance. Maintained by the transaction ledger, never set
    /// directly after the account is created.
    pub outstanding_balance: Decimal,
    /// Whether the account is closed. Closed accounts accept no new or
    /// revised transactions.
    pub is_closed: bool,
}

/// The maximum length of an account number.
pub const ACCOUNT_NUMBER_MAX_LENGTH: usize = 50;

/// The validated input for creating an account.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountFields {
    /// The ID of the person who will own the account.
    pub person_id: PersonId,
    /// The account number.
    pub account_number: String,
    /// The opening balance. Must not be negative.
    pub outstanding_balance: Decimal,
}

impl AccountFields {
    /// Validate raw form input.
    ///
    /// # Errors
    /// Returns [Error::InvalidField] when the account number is empty or too
    /// long, and [Error::NegativeOpeningBalance] when the opening balance is
    /// below zero.
    pub fn new(
        person_id: PersonId,
        account_number: &str,
        outstanding_balance: Decimal,
    ) -> Result<Self, Error> {
        let account_number = account_number.trim();

        if account_number.is_empty() || account_number.len() > ACCOUNT_NUMBER_MAX_LENGTH {
            return Err(Error::InvalidField("account number"));
        }

        if outstanding_balance < Decimal::ZERO {
            return Err(Error::NegativeOpeningBalance);
        }

        Ok(Self {
            person_id,
            account_number: account_number.to_owned(),
            outstanding_balance,
        })
    }
}

/// Create the account table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            person_id INTEGER NOT NULL REFERENCES person(id) ON DELETE RESTRICT,
            account_number TEXT NOT NULL UNIQUE,
            outstanding_balance TEXT NOT NULL,
            is_closed INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Account].
pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        person_id: row.get(1)?,
        account_number: row.get(2)?,
        outstanding_balance: decimal_from_row(row, 3)?,
        is_closed: row.get(4)?,
    })
}

const ACCOUNT_COLUMNS: &str = "id, person_id, account_number, outstanding_balance, is_closed";

/// Create a new account in the database. New accounts are always open.
///
/// # Errors
/// Returns [Error::DuplicateAccountNumber] if another account already has the
/// account number, [Error::NotFound] if the owner does not exist, or
/// [Error::SqlError] if there is some other SQL error.
pub fn create_account(fields: &AccountFields, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO account (person_id, account_number, outstanding_balance, is_closed)
             VALUES (?1, ?2, ?3, 0)
             RETURNING {ACCOUNT_COLUMNS}"
        ))?
        .query_row(
            params![
                fields.person_id,
                fields.account_number,
                decimal_to_sql(fields.outstanding_balance)
            ],
            map_row_to_account,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateAccountNumber(fields.account_number.clone()),
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::NotFound,
            error => error.into(),
        })
}

/// Retrieve an account from the database by its `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a valid account, or
/// [Error::SqlError] if there is some other SQL error.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    connection
        .query_one(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM account WHERE id = ?1"),
            params![id],
            map_row_to_account,
        )
        .map_err(Error::from)
}

/// Retrieve the accounts owned by `person_id`, ordered by account number.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_accounts_by_person(
    person_id: PersonId,
    connection: &Connection,
) -> Result<Vec<Account>, Error> {
    connection
        .prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account
             WHERE person_id = ?1
             ORDER BY account_number ASC"
        ))?
        .query_map(params![person_id], map_row_to_account)?
        .map(|account_result| account_result.map_err(Error::from))
        .collect()
}

/// Overwrite the account number and closed status of the account `id`.
///
/// The balance is deliberately not touched, only the transaction ledger
/// changes balances.
///
/// # Errors
/// Returns [Error::DuplicateAccountNumber] if the new account number belongs
/// to another account, or [Error::SqlError] if there is some other SQL error.
/// Returns `Ok(0)` when no account with `id` exists.
pub fn update_account(
    id: AccountId,
    account_number: &str,
    is_closed: bool,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE account SET account_number = ?1, is_closed = ?2 WHERE id = ?3",
            params![account_number, is_closed, id],
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateAccountNumber(account_number.to_owned()),
            error => error.into(),
        })
}

/// Delete the account `id`.
///
/// The referential-integrity policy is checked explicitly before the delete:
/// an account that still has transactions is not deleted.
///
/// # Errors
/// Returns [Error::AccountHasTransactions] if transactions still reference
/// the account, or [Error::SqlError] if there is some other SQL error.
/// Returns `Ok(0)` when no account with `id` exists.
pub fn delete_account(id: AccountId, connection: &Connection) -> Result<RowsAffected, Error> {
    let transaction_count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE account_id = ?1",
        params![id],
        |row| row.get(0),
    )?;

    if transaction_count > 0 {
        return Err(Error::AccountHasTransactions);
    }

    connection
        .execute("DELETE FROM account WHERE id = ?1", params![id])
        .map_err(Error::from)
}

#[cfg(test)]
mod account_fields_tests {
    use rust_decimal_macros::dec;

    use crate::Error;

    use super::AccountFields;

    #[test]
    fn accepts_valid_input() {
        let fields = AccountFields::new(1, " ACC10001 ", dec!(1500.50)).unwrap();

        assert_eq!(fields.account_number, "ACC10001");
        assert_eq!(fields.outstanding_balance, dec!(1500.50));
    }

    #[test]
    fn accepts_zero_opening_balance() {
        let fields = AccountFields::new(1, "ACC10001", dec!(0));

        assert!(fields.is_ok());
    }

    #[test]
    fn accepts_account_number_at_the_length_limit() {
        let result = AccountFields::new(1, &"A".repeat(50), dec!(0));

        assert!(result.is_ok());
    }

    #[test]
    fn rejects_empty_account_number() {
        let result = AccountFields::new(1, "  ", dec!(100));

        assert_eq!(result, Err(Error::InvalidField("account number")));
    }

    #[test]
    fn rejects_overlong_account_number() {
        let result = AccountFields::new(1, &"A".repeat(51), dec!(0));

        assert_eq!(result, Err(Error::InvalidField("account number")));
    }

    #[test]
    fn rejects_negative_opening_balance() {
        let result = AccountFields::new(1, "ACC10001", dec!(-0.01));

        assert_eq!(result, Err(Error::NegativeOpeningBalance));
    }
}
