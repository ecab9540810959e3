//! Defines the transaction model and its read queries.
//!
//! Writes go through [crate::transaction::ledger], which keeps account
//! balances in step with the transaction rows.

use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    currency::decimal_from_row,
    database_id::{AccountId, TransactionId},
};

/// A deposit into or withdrawal from an account.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the account the transaction belongs to.
    pub account_id: AccountId,
    /// The date the transaction took place. Never in the future.
    pub transaction_date: Date,
    /// When the transaction was first recorded. Set once on creation and
    /// never changed afterwards, revisions included.
    pub capture_date: OffsetDateTime,
    /// The value of the transaction in dollars.
    pub amount: Decimal,
    /// Text detailing the transaction.
    pub description: String,
}

/// The maximum length of a transaction description.
pub const DESCRIPTION_MAX_LENGTH: usize = 100;

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id INTEGER NOT NULL REFERENCES account(id) ON DELETE RESTRICT,
            transaction_date TEXT NOT NULL,
            capture_date TEXT NOT NULL,
            amount TEXT NOT NULL,
            description TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
pub fn map_row_to_transaction(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        account_id: row.get(1)?,
        transaction_date: row.get(2)?,
        capture_date: row.get(3)?,
        amount: decimal_from_row(row, 4)?,
        description: row.get(5)?,
    })
}

pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, account_id, transaction_date, capture_date, amount, description";

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a valid transaction,
/// or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .query_one(
            &format!("SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = ?1"),
            params![id],
            map_row_to_transaction,
        )
        .map_err(Error::from)
}

/// Retrieve the transactions of `account_id`, newest first.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_transactions_by_account(
    account_id: AccountId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE account_id = ?1
             ORDER BY transaction_date DESC, id DESC"
        ))?
        .query_map(params![account_id], map_row_to_transaction)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        account::core::{AccountFields, create_account},
        db::initialize,
        person::core::{PersonFields, create_person},
        transaction::ledger::{TransactionInput, post_transaction},
    };

    use super::{get_transaction, get_transactions_by_account};

    fn get_test_connection() -> Connection {
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
        connection
    }

    #[test]
    fn get_missing_transaction_returns_not_found() {
        let connection = get_test_connection();

        assert_eq!(get_transaction(999, &connection), Err(Error::NotFound));
    }

    #[test]
    fn lists_account_transactions_newest_first() {
        let mut connection = get_test_connection();
        post_transaction(
            TransactionInput {
                account_id: 1,
                transaction_date: date!(2026 - 08 - 01),
                amount: dec!(10),
                description: "First".to_owned(),
            },
            &mut connection,
        )
        .unwrap();
        post_transaction(
            TransactionInput {
                account_id: 1,
                transaction_date: date!(2026 - 08 - 02),
                amount: dec!(20),
                description: "Second".to_owned(),
            },
            &mut connection,
        )
        .unwrap();

        let transactions = get_transactions_by_account(1, &connection).unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].description, "Second");
        assert_eq!(transactions[1].description, "First");
    }
}
