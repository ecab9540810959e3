//! The ledger operations that keep account balances in step with the
//! transaction rows.
//!
//! Every write here runs inside an immediate SQL transaction so the balance
//! update and the transaction row change land together or not at all. A lock
//! collision with another writer surfaces as [Error::ConcurrencyConflict].

use rusqlite::{Connection, TransactionBehavior, params};
use rust_decimal::Decimal;
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    currency::{decimal_from_row, decimal_to_sql},
    database_id::{AccountId, TransactionId},
    transaction::core::{
        DESCRIPTION_MAX_LENGTH, TRANSACTION_COLUMNS, Transaction, map_row_to_transaction,
    },
};

/// The input for posting a new transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionInput {
    /// The ID of the account to post against.
    pub account_id: AccountId,
    /// The date the transaction took place.
    pub transaction_date: Date,
    /// The value of the transaction in dollars. Must be strictly positive.
    pub amount: Decimal,
    /// Text detailing the transaction.
    pub description: String,
}

/// The input for revising an existing transaction.
///
/// The account and the capture date of a transaction cannot be revised.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRevision {
    /// The new transaction date.
    pub transaction_date: Date,
    /// The new amount in dollars. Must be strictly positive.
    pub amount: Decimal,
    /// The new description.
    pub description: String,
}

fn validate(transaction_date: Date, amount: Decimal, description: &str) -> Result<String, Error> {
    if transaction_date > OffsetDateTime::now_utc().date() {
        return Err(Error::FutureDate(transaction_date));
    }

    if amount <= Decimal::ZERO {
        return Err(Error::NonPositiveAmount(amount));
    }

    let description = description.trim();

    if description.is_empty() || description.len() > DESCRIPTION_MAX_LENGTH {
        return Err(Error::InvalidField("description"));
    }

    Ok(description.to_owned())
}

struct AccountBalance {
    outstanding_balance: Decimal,
    is_closed: bool,
}

fn get_account_balance(
    account_id: AccountId,
    connection: &Connection,
) -> Result<AccountBalance, Error> {
    connection
        .query_one(
            "SELECT outstanding_balance, is_closed FROM account WHERE id = ?1",
            params![account_id],
            |row| {
                Ok(AccountBalance {
                    outstanding_balance: decimal_from_row(row, 0)?,
                    is_closed: row.get(1)?,
                })
            },
        )
        .map_err(Error::from)
}

fn set_account_balance(
    account_id: AccountId,
    balance: Decimal,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE account SET outstanding_balance = ?1 WHERE id = ?2",
        params![decimal_to_sql(balance), account_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Post a new transaction and add its amount to the account balance.
///
/// The capture date is set to the current time and never changes afterwards.
///
/// # Errors
/// Returns [Error::FutureDate] if the transaction date is in the future,
/// [Error::NonPositiveAmount] if the amount is zero or negative,
/// [Error::InvalidField] if the description is blank or too long,
/// [Error::NotFound] if the account does not exist, [Error::ClosedAccount] if
/// the account is closed, [Error::ConcurrencyConflict] if another writer
/// holds the database, or [Error::SqlError] for other SQL errors.
pub fn post_transaction(
    input: TransactionInput,
    connection: &mut Connection,
) -> Result<Transaction, Error> {
    // Validate before opening the write transaction so bad input never takes
    // the write lock.
    let description = validate(input.transaction_date, input.amount, &input.description)?;

    let sql_transaction = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let account = get_account_balance(input.account_id, &sql_transaction)?;

    if account.is_closed {
        return Err(Error::ClosedAccount);
    }

    let capture_date = OffsetDateTime::now_utc();

    let transaction = sql_transaction
        .prepare(&format!(
            "INSERT INTO \"transaction\"
                (account_id, transaction_date, capture_date, amount, description)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            params![
                input.account_id,
                input.transaction_date,
                capture_date,
                decimal_to_sql(input.amount),
                description
            ],
            map_row_to_transaction,
        )?;

    set_account_balance(
        input.account_id,
        account.outstanding_balance + input.amount,
        &sql_transaction,
    )?;

    sql_transaction.commit()?;

    Ok(transaction)
}

/// Revise an existing transaction and move the account balance by the
/// difference between the old and new amounts.
///
/// The capture date of the original transaction is preserved.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction does not exist,
/// [Error::ClosedAccount] if its account is closed, [Error::FutureDate] if
/// the new date is in the future, [Error::NonPositiveAmount] if the new
/// amount is zero or negative, [Error::InvalidField] if the new description
/// is blank or too long, [Error::ConcurrencyConflict] if another writer
/// holds the database, or [Error::SqlError] for other SQL errors.
pub fn revise_transaction(
    id: TransactionId,
    revision: TransactionRevision,
    connection: &mut Connection,
) -> Result<Transaction, Error> {
    let sql_transaction = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let existing = sql_transaction.query_one(
        &format!("SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = ?1"),
        params![id],
        map_row_to_transaction,
    )?;

    let account = get_account_balance(existing.account_id, &sql_transaction)?;

    if account.is_closed {
        return Err(Error::ClosedAccount);
    }

    let description = validate(revision.transaction_date, revision.amount, &revision.description)?;

    let rows_affected = sql_transaction.execute(
        "UPDATE \"transaction\"
         SET transaction_date = ?1, amount = ?2, description = ?3
         WHERE id = ?4",
        params![
            revision.transaction_date,
            decimal_to_sql(revision.amount),
            description,
            id
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    set_account_balance(
        existing.account_id,
        account.outstanding_balance - existing.amount + revision.amount,
        &sql_transaction,
    )?;

    sql_transaction.commit()?;

    Ok(Transaction {
        transaction_date: revision.transaction_date,
        amount: revision.amount,
        description,
        ..existing
    })
}

/// Retract a transaction, deleting it and subtracting its amount from the
/// account balance.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction does not exist,
/// [Error::ClosedAccount] if its account is closed,
/// [Error::ConcurrencyConflict] if another writer holds the database, or
/// [Error::SqlError] for other SQL errors.
pub fn retract_transaction(id: TransactionId, connection: &mut Connection) -> Result<(), Error> {
    let sql_transaction = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let existing = sql_transaction.query_one(
        &format!("SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = ?1"),
        params![id],
        map_row_to_transaction,
    )?;

    let account = get_account_balance(existing.account_id, &sql_transaction)?;

    if account.is_closed {
        return Err(Error::ClosedAccount);
    }

    let rows_affected =
        sql_transaction.execute("DELETE FROM \"transaction\" WHERE id = ?1", params![id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    set_account_balance(
        existing.account_id,
        account.outstanding_balance - existing.amount,
        &sql_transaction,
    )?;

    sql_transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Duration, OffsetDateTime, macros::date};

    use crate::{
        Error,
        account::core::{AccountFields, create_account, get_account},
        db::initialize,
        person::core::{PersonFields, create_person},
        transaction::core::get_transaction,
    };

    use super::{TransactionInput, TransactionRevision, post_transaction, retract_transaction, revise_transaction};

    fn get_test_connection() -> Connection {
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
        connection
    }

    fn deposit(amount: Decimal) -> TransactionInput {
        TransactionInput {
            account_id: 1,
            transaction_date: date!(2026 - 08 - 01),
            amount,
            description: "Deposit".to_owned(),
        }
    }

    #[track_caller]
    fn assert_balance(want: Decimal, connection: &Connection) {
        let got = get_account(1, connection).unwrap().outstanding_balance;
        assert_eq!(got, want, "want balance {want}, got {got}");
    }

    #[test]
    fn post_revise_retract_walk_the_balance_and_back() {
        let mut connection = get_test_connection();

        let transaction = post_transaction(deposit(dec!(100)), &mut connection).unwrap();
        assert_balance(dec!(1600.50), &connection);

        revise_transaction(
            transaction.id,
            TransactionRevision {
                transaction_date: transaction.transaction_date,
                amount: dec!(50),
                description: "Smaller deposit".to_owned(),
            },
            &mut connection,
        )
        .unwrap();
        assert_balance(dec!(1550.50), &connection);

        retract_transaction(transaction.id, &mut connection).unwrap();
        assert_balance(dec!(1500.50), &connection);
        assert_eq!(
            get_transaction(transaction.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn balance_equals_opening_plus_posted_amounts() {
        let mut connection = get_test_connection();
        let amounts = [dec!(0.01), dec!(12.34), dec!(500), dec!(99.99)];

        for amount in amounts {
            post_transaction(deposit(amount), &mut connection).unwrap();
        }

        let want = dec!(1500.50) + amounts.iter().sum::<Decimal>();
        assert_balance(want, &connection);
    }

    #[test]
    fn post_sets_capture_date_and_revise_preserves_it() {
        let mut connection = get_test_connection();

        let transaction = post_transaction(deposit(dec!(100)), &mut connection).unwrap();

        revise_transaction(
            transaction.id,
            TransactionRevision {
                transaction_date: date!(2026 - 08 - 02),
                amount: dec!(200),
                description: "Revised".to_owned(),
            },
            &mut connection,
        )
        .unwrap();

        let revised = get_transaction(transaction.id, &connection).unwrap();
        assert_eq!(revised.capture_date, transaction.capture_date);
        assert_eq!(revised.transaction_date, date!(2026 - 08 - 02));
        assert_eq!(revised.amount, dec!(200));
        assert_eq!(revised.description, "Revised");
    }

    #[test]
    fn post_rejects_future_date() {
        let mut connection = get_test_connection();
        let tomorrow = OffsetDateTime::now_utc().date() + Duration::days(1);

        let result = post_transaction(
            TransactionInput {
                transaction_date: tomorrow,
                ..deposit(dec!(100))
            },
            &mut connection,
        );

        assert_eq!(result, Err(Error::FutureDate(tomorrow)));
        assert_balance(dec!(1500.50), &connection);
    }

    #[test]
    fn post_rejects_zero_and_negative_amounts() {
        let mut connection = get_test_connection();

        assert_eq!(
            post_transaction(deposit(dec!(0)), &mut connection),
            Err(Error::NonPositiveAmount(dec!(0)))
        );
        assert_eq!(
            post_transaction(deposit(dec!(-5)), &mut connection),
            Err(Error::NonPositiveAmount(dec!(-5)))
        );
        assert_balance(dec!(1500.50), &connection);
    }

    #[test]
    fn post_rejects_overlong_description() {
        let mut connection = get_test_connection();

        let result = post_transaction(
            TransactionInput {
                description: "x".repeat(101),
                ..deposit(dec!(100))
            },
            &mut connection,
        );

        assert_eq!(result, Err(Error::InvalidField("description")));
        assert_balance(dec!(1500.50), &connection);
    }

    #[test]
    fn post_rejects_blank_description() {
        let mut connection = get_test_connection();

        let result = post_transaction(
            TransactionInput {
                description: "   ".to_owned(),
                ..deposit(dec!(100))
            },
            &mut connection,
        );

        assert_eq!(result, Err(Error::InvalidField("description")));
        assert_balance(dec!(1500.50), &connection);
    }

    #[test]
    fn revise_rejects_blank_description() {
        let mut connection = get_test_connection();
        let transaction = post_transaction(deposit(dec!(100)), &mut connection).unwrap();

        let result = revise_transaction(
            transaction.id,
            TransactionRevision {
                transaction_date: transaction.transaction_date,
                amount: dec!(100),
                description: String::new(),
            },
            &mut connection,
        );

        assert_eq!(result, Err(Error::InvalidField("description")));
        assert_eq!(
            get_transaction(transaction.id, &connection).unwrap().description,
            "Deposit"
        );
    }

    #[test]
    fn post_validates_input_before_looking_up_the_account() {
        let mut connection = get_test_connection();

        let result = post_transaction(
            TransactionInput {
                account_id: 999,
                ..deposit(dec!(0))
            },
            &mut connection,
        );

        assert_eq!(result, Err(Error::NonPositiveAmount(dec!(0))));
    }

    #[test]
    fn post_to_missing_account_returns_not_found() {
        let mut connection = get_test_connection();

        let result = post_transaction(
            TransactionInput {
                account_id: 999,
                ..deposit(dec!(100))
            },
            &mut connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn closed_account_rejects_all_ledger_operations() {
        let mut connection = get_test_connection();
        let transaction = post_transaction(deposit(dec!(100)), &mut connection).unwrap();
        connection
            .execute("UPDATE account SET is_closed = 1 WHERE id = 1", [])
            .unwrap();

        assert_eq!(
            post_transaction(deposit(dec!(10)), &mut connection),
            Err(Error::ClosedAccount)
        );
        assert_eq!(
            revise_transaction(
                transaction.id,
                TransactionRevision {
                    transaction_date: transaction.transaction_date,
                    amount: dec!(10),
                    description: "Revised".to_owned(),
                },
                &mut connection,
            ),
            Err(Error::ClosedAccount)
        );
        assert_eq!(
            retract_transaction(transaction.id, &mut connection),
            Err(Error::ClosedAccount)
        );

        assert_balance(dec!(1600.50), &connection);
        assert!(get_transaction(transaction.id, &connection).is_ok());
    }

    #[test]
    fn revise_missing_transaction_returns_not_found() {
        let mut connection = get_test_connection();

        let result = revise_transaction(
            999,
            TransactionRevision {
                transaction_date: date!(2026 - 08 - 01),
                amount: dec!(10),
                description: "Missing".to_owned(),
            },
            &mut connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn retract_missing_transaction_returns_not_found() {
        let mut connection = get_test_connection();

        assert_eq!(
            retract_transaction(999, &mut connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn failed_revision_leaves_balance_untouched() {
        let mut connection = get_test_connection();
        let transaction = post_transaction(deposit(dec!(100)), &mut connection).unwrap();

        let result = revise_transaction(
            transaction.id,
            TransactionRevision {
                transaction_date: transaction.transaction_date,
                amount: dec!(-1),
                description: "Bad".to_owned(),
            },
            &mut connection,
        );

        assert_eq!(result, Err(Error::NonPositiveAmount(dec!(-1))));
        assert_balance(dec!(1600.50), &connection);
        assert_eq!(
            get_transaction(transaction.id, &connection).unwrap().amount,
            dec!(100)
        );
    }
}
