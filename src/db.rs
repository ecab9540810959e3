//! Database bootstrapping: schema creation and the demo data fixture.

use rusqlite::{Connection, Transaction as SqlTransaction, params};
use time::{Duration, OffsetDateTime};

use crate::{
    Error, account::create_account_table, person::create_person_table,
    transaction::create_transaction_table,
};

/// Create the application tables if they do not exist.
///
/// Runs in one exclusive transaction so a partially created schema is never
/// left behind.
///
/// # Errors
/// Returns an error if the tables cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_person_table(&transaction)?;
    create_account_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Populate an empty database with the demo fixture: five persons, five
/// accounts (account 4 closed), and five transactions.
///
/// Does nothing when any person already exists.
///
/// Note that the fixture is carried over from the system this app replaces,
/// including two withdrawal rows with negative amounts. The posting rule
/// rejects non-positive amounts, so rows like these can no longer be created
/// through the app; they are kept as-is to preserve the observed behavior of
/// the original fixture.
///
/// # Errors
/// Returns an error if any insert fails.
pub fn seed_demo_data(connection: &Connection) -> Result<(), Error> {
    let person_count: i64 =
        connection.query_row("SELECT COUNT(id) FROM person;", [], |row| row.get(0))?;

    if person_count > 0 {
        tracing::debug!("database already contains persons, skipping demo data");
        return Ok(());
    }

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Immediate)?;

    let persons = [
        ("John", "Doe", "8501015000089"),
        ("Jane", "Smith", "9002026000098"),
        ("Bob", "Johnson", "9503037000077"),
        ("Alice", "Brown", "8804048000066"),
        ("Charlie", "Wilson", "9205059000055"),
    ];

    for (first_name, surname, id_number) in persons {
        transaction.execute(
            "INSERT INTO person (first_name, surname, id_number) VALUES (?1, ?2, ?3);",
            params![first_name, surname, id_number],
        )?;
    }

    let accounts = [
        (1, "ACC10001", "1500.50", false),
        (2, "ACC10002", "2500.75", false),
        (3, "ACC10003", "500.25", false),
        (4, "ACC10004", "0.00", true),
        (5, "ACC10005", "3200.00", false),
    ];

    for (person_id, account_number, balance, is_closed) in accounts {
        transaction.execute(
            "INSERT INTO account (person_id, account_number, outstanding_balance, is_closed)
             VALUES (?1, ?2, ?3, ?4);",
            params![person_id, account_number, balance, is_closed],
        )?;
    }

    let now = OffsetDateTime::now_utc();
    let days_ago = |days: i64| now - Duration::days(days);
    let transactions = [
        (1, days_ago(10), "100.00", "Initial Deposit"),
        (1, days_ago(5), "-50.00", "ATM Withdrawal"),
        (2, days_ago(8), "200.00", "Transfer Received"),
        (3, days_ago(3), "150.00", "Salary Deposit"),
        (5, days_ago(1), "-100.00", "Online Payment"),
    ];

    for (account_id, moment, amount, description) in transactions {
        transaction.execute(
            "INSERT INTO \"transaction\"
                (account_id, transaction_date, capture_date, amount, description)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![account_id, moment.date(), moment, amount, description],
        )?;
    }

    transaction.commit()?;

    tracing::info!("seeded demo data");

    Ok(())
}
