//! Defines the person model and its database queries.

use rusqlite::{Connection, Row, params};

use crate::{Error, database_id::PersonId};

/// A person who can own accounts.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    /// The ID of the person.
    pub id: PersonId,
    /// The person's first name, if recorded.
    pub first_name: Option<String>,
    /// The person's surname.
    pub surname: String,
    /// The person's national ID number, exactly 13 digits, unique across all
    /// persons.
    pub id_number: String,
}

/// The maximum length of the name fields.
pub const NAME_MAX_LENGTH: usize = 50;

/// The validated input for creating or updating a person.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonFields {
    /// The person's first name. Empty input becomes `None`.
    pub first_name: Option<String>,
    /// The person's surname.
    pub surname: String,
    /// The person's 13-digit ID number.
    pub id_number: String,
}

impl PersonFields {
    /// Validate raw form input.
    ///
    /// # Errors
    /// Returns [Error::InvalidField] when the surname is empty or a name
    /// exceeds its length limit, and [Error::InvalidIdNumber] when the ID
    /// number is not exactly 13 ASCII digits.
    pub fn new(first_name: &str, surname: &str, id_number: &str) -> Result<Self, Error> {
        let first_name = first_name.trim();
        let surname = surname.trim();
        let id_number = id_number.trim();

        if first_name.len() > NAME_MAX_LENGTH {
            return Err(Error::InvalidField("first name"));
        }

        if surname.is_empty() || surname.len() > NAME_MAX_LENGTH {
            return Err(Error::InvalidField("surname"));
        }

        if id_number.len() != 13 || !id_number.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(Error::InvalidIdNumber);
        }

        Ok(Self {
            first_name: (!first_name.is_empty()).then(|| first_name.to_owned()),
            surname: surname.to_owned(),
            id_number: id_number.to_owned(),
        })
    }
}

/// Create the person table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_person_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS person (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT,
            surname TEXT NOT NULL,
            id_number TEXT NOT NULL UNIQUE
        )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Person].
pub fn map_row_to_person(row: &Row) -> Result<Person, rusqlite::Error> {
    Ok(Person {
        id: row.get(0)?,
        first_name: row.get(1)?,
        surname: row.get(2)?,
        id_number: row.get(3)?,
    })
}

/// Create a new person in the database.
///
/// # Errors
/// Returns [Error::DuplicateIdNumber] if another person already has the ID
/// number, or [Error::SqlError] if there is some other SQL error.
pub fn create_person(fields: &PersonFields, connection: &Connection) -> Result<Person, Error> {
    connection
        .prepare(
            "INSERT INTO person (first_name, surname, id_number)
             VALUES (?1, ?2, ?3)
             RETURNING id, first_name, surname, id_number",
        )?
        .query_row(
            params![fields.first_name, fields.surname, fields.id_number],
            map_row_to_person,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateIdNumber(fields.id_number.clone()),
            error => error.into(),
        })
}

/// Retrieve a person from the database by their `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a valid person, or
/// [Error::SqlError] if there is some other SQL error.
pub fn get_person(id: PersonId, connection: &Connection) -> Result<Person, Error> {
    connection
        .query_one(
            "SELECT id, first_name, surname, id_number FROM person WHERE id = ?1",
            params![id],
            map_row_to_person,
        )
        .map_err(Error::from)
}

/// The number of rows affected by a write.
pub type RowsAffected = usize;

/// Overwrite the person `id` with `fields`.
///
/// # Errors
/// Returns [Error::DuplicateIdNumber] if the new ID number belongs to another
/// person, or [Error::SqlError] if there is some other SQL error. Returns
/// `Ok(0)` when no person with `id` exists.
pub fn update_person(
    id: PersonId,
    fields: &PersonFields,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE person SET first_name = ?1, surname = ?2, id_number = ?3 WHERE id = ?4",
            params![fields.first_name, fields.surname, fields.id_number, id],
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateIdNumber(fields.id_number.clone()),
            error => error.into(),
        })
}

/// Delete the person `id`.
///
/// The referential-integrity policy is checked explicitly before the delete:
/// a person that still owns accounts is not deleted.
///
/// # Errors
/// Returns [Error::PersonHasAccounts] if accounts still reference the person,
/// or [Error::SqlError] if there is some other SQL error. Returns `Ok(0)`
/// when no person with `id` exists.
pub fn delete_person(id: PersonId, connection: &Connection) -> Result<RowsAffected, Error> {
    let account_count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM account WHERE person_id = ?1",
        params![id],
        |row| row.get(0),
    )?;

    if account_count > 0 {
        return Err(Error::PersonHasAccounts);
    }

    connection
        .execute("DELETE FROM person WHERE id = ?1", params![id])
        .map_err(Error::from)
}


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;

    use crate::{Error, db::initialize};

    use super::{PersonFields, create_person, delete_person, get_person, update_person};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn test_fields(id_number: &str) -> PersonFields {
        PersonFields::new("John", "Doe", id_number).unwrap()
    }

    #[test]
    fn create_assigns_id() {
        let connection = get_test_connection();

        let person = create_person(&test_fields("8501015000089"), &connection).unwrap();

        assert_eq!(person.id, 1);
        assert_eq!(person.surname, "Doe");
    }

    #[test]
    fn create_fails_on_duplicate_id_number() {
        let connection = get_test_connection();
        create_person(&test_fields("8501015000089"), &connection).unwrap();

        let result = create_person(&test_fields("8501015000089"), &connection);

        assert_eq!(
            result,
            Err(Error::DuplicateIdNumber("8501015000089".to_owned()))
        );
    }

    #[test]
    fn update_overwrites_fields() {
        let connection = get_test_connection();
        let person = create_person(&test_fields("8501015000089"), &connection).unwrap();
        let new_fields = PersonFields::new("Jane", "Smith", "9002026000098").unwrap();

        let rows_affected = update_person(person.id, &new_fields, &connection).unwrap();

        assert_eq!(rows_affected, 1);
        let updated = get_person(person.id, &connection).unwrap();
        assert_eq!(updated.first_name.as_deref(), Some("Jane"));
        assert_eq!(updated.surname, "Smith");
        assert_eq!(updated.id_number, "9002026000098");
    }

    #[test]
    fn update_missing_person_affects_no_rows() {
        let connection = get_test_connection();

        let rows_affected =
            update_person(999, &test_fields("8501015000089"), &connection).unwrap();

        assert_eq!(rows_affected, 0);
    }

    #[test]
    fn delete_removes_person() {
        let connection = get_test_connection();
        let person = create_person(&test_fields("8501015000089"), &connection).unwrap();

        let rows_affected = delete_person(person.id, &connection).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(get_person(person.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_fails_while_accounts_exist() {
        let connection = get_test_connection();
        let person = create_person(&test_fields("8501015000089"), &connection).unwrap();
        connection
            .execute(
                "INSERT INTO account (person_id, account_number, outstanding_balance, is_closed)
                 VALUES (?1, 'ACC10001', '0.00', 0)",
                [person.id],
            )
            .unwrap();

        let result = delete_person(person.id, &connection);

        assert_eq!(result, Err(Error::PersonHasAccounts));
        assert!(get_person(person.id, &connection).is_ok());
    }
}
