//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of a person record.
pub type PersonId = DatabaseId;

/// The ID of an account record.
pub type AccountId = DatabaseId;

/// The ID of a transaction record.
pub type TransactionId = DatabaseId;
