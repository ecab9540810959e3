//! Helpers for moving exact decimal currency amounts in and out of SQLite
//! and formatting them for display.
//!
//! Amounts are stored as TEXT so that no precision is lost to floating point
//! representation. Queries that order by an amount column must cast it, e.g.
//! `ORDER BY CAST(amount AS REAL)`.

use std::str::FromStr;

use rusqlite::{
    Row,
    types::{FromSqlError, Type},
};
use rust_decimal::Decimal;

/// Read a [Decimal] from the TEXT column at `index` of a query `row`.
pub fn decimal_from_row(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let text: String = row.get(index)?;

    Decimal::from_str(&text).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            Type::Text,
            Box::new(FromSqlError::Other(error.to_string().into())),
        )
    })
}

/// Convert a [Decimal] to the TEXT representation stored in the database.
///
/// The amount is rescaled to two decimal places so that equal amounts always
/// compare equal as text.
pub fn decimal_to_sql(amount: Decimal) -> String {
    let mut amount = amount;
    if amount.scale() < 2 {
        amount.rescale(2);
    }

    amount.to_string()
}

/// Format a currency amount for display, e.g. `-$1,234.50`.
pub fn format_currency(amount: Decimal) -> String {
    let mut amount = amount;
    amount.rescale(2);

    let text = amount.abs().to_string();
    let (whole, cents) = text
        .split_once('.')
        .unwrap_or((text.as_str(), "00"));

    let mut grouped = String::new();
    let digits = whole.as_bytes();
    for (index, digit) in digits.iter().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit as char);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{sign}${grouped}.{cents}")
}


#[cfg(test)]
mod decimal_to_sql_tests {
    use rust_decimal_macros::dec;

    use super::decimal_to_sql;

    #[test]
    fn pads_to_two_decimal_places() {
        assert_eq!(decimal_to_sql(dec!(100)), "100.00");
        assert_eq!(decimal_to_sql(dec!(1500.5)), "1500.50");
    }

    #[test]
    fn keeps_extra_precision() {
        assert_eq!(decimal_to_sql(dec!(0.125)), "0.125");
    }
}
