//! Consistency checks across a series of statements of the same account.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::statement::Statement;

#[derive(Debug, Error, PartialEq)]
pub enum SequenceError {
    #[error("no statements to validate")]
    Empty,

    #[error("statements '{previous}' (ending {previous_to}) and '{next}' (starting {next_from}) are not consecutive")]
    NotConsecutive {
        previous: String,
        previous_to: NaiveDate,
        next: String,
        next_from: NaiveDate,
    },

    #[error("balances of statements '{previous}' ({balance_new}) and '{next}' ({balance_old}) are not consistent")]
    BalanceMismatch {
        previous: String,
        balance_new: Decimal,
        next: String,
        balance_old: Decimal,
    },
}

/// Sort `statements` by start date and check that they form a gap-free chain:
/// every statement starts the day after its predecessor ends, and its old
/// balance equals the predecessor's new balance.
pub fn validate_sequence(statements: &mut [Statement]) -> Result<(), SequenceError> {
    if statements.is_empty() {
        return Err(SequenceError::Empty);
    }

    statements.sort_by_key(|st| st.from_date);

    for pair in statements.windows(2) {
        let (curr, next) = (&pair[0], &pair[1]);

        if curr.to_date.checked_add_days(Days::new(1)) != Some(next.from_date) {
            return Err(SequenceError::NotConsecutive {
                previous: curr.filename.clone(),
                previous_to: curr.to_date,
                next: next.filename.clone(),
                next_from: next.from_date,
            });
        }

        if curr.balance_new != next.balance_old {
            return Err(SequenceError::BalanceMismatch {
                previous: curr.filename.clone(),
                balance_new: curr.balance_new,
                next: next.filename.clone(),
                balance_old: next.balance_old,
            });
        }

        log::debug!("'{}' -> '{}' is consistent", curr.filename, next.filename);
    }

    Ok(())
}
