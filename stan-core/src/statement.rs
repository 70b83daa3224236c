//! Statement and booking item types produced by the parsers

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::booking_type::BookingType;

/// Tolerance used when comparing declared and calculated amounts (0.01).
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Returns true if `a` and `b` differ by less than [`TOLERANCE`].
pub fn within_tolerance(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < TOLERANCE
}

/// A single booking (transaction) row of a statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingItem {
    pub post_date: NaiveDate,
    pub value_date: NaiveDate,
    /// The matched description followed by any continuation lines, in document order
    pub info: Vec<String>,
    /// Positive = credit/incoming, negative = debit/outgoing
    pub amount: Decimal,
}

impl BookingItem {
    pub fn new(
        post_date: NaiveDate,
        value_date: NaiveDate,
        info_line: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            post_date,
            value_date,
            info: vec![info_line.into()],
            amount,
        }
    }

    /// Booking type derived from the first info line
    pub fn booking_type(&self) -> BookingType {
        self.info
            .first()
            .map(|line| BookingType::from_info(line))
            .unwrap_or(BookingType::Unknown)
    }

    /// All info lines joined by a single space
    pub fn joined_info(&self) -> String {
        self.info.join(" ")
    }

    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// One fully parsed and reconciled account statement.
///
/// Parsers construct this only after every required field was found and
/// the reconciliation checks passed; consumers treat it as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    /// Source identifier, usually the statement's file name
    pub filename: String,
    /// BCP 47 locale tag of the statement's number and date formats
    pub locale: String,
    /// ISO 4217 currency code
    pub currency: String,
    /// BIC of the bank
    pub bank_id: String,
    /// IBAN of the account
    pub account_id: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub balance_old: Decimal,
    pub balance_new: Decimal,
    /// Declared sum of incoming bookings (>= 0)
    pub sum_in: Decimal,
    /// Declared sum of outgoing bookings (<= 0)
    pub sum_out: Decimal,
    pub bookings: Vec<BookingItem>,
}

impl Statement {
    /// Sum of all positive booking amounts
    pub fn calculated_in(&self) -> Decimal {
        self.bookings
            .iter()
            .filter(|b| b.amount > Decimal::ZERO)
            .map(|b| b.amount)
            .sum()
    }

    /// Sum of all non-positive booking amounts
    pub fn calculated_out(&self) -> Decimal {
        self.bookings
            .iter()
            .filter(|b| b.amount <= Decimal::ZERO)
            .map(|b| b.amount)
            .sum()
    }
}
