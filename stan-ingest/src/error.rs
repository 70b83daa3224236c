//! Errors raised while turning extracted statement text into a `Statement`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

use crate::amount::AmountFormatError;
use crate::format::FormatError;

/// Fields that must be present on every parsed statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FromDate,
    ToDate,
    Iban,
    Bic,
    SumIn,
    SumOut,
    BalanceOld,
    BalanceNew,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::FromDate => "statement start date",
            Field::ToDate => "statement end date",
            Field::Iban => "IBAN",
            Field::Bic => "BIC",
            Field::SumIn => "incoming booking summary",
            Field::SumOut => "outgoing booking summary",
            Field::BalanceOld => "old balance",
            Field::BalanceNew => "new balance",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Incoming,
    Outgoing,
}

impl fmt::Display for SummaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SummaryKind::Incoming => "incoming",
            SummaryKind::Outgoing => "outgoing",
        })
    }
}

/// Line indices are zero-based positions in the extracted line sequence.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("inconsistent IBAN at line {line}: '{first}' vs. '{second}'")]
    InconsistentIban {
        first: String,
        second: String,
        line: usize,
    },

    #[error("inconsistent BIC at line {line}: '{first}' vs. '{second}'")]
    InconsistentBic {
        first: String,
        second: String,
        line: usize,
    },

    #[error("inconsistent {field} at line {line}: {first} vs. {second}")]
    InconsistentField {
        field: Field,
        first: String,
        second: String,
        line: usize,
    },

    #[error("multiple {field} lines found, second at line {line}")]
    DuplicateField { field: Field, line: usize },

    #[error("no {field} found (reached line {line})")]
    MissingField { field: Field, line: usize },

    #[error("bad amount at line {line}: {source}")]
    Amount {
        #[source]
        source: AmountFormatError,
        line: usize,
    },

    #[error("error parsing booking summary near line {line}: '{text}'")]
    Summary { text: String, line: usize },

    #[error("invalid date '{text}' at line {line}")]
    InvalidDate { text: String, line: usize },

    #[error("booking row at line {line} precedes the statement period")]
    BookingBeforePeriod { line: usize },

    #[error("statement period starts {from} after it ends {to}")]
    InvalidPeriod { from: NaiveDate, to: NaiveDate },

    #[error("sanity check on {kind} booking summary failed: declared {declared}, calculated {calculated}")]
    SummaryMismatch {
        kind: SummaryKind,
        declared: Decimal,
        calculated: Decimal,
    },

    #[error("sanity check on balances failed: {balance_old} + {sum_in} + {sum_out} != {balance_new}")]
    BalanceMismatch {
        balance_old: Decimal,
        sum_in: Decimal,
        sum_out: Decimal,
        balance_new: Decimal,
    },
}

impl ParseError {
    pub(crate) fn amount(source: AmountFormatError, line: usize) -> Self {
        ParseError::Amount { source, line }
    }
}
