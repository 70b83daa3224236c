//! Booking types, loosely based on OFX transaction types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingType {
    /// The mapping did not see any info line at all
    Unknown,
    Atm,
    Cash,
    Check,
    Credit,
    Debit,
    /// Interest earned or paid
    Int,
    Payment,
    /// Standing order
    RepeatPmt,
    Salary,
    Transfer,
    /// Info line present but not covered by the mapping
    Other,
}

impl BookingType {
    pub const ALL: [BookingType; 12] = [
        BookingType::Unknown,
        BookingType::Atm,
        BookingType::Cash,
        BookingType::Check,
        BookingType::Credit,
        BookingType::Debit,
        BookingType::Int,
        BookingType::Payment,
        BookingType::RepeatPmt,
        BookingType::Salary,
        BookingType::Transfer,
        BookingType::Other,
    ];

    /// Map the first info line of a booking item to its type.
    pub fn from_info(info_line: &str) -> Self {
        match info_line.trim() {
            "Auszahlung Geldautomat" | "Bargeldausz. Geldautomat" | "Kartenverfüg" => BookingType::Atm,

            "Auszahlung" | "Bargeldauszahlung" => BookingType::Cash,

            "Scheckeinreichung" | "Scheckeinr" | "Inh. Scheck" => BookingType::Check,

            "Gutschrift" | "Gutschr.SEPA" | "Gutschr. SEPA" | "Storno: SDD Lastschr"
            | "paydirekt Rückzahlung" | "Einzahlung" | "Retoure" => BookingType::Credit,

            "Kartenlastschrift" | "Lastschrift" | "SDD Lastschr" | "paydirekt Zahlung" => {
                BookingType::Debit
            }

            "Zinsen/Entg." => BookingType::Int,

            "Überweisung giropay" | "Kartenzahlung" | "Geldkarte" | "Gutscheinkauf" => {
                BookingType::Payment
            }

            "Gehalt/Rente" => BookingType::Salary,

            "SEPA Überw. Einzel" | "SEPA Überw. BZÜ" | "Umbuchung" => BookingType::Transfer,

            other => match other.split(' ').next() {
                Some("Gut") => BookingType::Credit,
                Some("Dauerauftrag") => BookingType::RepeatPmt,
                _ => BookingType::Other,
            },
        }
    }

    /// OFX `TRNTYPE` value for this type
    pub fn ofx_name(&self) -> &'static str {
        match self {
            BookingType::Atm => "ATM",
            BookingType::Cash => "CASH",
            BookingType::Check => "CHECK",
            BookingType::Credit | BookingType::Salary => "CREDIT",
            BookingType::Debit => "DEBIT",
            BookingType::Int => "INT",
            BookingType::Payment => "PAYMENT",
            BookingType::RepeatPmt => "REPEATPMT",
            BookingType::Transfer => "XFER",
            BookingType::Unknown | BookingType::Other => "OTHER",
        }
    }
}

impl fmt::Display for BookingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingType::Unknown => "UNKNOWN",
            BookingType::Atm => "ATM",
            BookingType::Cash => "CASH",
            BookingType::Check => "CHECK",
            BookingType::Credit => "CREDIT",
            BookingType::Debit => "DEBIT",
            BookingType::Int => "INT",
            BookingType::Payment => "PAYMENT",
            BookingType::RepeatPmt => "REPEATPMT",
            BookingType::Salary => "SALARY",
            BookingType::Transfer => "TRANSFER",
            BookingType::Other => "OTHER",
        };
        f.write_str(s)
    }
}

impl FromStr for BookingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingType::ALL
            .into_iter()
            .find(|t| t.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown booking type '{s}'"))
    }
}
