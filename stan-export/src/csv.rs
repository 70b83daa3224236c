use anyhow::Result;
use stan_core::{BookingItem, BookingType, Statement};
use std::io::Write;

use crate::{Exporter, decimal_comma, is_negative};

pub const DEFAULT_DELIMITER: u8 = b',';
const INFO_SEPARATOR: &str = " / ";

/// One line per booking in the column layout MoneyControl imports:
/// account, post date, value date, info, amount and entry type.
/// Fields holding the delimiter are quoted.
#[derive(Debug, Clone, Copy)]
pub struct CsvExporter {
    delimiter: u8,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl CsvExporter {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

/// Income, expense or transfer, as MoneyControl names them.
fn entry_type(item: &BookingItem) -> &'static str {
    let by_sign = if is_negative(item.amount) { "Ausgabe" } else { "Einnahme" };
    match item.booking_type() {
        BookingType::Atm | BookingType::Check | BookingType::Int | BookingType::Other => by_sign,
        BookingType::Cash | BookingType::Debit | BookingType::Payment | BookingType::RepeatPmt | BookingType::Unknown => {
            "Ausgabe"
        }
        BookingType::Credit | BookingType::Salary => "Einnahme",
        BookingType::Transfer => "Überweisung",
    }
}

impl Exporter for CsvExporter {
    fn name(&self) -> &'static str {
        "CSV"
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn write(&self, st: &Statement, out: &mut dyn Write) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(out);

        // Amounts follow the statement's locale.
        let german = st.locale.starts_with("de");

        for item in &st.bookings {
            let amount = if german {
                decimal_comma(item.amount)
            } else {
                format!("{:.2}", item.amount)
            };
            let info = item.info.join(INFO_SEPARATOR);
            let (post_date, value_date) = (item.post_date.to_string(), item.value_date.to_string());
            wtr.write_record([
                st.account_id.as_str(),
                post_date.as_str(),
                value_date.as_str(),
                info.as_str(),
                amount.as_str(),
                entry_type(item),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }
}
