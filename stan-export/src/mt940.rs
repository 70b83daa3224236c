//! SWIFT MT940 customer statement, as read by most accounting tools.
//!
//! Dates are `yyMMdd`, amounts are unsigned with a decimal comma and carry
//! a separate `D`/`C` mark. The statement date is the first day of the
//! period.

use anyhow::Result;
use stan_core::{BookingItem, Statement};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::io::Write;

use crate::{Exporter, decimal_comma, is_negative};

const DATE_FORMAT: &str = "%y%m%d";

const REFERENCE_DIGITS: usize = 10;
const TRANSACTION_DIGITS: usize = 16;

const TRANSACTION_TYPE: &str = "N";
const IDENTIFICATION_CODE: &str = "TRF";
const NARRATIVE_SEPARATOR: &str = " / ";

#[derive(Debug, Clone, Copy, Default)]
pub struct Mt940Exporter;

fn mark<T: PartialOrd + Default>(amount: T) -> char {
    if is_negative(amount) { 'D' } else { 'C' }
}

/// The last `digits` decimal digits of a stable hash of `value`, zero padded.
fn number(value: impl Hash, digits: usize) -> String {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    let text = format!("{:0digits$}", hasher.finish());
    text[text.len() - digits..].to_string()
}

fn transaction_number(item: &BookingItem) -> String {
    number(
        (item.post_date, item.value_date, item.amount, &item.info),
        TRANSACTION_DIGITS,
    )
}

impl Exporter for Mt940Exporter {
    fn name(&self) -> &'static str {
        "MT940"
    }

    fn extension(&self) -> &'static str {
        "sta"
    }

    fn write(&self, st: &Statement, out: &mut dyn Write) -> Result<()> {
        let statement_date = st.from_date.format(DATE_FORMAT).to_string();
        let currency = &st.currency;
        let reference = number(
            (&st.account_id, st.from_date, st.to_date, st.balance_old, st.balance_new),
            REFERENCE_DIGITS,
        );

        writeln!(out, ":20:{statement_date}{reference}")?;
        writeln!(out, ":25:{}/{}", st.bank_id, st.account_id)?;
        writeln!(out, ":28C:1/1")?;
        writeln!(
            out,
            ":60F:{}{statement_date}{currency}{}",
            mark(st.balance_old),
            decimal_comma(st.balance_old.abs())
        )?;

        for item in &st.bookings {
            writeln!(
                out,
                ":61:{}{}{}{TRANSACTION_TYPE}{IDENTIFICATION_CODE}{}",
                item.value_date.format(DATE_FORMAT),
                mark(item.amount),
                decimal_comma(item.amount.abs()),
                transaction_number(item)
            )?;
            writeln!(out, ":86:{}", item.info.join(NARRATIVE_SEPARATOR))?;
        }

        writeln!(
            out,
            ":62:{}{statement_date}{currency}{}",
            mark(st.balance_new),
            decimal_comma(st.balance_new.abs())
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::march_statement;
    use rust_decimal::Decimal;

    fn export(st: &Statement) -> Vec<String> {
        let mut buf = Vec::new();
        Mt940Exporter.write(st, &mut buf).unwrap();
        String::from_utf8(buf).unwrap().lines().map(str::to_string).collect()
    }

    #[test]
    fn test_statement_records() {
        let lines = export(&march_statement());

        assert_eq!(lines.len(), 9);
        assert!(lines[0].starts_with(":20:170301"));
        assert_eq!(lines[0].len(), ":20:170301".len() + REFERENCE_DIGITS);
        assert_eq!(lines[1], ":25:PBNKDEFFXXX/DE12345678901234567890");
        assert_eq!(lines[2], ":28C:1/1");
        assert_eq!(lines[3], ":60F:C170301EUR1000,00");
        assert!(lines[4].starts_with(":61:170302C2145,67NTRF"));
        assert_eq!(lines[5], ":86:Gehalt/Rente");
        assert!(lines[6].starts_with(":61:170301D800,00NTRF"));
        assert_eq!(lines[7], ":86:Dauerauftrag / Miete März");
        assert_eq!(lines[8], ":62:C170301EUR2345,67");
    }

    #[test]
    fn test_transaction_numbers_have_fixed_width() {
        let lines = export(&march_statement());
        for line in [&lines[4], &lines[6]] {
            let (_, number) = line.split_once("NTRF").unwrap();
            assert_eq!(number.len(), TRANSACTION_DIGITS);
            assert!(number.bytes().all(|b| b.is_ascii_digit()));
        }
        assert_ne!(lines[4].split_once("NTRF"), lines[6].split_once("NTRF"));
    }

    #[test]
    fn test_output_is_stable() {
        assert_eq!(export(&march_statement()), export(&march_statement()));
    }

    #[test]
    fn test_negative_balances_are_debit() {
        let mut st = march_statement();
        st.balance_old = Decimal::new(-5050, 2);
        st.balance_new = Decimal::new(-1, 2);
        let lines = export(&st);
        assert_eq!(lines[3], ":60F:D170301EUR50,50");
        assert_eq!(lines[8], ":62:D170301EUR0,01");
    }
}
