use anyhow::Result;
use stan_core::{CategoryMatcher, Statement};
use std::io::Write;

use crate::Exporter;

const ACCOUNT_TYPE: &str = "Bank";
const DATE_FORMAT: &str = "%m/%d'%y";

/// Quicken Interchange Format, one record per booking keyed by value date.
/// Lines always end in `\n`.
#[derive(Debug, Clone, Default)]
pub struct QifExporter {
    categories: CategoryMatcher,
}

impl QifExporter {
    pub fn new(categories: CategoryMatcher) -> Self {
        Self { categories }
    }
}

impl Exporter for QifExporter {
    fn name(&self) -> &'static str {
        "QIF"
    }

    fn extension(&self) -> &'static str {
        "qif"
    }

    fn write(&self, st: &Statement, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "!Account")?;
        writeln!(out, "N{} {}", st.account_id, st.bank_id)?;
        writeln!(out, "T{ACCOUNT_TYPE}")?;
        writeln!(out, "^")?;
        writeln!(out, "!Type:{ACCOUNT_TYPE}")?;

        for item in &st.bookings {
            writeln!(out, "D{}", item.value_date.format(DATE_FORMAT))?;
            writeln!(out, "T{:.2}", item.amount)?;
            writeln!(out, "M{}", item.joined_info())?;
            if let Some(category) = self.categories.find(item) {
                writeln!(out, "L{category}")?;
            }
            writeln!(out, "^")?;
        }

        Ok(())
    }
}
