//! OFX v1 (SGML dialect) export.
//!
//! Aggregates open with `<TAG>` and close with `</TAG>`; data elements are
//! written as `<TAG>value` without a closing tag. Each nesting level is
//! indented by four spaces.

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime};
use stan_core::{BookingItem, Statement};
use std::fmt::Display;
use std::io::Write;

use crate::Exporter;

const HEADER: [&str; 9] = [
    "OFXHEADER:100",
    "DATA:OFXSGML",
    "VERSION:160",
    "SECURITY:NONE",
    "ENCODING:UTF-8",
    "CHARSET:NONE",
    "COMPRESSION:NONE",
    "OLDFILEUID:NONE",
    "NEWFILEUID:NONE",
];

const INDENT: usize = 4;
const DATE_FORMAT: &str = "%Y%m%d";
const DATETIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// ISO 639-2 code of the locale's language, as OFX `LANGUAGE` expects it
fn language_code(locale: &str) -> String {
    let language = locale.split(['-', '_']).next().unwrap_or_default();
    match language.to_ascii_lowercase().as_str() {
        "de" => "DEU".to_string(),
        "en" => "ENG".to_string(),
        "fr" => "FRA".to_string(),
        "it" => "ITA".to_string(),
        "es" => "SPA".to_string(),
        "nl" => "NLD".to_string(),
        other => other.to_ascii_uppercase(),
    }
}

fn ofx_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

struct SgmlWriter<'w> {
    out: &'w mut dyn Write,
    depth: usize,
}

impl<'w> SgmlWriter<'w> {
    fn new(out: &'w mut dyn Write) -> Self {
        Self { out, depth: 0 }
    }

    fn begin(&mut self, tag: &str) -> Result<()> {
        writeln!(self.out, "{:width$}<{tag}>", "", width = self.depth * INDENT)?;
        self.depth += 1;
        Ok(())
    }

    fn end(&mut self, tag: &str) -> Result<()> {
        self.depth = self.depth.saturating_sub(1);
        writeln!(self.out, "{:width$}</{tag}>", "", width = self.depth * INDENT)?;
        Ok(())
    }

    fn data(&mut self, tag: &str, value: impl Display) -> Result<()> {
        writeln!(self.out, "{:width$}<{tag}>{value}", "", width = self.depth * INDENT)?;
        Ok(())
    }

    fn status(&mut self, code: u32, severity: &str) -> Result<()> {
        self.begin("STATUS")?;
        self.data("CODE", code)?;
        self.data("SEVERITY", severity)?;
        self.end("STATUS")
    }

    fn transaction(&mut self, item: &BookingItem) -> Result<()> {
        self.begin("STMTTRN")?;
        self.data("TRNTYPE", item.booking_type().ofx_name())?;
        self.data("DTPOSTED", ofx_date(item.post_date))?;
        self.data("TRNAMT", format!("{:.2}", item.amount))?;
        if let Some(name) = item.info.first() {
            self.data("NAME", name)?;
        }
        self.data("MEMO", item.joined_info())?;
        self.end("STMTTRN")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OfxExporter {
    /// Fixed `DTSERVER` value; the local time of writing when unset
    server_time: Option<NaiveDateTime>,
}

impl OfxExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server_time(server_time: NaiveDateTime) -> Self {
        Self {
            server_time: Some(server_time),
        }
    }
}

impl Exporter for OfxExporter {
    fn name(&self) -> &'static str {
        "OFX"
    }

    fn extension(&self) -> &'static str {
        "ofx"
    }

    fn write(&self, st: &Statement, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{}\n", HEADER.join("\n"))?;

        let server_time = self.server_time.unwrap_or_else(|| Local::now().naive_local());
        let mut w = SgmlWriter::new(out);

        w.begin("OFX")?;

        w.begin("SIGNONMSGSRSV1")?;
        w.begin("SONRS")?;
        w.status(0, "INFO")?;
        w.data("DTSERVER", server_time.format(DATETIME_FORMAT))?;
        w.data("LANGUAGE", language_code(&st.locale))?;
        w.end("SONRS")?;
        w.end("SIGNONMSGSRSV1")?;

        w.begin("BANKMSGSRSV1")?;
        w.begin("STMTTRNRS")?;
        w.data("TRNUID", 0)?;
        w.status(0, "INFO")?;

        w.begin("STMTRS")?;
        w.data("CURDEF", &st.currency)?;

        w.begin("BANKACCTFROM")?;
        w.data("BANKID", &st.bank_id)?;
        w.data("ACCTID", &st.account_id)?;
        w.data("ACCTTYPE", "CHECKING")?;
        w.end("BANKACCTFROM")?;

        w.begin("BANKTRANLIST")?;
        w.data("DTSTART", ofx_date(st.from_date))?;
        w.data("DTEND", ofx_date(st.to_date))?;
        for item in &st.bookings {
            w.transaction(item)?;
        }
        w.end("BANKTRANLIST")?;

        w.begin("LEDGERBAL")?;
        w.data("BALAMT", format!("{:.2}", st.balance_new))?;
        w.data("DTASOF", ofx_date(st.to_date))?;
        w.end("LEDGERBAL")?;

        w.end("STMTRS")?;
        w.end("STMTTRNRS")?;
        w.end("BANKMSGSRSV1")?;

        w.end("OFX")
    }
}
