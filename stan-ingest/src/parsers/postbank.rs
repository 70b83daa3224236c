//! Postbank account statement parser (text)
//!
//! Expected extracted text, format B (documents created from June 2017):
//!   Auszug Jahr Seite von IBAN Alter Kontostand
//!   3 2017 1 2 DE12 3456 7890 1234 5678 90 EUR + 1.234,56
//!   BIC (SWIFT): PBNKDEFFXXX
//!   Kontoauszug: Herr X vom 01.03.2017 bis 31.03.2017
//!   Buchung/Wert Vorgang/Buchungsinformation Soll Haben
//!   01.03. 02.03. Lastschrift - 50,00
//!   ...
//!   Zinssatz für geduldete Überziehung Anlage Neuer Kontostand
//!   13,49% EUR + 1.184,56

use stan_core::Statement;

use crate::document::ExtractedDocument;
use crate::error::ParseError;
use crate::format::{FORMAT_B, FormatProfile, detect_format};
use crate::reconcile::reconcile;
use crate::scanner::scan;

pub const LOCALE: &str = "de-DE";
pub const CURRENCY: &str = "EUR";

fn profile_for(doc: &ExtractedDocument) -> Result<&'static FormatProfile, ParseError> {
    match doc.creation_date.as_deref() {
        Some(timestamp) => Ok(detect_format(timestamp)?),
        None => {
            log::warn!("'{}' has no creation date, assuming the current layout", doc.source);
            Ok(&FORMAT_B)
        }
    }
}

/// Parse an extracted Postbank statement into a reconciled `Statement`.
pub fn parse_postbank_text(doc: &ExtractedDocument) -> Result<Statement, ParseError> {
    let profile = profile_for(doc)?;
    let draft = scan(&doc.lines, profile)?;
    let statement = reconcile(draft, &doc.source, LOCALE, CURRENCY)?;

    log::info!(
        "parsed '{}': {} bookings from {} to {}",
        statement.filename,
        statement.bookings.len(),
        statement.from_date,
        statement.to_date
    );
    Ok(statement)
}
