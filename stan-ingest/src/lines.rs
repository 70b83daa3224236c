//! Classification of single statement text lines.

use regex::Regex;
use std::sync::LazyLock;

use crate::format::{BicSource, FormatProfile};

pub const PAGE_HEADER_OLD_BALANCE: &str = "Alter Kontostand";

pub const SUMMARY_IN: &str = "Kontonummer BLZ Summe Zahlungseingänge";
pub const SUMMARY_OUT: &str = "Dispositionskredit Zinssatz für Dispositionskredit Summe Zahlungsausgänge";
pub const SUMMARY_OUT_ALT: &str =
    "Eingeräumte Kontoüberziehung Zinssatz für eingeräumte Kontoüberziehung Summe Zahlungsausgänge";
pub const BALANCE_SINGULAR: &str = "Zinssatz für geduldete Überziehung Anlage Neuer Kontostand";
pub const BALANCE_PLURAL: &str = "Zinssatz für geduldete Überziehung Anlagen Neuer Kontostand";

static STATEMENT_DATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Kontoauszug: (.+) vom (\d\d\.\d\d\.\d\d\d\d) bis (\d\d\.\d\d\.\d\d\d\d)$")
        .expect("valid statement date regex")
});

static TABLE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Buchung[ /]Wert Vorgang/Buchungsinformation Soll Haben$").expect("valid table header regex")
});

static BOOKING_SIGNED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d\d)\.(\d\d)\.[ /](\d\d)\.(\d\d)\. (.+) ([+-] ?[\d.,]+)$").expect("valid booking regex")
});

static BOOKING_UNSIGNED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d\d)\.(\d\d)\.[ /](\d\d)\.(\d\d)\. (.+) ([\d.,]+)$").expect("valid booking regex")
});

/// Day and month of a row date; rows never carry a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMonth {
    pub day: u32,
    pub month: u32,
}

/// A booking table row as it appears in the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRow<'a> {
    pub post: DayMonth,
    pub value: DayMonth,
    pub description: &'a str,
    /// The raw amount token, signed or not depending on the line kind
    pub amount: &'a str,
}

impl BookingRow<'_> {
    /// Re-render the row with `sign` placed in front of the amount.
    pub fn with_sign(&self, sign: char) -> String {
        format!(
            "{:02}.{:02}. {:02}.{:02}. {} {} {}",
            self.post.day, self.post.month, self.value.day, self.value.month, self.description, sign, self.amount
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    StatementDates { from: &'a str, to: &'a str },
    PageHeader { has_old_balance: bool },
    BicHeaderLine { bic: &'a str },
    BookingTableHeader,
    BookingItemSigned(BookingRow<'a>),
    BookingItemUnsigned(BookingRow<'a>),
    SignMarker(char),
    SummaryInMarker,
    SummaryOutMarker { marker: &'static str },
    BalanceMarkerSingular,
    BalanceMarkerPlural,
    Unclassified(&'a str),
}

impl LineKind<'_> {
    /// Full text of the marker for the summary marker kinds
    pub fn marker_text(&self) -> Option<&'static str> {
        match self {
            LineKind::SummaryInMarker => Some(SUMMARY_IN),
            LineKind::SummaryOutMarker { marker } => Some(marker),
            LineKind::BalanceMarkerSingular => Some(BALANCE_SINGULAR),
            LineKind::BalanceMarkerPlural => Some(BALANCE_PLURAL),
            _ => None,
        }
    }
}

/// A line starts a marker if it is a non-empty prefix of the marker text.
fn starts_marker(marker: &str, line: &str) -> bool {
    !line.is_empty() && marker.starts_with(line)
}

fn day_month(day: &str, month: &str) -> DayMonth {
    // Both captures are exactly two ASCII digits.
    DayMonth {
        day: day.parse().unwrap_or_default(),
        month: month.parse().unwrap_or_default(),
    }
}

fn booking_row<'a>(re: &Regex, line: &'a str) -> Option<BookingRow<'a>> {
    let caps = re.captures(line)?;
    Some(BookingRow {
        post: day_month(caps.get(1)?.as_str(), caps.get(2)?.as_str()),
        value: day_month(caps.get(3)?.as_str(), caps.get(4)?.as_str()),
        description: caps.get(5)?.as_str(),
        amount: caps.get(6)?.as_str(),
    })
}

/// Classify `line` under the given layout. Never fails; anything not
/// recognized is `Unclassified`.
pub fn classify<'a>(line: &'a str, profile: &FormatProfile) -> LineKind<'a> {
    if let Some(caps) = STATEMENT_DATES.captures(line) {
        if let (Some(from), Some(to)) = (caps.get(2), caps.get(3)) {
            return LineKind::StatementDates {
                from: from.as_str(),
                to: to.as_str(),
            };
        }
    }

    if let BicSource::LabeledLine { label } = profile.bic_source {
        if let Some(rest) = line.strip_prefix(label) {
            return LineKind::BicHeaderLine { bic: rest.trim() };
        }
    }

    if line.starts_with(profile.page_header) {
        return LineKind::PageHeader {
            has_old_balance: line.ends_with(PAGE_HEADER_OLD_BALANCE),
        };
    }

    if starts_marker(SUMMARY_IN, line) {
        return LineKind::SummaryInMarker;
    }
    if starts_marker(SUMMARY_OUT, line) {
        return LineKind::SummaryOutMarker { marker: SUMMARY_OUT };
    }
    if starts_marker(SUMMARY_OUT_ALT, line) {
        return LineKind::SummaryOutMarker {
            marker: SUMMARY_OUT_ALT,
        };
    }
    if starts_marker(BALANCE_SINGULAR, line) {
        return LineKind::BalanceMarkerSingular;
    }
    if starts_marker(BALANCE_PLURAL, line) {
        return LineKind::BalanceMarkerPlural;
    }

    match line {
        "+" => return LineKind::SignMarker('+'),
        "-" => return LineKind::SignMarker('-'),
        _ => {}
    }

    if TABLE_HEADER.is_match(line) {
        return LineKind::BookingTableHeader;
    }

    if let Some(row) = booking_row(&BOOKING_SIGNED, line) {
        return LineKind::BookingItemSigned(row);
    }
    if let Some(row) = booking_row(&BOOKING_UNSIGNED, line) {
        return LineKind::BookingItemUnsigned(row);
    }

    LineKind::Unclassified(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{FORMAT_A, FORMAT_B};

    #[test]
    fn test_statement_dates() {
        assert_eq!(
            classify("Kontoauszug: Herr X vom 01.03.2017 bis 31.03.2017", &FORMAT_B),
            LineKind::StatementDates {
                from: "01.03.2017",
                to: "31.03.2017"
            }
        );
    }

    #[test]
    fn test_page_headers_depend_on_format() {
        let a = "Auszug Seite IBAN BIC (SWIFT) Alter Kontostand";
        let b = "Auszug Jahr Seite von IBAN";
        assert_eq!(classify(a, &FORMAT_A), LineKind::PageHeader { has_old_balance: true });
        assert_eq!(classify(b, &FORMAT_B), LineKind::PageHeader { has_old_balance: false });
        assert!(matches!(classify(a, &FORMAT_B), LineKind::Unclassified(_)));
        assert!(matches!(classify(b, &FORMAT_A), LineKind::Unclassified(_)));
    }

    #[test]
    fn test_bic_line_only_in_format_b() {
        let line = "BIC (SWIFT): PBNKDEFFXXX ";
        assert_eq!(classify(line, &FORMAT_B), LineKind::BicHeaderLine { bic: "PBNKDEFFXXX" });
        assert!(matches!(classify(line, &FORMAT_A), LineKind::Unclassified(_)));
    }

    #[test]
    fn test_table_header_variants() {
        for line in [
            "Buchung/Wert Vorgang/Buchungsinformation Soll Haben",
            "Buchung Wert Vorgang/Buchungsinformation Soll Haben",
        ] {
            assert_eq!(classify(line, &FORMAT_A), LineKind::BookingTableHeader);
        }
        assert!(matches!(
            classify("Buchung/Wert Vorgang/Buchungsinformation Soll Haben EUR", &FORMAT_A),
            LineKind::Unclassified(_)
        ));
    }

    #[test]
    fn test_signed_booking_row() {
        let kind = classify("01.03. 02.03. Supermarket - 50,00", &FORMAT_B);
        assert_eq!(
            kind,
            LineKind::BookingItemSigned(BookingRow {
                post: DayMonth { day: 1, month: 3 },
                value: DayMonth { day: 2, month: 3 },
                description: "Supermarket",
                amount: "- 50,00",
            })
        );

        let LineKind::BookingItemSigned(row) = classify("28.12./02.01. Gutschrift +1.000,00", &FORMAT_A) else {
            panic!("expected signed row");
        };
        assert_eq!(row.amount, "+1.000,00");
        assert_eq!(row.value, DayMonth { day: 2, month: 1 });
    }

    #[test]
    fn test_unsigned_booking_row_and_splice() {
        let line = "01.03. 02.03. Lastschrift Stadtwerke 42,10";
        let LineKind::BookingItemUnsigned(row) = classify(line, &FORMAT_B) else {
            panic!("expected unsigned row");
        };
        let spliced = row.with_sign('-');
        assert_eq!(spliced, "01.03. 02.03. Lastschrift Stadtwerke - 42,10");
        assert!(matches!(
            classify(&spliced, &FORMAT_B),
            LineKind::BookingItemSigned(BookingRow { amount: "- 42,10", .. })
        ));
    }

    #[test]
    fn test_summary_markers_match_prefixes() {
        assert_eq!(classify(SUMMARY_IN, &FORMAT_B), LineKind::SummaryInMarker);
        assert_eq!(classify("Kontonummer BLZ", &FORMAT_B), LineKind::SummaryInMarker);
        assert_eq!(
            classify("Eingeräumte Kontoüberziehung", &FORMAT_B),
            LineKind::SummaryOutMarker {
                marker: SUMMARY_OUT_ALT
            }
        );
        assert_eq!(classify(BALANCE_SINGULAR, &FORMAT_B), LineKind::BalanceMarkerSingular);
        assert_eq!(classify(BALANCE_PLURAL, &FORMAT_B), LineKind::BalanceMarkerPlural);
        // Common prefix of both balance wordings resolves to the singular one.
        assert_eq!(
            classify("Zinssatz für geduldete Überziehung", &FORMAT_B),
            LineKind::BalanceMarkerSingular
        );
    }

    #[test]
    fn test_sign_markers_and_fallback() {
        assert_eq!(classify("+", &FORMAT_A), LineKind::SignMarker('+'));
        assert_eq!(classify("-", &FORMAT_A), LineKind::SignMarker('-'));
        assert_eq!(classify("", &FORMAT_A), LineKind::Unclassified(""));
        assert_eq!(classify("Referenz 123", &FORMAT_A), LineKind::Unclassified("Referenz 123"));
    }
}
