//! Single forward pass over the extracted lines of a statement.
//!
//! Each line is classified and handed to the matching `ScanState` update.
//! Multi-line constructs (page header field rows, wrapped summary labels)
//! pull further lines from the shared cursor.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use stan_core::BookingItem;
use std::sync::LazyLock;

use crate::amount::decode_amount;
use crate::cell::{Conflict, SetOnce};
use crate::error::{Field, ParseError};
use crate::format::{BicSource, FormatProfile};
use crate::lines::{BookingRow, DayMonth, LineKind, classify};

static SUMMARY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*) ?(EUR) ([+-] [\d.,]+)$").expect("valid summary regex"));

const STATEMENT_DATE_FORMAT: &str = "%d.%m.%Y";
const IBAN_GROUPS: usize = 6;
/// Page header field rows shorter than this carry no account identifiers.
const MIN_HEADER_FIELDS: usize = 9;

/// Forward-only position in the line sequence
#[derive(Debug)]
pub(crate) struct Cursor<'a> {
    lines: &'a [String],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(lines: &'a [String]) -> Self {
        Self { lines, pos: 0 }
    }

    pub(crate) fn next_line(&mut self) -> Option<&'a str> {
        let line = self.lines.get(self.pos)?;
        self.pos += 1;
        Some(line.as_str())
    }

    /// Index of the line the next call to `next_line` returns
    pub(crate) fn position(&self) -> usize {
        self.pos
    }
}

/// Everything a successful scan found, before reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub iban: String,
    pub bic: String,
    pub sum_in: Decimal,
    pub sum_out: Decimal,
    pub balance_old: Decimal,
    pub balance_new: Decimal,
    pub bookings: Vec<BookingItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Continue,
    /// The new balance was read; nothing after it is of interest.
    Stop,
}

#[derive(Debug)]
pub(crate) struct ScanState {
    profile: &'static FormatProfile,
    found_table_start: bool,
    pending_sign: Option<char>,
    post_year: Option<i32>,
    value_year: Option<i32>,
    from_date: SetOnce<NaiveDate>,
    to_date: SetOnce<NaiveDate>,
    iban: SetOnce<String>,
    bic: SetOnce<String>,
    sum_in: SetOnce<Decimal>,
    sum_out: SetOnce<Decimal>,
    balance_old: SetOnce<Decimal>,
    balance_new: SetOnce<Decimal>,
    bookings: Vec<BookingItem>,
}

fn inconsistent(field: Field, line: usize) -> impl FnOnce(Conflict<Decimal>) -> ParseError {
    move |c| ParseError::InconsistentField {
        field,
        first: c.first.to_string(),
        second: c.second.to_string(),
        line,
    }
}

fn row_date(year: i32, dm: DayMonth, line: usize) -> Result<NaiveDate, ParseError> {
    NaiveDate::from_ymd_opt(year, dm.month, dm.day).ok_or_else(|| ParseError::InvalidDate {
        text: format!("{:02}.{:02}.{year}", dm.day, dm.month),
        line,
    })
}

/// Split a page header field row on single spaces, dropping trailing blanks.
fn header_fields(row: &str) -> Vec<&str> {
    let mut fields: Vec<&str> = row.split(' ').collect();
    while fields.last().is_some_and(|f| f.trim().is_empty()) {
        fields.pop();
    }
    fields
}

impl ScanState {
    pub(crate) fn new(profile: &'static FormatProfile) -> Self {
        Self {
            profile,
            found_table_start: false,
            pending_sign: None,
            post_year: None,
            value_year: None,
            from_date: SetOnce::default(),
            to_date: SetOnce::default(),
            iban: SetOnce::default(),
            bic: SetOnce::default(),
            sum_in: SetOnce::default(),
            sum_out: SetOnce::default(),
            balance_old: SetOnce::default(),
            balance_new: SetOnce::default(),
            bookings: Vec::new(),
        }
    }

    /// Apply `line`, found at `index` and already classified as `kind`.
    pub(crate) fn apply<'a>(
        &mut self,
        kind: LineKind<'_>,
        line: &'a str,
        index: usize,
        cursor: &mut Cursor<'a>,
    ) -> Result<Step, ParseError> {
        match kind {
            LineKind::StatementDates { from, to } => self.on_statement_dates(from, to, index)?,
            LineKind::BicHeaderLine { bic } => self.on_bic_line(bic, index)?,
            LineKind::PageHeader { has_old_balance } => match cursor.next_line() {
                Some(row) => self.on_page_header(has_old_balance, row, index + 1)?,
                None => {
                    log::debug!("page header at line {index} without field row");
                }
            },
            LineKind::SummaryInMarker
            | LineKind::SummaryOutMarker { .. }
            | LineKind::BalanceMarkerSingular
            | LineKind::BalanceMarkerPlural => {
                let marker = kind.marker_text().unwrap_or_default();
                let value = read_summary(marker, line, cursor)?;
                let at = cursor.position();
                match kind {
                    LineKind::SummaryInMarker => self.sum_in.set(value).map_err(inconsistent(Field::SumIn, at))?,
                    LineKind::SummaryOutMarker { .. } => {
                        self.sum_out.set(value).map_err(inconsistent(Field::SumOut, at))?
                    }
                    _ => {
                        self.balance_new.set(value).map_err(inconsistent(Field::BalanceNew, at))?;
                        return Ok(Step::Stop);
                    }
                }
            }
            LineKind::SignMarker(sign) => self.on_sign(sign),
            LineKind::BookingTableHeader if !self.found_table_start => {
                self.found_table_start = true;
            }
            LineKind::BookingItemSigned(row) if self.found_table_start => self.on_booking(&row, index)?,
            LineKind::BookingItemUnsigned(row) if self.found_table_start => match self.pending_sign.take() {
                Some(sign) => {
                    let spliced = row.with_sign(sign);
                    match classify(&spliced, self.profile) {
                        LineKind::BookingItemSigned(signed) => self.on_booking(&signed, index)?,
                        _ => self.on_continuation(line),
                    }
                }
                None => self.on_continuation(line),
            },
            _ => self.on_continuation(line),
        }

        Ok(Step::Continue)
    }

    fn on_statement_dates(&mut self, from: &str, to: &str, line: usize) -> Result<(), ParseError> {
        let parse = |text: &str| {
            NaiveDate::parse_from_str(text, STATEMENT_DATE_FORMAT).map_err(|_| ParseError::InvalidDate {
                text: text.to_string(),
                line,
            })
        };

        if self.from_date.is_set() {
            return Err(ParseError::DuplicateField {
                field: Field::FromDate,
                line,
            });
        }
        let from = parse(from)?;
        self.from_date.set(from).map_err(|_| ParseError::DuplicateField {
            field: Field::FromDate,
            line,
        })?;

        if self.to_date.is_set() {
            return Err(ParseError::DuplicateField {
                field: Field::ToDate,
                line,
            });
        }
        self.to_date.set(parse(to)?).map_err(|_| ParseError::DuplicateField {
            field: Field::ToDate,
            line,
        })?;

        self.post_year = Some(from.year());
        self.value_year = Some(from.year());
        Ok(())
    }

    fn on_bic_line(&mut self, bic: &str, line: usize) -> Result<(), ParseError> {
        self.set_bic(bic, line)
    }

    fn set_bic(&mut self, bic: &str, line: usize) -> Result<(), ParseError> {
        self.bic.set(bic.to_string()).map_err(|c| ParseError::InconsistentBic {
            first: c.first,
            second: c.second,
            line,
        })
    }

    /// `row` is the field row following the page header, found at `line`.
    fn on_page_header(&mut self, has_old_balance: bool, row: &str, line: usize) -> Result<(), ParseError> {
        let fields = header_fields(row);

        if fields.len() >= MIN_HEADER_FIELDS {
            if let BicSource::PageHeader { field } = self.profile.bic_source {
                if let Some(bic) = fields.get(field) {
                    self.set_bic(bic, line)?;
                }
            }

            let start = self.profile.iban_field;
            match fields.get(start..start + IBAN_GROUPS) {
                Some(groups) => {
                    self.iban.set(groups.concat()).map_err(|c| ParseError::InconsistentIban {
                        first: c.first,
                        second: c.second,
                        line,
                    })?;
                }
                None => log::warn!("page header row at line {line} is too short for an IBAN"),
            }
        }

        let offset = self.profile.old_balance_field;
        if has_old_balance && fields.len() == offset + 2 {
            let token = format!("{} {}", fields[offset], fields[offset + 1]);
            let balance = decode_amount(&token).map_err(|e| ParseError::amount(e, line))?;
            self.balance_old.set(balance).map_err(inconsistent(Field::BalanceOld, line))?;
        }

        // The table header has to show up again on every page.
        self.found_table_start = false;
        Ok(())
    }

    fn on_sign(&mut self, sign: char) {
        if let Some(stale) = self.pending_sign.replace(sign) {
            log::warn!("sign marker '{sign}' replaces unused pending sign '{stale}'");
        }
    }

    fn on_booking(&mut self, row: &BookingRow<'_>, line: usize) -> Result<(), ParseError> {
        let (Some(mut post_year), Some(mut value_year)) = (self.post_year, self.value_year) else {
            return Err(ParseError::BookingBeforePeriod { line });
        };

        // Rows carry no year, so a decreasing month means the year rolled over.
        if let Some(previous) = self.bookings.last() {
            if row.post.month < previous.post_date.month() {
                post_year += 1;
            }
            if row.value.month < previous.value_date.month() {
                value_year += 1;
            }
        }
        self.post_year = Some(post_year);
        self.value_year = Some(value_year);

        let post_date = row_date(post_year, row.post, line)?;
        let value_date = row_date(value_year, row.value, line)?;
        let amount = decode_amount(row.amount).map_err(|e| ParseError::amount(e, line))?;

        self.bookings
            .push(BookingItem::new(post_date, value_date, row.description, amount));
        Ok(())
    }

    /// Lines inside the booking table that start no new item describe the
    /// current one further. Outside the table they are skipped, and so are
    /// the blank lines between pages.
    fn on_continuation(&mut self, line: &str) {
        if !self.found_table_start || line.trim().is_empty() {
            return;
        }
        if let Some(item) = self.bookings.last_mut() {
            item.info.push(line.to_string());
        }
    }

    /// Check that every required field was found; `line` is where scanning ended.
    pub(crate) fn finish(self, line: usize) -> Result<Draft, ParseError> {
        let missing = |field| ParseError::MissingField { field, line };

        let from_date = self.from_date.into_inner().ok_or(missing(Field::FromDate))?;
        let to_date = self.to_date.into_inner().ok_or(missing(Field::ToDate))?;
        let iban = self.iban.into_inner().ok_or(missing(Field::Iban))?;
        let bic = self.bic.into_inner().ok_or(missing(Field::Bic))?;
        let sum_in = self.sum_in.into_inner().ok_or(missing(Field::SumIn))?;
        let sum_out = self.sum_out.into_inner().ok_or(missing(Field::SumOut))?;
        let balance_old = self.balance_old.into_inner().ok_or(missing(Field::BalanceOld))?;
        let balance_new = self.balance_new.into_inner().ok_or(missing(Field::BalanceNew))?;

        Ok(Draft {
            from_date,
            to_date,
            iban,
            bic,
            sum_in,
            sum_out,
            balance_old,
            balance_new,
            bookings: self.bookings,
        })
    }
}

/// Consume a summary marker that may be wrapped over several lines, then
/// decode the `<label> EUR <sign amount>` value that follows it.
fn read_summary<'a>(marker: &str, first_line: &'a str, cursor: &mut Cursor<'a>) -> Result<Decimal, ParseError> {
    let mut remaining = marker;
    let mut line = first_line;

    loop {
        if let Some(rest) = remaining.strip_prefix(line) {
            remaining = rest.strip_prefix(' ').unwrap_or(rest);
        }

        let Some(next) = cursor.next_line() else {
            break;
        };
        line = next;

        if remaining.is_empty() || !remaining.starts_with(line) {
            break;
        }
    }

    let value = match SUMMARY_VALUE.captures(line) {
        Some(caps) => caps[3].to_string(),
        None => {
            // The value may have been wrapped onto the following line.
            let joined = cursor
                .next_line()
                .map(|next| format!("{} {}", line.trim(), next.trim()));
            let caps = joined.as_deref().and_then(|j| SUMMARY_VALUE.captures(j));
            match caps {
                Some(caps) => caps[3].to_string(),
                None => {
                    return Err(ParseError::Summary {
                        text: joined.unwrap_or_else(|| line.to_string()),
                        line: cursor.position(),
                    });
                }
            }
        }
    };

    decode_amount(&value).map_err(|e| ParseError::amount(e, cursor.position()))
}

/// Scan `lines` under the given layout.
pub fn scan(lines: &[String], profile: &'static FormatProfile) -> Result<Draft, ParseError> {
    let mut state = ScanState::new(profile);
    let mut cursor = Cursor::new(lines);

    while let Some(line) = cursor.next_line() {
        let index = cursor.position() - 1;
        let kind = classify(line, profile);
        log::debug!("{index:>4}: {kind:?}");

        if state.apply(kind, line, index, &mut cursor)? == Step::Stop {
            break;
        }
    }

    state.finish(cursor.position())
}
