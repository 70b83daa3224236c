//! Text extracted from a statement document, the input of all parsers.
//!
//! On disk an extract is plain text as written by `pdftotext`: pages are
//! separated by form feeds. Document metadata precedes the text as
//! `%%Key: value` lines; only `CreationDate` is used.
//!
//!   %%CreationDate: D:20170606120000+02'00'
//!   Kontoauszug: Herr X vom 01.03.2017 bis 31.03.2017
//!   ...

use std::fs;
use std::io;
use std::path::Path;

const METADATA_PREFIX: &str = "%%";
const CREATION_DATE_KEY: &str = "CreationDate";
const PAGE_SEPARATOR: char = '\x0c';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    /// Identifier of the source, usually its path
    pub source: String,
    /// Creation timestamp as `YYYYMMDDHHMMSS...`, without the raw `D:` prefix
    pub creation_date: Option<String>,
    /// Text lines of all pages in reading order
    pub lines: Vec<String>,
}

/// Metadata values carry a two character type prefix (`D:`) by convention.
fn strip_raw_prefix(raw: &str) -> String {
    raw.trim().chars().skip(2).collect()
}

impl ExtractedDocument {
    pub fn new(source: impl Into<String>, creation_date: Option<String>, lines: Vec<String>) -> Self {
        Self {
            source: source.into(),
            creation_date,
            lines,
        }
    }

    /// Join per-page texts so that every page ends in exactly one line break.
    /// `raw_creation_date` is the unmodified metadata value.
    pub fn from_pages<S: AsRef<str>>(source: impl Into<String>, raw_creation_date: Option<&str>, pages: &[S]) -> Self {
        let mut text = String::new();
        for page in pages {
            let page = page.as_ref();
            text.push_str(page.strip_suffix('\n').unwrap_or(page));
            text.push('\n');
        }

        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }

        Self::new(source, raw_creation_date.map(strip_raw_prefix), lines)
    }

    /// Parse the on-disk extract format described in the module docs.
    pub fn from_text(source: impl Into<String>, text: &str) -> Self {
        let mut creation_date = None;
        let mut body = text;

        while let Some(rest) = body.strip_prefix(METADATA_PREFIX) {
            let (entry, remainder) = rest.split_once('\n').unwrap_or((rest, ""));
            match entry.split_once(':') {
                Some((key, value)) if key.trim() == CREATION_DATE_KEY => creation_date = Some(value.trim()),
                _ => log::debug!("ignoring metadata entry '{}'", entry.trim()),
            }
            body = remainder;
        }

        let pages: Vec<&str> = body.split(PAGE_SEPARATOR).collect();
        Self::from_pages(source, creation_date, &pages)
    }

    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Ok(Self::from_text(path.display().to_string(), &text))
    }
}
