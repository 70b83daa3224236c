//! stan-ingest: turns text extracted from bank statements into reconciled statements.

pub mod amount;
pub mod cell;
pub mod document;
pub mod error;
pub mod format;
pub mod lines;
pub mod parsers;
pub mod reconcile;
pub mod scanner;

pub use amount::{AmountFormatError, decode_amount};
pub use document::ExtractedDocument;
pub use error::{Field, ParseError, SummaryKind};
pub use format::{FormatError, FormatGeneration, FormatProfile, detect_format};
pub use parsers::parse_postbank_text;
