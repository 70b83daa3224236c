//! Bank-specific statement parsers

pub mod postbank;

pub use postbank::parse_postbank_text;
