//! stan-export: writes parsed statements as JSON, OFX v1, QIF, CSV or MT940

pub mod csv;
pub mod json;
pub mod mt940;
pub mod ofx;
pub mod qif;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stan_core::{CategoryMatcher, Statement};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use self::csv::CsvExporter;
pub use json::JsonExporter;
pub use mt940::Mt940Exporter;
pub use ofx::OfxExporter;
pub use qif::QifExporter;

/// A statement output format. Exporters only read the statement.
pub trait Exporter {
    fn name(&self) -> &'static str;

    /// File extension without the leading dot
    fn extension(&self) -> &'static str;

    fn write(&self, statement: &Statement, out: &mut dyn Write) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Ofx,
    Qif,
    Csv,
    Mt940,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Json,
        ExportFormat::Ofx,
        ExportFormat::Qif,
        ExportFormat::Csv,
        ExportFormat::Mt940,
    ];

    /// Build the exporter for this format. Only QIF makes use of `categories`.
    pub fn exporter(self, categories: CategoryMatcher) -> Box<dyn Exporter> {
        match self {
            ExportFormat::Json => Box::new(JsonExporter),
            ExportFormat::Ofx => Box::new(OfxExporter::new()),
            ExportFormat::Qif => Box::new(QifExporter::new(categories)),
            ExportFormat::Csv => Box::new(CsvExporter::default()),
            ExportFormat::Mt940 => Box::new(Mt940Exporter),
        }
    }

    /// Name on the command line and in the config file
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Ofx => "ofx",
            ExportFormat::Qif => "qif",
            ExportFormat::Csv => "csv",
            ExportFormat::Mt940 => "mt940",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            // `.txt` would collide with the extracted source text.
            ExportFormat::Mt940 => "sta",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown export format '{s}' (expected json, ofx, qif, csv or mt940)"))
    }
}

/// Two decimals with a decimal comma and no grouping.
pub(crate) fn decimal_comma(amount: impl fmt::Display) -> String {
    format!("{amount:.2}").replace('.', ",")
}

pub(crate) fn is_negative<T: PartialOrd + Default>(amount: T) -> bool {
    amount < T::default()
}

/// The statement's source path with its extension replaced by the exporter's.
pub fn output_path(source: impl AsRef<Path>, exporter: &dyn Exporter) -> PathBuf {
    source.as_ref().with_extension(exporter.extension())
}

/// Export `statement` next to its source file and return the written path.
pub fn export_to_file(statement: &Statement, exporter: &dyn Exporter) -> Result<PathBuf> {
    let path = output_path(&statement.filename, exporter);
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;

    let mut out = BufWriter::new(file);
    exporter
        .write(statement, &mut out)
        .with_context(|| format!("writing {} export to {}", exporter.name(), path.display()))?;
    out.flush().with_context(|| format!("flushing {}", path.display()))?;

    log::info!("exported '{}' as {}", statement.filename, exporter.name());
    Ok(path)
}
