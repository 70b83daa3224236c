//! Parse many statement files at once and check that they form one
//! gapless sequence.

use anyhow::{Context, Result, bail};
use stan_core::{Statement, validate_sequence};
use stan_ingest::{ExtractedDocument, parse_postbank_text};
use std::path::{Path, PathBuf};

use crate::glob::expand_all;

pub fn parse_file(path: &Path) -> Result<Statement> {
    let doc = ExtractedDocument::load(path).with_context(|| format!("read {}", path.display()))?;
    Ok(parse_postbank_text(&doc)?)
}

/// Parse every file; a file that fails is reported and skipped.
pub fn parse_files(files: &[PathBuf]) -> Vec<Statement> {
    println!("Parsing {} statement file(s)...", files.len());

    let mut statements = Vec::with_capacity(files.len());
    for file in files {
        match parse_file(file) {
            Ok(st) => {
                println!(
                    "Successfully parsed statement '{}' dated from {} to {}.",
                    file.display(),
                    st.from_date,
                    st.to_date
                );
                statements.push(st);
            }
            Err(e) => eprintln!("Error parsing '{}': {e:#}", file.display()),
        }
    }

    println!("Successfully parsed {} of {} statement(s).\n", statements.len(), files.len());
    statements
}

/// Expand `patterns`, parse the files and run the consistency checks.
/// Returns the statements ordered by period.
pub fn check(patterns: &[String]) -> Result<Vec<Statement>> {
    let files = expand_all(patterns)?;
    if files.is_empty() {
        bail!("No statement file(s) specified.");
    }

    let mut statements = parse_files(&files);
    if statements.is_empty() {
        bail!("No statements found.");
    }

    println!("Checking parsed statements for consistency...");
    validate_sequence(&mut statements).context("consistency check failed")?;
    println!(
        "All {} parsed statements of originally {} statements passed the consistency checks.\n",
        statements.len(),
        files.len()
    );

    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const JUNE: &str = "%%CreationDate: D:20170703101500+02'00'
Auszug Jahr Seite von IBAN Alter Kontostand
6 2017 1 1 DE98 7654 3210 9876 5432 10 EUR + 100,00
BIC (SWIFT): PBNKDEFFXXX
Kontoauszug: Max Mustermann vom 01.06.2017 bis 30.06.2017
Buchung Wert Vorgang/Buchungsinformation Soll Haben
12.06. 12.06. Lastschrift - 40,00
Kontonummer BLZ Summe Zahlungseingänge
9876543210 10010010 EUR + 0,00
Dispositionskredit Zinssatz für Dispositionskredit Summe Zahlungsausgänge
0,00 EUR 11,49% EUR - 40,00
Zinssatz für geduldete Überziehung Anlage Neuer Kontostand
13,49% EUR + 60,00
";

    #[test]
    fn test_unparsable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("june.txt"), JUNE).unwrap();
        fs::write(dir.path().join("junk.txt"), "nothing to see\n").unwrap();

        let statements = check(&[format!("{}/*.txt", dir.path().display())]).unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].balance_new.to_string(), "60.00");
    }

    #[test]
    fn test_no_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = check(&[format!("{}/*.txt", dir.path().display())]).unwrap_err();
        assert_eq!(err.to_string(), "No statement file(s) specified.");
    }

    #[test]
    fn test_missing_literal_file_yields_no_statements() {
        let err = check(&["/nonexistent/statement.txt".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "No statements found.");
    }

    #[test]
    fn test_gap_between_statements_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("june.txt"), JUNE).unwrap();
        let august = JUNE
            .replace("01.06.2017 bis 30.06.2017", "01.08.2017 bis 31.08.2017")
            .replace("12.06. 12.06.", "12.08. 12.08.")
            .replace("13,49% EUR + 60,00", "13,49% EUR + 20,00")
            .replace("EUR + 100,00", "EUR + 60,00");
        fs::write(dir.path().join("august.txt"), august).unwrap();

        let err = check(&[format!("{}/*.txt", dir.path().display())]).unwrap_err();
        assert!(format!("{err:#}").contains("consistency check failed"));
    }
}
