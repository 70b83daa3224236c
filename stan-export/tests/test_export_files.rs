use stan_core::CategoryMatcher;
use stan_export::{ExportFormat, export_to_file};
use stan_ingest::{ExtractedDocument, parse_postbank_text};
use std::fs;
use std::path::PathBuf;

fn ingest_fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("stan-ingest/tests/fixtures")
        .join(name)
}

/// Parse a real-layout extract from a scratch directory and export it in every format.
#[test]
fn test_exports_land_next_to_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("PB_KAZ_2017_06.txt");
    fs::copy(ingest_fixture("format_b_2017_06.txt"), &source).unwrap();

    let statement = parse_postbank_text(&ExtractedDocument::load(&source).unwrap()).unwrap();

    for format in ExportFormat::ALL {
        let exporter = format.exporter(CategoryMatcher::default());
        let written = export_to_file(&statement, exporter.as_ref()).unwrap();
        assert_eq!(written, dir.path().join(format!("PB_KAZ_2017_06.{}", format.extension())));

        let text = fs::read_to_string(&written).unwrap();
        assert!(text.contains("DE98765432109876543210"), "{format}: {text}");
    }

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("PB_KAZ_2017_06.json")).unwrap()).unwrap();
    assert_eq!(json["bookings"].as_array().map(Vec::len), Some(3));

    let qif = fs::read_to_string(dir.path().join("PB_KAZ_2017_06.qif")).unwrap();
    assert!(qif.contains("D06/21'17\nT-76.30\nMKartenzahlung Baumarkt\n^\n"));
}

#[test]
fn test_unwritable_target_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("missing").join("statement.txt");
    let mut statement = parse_postbank_text(&ExtractedDocument::load(ingest_fixture("format_b_2017_06.txt")).unwrap())
        .unwrap();
    statement.filename = source.display().to_string();

    let exporter = ExportFormat::Json.exporter(CategoryMatcher::default());
    let err = export_to_file(&statement, exporter.as_ref()).unwrap_err();
    assert!(format!("{err:#}").contains("statement.json"));
}
