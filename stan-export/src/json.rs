use anyhow::Result;
use stan_core::Statement;
use std::io::Write;

use crate::Exporter;

/// Pretty-printed structural dump of the statement
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn write(&self, statement: &Statement, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, statement)?;
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::march_statement;

    #[test]
    fn test_json_shape() {
        let mut buf = Vec::new();
        JsonExporter.write(&march_statement(), &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["accountId"], "DE12345678901234567890");
        assert_eq!(value["fromDate"], "2017-03-01");
        assert_eq!(value["bookings"][1]["info"][1], "Miete März");
        assert_eq!(value["bookings"][0]["valueDate"], "2017-03-02");
    }

    #[test]
    fn test_json_reads_back() {
        let statement = march_statement();
        let mut buf = Vec::new();
        JsonExporter.write(&statement, &mut buf).unwrap();
        assert!(buf.ends_with(b"}\n"));

        let back: Statement = serde_json::from_slice(&buf).unwrap();
        assert_eq!(back, statement);
    }
}
