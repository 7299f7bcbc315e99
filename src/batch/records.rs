use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tokio::fs;

/// One source report row, indexed over the concatenated input files.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub index: usize,
    pub report: String,
}

#[derive(Debug, Deserialize)]
struct ReportRow {
    #[serde(rename = "Report")]
    report: String,
}

/// Load report rows from CSV files, concatenated in the given order with
/// indices reassigned contiguously from zero. Every file must carry a
/// `Report` column; other columns are ignored.
pub async fn load_reports(paths: &[PathBuf]) -> Result<Vec<Record>> {
    let mut records = Vec::new();

    for path in paths {
        let bytes = fs::read(path)
            .await
            .context(format!("Failed to read report file: {:?}", path))?;

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        for row in reader.deserialize::<ReportRow>() {
            let row = row.context(format!("Malformed row in {:?}", path))?;
            records.push(Record {
                index: records.len(),
                report: row.report,
            });
        }
    }

    tracing::debug!(
        "[records] Loaded {} reports from {} file(s)",
        records.len(),
        paths.len()
    );
    Ok(records)
}
