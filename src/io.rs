// 📂 Dataset I/O - Load company records, export cluster assignments
//
// CSV columns use the dataset's names (company_name, main_country, ...).
// Exported files carry the same columns plus block_key and cluster_id, so an
// export can be loaded back as input.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::pipeline::Resolution;
use crate::record::{RawRecord, RecordId};
use crate::report::ResolutionSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DatasetFormat {
    Csv,
    Jsonl,
}

impl DatasetFormat {
    /// Guess format from file extension (.jsonl / .ndjson, anything else is CSV)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jsonl") || ext.eq_ignore_ascii_case("ndjson") => {
                DatasetFormat::Jsonl
            }
            _ => DatasetFormat::Csv,
        }
    }
}

/// Load records in the given format
pub fn load(path: &Path, format: DatasetFormat) -> Result<Vec<RawRecord>> {
    match format {
        DatasetFormat::Csv => load_csv(path),
        DatasetFormat::Jsonl => load_jsonl(path),
    }
}

/// Load records from CSV (header row required, extra columns ignored)
pub fn load_csv(csv_path: &Path) -> Result<Vec<RawRecord>> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {:?}", csv_path))?;

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    if !RawRecord::COLUMNS.iter().any(|column| headers.iter().any(|h| h == *column)) {
        warn!(path = ?csv_path, "CSV header has none of the company columns, every record will be blank");
    }

    let mut records = Vec::new();
    for (i, result) in reader.deserialize().enumerate() {
        let record: RawRecord = result
            .with_context(|| format!("Failed to parse CSV row {}", i + 1))?;
        records.push(record);
    }

    Ok(records)
}

/// Load records from JSON Lines (one object per line, blank lines skipped)
///
/// Attributes holding anything but a string are treated as missing.
pub fn load_jsonl(path: &Path) -> Result<Vec<RawRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSONL file: {:?}", path))?;

    let mut records = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line_number = i + 1;
        if line.trim().is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("Invalid JSON on line {}", line_number))?;
        let object = value
            .as_object()
            .ok_or_else(|| anyhow!("Line {} is not a JSON object", line_number))?;

        records.push(raw_from_object(object, line_number));
    }

    Ok(records)
}

fn raw_from_object(object: &Map<String, Value>, line_number: usize) -> RawRecord {
    let text = |column: &str| -> Option<String> {
        match object.get(column) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                debug!(line = line_number, column, value = %other, "non-string attribute treated as missing");
                None
            }
        }
    };

    RawRecord {
        company_name: text("company_name"),
        company_legal_names: text("company_legal_names"),
        company_commercial_names: text("company_commercial_names"),
        website_domain: text("website_domain"),
        primary_email: text("primary_email"),
        main_country: text("main_country"),
        main_city: text("main_city"),
        main_address_raw_text: text("main_address_raw_text"),
    }
}

// ============================================================================
// EXPORT
// ============================================================================

/// One exported row: normalized attributes + block key + cluster id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub record_id: RecordId,
    pub company_name: String,
    pub company_legal_names: String,
    pub company_commercial_names: String,
    pub website_domain: String,
    pub primary_email: String,
    pub main_country: String,
    pub main_city: String,
    pub main_address_raw_text: String,
    pub block_key: String,
    pub cluster_id: usize,
    pub cluster_size: usize,
}

/// Rows in record order
pub fn export_rows(resolution: &Resolution) -> Vec<ExportRow> {
    resolution
        .records
        .iter()
        .zip(resolution.assignment.iter())
        .map(|(record, (_, cluster))| ExportRow {
            record_id: record.id,
            company_name: record.company_name.clone(),
            company_legal_names: record.legal_names.clone(),
            company_commercial_names: record.commercial_names.clone(),
            website_domain: record.website_domain.clone(),
            primary_email: record.primary_email.clone(),
            main_country: record.country.clone(),
            main_city: record.city.clone(),
            main_address_raw_text: record.address_text.clone(),
            block_key: record.block_key.clone(),
            cluster_id: cluster.value(),
            cluster_size: resolution.assignment.cluster_size(cluster),
        })
        .collect()
}

/// Write the clustered dataset to CSV; returns rows written
pub fn write_csv(path: &Path, resolution: &Resolution) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {:?}", path))?;

    let rows = export_rows(resolution);
    for row in &rows {
        writer.serialize(row).context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush CSV file")?;

    Ok(rows.len())
}

pub fn write_summary_json(path: &Path, summary: &ResolutionSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("Failed to serialize summary")?;
    fs::write(path, json).with_context(|| format!("Failed to write summary: {:?}", path))?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::pipeline::EntityResolver;

    #[test]
    fn test_format_from_path() {
        assert_eq!(DatasetFormat::from_path(Path::new("a.jsonl")), DatasetFormat::Jsonl);
        assert_eq!(DatasetFormat::from_path(Path::new("a.NDJSON")), DatasetFormat::Jsonl);
        assert_eq!(DatasetFormat::from_path(Path::new("a.csv")), DatasetFormat::Csv);
        assert_eq!(DatasetFormat::from_path(Path::new("data")), DatasetFormat::Csv);
    }

    #[test]
    fn test_load_csv_missing_and_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("companies.csv");
        fs::write(
            &path,
            "company_name,main_country,revenue\nAcme Inc,US,100\n,DE,5\n",
        )
        .unwrap();

        let records = load_csv(&path).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].company_name.as_deref(), Some("Acme Inc"));
        assert_eq!(records[0].main_country.as_deref(), Some("US"));
        assert_eq!(records[0].website_domain, None);
        assert_eq!(records[1].company_name, None);
    }

    #[test]
    fn test_load_jsonl_non_string_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("companies.jsonl");
        fs::write(
            &path,
            concat!(
                r#"{"company_name": "Acme Inc", "main_country": "US"}"#,
                "\n\n",
                r#"{"company_name": 42, "main_city": ["x"], "main_country": null}"#,
                "\n",
            ),
        )
        .unwrap();

        let records = load_jsonl(&path).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], RawRecord::named("Acme Inc", "US"));
        assert_eq!(records[1], RawRecord::default());
    }

    #[test]
    fn test_load_jsonl_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        fs::write(&path, "{\"company_name\": \"Acme\"}\n[1, 2]\n").unwrap();

        let err = load_jsonl(&path).unwrap_err();
        assert!(err.to_string().contains("Line 2"));
    }

    #[test]
    fn test_export_round_trip() {
        let raw = vec![
            RawRecord::named("Acme Inc", "US"),
            RawRecord::named("ACME INC.", "US"),
            RawRecord::named("Globex", "DE"),
        ];
        let resolution = EntityResolver::new(ResolverConfig::default())
            .unwrap()
            .resolve(&raw)
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clustered.csv");
        assert_eq!(write_csv(&path, &resolution).unwrap(), 3);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<ExportRow> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows, export_rows(&resolution));
        assert_eq!(rows[0].cluster_id, rows[1].cluster_id);
        assert_ne!(rows[0].cluster_id, rows[2].cluster_id);
        assert_eq!(rows[2].cluster_size, 1);

        // exported file is valid input again
        let reloaded = load_csv(&path).unwrap();
        assert_eq!(reloaded[1].company_name.as_deref(), Some("acme inc"));
    }
}
