use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::entities::catalog::{FieldCatalog, FieldKey};
use crate::domain::entities::record::{CellValue, Record};

/// Read one snapshot from a csv export whose headers carry the catalogue
/// labels. Unknown columns are ignored; empty cells become Null; the
/// trailing footer row is discarded like in the xlsx reader.
pub fn read_csv_snapshot(catalog: &FieldCatalog, path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open csv: {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read headers from csv: {}", path.display()))?
        .clone();

    if headers.is_empty() {
        anyhow::bail!("csv header is required")
    }

    let columns: Vec<Option<FieldKey>> = headers
        .iter()
        .map(|name| catalog.spec_by_label(name.trim()).map(|spec| spec.key))
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.context("failed to parse csv record")?;

        let mut record = Record::new();
        for spec in catalog.fields() {
            record.set(spec.key, CellValue::Null);
        }
        for (idx, key) in columns.iter().enumerate() {
            let Some(key) = key else { continue };
            let value = row.get(idx).unwrap_or("");
            if !value.is_empty() {
                record.set(*key, CellValue::Text(value.to_string()));
            }
        }

        if !record.is_blank(catalog) {
            records.push(record);
        }
    }

    if !records.is_empty() {
        records.pop();
    }

    Ok(records)
}
