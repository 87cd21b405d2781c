use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use crate::domain::entities::catalog::FieldCatalog;
use crate::domain::entities::record::{CellValue, Record};

/// The workplace register lives on the third sheet of the upstream workbook.
const SNAPSHOT_SHEET_INDEX: usize = 2;

pub fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::String(v) => CellValue::Text(v.to_string()),
        Data::Float(v) => CellValue::Number(*v),
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Bool(v) => CellValue::Text(v.to_string()),
        Data::DateTime(v) => CellValue::Text(v.to_string()),
        Data::DateTimeIso(v) => CellValue::Text(v.to_string()),
        Data::DurationIso(v) => CellValue::Text(v.to_string()),
        Data::Error(v) => CellValue::Text(format!("{v:?}")),
        Data::Empty => CellValue::Null,
    }
}

fn row_to_record(catalog: &FieldCatalog, row: &[Data]) -> Record {
    let mut record = Record::new();
    for spec in catalog.fields() {
        let value = row
            .get(spec.column as usize - 1)
            .map(cell_to_value)
            .unwrap_or(CellValue::Null);
        record.set(spec.key, value);
    }
    record
}

/// Read one snapshot from an xlsx workbook: the register sheet, minus the
/// header row, minus rows with no data, minus the trailing footer row.
pub fn read_xlsx_snapshot(catalog: &FieldCatalog, path: &Path) -> Result<Vec<Record>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open xlsx: {}", path.display()))?;

    let sheet_name = workbook
        .sheet_names()
        .get(SNAPSHOT_SHEET_INDEX)
        .cloned()
        .with_context(|| {
            format!(
                "workbook has no register sheet (#{}): {}",
                SNAPSHOT_SHEET_INDEX + 1,
                path.display()
            )
        })?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("failed to read sheet: {sheet_name}"))?;

    let mut records = Vec::new();
    for row in range.rows().skip(1) {
        let record = row_to_record(catalog, row);
        if !record.is_blank(catalog) {
            records.push(record);
        }
    }

    // The last data row is a totals footer, never a workplace.
    if !records.is_empty() {
        records.pop();
    }

    Ok(records)
}
