pub mod csv;
pub mod xlsx;

use std::path::Path;

use crate::domain::entities::catalog::FieldCatalog;
use crate::domain::entities::record::Record;
use crate::usecase::ports::reader::{ReadError, SnapshotReader};

/// File-based snapshot reader dispatching on the file extension: csv files
/// go through the csv reader, everything else is treated as a workbook.
pub struct SnapshotFileReader {
    catalog: FieldCatalog,
}

impl SnapshotFileReader {
    pub fn new(catalog: FieldCatalog) -> Self {
        Self { catalog }
    }
}

impl SnapshotReader for SnapshotFileReader {
    fn read_snapshot(&self, path: &Path) -> Result<Vec<Record>, ReadError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let result = if ext == "csv" {
            csv::read_csv_snapshot(&self.catalog, path)
        } else {
            xlsx::read_xlsx_snapshot(&self.catalog, path)
        };

        result.map_err(|err| ReadError::Message(err.to_string()))
    }
}
