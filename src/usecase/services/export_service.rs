use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::domain::classify::PairChange;
use crate::domain::entities::catalog::FieldCatalog;
use crate::domain::entities::record::WorkplaceId;
use crate::domain::entities::row::DisplayRow;
use crate::infra::export::xlsx::write_comparison;

pub struct ExportService {
    catalog: FieldCatalog,
}

impl ExportService {
    pub fn new(catalog: FieldCatalog) -> Self {
        Self { catalog }
    }

    /// Write the filtered row sequence to an xlsx workbook, reusing the
    /// classifier's status and change-type texts.
    pub fn export_filtered(
        &self,
        path: &Path,
        rows: &[DisplayRow],
        pairs: &HashMap<WorkplaceId, PairChange>,
    ) -> Result<()> {
        write_comparison(path, &self.catalog, rows, pairs)?;
        info!(rows = rows.len(), path = %path.display(), "comparison exported");
        Ok(())
    }
}
