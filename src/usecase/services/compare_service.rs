use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::domain::classify::{build_pair_index, PairChange};
use crate::domain::diff::diff_snapshots;
use crate::domain::entities::catalog::FieldCatalog;
use crate::domain::entities::diff::DiffEntry;
use crate::domain::entities::record::WorkplaceId;
use crate::domain::entities::row::DisplayRow;
use crate::domain::filter::{collect_filter_options, FilterOptions};
use crate::domain::project::project_rows;
use crate::usecase::ports::reader::{ReadError, SnapshotReader};

/// The filter-invariant output of one pipeline run. Cached by the app and
/// re-filtered in place when the filter state changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeReport {
    pub entries: Vec<DiffEntry>,
    pub rows: Vec<DisplayRow>,
    pub pairs: HashMap<WorkplaceId, PairChange>,
    pub options: FilterOptions,
}

pub struct CompareService {
    reader: Arc<dyn SnapshotReader>,
    catalog: FieldCatalog,
}

impl CompareService {
    pub fn new(reader: Arc<dyn SnapshotReader>, catalog: FieldCatalog) -> Self {
        Self { reader, catalog }
    }

    /// Read both snapshots and run the full pipeline. Both files must parse
    /// before any diffing happens; a failed read surfaces as one error and
    /// leaves no partial result.
    pub fn compare(&self, before_path: &Path, after_path: &Path) -> Result<ChangeReport, ReadError> {
        let before = self.reader.read_snapshot(before_path)?;
        let after = self.reader.read_snapshot(after_path)?;
        info!(
            before_rows = before.len(),
            after_rows = after.len(),
            "snapshots loaded"
        );

        let entries = diff_snapshots(&self.catalog, &before, &after);
        let rows = project_rows(&entries);
        let pairs = build_pair_index(&self.catalog, &entries);
        let options = collect_filter_options(&self.catalog, &entries, &rows, &pairs);
        info!(
            entries = entries.len(),
            rows = rows.len(),
            changed_pairs = pairs.len(),
            "comparison ready"
        );

        Ok(ChangeReport {
            entries,
            rows,
            pairs,
            options,
        })
    }
}
