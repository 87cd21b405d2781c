use super::record::{Record, WorkplaceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    New,
    Changed,
    Deleted,
}

/// One reconciled key. `before` is None iff the record is new, `after` is
/// None iff it was deleted; a Changed entry carries both and is only
/// emitted when at least one field differs.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffEntry {
    pub kind: DiffKind,
    pub key: WorkplaceId,
    pub before: Option<Record>,
    pub after: Option<Record>,
}
