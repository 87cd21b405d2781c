use super::record::{CellValue, Record, WorkplaceId};

/// Which half of a changed pair a display row represents, or that the row
/// was wholly deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lineage {
    Old,
    New,
    Deleted,
}

/// Why the row exists at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrigin {
    New,
    Deleted,
    Changed,
}

/// Effective status shown for a row and matched by the status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RowStatus {
    Was,
    Became,
    New,
    Deleted,
}

impl RowStatus {
    pub const ALL: [RowStatus; 4] = [
        RowStatus::Was,
        RowStatus::Became,
        RowStatus::New,
        RowStatus::Deleted,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RowStatus::Was => "БЫЛО",
            RowStatus::Became => "СТАЛО",
            RowStatus::New => "НОВАЯ",
            RowStatus::Deleted => "УДАЛЕНА",
        }
    }
}

/// A row as presented in the comparison grid. Built once by the projector
/// and never mutated afterwards; downstream stages select, they do not
/// rewrite.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub lineage: Lineage,
    pub origin: RowOrigin,
    pub key: WorkplaceId,
    pub record: Record,
    pub city: Option<String>,
    pub quantity: CellValue,
}

impl DisplayRow {
    pub fn status(&self) -> RowStatus {
        match self.origin {
            RowOrigin::New => RowStatus::New,
            RowOrigin::Deleted => RowStatus::Deleted,
            RowOrigin::Changed => match self.lineage {
                Lineage::Old => RowStatus::Was,
                Lineage::New | Lineage::Deleted => RowStatus::Became,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(lineage: Lineage, origin: RowOrigin) -> DisplayRow {
        DisplayRow {
            lineage,
            origin,
            key: "K1".to_string(),
            record: Record::new(),
            city: None,
            quantity: CellValue::Null,
        }
    }

    #[test]
    fn origin_wins_over_lineage_for_the_effective_status() {
        assert_eq!(row(Lineage::New, RowOrigin::New).status(), RowStatus::New);
        assert_eq!(
            row(Lineage::Deleted, RowOrigin::Deleted).status(),
            RowStatus::Deleted
        );
        assert_eq!(
            row(Lineage::Old, RowOrigin::Changed).status(),
            RowStatus::Was
        );
        assert_eq!(
            row(Lineage::New, RowOrigin::Changed).status(),
            RowStatus::Became
        );
    }
}
