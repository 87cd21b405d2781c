use std::sync::OnceLock;

use regex::Regex;

use crate::domain::entities::catalog::FieldKey;
use crate::domain::entities::diff::{DiffEntry, DiffKind};
use crate::domain::entities::record::{CellValue, Record, WorkplaceId};
use crate::domain::entities::row::{DisplayRow, Lineage, RowOrigin};

static CITY_PATTERN: OnceLock<Regex> = OnceLock::new();

fn city_pattern() -> &'static Regex {
    CITY_PATTERN.get_or_init(|| {
        Regex::new(r"г\s+([А-Яа-яЁё-]+(?:\s[А-Яа-яЁё-]+)*)").expect("city pattern should compile")
    })
}

/// City name from an address: the token run after the "г " marker.
pub fn extract_city(address: &CellValue) -> Option<String> {
    let text = address.display()?;
    city_pattern()
        .captures(&text)
        .map(|captures| captures[1].trim().to_string())
}

fn display_row(
    key: &WorkplaceId,
    record: &Record,
    lineage: Lineage,
    origin: RowOrigin,
) -> DisplayRow {
    DisplayRow {
        lineage,
        origin,
        key: key.clone(),
        city: extract_city(record.get(FieldKey::Address)),
        quantity: record.get(FieldKey::Quantity).clone(),
        record: record.clone(),
    }
}

/// Expand diff entries into display rows, preserving entry order. A changed
/// entry becomes an adjacent old/new pair; new and deleted entries become a
/// single row each.
pub fn project_rows(entries: &[DiffEntry]) -> Vec<DisplayRow> {
    let mut rows = Vec::new();
    for entry in entries {
        match entry.kind {
            DiffKind::Changed => {
                if let (Some(before), Some(after)) = (&entry.before, &entry.after) {
                    rows.push(display_row(
                        &entry.key,
                        before,
                        Lineage::Old,
                        RowOrigin::Changed,
                    ));
                    rows.push(display_row(
                        &entry.key,
                        after,
                        Lineage::New,
                        RowOrigin::Changed,
                    ));
                }
            }
            DiffKind::New => {
                if let Some(after) = &entry.after {
                    rows.push(display_row(&entry.key, after, Lineage::New, RowOrigin::New));
                }
            }
            DiffKind::Deleted => {
                if let Some(before) = &entry.before {
                    rows.push(display_row(
                        &entry.key,
                        before,
                        Lineage::Deleted,
                        RowOrigin::Deleted,
                    ));
                }
            }
        }
    }
    rows
}
