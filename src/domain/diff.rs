use std::collections::HashMap;

use crate::domain::entities::catalog::FieldCatalog;
use crate::domain::entities::diff::{DiffEntry, DiffKind};
use crate::domain::entities::record::{Record, WorkplaceId};

/// Index a snapshot by its key field: first-occurrence key order plus a
/// lookup where a repeated key silently shadows the earlier row. Rows
/// without a key are dropped.
fn index_snapshot(
    catalog: &FieldCatalog,
    records: &[Record],
) -> (Vec<WorkplaceId>, HashMap<WorkplaceId, Record>) {
    let mut order = Vec::new();
    let mut by_key = HashMap::new();
    for record in records {
        let Some(key) = record.key_id(catalog) else {
            continue;
        };
        if !by_key.contains_key(&key) {
            order.push(key.clone());
        }
        by_key.insert(key, record.clone());
    }
    (order, by_key)
}

/// Reconcile two snapshots into an ordered diff: new and changed entries
/// in after-snapshot order, then deleted entries in before-snapshot order.
/// Keys whose records are field-wise identical produce no entry.
pub fn diff_snapshots(
    catalog: &FieldCatalog,
    before: &[Record],
    after: &[Record],
) -> Vec<DiffEntry> {
    let (before_order, before_map) = index_snapshot(catalog, before);
    let (after_order, after_map) = index_snapshot(catalog, after);

    let mut entries = Vec::new();

    for key in &after_order {
        let new_record = &after_map[key];
        match before_map.get(key) {
            None => entries.push(DiffEntry {
                kind: DiffKind::New,
                key: key.clone(),
                before: None,
                after: Some(new_record.clone()),
            }),
            Some(old_record) if !old_record.eq_fields(new_record, catalog) => {
                entries.push(DiffEntry {
                    kind: DiffKind::Changed,
                    key: key.clone(),
                    before: Some(old_record.clone()),
                    after: Some(new_record.clone()),
                });
            }
            Some(_) => {}
        }
    }

    for key in &before_order {
        if !after_map.contains_key(key) {
            entries.push(DiffEntry {
                kind: DiffKind::Deleted,
                key: key.clone(),
                before: Some(before_map[key].clone()),
                after: None,
            });
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::catalog::FieldKey;
    use crate::domain::entities::record::CellValue;

    fn record(key: &str, attribute: &str) -> Record {
        let mut record = Record::new();
        record.set(FieldKey::WorkplaceId, CellValue::Text(key.to_string()));
        record.set(FieldKey::Attribute, CellValue::Text(attribute.to_string()));
        record
    }

    #[test]
    fn every_key_appears_in_exactly_one_entry() {
        let catalog = FieldCatalog::workplace();
        let before = vec![record("A", "x"), record("B", "y"), record("C", "z")];
        let after = vec![record("A", "x"), record("B", "changed"), record("D", "w")];

        let entries = diff_snapshots(&catalog, &before, &after);

        let keys: Vec<(&str, DiffKind)> = entries
            .iter()
            .map(|entry| (entry.key.as_str(), entry.kind))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("B", DiffKind::Changed),
                ("D", DiffKind::New),
                ("C", DiffKind::Deleted),
            ]
        );
    }

    #[test]
    fn diffing_a_snapshot_against_itself_is_empty() {
        let catalog = FieldCatalog::workplace();
        let snapshot = vec![record("A", "x"), record("B", "y")];

        let entries = diff_snapshots(&catalog, &snapshot, &snapshot);

        assert!(entries.is_empty(), "self-diff should be empty: {entries:?}");
    }

    #[test]
    fn changed_entries_carry_both_records() {
        let catalog = FieldCatalog::workplace();
        let before = vec![record("A", "old")];
        let after = vec![record("A", "new")];

        let entries = diff_snapshots(&catalog, &before, &after);

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.kind, DiffKind::Changed);
        assert_eq!(
            entry
                .before
                .as_ref()
                .map(|r| r.get(FieldKey::Attribute).clone()),
            Some(CellValue::Text("old".to_string()))
        );
        assert_eq!(
            entry
                .after
                .as_ref()
                .map(|r| r.get(FieldKey::Attribute).clone()),
            Some(CellValue::Text("new".to_string()))
        );
    }

    #[test]
    fn duplicate_keys_shadow_silently() {
        let catalog = FieldCatalog::workplace();
        let before = vec![record("A", "first"), record("A", "second")];
        let after = vec![record("A", "second")];

        let entries = diff_snapshots(&catalog, &before, &after);

        assert!(
            entries.is_empty(),
            "later duplicate should win, leaving nothing to report: {entries:?}"
        );
    }

    #[test]
    fn rows_without_a_key_are_ignored() {
        let catalog = FieldCatalog::workplace();
        let mut keyless = Record::new();
        keyless.set(FieldKey::Attribute, CellValue::Text("loose".to_string()));
        let before = vec![keyless.clone()];
        let after = vec![keyless, record("A", "x")];

        let entries = diff_snapshots(&catalog, &before, &after);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiffKind::New);
        assert_eq!(entries[0].key, "A");
    }

    #[test]
    fn numeric_and_text_keys_share_one_namespace() {
        let catalog = FieldCatalog::workplace();
        let mut numeric = Record::new();
        numeric.set(FieldKey::WorkplaceId, CellValue::Number(42.0));
        let mut textual = Record::new();
        textual.set(FieldKey::WorkplaceId, CellValue::Text("42".to_string()));

        let entries = diff_snapshots(&catalog, &[numeric], &[textual]);

        assert_eq!(entries.len(), 1, "same stringified key, one changed entry");
        assert_eq!(entries[0].kind, DiffKind::Changed);
    }
}
