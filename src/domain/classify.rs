use std::collections::{BTreeSet, HashMap};

use crate::domain::entities::catalog::{FieldCatalog, FieldKey};
use crate::domain::entities::diff::{DiffEntry, DiffKind};
use crate::domain::entities::record::{Record, WorkplaceId, NO_VALUE};
use crate::domain::entities::row::{DisplayRow, Lineage, RowOrigin};

/// Synthetic change-type labels. The grid filter and the exporter share
/// these through the classifier, so they cannot drift apart.
pub const NEW_RECORD_LABEL: &str = "Новая запись";
pub const RECORD_REMOVED_LABEL: &str = "Запись удалена";

const UNCHANGED_TEXT: &str = "Без изменений";
const CHANGED_FALLBACK_TEXT: &str = "Изменено";

const RESERVE_VALUE: &str = "Резерв";
const PARTNER_VALUES: [&str; 3] = [
    "Размещение делового партнера",
    "Размещение партнера",
    "Партнер",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TransitionKind {
    ToReserve,
    ToPartner,
}

/// A curated attribute transition: a pure predicate over the trimmed
/// before/after attribute values. Direction matters; moving away from the
/// target value never matches.
pub struct TransitionRule {
    pub kind: TransitionKind,
    pub label: &'static str,
    pub matches: fn(before: Option<&str>, after: Option<&str>) -> bool,
}

fn to_reserve(before: Option<&str>, after: Option<&str>) -> bool {
    after == Some(RESERVE_VALUE) && before != Some(RESERVE_VALUE)
}

fn to_partner(before: Option<&str>, after: Option<&str>) -> bool {
    let is_partner = |value: Option<&str>| value.is_some_and(|v| PARTNER_VALUES.contains(&v));
    is_partner(after) && !is_partner(before)
}

pub static TRANSITION_RULES: [TransitionRule; 2] = [
    TransitionRule {
        kind: TransitionKind::ToReserve,
        label: "Признак → Резерв",
        matches: to_reserve,
    },
    TransitionRule {
        kind: TransitionKind::ToPartner,
        label: "Признак → Партнер",
        matches: to_partner,
    },
];

/// Fields whose values differ between the two records, in catalogue order.
pub fn changed_fields(catalog: &FieldCatalog, before: &Record, after: &Record) -> Vec<FieldKey> {
    catalog
        .keys()
        .filter(|key| before.get(*key) != after.get(*key))
        .collect()
}

/// Deduplicate and order change labels: the attribute label first, all
/// others alphabetically.
pub fn order_change_labels(
    catalog: &FieldCatalog,
    labels: impl IntoIterator<Item = String>,
) -> Vec<String> {
    let attribute = catalog.label(FieldKey::Attribute);
    let mut ordered: Vec<String> = labels.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    if let Some(position) = ordered.iter().position(|label| label == attribute) {
        let label = ordered.remove(position);
        ordered.insert(0, label);
    }
    ordered
}

/// Everything downstream consumers need to know about one changed pair,
/// computed once per pipeline run and looked up by key.
#[derive(Debug, Clone, PartialEq)]
pub struct PairChange {
    pub changed: Vec<FieldKey>,
    pub labels: Vec<String>,
    pub transitions: BTreeSet<TransitionKind>,
    pub attribute_before: Option<String>,
    pub attribute_after: Option<String>,
}

/// Build the key→pair lookup for all changed entries.
pub fn build_pair_index(
    catalog: &FieldCatalog,
    entries: &[DiffEntry],
) -> HashMap<WorkplaceId, PairChange> {
    entries
        .iter()
        .filter(|entry| entry.kind == DiffKind::Changed)
        .filter_map(|entry| {
            let before = entry.before.as_ref()?;
            let after = entry.after.as_ref()?;

            let changed = changed_fields(catalog, before, after);
            let labels = order_change_labels(
                catalog,
                changed.iter().map(|key| catalog.label(*key).to_string()),
            );
            let attribute_before = before.get(FieldKey::Attribute).trimmed_text();
            let attribute_after = after.get(FieldKey::Attribute).trimmed_text();
            let transitions = TRANSITION_RULES
                .iter()
                .filter(|rule| {
                    (rule.matches)(attribute_before.as_deref(), attribute_after.as_deref())
                })
                .map(|rule| rule.kind)
                .collect();

            Some((
                entry.key.clone(),
                PairChange {
                    changed,
                    labels,
                    transitions,
                    attribute_before,
                    attribute_after,
                },
            ))
        })
        .collect()
}

/// The grid's "Тип изменения" cell: attribute transitions only, with
/// arrows marking one-sided values.
pub fn attribute_change_cell(
    catalog: &FieldCatalog,
    row: &DisplayRow,
    pairs: &HashMap<WorkplaceId, PairChange>,
) -> String {
    let attribute = catalog.label(FieldKey::Attribute);
    match row.origin {
        RowOrigin::New => match row.record.get(FieldKey::Attribute).trimmed_text() {
            Some(value) => format!("{attribute}: → \"{value}\""),
            None => NO_VALUE.to_string(),
        },
        RowOrigin::Deleted => match row.record.get(FieldKey::Attribute).trimmed_text() {
            Some(value) => format!("{attribute}: \"{value}\" →"),
            None => NO_VALUE.to_string(),
        },
        RowOrigin::Changed => {
            if row.lineage != Lineage::New {
                return NO_VALUE.to_string();
            }
            let Some(pair) = pairs.get(&row.key) else {
                return NO_VALUE.to_string();
            };
            match (&pair.attribute_before, &pair.attribute_after) {
                (Some(before), Some(after)) if before != after => {
                    format!("{attribute}: \"{before}\" → \"{after}\"")
                }
                (Some(_), Some(after)) => format!("{attribute}: \"{after}\""),
                (Some(before), None) => format!("{attribute}: \"{before}\" →"),
                (None, Some(after)) => format!("{attribute}: → \"{after}\""),
                (None, None) => NO_VALUE.to_string(),
            }
        }
    }
}

/// The exporter's change-type text: the full changed-field list, attribute
/// first and quoted with both sides, other fields with their new value.
pub fn change_summary(
    catalog: &FieldCatalog,
    row: &DisplayRow,
    pairs: &HashMap<WorkplaceId, PairChange>,
) -> String {
    match row.origin {
        RowOrigin::New => NEW_RECORD_LABEL.to_string(),
        RowOrigin::Deleted => RECORD_REMOVED_LABEL.to_string(),
        RowOrigin::Changed => {
            if row.lineage != Lineage::New {
                return NO_VALUE.to_string();
            }
            let Some(pair) = pairs.get(&row.key) else {
                return CHANGED_FALLBACK_TEXT.to_string();
            };
            if pair.changed.is_empty() {
                return UNCHANGED_TEXT.to_string();
            }

            let mut fields = pair.changed.clone();
            if let Some(position) = fields.iter().position(|key| *key == FieldKey::Attribute) {
                let key = fields.remove(position);
                fields.insert(0, key);
            }

            fields
                .iter()
                .map(|key| {
                    let label = catalog.label(*key);
                    if *key == FieldKey::Attribute {
                        let before = pair
                            .attribute_before
                            .clone()
                            .unwrap_or_else(|| NO_VALUE.to_string());
                        let after = pair
                            .attribute_after
                            .clone()
                            .unwrap_or_else(|| NO_VALUE.to_string());
                        format!("{label}: \"{before}\" → \"{after}\"")
                    } else {
                        format!("{label}: {}", row.record.get(*key).display_or_placeholder())
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}
