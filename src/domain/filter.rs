use std::collections::{BTreeSet, HashMap};

use crate::domain::classify::{
    order_change_labels, PairChange, TransitionKind, NEW_RECORD_LABEL, RECORD_REMOVED_LABEL,
};
use crate::domain::entities::catalog::{FieldCatalog, FieldKey};
use crate::domain::entities::diff::{DiffEntry, DiffKind};
use crate::domain::entities::record::{CellValue, WorkplaceId};
use crate::domain::entities::row::{DisplayRow, Lineage, RowOrigin, RowStatus};

/// User-selected restrictions. Axes compose by AND; within one axis the
/// selected set is an OR. An empty set leaves its axis unrestricted, except
/// for status, which starts with all four labels selected.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub status: BTreeSet<RowStatus>,
    pub address: BTreeSet<String>,
    pub floor: BTreeSet<String>,
    pub city: BTreeSet<String>,
    pub quantity: BTreeSet<String>,
    pub change_labels: BTreeSet<String>,
    pub transitions: BTreeSet<TransitionKind>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            status: RowStatus::ALL.into_iter().collect(),
            address: BTreeSet::new(),
            floor: BTreeSet::new(),
            city: BTreeSet::new(),
            quantity: BTreeSet::new(),
            change_labels: BTreeSet::new(),
            transitions: BTreeSet::new(),
        }
    }
}

impl FilterState {
    pub fn is_change_filter_active(&self) -> bool {
        !self.change_labels.is_empty() || !self.transitions.is_empty()
    }
}

fn member_if_present(selected: &BTreeSet<String>, value: &CellValue) -> bool {
    if selected.is_empty() {
        return true;
    }
    match value.display() {
        Some(text) => selected.contains(&text),
        None => true,
    }
}

fn matches_change_labels(
    row: &DisplayRow,
    pairs: &HashMap<WorkplaceId, PairChange>,
    selected: &BTreeSet<String>,
) -> bool {
    match row.origin {
        RowOrigin::New => selected.contains(NEW_RECORD_LABEL),
        RowOrigin::Deleted => selected.contains(RECORD_REMOVED_LABEL),
        RowOrigin::Changed => {
            row.lineage == Lineage::New
                && pairs
                    .get(&row.key)
                    .is_some_and(|pair| pair.labels.iter().any(|label| selected.contains(label)))
        }
    }
}

fn row_visible(
    row: &DisplayRow,
    pairs: &HashMap<WorkplaceId, PairChange>,
    filters: &FilterState,
) -> bool {
    if !filters.status.contains(&row.status()) {
        return false;
    }

    if !member_if_present(&filters.address, row.record.get(FieldKey::Address)) {
        return false;
    }
    if !member_if_present(&filters.floor, row.record.get(FieldKey::Floor)) {
        return false;
    }
    if !filters.city.is_empty() {
        if let Some(city) = &row.city {
            if !filters.city.contains(city) {
                return false;
            }
        }
    }
    if !member_if_present(&filters.quantity, &row.quantity) {
        return false;
    }

    if !filters.change_labels.is_empty() && !matches_change_labels(row, pairs, &filters.change_labels)
    {
        return false;
    }

    for kind in &filters.transitions {
        let matches = row.origin == RowOrigin::Changed
            && row.lineage == Lineage::New
            && pairs
                .get(&row.key)
                .is_some_and(|pair| pair.transitions.contains(kind));
        if !matches {
            return false;
        }
    }

    true
}

/// The ordered subsequence of rows satisfying every active axis.
pub fn apply_filters(
    rows: &[DisplayRow],
    pairs: &HashMap<WorkplaceId, PairChange>,
    filters: &FilterState,
) -> Vec<DisplayRow> {
    rows.iter()
        .filter(|row| row_visible(row, pairs, filters))
        .cloned()
        .collect()
}

/// The unique values each filter axis offers, collected once per run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub addresses: Vec<String>,
    pub floors: Vec<String>,
    pub cities: Vec<String>,
    pub quantities: Vec<String>,
    pub change_labels: Vec<String>,
}

pub fn collect_filter_options(
    catalog: &FieldCatalog,
    entries: &[DiffEntry],
    rows: &[DisplayRow],
    pairs: &HashMap<WorkplaceId, PairChange>,
) -> FilterOptions {
    let field_values = |key: FieldKey| -> Vec<String> {
        rows.iter()
            .filter_map(|row| row.record.get(key).display())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    };

    let cities = rows
        .iter()
        .filter_map(|row| row.city.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut quantities: Vec<String> = rows
        .iter()
        .filter_map(|row| row.quantity.display())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    quantities.sort_by(|a, b| match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(left), Ok(right)) => left.partial_cmp(&right).unwrap_or(std::cmp::Ordering::Equal),
        _ => a.cmp(b),
    });

    let mut labels: BTreeSet<String> = pairs
        .values()
        .flat_map(|pair| pair.labels.iter().cloned())
        .collect();
    if entries.iter().any(|entry| entry.kind == DiffKind::New) {
        labels.insert(NEW_RECORD_LABEL.to_string());
    }
    if entries.iter().any(|entry| entry.kind == DiffKind::Deleted) {
        labels.insert(RECORD_REMOVED_LABEL.to_string());
    }

    FilterOptions {
        addresses: field_values(FieldKey::Address),
        floors: field_values(FieldKey::Floor),
        cities,
        quantities,
        change_labels: order_change_labels(catalog, labels),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classify::build_pair_index;
    use crate::domain::diff::diff_snapshots;
    use crate::domain::entities::record::Record;
    use crate::domain::project::project_rows;

    struct Fixture {
        rows: Vec<DisplayRow>,
        pairs: HashMap<WorkplaceId, PairChange>,
    }

    fn record(key: &str, address: &str, floor: f64, attribute: &str, quantity: f64) -> Record {
        let mut record = Record::new();
        record.set(FieldKey::WorkplaceId, CellValue::Text(key.to_string()));
        record.set(FieldKey::Address, CellValue::Text(address.to_string()));
        record.set(FieldKey::Floor, CellValue::Number(floor));
        record.set(FieldKey::Attribute, CellValue::Text(attribute.to_string()));
        record.set(FieldKey::Quantity, CellValue::Number(quantity));
        record
    }

    // One changed pair (A, to reserve), one new row (B), one deleted row (C).
    fn fixture() -> Fixture {
        let catalog = FieldCatalog::workplace();
        let before = vec![
            record("A", "г Москва, ул Ленина", 2.0, "Партнер", 1.0),
            record("C", "г Тверь, пл Мира", 1.0, "Свободно", 1.0),
        ];
        let after = vec![
            record("A", "г Москва, ул Ленина", 2.0, "Резерв", 1.0),
            record("B", "г Казань, ул Баумана", 3.0, "Свободно", 2.0),
        ];
        let entries = diff_snapshots(&catalog, &before, &after);
        let rows = project_rows(&entries);
        let pairs = build_pair_index(&catalog, &entries);
        Fixture { rows, pairs }
    }

    #[test]
    fn default_filters_keep_everything() {
        let fixture = fixture();
        let filters = FilterState::default();

        let visible = apply_filters(&fixture.rows, &fixture.pairs, &filters);

        assert_eq!(visible.len(), fixture.rows.len());
    }

    #[test]
    fn status_axis_drops_unselected_statuses() {
        let fixture = fixture();
        let mut filters = FilterState::default();
        filters.status = [RowStatus::New, RowStatus::Deleted].into_iter().collect();

        let visible = apply_filters(&fixture.rows, &fixture.pairs, &filters);

        let statuses: Vec<RowStatus> = visible.iter().map(|row| row.status()).collect();
        assert_eq!(statuses, vec![RowStatus::New, RowStatus::Deleted]);
    }

    #[test]
    fn axis_membership_is_or_within_and_between() {
        let fixture = fixture();
        let mut filters = FilterState::default();
        filters.city = ["Москва".to_string(), "Казань".to_string()]
            .into_iter()
            .collect();

        let visible = apply_filters(&fixture.rows, &fixture.pairs, &filters);
        assert_eq!(visible.len(), 3, "both cities pass the city axis");

        filters.floor = ["3".to_string()].into_iter().collect();
        let visible = apply_filters(&fixture.rows, &fixture.pairs, &filters);
        let keys: Vec<&str> = visible.iter().map(|row| row.key.as_str()).collect();
        assert_eq!(keys, vec!["B"], "floor axis ANDs with the city axis");
    }

    #[test]
    fn rows_without_a_value_pass_a_restricted_axis() {
        let catalog = FieldCatalog::workplace();
        let mut bare = Record::new();
        bare.set(FieldKey::WorkplaceId, CellValue::Text("N".to_string()));
        let entries = diff_snapshots(&catalog, &[], &[bare]);
        let rows = project_rows(&entries);
        let pairs = HashMap::new();

        let mut filters = FilterState::default();
        filters.address = ["г Москва, ул Ленина".to_string()].into_iter().collect();
        filters.quantity = ["1".to_string()].into_iter().collect();

        let visible = apply_filters(&rows, &pairs, &filters);
        assert_eq!(visible.len(), 1, "absent values never cause a drop");
    }

    #[test]
    fn change_label_axis_matches_origin_and_pair_labels() {
        let fixture = fixture();
        let mut filters = FilterState::default();
        filters.change_labels = ["Признак".to_string()].into_iter().collect();

        let visible = apply_filters(&fixture.rows, &fixture.pairs, &filters);
        let keys: Vec<(&str, Lineage)> = visible
            .iter()
            .map(|row| (row.key.as_str(), row.lineage))
            .collect();
        assert_eq!(
            keys,
            vec![("A", Lineage::New)],
            "only the new half of the changed pair carries the label"
        );

        filters.change_labels = [NEW_RECORD_LABEL.to_string()].into_iter().collect();
        let visible = apply_filters(&fixture.rows, &fixture.pairs, &filters);
        let keys: Vec<&str> = visible.iter().map(|row| row.key.as_str()).collect();
        assert_eq!(keys, vec!["B"]);
    }

    #[test]
    fn transition_axis_keeps_only_matching_new_halves() {
        let fixture = fixture();
        let mut filters = FilterState::default();
        filters.transitions = [TransitionKind::ToReserve].into_iter().collect();

        let visible = apply_filters(&fixture.rows, &fixture.pairs, &filters);
        let keys: Vec<(&str, Lineage)> = visible
            .iter()
            .map(|row| (row.key.as_str(), row.lineage))
            .collect();
        assert_eq!(keys, vec![("A", Lineage::New)]);

        filters.transitions = [TransitionKind::ToPartner].into_iter().collect();
        let visible = apply_filters(&fixture.rows, &fixture.pairs, &filters);
        assert!(visible.is_empty(), "no pair moved to a partner attribute");
    }

    #[test]
    fn two_active_axes_intersect_single_axis_results() {
        let fixture = fixture();

        let mut city_only = FilterState::default();
        city_only.city = ["Москва".to_string()].into_iter().collect();
        let mut status_only = FilterState::default();
        status_only.status = [RowStatus::Became].into_iter().collect();

        let mut both = FilterState::default();
        both.city = city_only.city.clone();
        both.status = status_only.status.clone();

        let city_rows = apply_filters(&fixture.rows, &fixture.pairs, &city_only);
        let status_rows = apply_filters(&fixture.rows, &fixture.pairs, &status_only);
        let combined = apply_filters(&fixture.rows, &fixture.pairs, &both);

        let expected: Vec<&DisplayRow> = city_rows
            .iter()
            .filter(|row| status_rows.contains(row))
            .collect();
        assert_eq!(combined.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn options_sort_quantities_numerically_and_labels_attribute_first() {
        let catalog = FieldCatalog::workplace();
        let before = vec![record("A", "г Москва", 2.0, "Партнер", 10.0)];
        let after = vec![
            record("A", "г Москва", 3.0, "Резерв", 2.0),
            record("B", "г Казань", 1.0, "Свободно", 9.0),
        ];
        let entries = diff_snapshots(&catalog, &before, &after);
        let rows = project_rows(&entries);
        let pairs = build_pair_index(&catalog, &entries);

        let options = collect_filter_options(&catalog, &entries, &rows, &pairs);

        assert_eq!(options.quantities, vec!["2", "9", "10"]);
        assert_eq!(
            options.change_labels,
            vec![
                "Признак".to_string(),
                "Кол-во".to_string(),
                NEW_RECORD_LABEL.to_string(),
                "Этаж".to_string(),
            ]
        );
        assert_eq!(options.cities, vec!["Казань", "Москва"]);
    }
}
