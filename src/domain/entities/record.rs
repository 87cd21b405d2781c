use std::collections::BTreeMap;

use super::catalog::{FieldCatalog, FieldKey};

/// Placeholder shown wherever a cell has no value.
pub const NO_VALUE: &str = "—";

pub type WorkplaceId = String;

/// A single scalar cell, kept in the storage system's native form.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Null,
}

impl CellValue {
    /// Stringified value, or None when there is nothing to show.
    /// Null and empty text are both "no value"; they only differ for
    /// record equality.
    pub fn display(&self) -> Option<String> {
        match self {
            CellValue::Text(text) if text.is_empty() => None,
            CellValue::Text(text) => Some(text.clone()),
            CellValue::Number(value) => Some(format_number(*value)),
            CellValue::Null => None,
        }
    }

    pub fn display_or_placeholder(&self) -> String {
        self.display().unwrap_or_else(|| NO_VALUE.to_string())
    }

    /// Trimmed text form used by the attribute-transition rules.
    pub fn trimmed_text(&self) -> Option<String> {
        let text = self.display()?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value.fract().abs() < f64::EPSILON {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

static NULL_CELL: CellValue = CellValue::Null;

/// One snapshot row, restricted to the catalogue's fields. Readers insert
/// Null for fields missing from the source row, so equality is plain
/// field-wise value equality.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: BTreeMap<FieldKey, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: FieldKey, value: CellValue) {
        self.values.insert(key, value);
    }

    pub fn get(&self, key: FieldKey) -> &CellValue {
        self.values.get(&key).unwrap_or(&NULL_CELL)
    }

    /// Stringified key-field value; None means the row has no key and is
    /// dropped before reconciliation.
    pub fn key_id(&self, catalog: &FieldCatalog) -> Option<WorkplaceId> {
        self.get(catalog.key_field()).display()
    }

    pub fn eq_fields(&self, other: &Record, catalog: &FieldCatalog) -> bool {
        catalog.keys().all(|key| self.get(key) == other.get(key))
    }

    pub fn is_blank(&self, catalog: &FieldCatalog) -> bool {
        catalog.keys().all(|key| *self.get(key) == CellValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_numbers_without_trailing_zero() {
        assert_eq!(CellValue::Number(5.0).display(), Some("5".to_string()));
        assert_eq!(CellValue::Number(2.5).display(), Some("2.5".to_string()));
        assert_eq!(CellValue::Null.display(), None);
        assert_eq!(CellValue::Text(String::new()).display(), None);
    }

    #[test]
    fn empty_text_and_null_differ_for_equality_but_not_for_display() {
        let empty = CellValue::Text(String::new());

        assert_ne!(empty, CellValue::Null);
        assert_eq!(empty.display_or_placeholder(), NO_VALUE);
        assert_eq!(CellValue::Null.display_or_placeholder(), NO_VALUE);
    }

    #[test]
    fn absent_field_reads_as_null() {
        let catalog = FieldCatalog::workplace();
        let sparse = Record::new();
        let mut explicit = Record::new();
        for key in catalog.keys() {
            explicit.set(key, CellValue::Null);
        }

        assert_eq!(*sparse.get(FieldKey::Address), CellValue::Null);
        assert!(sparse.eq_fields(&explicit, &catalog));
        assert!(sparse.is_blank(&catalog));
    }

    #[test]
    fn key_id_stringifies_numeric_keys() {
        let catalog = FieldCatalog::workplace();
        let mut record = Record::new();
        record.set(FieldKey::WorkplaceId, CellValue::Number(1204.0));

        assert_eq!(record.key_id(&catalog), Some("1204".to_string()));

        record.set(FieldKey::WorkplaceId, CellValue::Null);
        assert_eq!(record.key_id(&catalog), None);
    }
}
