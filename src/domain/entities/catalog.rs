/// Columns of interest in a workplace snapshot, in catalogue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Address,
    Floor,
    WorkplaceId,
    WorkplaceKind,
    Attribute,
    PersonnelId,
    FullName,
    Department,
    Owner,
    Division,
    Tribe,
    DateFrom,
    Status,
    Quantity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: FieldKey,
    pub label: &'static str,
    /// 1-based column index in the upstream workbook.
    pub column: u32,
}

/// The field/label catalogue is an explicit value handed to every component
/// rather than a module-level constant, so the pipeline stays usable for a
/// differently-shaped dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCatalog {
    fields: Vec<FieldSpec>,
    key_field: FieldKey,
}

impl FieldCatalog {
    pub fn new(fields: Vec<FieldSpec>, key_field: FieldKey) -> Self {
        Self { fields, key_field }
    }

    /// The workplace-records catalogue used by the comparison tool.
    pub fn workplace() -> Self {
        let fields = vec![
            FieldSpec {
                key: FieldKey::Address,
                label: "Адрес",
                column: 4,
            },
            FieldSpec {
                key: FieldKey::Floor,
                label: "Этаж",
                column: 13,
            },
            FieldSpec {
                key: FieldKey::WorkplaceId,
                label: "РМ",
                column: 20,
            },
            FieldSpec {
                key: FieldKey::WorkplaceKind,
                label: "Тип РМ",
                column: 25,
            },
            FieldSpec {
                key: FieldKey::Attribute,
                label: "Признак",
                column: 39,
            },
            FieldSpec {
                key: FieldKey::PersonnelId,
                label: "Таб. №",
                column: 40,
            },
            FieldSpec {
                key: FieldKey::FullName,
                label: "ФИО",
                column: 41,
            },
            FieldSpec {
                key: FieldKey::Department,
                label: "Департамент",
                column: 45,
            },
            FieldSpec {
                key: FieldKey::Owner,
                label: "Ответственный",
                column: 49,
            },
            FieldSpec {
                key: FieldKey::Division,
                label: "ДП",
                column: 52,
            },
            FieldSpec {
                key: FieldKey::Tribe,
                label: "Трайб",
                column: 54,
            },
            FieldSpec {
                key: FieldKey::DateFrom,
                label: "Дата с",
                column: 59,
            },
            FieldSpec {
                key: FieldKey::Status,
                label: "Статус",
                column: 62,
            },
            FieldSpec {
                key: FieldKey::Quantity,
                label: "Кол-во",
                column: 64,
            },
        ];
        Self::new(fields, FieldKey::WorkplaceId)
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.fields.iter().map(|spec| spec.key)
    }

    pub fn key_field(&self) -> FieldKey {
        self.key_field
    }

    pub fn label(&self, key: FieldKey) -> &'static str {
        self.fields
            .iter()
            .find(|spec| spec.key == key)
            .map(|spec| spec.label)
            .unwrap_or("")
    }

    pub fn spec_by_label(&self, label: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workplace_catalog_keys_the_workplace_id_column() {
        let catalog = FieldCatalog::workplace();

        assert_eq!(catalog.fields().len(), 14);
        assert_eq!(catalog.key_field(), FieldKey::WorkplaceId);
        assert_eq!(catalog.label(FieldKey::WorkplaceId), "РМ");
        assert_eq!(catalog.label(FieldKey::Attribute), "Признак");
    }

    #[test]
    fn spec_lookup_by_label_matches_exact_label() {
        let catalog = FieldCatalog::workplace();

        let spec = catalog
            .spec_by_label("Этаж")
            .expect("floor label should resolve");
        assert_eq!(spec.key, FieldKey::Floor);
        assert_eq!(spec.column, 13);

        assert!(catalog.spec_by_label("нет такого").is_none());
    }
}
