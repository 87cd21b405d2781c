use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::Local;
use dioxus::prelude::*;
use rfd::{FileDialog, MessageDialog, MessageLevel};

use crate::domain::classify::{attribute_change_cell, PairChange, TRANSITION_RULES};
use crate::domain::entities::catalog::FieldCatalog;
use crate::domain::entities::record::WorkplaceId;
use crate::domain::entities::row::{DisplayRow, Lineage, RowOrigin, RowStatus};
use crate::domain::filter::{apply_filters, FilterState};
use crate::infra::import::SnapshotFileReader;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::state::app_state::AppState;
use crate::usecase::services::compare_service::CompareService;
use crate::usecase::services::export_service::ExportService;

const CELL_STYLE: &str = "border: 1px solid #d1d5db; padding: 4px 8px; font-size: 13px;";
const HEADER_CELL_STYLE: &str = "border: 1px solid #d1d5db; padding: 6px 8px; font-size: 12px; \
     background: #f3f4f6; font-weight: 600; position: sticky; top: 0;";

fn status_color(status: RowStatus) -> &'static str {
    match status {
        RowStatus::Was => "#ef4444",
        RowStatus::Became => "#22c55e",
        RowStatus::New => "#3b82f6",
        RowStatus::Deleted => "#f97316",
    }
}

fn row_palette(row: &DisplayRow, checked: bool) -> &'static str {
    if checked {
        return "background: #f8f8f8; color: #6b7280; text-decoration: line-through;";
    }
    match (row.origin, row.lineage) {
        (RowOrigin::New, _) => "background: #eff6ff; color: #1e40af; font-weight: 600;",
        (RowOrigin::Deleted, _) => "background: #fef2f2; color: #ef4444;",
        (RowOrigin::Changed, Lineage::Old) => "background: #fef2f2; color: #b91c1c;",
        (RowOrigin::Changed, _) => "background: #f0fdf4; color: #15803d;",
    }
}

struct RowView {
    key: WorkplaceId,
    status: RowStatus,
    /// Field cell text plus whether this field differs from the paired row.
    cells: Vec<(String, bool)>,
    change_text: String,
    row_style: &'static str,
    checked: bool,
}

fn build_row_views(
    catalog: &FieldCatalog,
    rows: &[DisplayRow],
    pairs: &HashMap<WorkplaceId, PairChange>,
    checked_keys: &BTreeSet<WorkplaceId>,
) -> Vec<RowView> {
    rows.iter()
        .map(|row| {
            let checked = checked_keys.contains(&row.key);
            let changed_fields = (row.origin == RowOrigin::Changed
                && row.lineage == Lineage::New)
                .then(|| pairs.get(&row.key).map(|pair| pair.changed.as_slice()))
                .flatten()
                .unwrap_or(&[]);

            let cells = catalog
                .fields()
                .iter()
                .map(|spec| {
                    (
                        row.record.get(spec.key).display_or_placeholder(),
                        changed_fields.contains(&spec.key),
                    )
                })
                .collect();

            RowView {
                key: row.key.clone(),
                status: row.status(),
                cells,
                change_text: attribute_change_cell(catalog, row, pairs),
                row_style: row_palette(row, checked),
                checked,
            }
        })
        .collect()
}

#[component]
fn FilterChipGroup(
    title: &'static str,
    options: Vec<String>,
    selected: BTreeSet<String>,
    disabled: bool,
    on_toggle: EventHandler<(String, bool)>,
) -> Element {
    rsx! {
        div { style: "margin: 6px 0;",
            label { style: "display: block; font-size: 12px; font-weight: 600; color: #374151; margin-bottom: 4px;",
                "{title}"
            }
            div { style: "display: flex; flex-wrap: wrap; gap: 8px; max-height: 96px; overflow-y: auto;",
                for option in options {
                    {
                        let is_checked = selected.contains(&option);
                        let value = option.clone();
                        rsx! {
                            label { style: "display: inline-flex; align-items: center; gap: 4px; font-size: 12px; white-space: nowrap;",
                                input {
                                    r#type: "checkbox",
                                    checked: is_checked,
                                    disabled: disabled,
                                    onchange: move |event| {
                                        let checked = event.value().parse::<bool>().unwrap_or(false);
                                        on_toggle.call((value.clone(), checked));
                                    },
                                }
                                "{option}"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn App() -> Element {
    let catalog = FieldCatalog::workplace();
    let AppState {
        mut before_path,
        mut after_path,
        mut report,
        mut filters,
        mut checked_keys,
        mut busy,
        mut status,
    } = AppState::new();

    let catalog_for_compare = catalog.clone();
    let catalog_for_export = catalog.clone();

    let current_report = report();
    let current_filters = filters();
    let current_checked = checked_keys();
    let visible_rows = current_report
        .as_ref()
        .map(|r| apply_filters(&r.rows, &r.pairs, &current_filters))
        .unwrap_or_default();
    let row_views = current_report
        .as_ref()
        .map(|r| build_row_views(&catalog, &visible_rows, &r.pairs, &current_checked))
        .unwrap_or_default();
    let field_count = catalog.fields().len();
    let header_labels: Vec<&'static str> =
        catalog.fields().iter().map(|spec| spec.label).collect();

    rsx! {
        div { style: "max-width: 1280px; margin: 0 auto; padding: 16px; font-family: sans-serif;",
            h1 { style: "font-size: 22px; font-weight: 700; color: #1f2937; margin-bottom: 12px;",
                "Сравнение снимков реестра РМ"
            }

            div { style: "background: #f9fafb; border-radius: 8px; padding: 12px; margin-bottom: 16px; display: flex; gap: 12px; align-items: center; flex-wrap: wrap;",
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        if busy() {
                            return;
                        }
                        let Some(path) = FileDialog::new()
                            .add_filter("Снимки реестра", &["xlsx", "xls", "csv"])
                            .pick_file() else {
                            return;
                        };
                        *status.write() = format!("Файл «до»: {}", path.display());
                        *before_path.write() = Some(path);
                    },
                    "Первый файл (старый)"
                }
                span { style: "font-size: 12px; color: #6b7280;",
                    {before_path().map(|p| p.display().to_string()).unwrap_or_else(|| "не выбран".to_string())}
                }

                button {
                    disabled: busy(),
                    onclick: move |_| {
                        if busy() {
                            return;
                        }
                        let Some(path) = FileDialog::new()
                            .add_filter("Снимки реестра", &["xlsx", "xls", "csv"])
                            .pick_file() else {
                            return;
                        };
                        *status.write() = format!("Файл «после»: {}", path.display());
                        *after_path.write() = Some(path);
                    },
                    "Второй файл (новый)"
                }
                span { style: "font-size: 12px; color: #6b7280;",
                    {after_path().map(|p| p.display().to_string()).unwrap_or_else(|| "не выбран".to_string())}
                }

                button {
                    disabled: busy(),
                    style: "background: #2563eb; color: white; border: none; border-radius: 6px; padding: 8px 16px; cursor: pointer;",
                    onclick: move |_| {
                        if busy() {
                            return;
                        }
                        let (Some(before), Some(after)) = (before_path(), after_path()) else {
                            MessageDialog::new()
                                .set_level(MessageLevel::Warning)
                                .set_title("Сравнение РМ")
                                .set_description("Пожалуйста, выберите оба файла.")
                                .show();
                            return;
                        };

                        *busy.write() = true;
                        *status.write() = "Обработка...".to_string();

                        let service = CompareService::new(
                            Arc::new(SnapshotFileReader::new(catalog_for_compare.clone())),
                            catalog_for_compare.clone(),
                        );
                        match run_blocking(|| service.compare(&before, &after)) {
                            Ok(result) => {
                                *status.write() = format!("Найдено изменений: {}", result.entries.len());
                                *report.write() = Some(result);
                                *checked_keys.write() = BTreeSet::new();
                            }
                            Err(err) => {
                                MessageDialog::new()
                                    .set_level(MessageLevel::Error)
                                    .set_title("Ошибка чтения")
                                    .set_description(
                                        "Ошибка при чтении файлов. Проверьте, что это корректные файлы реестра.",
                                    )
                                    .show();
                                *status.write() = format!("Ошибка при чтении файлов: {err}");
                            }
                        }

                        *busy.write() = false;
                    },
                    if busy() { "Обработка..." } else { "Сравнить файлы" }
                }

                span { style: "font-size: 12px; color: #374151;", " {status}" }
            }

            if let Some(current) = current_report.clone() {
                div { style: "border-top: 1px solid #e5e7eb; border-bottom: 1px solid #e5e7eb; padding: 10px 4px; margin-bottom: 12px;",
                    div { style: "display: flex; gap: 16px; align-items: center; margin-bottom: 6px;",
                        h3 { style: "font-size: 13px; font-weight: 600; color: #1f2937; margin: 0;", "Фильтры" }
                        button {
                            disabled: busy(),
                            style: "font-size: 12px; color: #6b7280; background: none; border: none; text-decoration: underline; cursor: pointer;",
                            onclick: move |_| {
                                *filters.write() = FilterState::default();
                            },
                            "Сбросить всё"
                        }
                        button {
                            disabled: busy(),
                            style: "font-size: 12px; color: #2563eb; background: none; border: none; text-decoration: underline; cursor: pointer;",
                            onclick: move |_| {
                                if busy() {
                                    return;
                                }
                                let Some(current) = report() else {
                                    return;
                                };
                                let visible = apply_filters(&current.rows, &current.pairs, &filters());
                                if visible.is_empty() {
                                    *status.write() = "Нет строк для выгрузки".to_string();
                                    return;
                                }

                                let default_name =
                                    format!("сравнение_РМ_{}.xlsx", Local::now().format("%Y-%m-%d"));
                                let Some(path) = FileDialog::new()
                                    .add_filter("Excel", &["xlsx"])
                                    .set_file_name(&default_name)
                                    .save_file() else {
                                    *status.write() = "Выгрузка отменена".to_string();
                                    return;
                                };

                                *busy.write() = true;
                                let service = ExportService::new(catalog_for_export.clone());
                                match run_blocking(|| service.export_filtered(&path, &visible, &current.pairs)) {
                                    Ok(()) => {
                                        *status.write() = format!("Файл сохранён: {}", path.display());
                                    }
                                    Err(err) => {
                                        MessageDialog::new()
                                            .set_level(MessageLevel::Error)
                                            .set_title("Выгрузка")
                                            .set_description("Не удалось сохранить файл сравнения.")
                                            .show();
                                        *status.write() = format!("Не удалось сохранить файл: {err}");
                                    }
                                }
                                *busy.write() = false;
                            },
                            "Скачать Excel"
                        }
                    }

                    div { style: "margin: 6px 0;",
                        label { style: "display: block; font-size: 12px; font-weight: 600; color: #374151; margin-bottom: 4px;",
                            "Статус"
                        }
                        div { style: "display: flex; flex-wrap: wrap; gap: 8px;",
                            for row_status in RowStatus::ALL {
                                {
                                    let is_checked = current_filters.status.contains(&row_status);
                                    let color = status_color(row_status);
                                    rsx! {
                                        label { style: "display: inline-flex; align-items: center; gap: 4px; font-size: 12px;",
                                            input {
                                                r#type: "checkbox",
                                                checked: is_checked,
                                                disabled: busy(),
                                                onchange: move |event| {
                                                    let checked = event.value().parse::<bool>().unwrap_or(false);
                                                    let mut next = filters();
                                                    if checked {
                                                        next.status.insert(row_status);
                                                    } else {
                                                        next.status.remove(&row_status);
                                                    }
                                                    *filters.write() = next;
                                                },
                                            }
                                            span { style: "background: {color}; color: white; border-radius: 999px; padding: 2px 8px; font-size: 11px; font-weight: 600;",
                                                {row_status.label()}
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }

                    if !current.options.change_labels.is_empty() {
                        FilterChipGroup {
                            title: "Изменено поле",
                            options: current.options.change_labels.clone(),
                            selected: current_filters.change_labels.clone(),
                            disabled: busy(),
                            on_toggle: move |(value, checked): (String, bool)| {
                                let mut next = filters();
                                if checked {
                                    next.change_labels.insert(value);
                                } else {
                                    next.change_labels.remove(&value);
                                }
                                *filters.write() = next;
                            },
                        }
                    }

                    div { style: "margin: 6px 0;",
                        label { style: "display: block; font-size: 12px; font-weight: 600; color: #374151; margin-bottom: 4px;",
                            "Изменение Признака"
                        }
                        div { style: "display: flex; flex-direction: column; gap: 4px;",
                            for rule in TRANSITION_RULES.iter() {
                                {
                                    let kind = rule.kind;
                                    let is_checked = current_filters.transitions.contains(&kind);
                                    rsx! {
                                        label { style: "display: inline-flex; align-items: center; gap: 4px; font-size: 12px;",
                                            input {
                                                r#type: "checkbox",
                                                checked: is_checked,
                                                disabled: busy(),
                                                onchange: move |event| {
                                                    let checked = event.value().parse::<bool>().unwrap_or(false);
                                                    let mut next = filters();
                                                    if checked {
                                                        next.transitions.insert(kind);
                                                    } else {
                                                        next.transitions.remove(&kind);
                                                    }
                                                    *filters.write() = next;
                                                },
                                            }
                                            span { style: "background: #fef9c3; color: #854d0e; border-radius: 4px; padding: 2px 8px; font-size: 11px; font-weight: 600;",
                                                "{rule.label}"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }

                    if !current.options.addresses.is_empty() {
                        FilterChipGroup {
                            title: "Адрес",
                            options: current.options.addresses.clone(),
                            selected: current_filters.address.clone(),
                            disabled: busy(),
                            on_toggle: move |(value, checked): (String, bool)| {
                                let mut next = filters();
                                if checked {
                                    next.address.insert(value);
                                } else {
                                    next.address.remove(&value);
                                }
                                *filters.write() = next;
                            },
                        }
                    }

                    if !current.options.floors.is_empty() {
                        FilterChipGroup {
                            title: "Этаж",
                            options: current.options.floors.clone(),
                            selected: current_filters.floor.clone(),
                            disabled: busy(),
                            on_toggle: move |(value, checked): (String, bool)| {
                                let mut next = filters();
                                if checked {
                                    next.floor.insert(value);
                                } else {
                                    next.floor.remove(&value);
                                }
                                *filters.write() = next;
                            },
                        }
                    }

                    if !current.options.cities.is_empty() {
                        FilterChipGroup {
                            title: "Город",
                            options: current.options.cities.clone(),
                            selected: current_filters.city.clone(),
                            disabled: busy(),
                            on_toggle: move |(value, checked): (String, bool)| {
                                let mut next = filters();
                                if checked {
                                    next.city.insert(value);
                                } else {
                                    next.city.remove(&value);
                                }
                                *filters.write() = next;
                            },
                        }
                    }

                    if !current.options.quantities.is_empty() {
                        FilterChipGroup {
                            title: "Занятость РМ",
                            options: current.options.quantities.clone(),
                            selected: current_filters.quantity.clone(),
                            disabled: busy(),
                            on_toggle: move |(value, checked): (String, bool)| {
                                let mut next = filters();
                                if checked {
                                    next.quantity.insert(value);
                                } else {
                                    next.quantity.remove(&value);
                                }
                                *filters.write() = next;
                            },
                        }
                    }
                }

                div { style: "overflow-x: auto; max-height: 80vh; border: 1px solid #e5e7eb; border-radius: 8px;",
                    table { style: "border-collapse: collapse; min-width: 100%; font-size: 13px;",
                        thead {
                            tr {
                                th { style: HEADER_CELL_STYLE, "✅" }
                                th { style: HEADER_CELL_STYLE, "Статус" }
                                for label in header_labels.clone() {
                                    th { style: HEADER_CELL_STYLE, "{label}" }
                                }
                                th { style: HEADER_CELL_STYLE, "Тип изменения" }
                            }
                        }
                        tbody {
                            if row_views.is_empty() {
                                tr {
                                    td {
                                        style: "padding: 16px; text-align: center; color: #6b7280;",
                                        colspan: field_count + 3,
                                        "Нет данных по выбранным фильтрам."
                                    }
                                }
                            } else {
                                for view in row_views {
                                    {
                                        let key_for_toggle = view.key.clone();
                                        let status_chip = status_color(view.status);
                                        let change_filter_active = current_filters.is_change_filter_active();
                                        rsx! {
                                            tr {
                                                td { style: "{CELL_STYLE} {view.row_style} text-align: center;",
                                                    input {
                                                        r#type: "checkbox",
                                                        checked: view.checked,
                                                        onchange: move |_| {
                                                            let mut next = checked_keys();
                                                            if !next.remove(&key_for_toggle) {
                                                                next.insert(key_for_toggle.clone());
                                                            }
                                                            *checked_keys.write() = next;
                                                        },
                                                    }
                                                }
                                                td { style: "{CELL_STYLE} {view.row_style}",
                                                    span { style: "background: {status_chip}; color: white; border-radius: 999px; padding: 2px 8px; font-size: 11px; font-weight: 600;",
                                                        {view.status.label()}
                                                    }
                                                }
                                                for (text, field_changed) in view.cells {
                                                    {
                                                        let highlight = if field_changed && !change_filter_active {
                                                            "background: #fef08a;"
                                                        } else if field_changed {
                                                            "font-weight: 700; color: #1d4ed8;"
                                                        } else {
                                                            ""
                                                        };
                                                        rsx! {
                                                            td { style: "{CELL_STYLE} {view.row_style} {highlight}", "{text}" }
                                                        }
                                                    }
                                                }
                                                td { style: "{CELL_STYLE} {view.row_style} font-size: 12px; font-style: italic; color: #dc2626;",
                                                    "{view.change_text}"
                                                }
                                            }
                                            tr {
                                                td { style: "height: 6px; border: none;", colspan: field_count + 3 }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            } else if !busy() {
                p { style: "margin-top: 24px; color: #6b7280;", "Загрузите два файла для сравнения." }
            }
        }
    }
}
