use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook};

use crate::domain::classify::{change_summary, PairChange};
use crate::domain::entities::catalog::FieldCatalog;
use crate::domain::entities::record::WorkplaceId;
use crate::domain::entities::row::{DisplayRow, Lineage, RowOrigin};

pub const EXPORT_SHEET_NAME: &str = "Сравнение данных";
pub const STATUS_HEADER: &str = "Статус";
pub const CHANGE_TYPE_HEADER: &str = "Тип изменения";

const MIN_COLUMN_WIDTH: usize = 10;
const MAX_COLUMN_WIDTH: usize = 50;

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x555555))
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter)
}

fn row_format(row: &DisplayRow) -> Format {
    match (row.origin, row.lineage) {
        (RowOrigin::New, _) => Format::new().set_background_color(Color::RGB(0xF0F0FF)),
        (RowOrigin::Deleted, _) => Format::new()
            .set_background_color(Color::RGB(0xFFF0D0))
            .set_font_strikethrough(),
        (RowOrigin::Changed, Lineage::Old) => {
            Format::new().set_background_color(Color::RGB(0xFFF0F0))
        }
        (RowOrigin::Changed, _) => Format::new().set_background_color(Color::RGB(0xF0FFF0)),
    }
}

fn row_cells(
    catalog: &FieldCatalog,
    row: &DisplayRow,
    pairs: &HashMap<WorkplaceId, PairChange>,
) -> Vec<String> {
    let mut cells = Vec::with_capacity(catalog.fields().len() + 2);
    cells.push(row.status().label().to_string());
    for spec in catalog.fields() {
        cells.push(row.record.get(spec.key).display_or_placeholder());
    }
    cells.push(change_summary(catalog, row, pairs));
    cells
}

/// Write the filtered comparison to an xlsx workbook: status column, the
/// catalogue's fields, and the change-type column, with per-status row
/// fills matching the grid.
pub fn write_comparison(
    path: &Path,
    catalog: &FieldCatalog,
    rows: &[DisplayRow],
    pairs: &HashMap<WorkplaceId, PairChange>,
) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(EXPORT_SHEET_NAME)
        .context("failed to name export sheet")?;

    let mut headers = Vec::with_capacity(catalog.fields().len() + 2);
    headers.push(STATUS_HEADER.to_string());
    headers.extend(catalog.fields().iter().map(|spec| spec.label.to_string()));
    headers.push(CHANGE_TYPE_HEADER.to_string());

    let header_style = header_format();
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header.as_str(), &header_style)
            .with_context(|| format!("failed to write header: {header}"))?;
    }
    worksheet
        .set_row_height(0, 20)
        .context("failed to size header row")?;

    let mut widths: Vec<usize> = headers
        .iter()
        .map(|header| header.chars().count().max(MIN_COLUMN_WIDTH))
        .collect();

    for (row_idx, row) in rows.iter().enumerate() {
        let style = row_format(row);
        for (col, cell) in row_cells(catalog, row, pairs).iter().enumerate() {
            worksheet
                .write_string_with_format(row_idx as u32 + 1, col as u16, cell.as_str(), &style)
                .with_context(|| format!("failed to write row {}", row_idx + 1))?;
            widths[col] = widths[col].max(cell.chars().count());
        }
    }

    for (col, width) in widths.iter().enumerate() {
        let width = (width + 2).min(MAX_COLUMN_WIDTH);
        worksheet
            .set_column_width(col as u16, width as f64)
            .with_context(|| format!("failed to size column {col}"))?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed to save workbook: {}", path.display()))?;

    Ok(())
}
