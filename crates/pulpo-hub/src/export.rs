//! Spreadsheet-friendly export of the inventory table.

use chrono::NaiveDate;
use pulpo_shared::schemas::Item;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

pub const CSV_HEADERS: [&str; 10] = [
    "Nombre",
    "Categoría",
    "Subcategoría",
    "Unidad",
    "Existencias",
    "Mínimo",
    "Stock Ideal",
    "Estado",
    "Proveedor",
    "Nivel Alerta",
];

/// Byte-order mark so spreadsheet apps pick UTF-8.
const BOM: char = '\u{feff}';

pub const XLSX_SHEET: &str = "Inventario";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Positions in `CSV_HEADERS` that hold quantities.
const NUMERIC_COLUMNS: [usize; 3] = [4, 5, 6];

fn row_cells(item: &Item) -> [String; 10] {
    [
        item.name.clone(),
        item.category.clone(),
        item.subcategory.clone(),
        item.unit.clone(),
        item.stock.to_string(),
        item.min_level.to_string(),
        item.stock_ideal.to_string(),
        item.stock_status.to_string(),
        item.supplier.clone(),
        item.alert_level.to_string(),
    ]
}

fn row_numbers(item: &Item) -> [f64; 3] {
    [item.stock, item.min_level, item.stock_ideal]
}

/// CSV of `items` with every data cell quoted. `None` for an empty list.
pub fn inventory_csv(items: &[&Item]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    for item in items {
        lines.push(
            row_cells(item)
                .iter()
                .map(|c| quote(c))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    Some(format!("{BOM}{}", lines.join("\n")))
}

pub fn inventory_csv_filename(date: NaiveDate) -> String {
    format!("inventario_pulpo_negro_{}.csv", date.format("%Y-%m-%d"))
}

/// Excel workbook with one "Inventario" sheet: a bold header row, then one
/// row per item with quantities stored as numbers. `Ok(None)` for an empty list.
pub fn inventory_xlsx(items: &[&Item]) -> Result<Option<Vec<u8>>, XlsxError> {
    if items.is_empty() {
        return Ok(None);
    }
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(XLSX_SHEET)?;
    for (col, title) in (0u16..).zip(CSV_HEADERS) {
        sheet.write_string_with_format(0, col, title, &header)?;
    }
    for (row, item) in (1u32..).zip(items) {
        let numbers = row_numbers(item);
        for (col, cell) in row_cells(item).iter().enumerate() {
            let col_num = col as u16;
            match NUMERIC_COLUMNS.iter().position(|&c| c == col) {
                Some(n) => sheet.write_number(row, col_num, numbers[n])?,
                None => sheet.write_string(row, col_num, cell)?,
            };
        }
    }
    sheet.set_freeze_panes(1, 0)?;
    sheet.autofit();
    workbook.save_to_buffer().map(Some)
}

pub fn inventory_xlsx_filename(date: NaiveDate) -> String {
    format!("inventario_pulpo_negro_{}.xlsx", date.format("%Y-%m-%d"))
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}
