use orcamento_core::workbook::{CellValue, OpenMode};
use umya_spreadsheet::{Cell, CellRawValue};

/// Converts a umya cell to a [`CellValue`].
///
/// In [`OpenMode::Formulas`] formula cells report `=` plus their formula;
/// otherwise they report whatever value was cached the last time a
/// spreadsheet engine saved the file.
pub fn cell_value(
    cell: &Cell,
    mode: OpenMode,
) -> CellValue {
    let value = cell.get_cell_value();
    if mode == OpenMode::Formulas && value.is_formula() {
        let formula = value.get_formula();
        return CellValue::Text(if formula.starts_with('=') {
            formula.to_string()
        } else {
            format!("={formula}")
        });
    }

    match value.get_raw_value() {
        CellRawValue::Empty => CellValue::Empty,
        CellRawValue::Numeric(n) => CellValue::Number(*n),
        CellRawValue::Bool(b) => CellValue::Bool(*b),
        // Strings, rich text and error codes all surface as their text.
        _ => {
            let text = cell.get_value();
            if text.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(text.into_owned())
            }
        }
    }
}

/// A cell with neither a value nor a formula.
pub fn is_blank(cell: &Cell) -> bool {
    let value = cell.get_cell_value();
    !value.is_formula() && cell.get_value().is_empty()
}
