//! Discovers the permitted values of dropdown cells from a workbook's
//! data-validation rules.
//!
//! A list validation's `formula1` takes one of three shapes:
//!
//! | shape              | example                       |
//! |--------------------|-------------------------------|
//! | inline list        | `"Visa,Master,Elo"`           |
//! | same-sheet range   | `$D$1:$D$9`                   |
//! | cross-sheet range  | `'Listas Auxiliares'!A1:A27`  |
//!
//! Anything malformed resolves to an empty list.

use std::{collections::HashMap, path::Path};

use tracing::{debug, warn};

use crate::{
    models::{CellMap, FieldKey},
    workbook::{CellRef, OpenMode, RangeRef, Workbook, WorkbookBackend},
};

/// Resolves the permitted values for `cell` on `sheet`.
pub fn dropdown_values(
    book: &dyn Workbook,
    sheet: &str,
    cell: CellRef,
) -> Vec<String> {
    let rules = book.data_validations(sheet);
    if rules.is_empty() {
        return Vec::new();
    }

    let Some(rule) = rules.iter().find(|rule| rule.applies_to(cell)) else {
        debug!(%cell, sheet, "no validation rule covers cell");
        return Vec::new();
    };
    let Some(formula) = rule.formula1.as_deref() else {
        return Vec::new();
    };

    let formula = formula.trim();
    let formula = formula.strip_prefix('=').unwrap_or(formula);

    let is_inline_list = formula.contains(',')
        && !formula.contains('!')
        && !formula.contains(':')
        && !formula.starts_with('$');

    if is_inline_list {
        split_list(strip_quotes(formula.trim()))
    } else if let Some((sheet_name, range)) = formula.split_once('!') {
        let sheet_name = normalize_sheet_name(sheet_name);
        let target = if book.has_sheet(&sheet_name) {
            sheet_name.as_str()
        } else {
            debug!(sheet = %sheet_name, fallback = sheet, "validation source sheet missing");
            sheet
        };
        values_from_range(book, target, &range.replace('$', ""))
    } else if formula.contains(':') {
        values_from_range(book, sheet, &formula.replace('$', ""))
    } else {
        let cleaned = strip_quotes(formula.trim());
        if cleaned.contains(',') {
            split_list(cleaned)
        } else if cleaned.is_empty() {
            Vec::new()
        } else {
            vec![cleaned.to_string()]
        }
    }
}

/// Collects the string form of every non-empty cell in `range`, row by row.
///
/// Order and duplicates are preserved. A malformed range yields `[]`.
pub fn values_from_range(
    book: &dyn Workbook,
    sheet: &str,
    range: &str,
) -> Vec<String> {
    let range: RangeRef = match range.parse() {
        Ok(range) => range,
        Err(error) => {
            warn!(%error, sheet, "malformed validation range");
            return Vec::new();
        }
    };
    let Some((min, max)) = range.bounds(|| book.extent(sheet)) else {
        return Vec::new();
    };

    let mut values = Vec::new();
    for row in min.row..=max.row {
        for col in min.col..=max.col {
            let value = book.cell(sheet, CellRef::new(col, row));
            if !value.is_empty() {
                values.push(value.to_string());
            }
        }
    }
    values
}

/// Trims a sheet name and removes Excel's `'…'` quoting.
pub fn normalize_sheet_name(name: &str) -> String {
    let name = name.trim();
    match name
        .strip_prefix('\'')
        .and_then(|inner| inner.strip_suffix('\''))
    {
        Some(inner) => inner.replace("''", "'"),
        None => name.to_string(),
    }
}

fn strip_quotes(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}

fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Permitted values per choice field, resolved once per session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropdownCache {
    entries: HashMap<FieldKey, Vec<String>>,
}

impl DropdownCache {
    pub fn from_entries(entries: impl IntoIterator<Item = (FieldKey, Vec<String>)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Resolves every choice field against the workbook's active sheet.
    pub fn load(
        book: &dyn Workbook,
        cells: &CellMap,
    ) -> Self {
        let sheet = book.active_sheet();
        let entries = FieldKey::CHOICES.into_iter().map(|key| {
            let values = dropdown_values(book, &sheet, cells.input(key));
            debug!(field = %key, count = values.len(), "dropdown resolved");
            (key, values)
        });
        Self::from_entries(entries)
    }

    /// Opens the template and loads its dropdowns.
    ///
    /// A missing or unreadable template yields an empty cache.
    pub fn from_template(
        backend: &dyn WorkbookBackend,
        template: &Path,
        cells: &CellMap,
    ) -> Self {
        match backend.open(template, OpenMode::CachedValues) {
            Ok(book) => Self::load(book.as_ref(), cells),
            Err(error) => {
                warn!(%error, template = %template.display(), "dropdowns unavailable");
                Self::default()
            }
        }
    }

    /// Resolved values for `key`, possibly empty.
    pub fn values(
        &self,
        key: FieldKey,
    ) -> &[String] {
        self.entries.get(&key).map(Vec::as_slice).unwrap_or_default()
    }
}
