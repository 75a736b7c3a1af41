use std::path::{Path, PathBuf};

use orcamento_core::workbook::{
    CellRef, CellValue, OpenMode, ValidationRule, Workbook, WorkbookError,
};
use tracing::debug;
use umya_spreadsheet::{Spreadsheet, Worksheet, reader, writer};

use crate::value::{cell_value, is_blank};

/// An `.xlsx` document loaded with `umya-spreadsheet`.
pub struct XlsxWorkbook {
    path: PathBuf,
    book: Spreadsheet,
    mode: OpenMode,
}

impl XlsxWorkbook {
    pub fn read(
        path: &Path,
        mode: OpenMode,
    ) -> Result<Self, WorkbookError> {
        let book = reader::xlsx::read(path).map_err(|e| {
            WorkbookError::Format(format!("cannot read '{}': {e}", path.display()))
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            book,
            mode,
        })
    }

    fn sheet(
        &self,
        name: &str,
    ) -> Option<&Worksheet> {
        self.book.get_sheet_by_name(name)
    }
}

impl Workbook for XlsxWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection()
            .iter()
            .map(|sheet| sheet.get_name().to_string())
            .collect()
    }

    fn active_sheet(&self) -> String {
        self.book.get_active_sheet().get_name().to_string()
    }

    fn data_validations(
        &self,
        sheet: &str,
    ) -> Vec<ValidationRule> {
        let Some(validations) = self.sheet(sheet).and_then(Worksheet::get_data_validations) else {
            return Vec::new();
        };
        validations
            .get_data_validation_list()
            .iter()
            .map(|dv| {
                let sqref = dv.get_sequence_of_references().get_sqref();
                let formula = dv.get_formula1();
                ValidationRule::new(&sqref, (!formula.is_empty()).then_some(formula))
            })
            .collect()
    }

    fn cell(
        &self,
        sheet: &str,
        at: CellRef,
    ) -> CellValue {
        self.sheet(sheet)
            .and_then(|ws| ws.get_cell((at.col, at.row)))
            .map(|cell| cell_value(cell, self.mode))
            .unwrap_or_default()
    }

    fn extent(
        &self,
        sheet: &str,
    ) -> Option<CellRef> {
        self.sheet(sheet)?
            .get_cell_collection()
            .into_iter()
            .filter(|cell| !is_blank(cell))
            .map(|cell| {
                let coordinate = cell.get_coordinate();
                CellRef::new(*coordinate.get_col_num(), *coordinate.get_row_num())
            })
            .reduce(|acc, at| CellRef::new(acc.col.max(at.col), acc.row.max(at.row)))
    }

    fn set_cell(
        &mut self,
        sheet: &str,
        at: CellRef,
        value: CellValue,
    ) -> Result<(), WorkbookError> {
        let ws = self
            .book
            .get_sheet_by_name_mut(sheet)
            .ok_or_else(|| WorkbookError::UnknownSheet(sheet.to_string()))?;
        let cell = ws.get_cell_mut((at.col, at.row));
        match value {
            CellValue::Empty => {
                cell.set_blank();
            }
            CellValue::Text(text) => {
                cell.set_value_string(text);
            }
            CellValue::Number(n) => {
                cell.set_value_number(n);
            }
            CellValue::Bool(b) => {
                cell.set_value_bool(b);
            }
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), WorkbookError> {
        debug!(path = %self.path.display(), "saving xlsx");
        writer::xlsx::write(&self.book, &self.path).map_err(|e| {
            WorkbookError::Format(format!("cannot write '{}': {e}", self.path.display()))
        })
    }
}
