pub mod calculator;
pub mod dropdown;
pub mod form;
pub mod format;
pub mod models;
pub mod workbook;

pub use calculator::{Calculator, TemplatePaths};
pub use dropdown::{DropdownCache, dropdown_values};
pub use form::{BudgetForm, ChoiceField, is_cash_payment};
pub use format::{format_currency, parse_locale_float, parse_locale_int};
pub use models::*;
pub use workbook::{
    BackendRegistry, CellRef, CellValue, MemoryBackend, MemoryWorkbook, OpenMode, Workbook,
    WorkbookBackend, WorkbookError,
};
