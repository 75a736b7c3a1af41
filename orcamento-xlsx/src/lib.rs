//! `.xlsx` backend for the budget calculator, built on `umya-spreadsheet`.

mod factory;
mod value;
mod workbook;

pub use factory::XlsxBackend;
pub use workbook::XlsxWorkbook;
