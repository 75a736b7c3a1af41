//! Document-library-agnostic view of a spreadsheet workbook.
//!
//! The resolver and the calculator only ever talk to the [`Workbook`] and
//! [`WorkbookBackend`] traits. `orcamento-xlsx` provides the real
//! implementation; [`memory`] provides an in-memory one for tests.

pub mod backend;
pub mod memory;
pub mod reference;

use std::{fmt, path::PathBuf};

use thiserror::Error;

pub use backend::{BackendRegistry, WorkbookBackend};
pub use memory::{MemoryBackend, MemoryWorkbook};
pub use reference::{CellRef, RangeRef, ReferenceError, parse_sqref};

#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("workbook not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unreadable workbook: {0}")]
    Format(String),

    #[error("no sheet named '{0}'")]
    UnknownSheet(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// How formula cells report their content once a workbook is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Formula cells read back as their formula text (`=B4*B5`).
    Formulas,
    /// Formula cells read back as the value an external engine last stored.
    CachedValues,
}

/// The content of one cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    /// Numeric view of the cell. Text is coerced when it parses as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Empty => None,
            Self::Number(n) => Some(*n),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(text) => f.write_str(text),
            // Whole numbers print without a fractional part ("12", not "12.0").
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(true) => f.write_str("TRUE"),
            Self::Bool(false) => f.write_str("FALSE"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

/// A data-validation rule attached to one or more ranges of a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRule {
    pub sqref: Vec<RangeRef>,
    pub formula1: Option<String>,
}

impl ValidationRule {
    pub fn new(
        sqref: &str,
        formula1: Option<&str>,
    ) -> Self {
        Self {
            sqref: parse_sqref(sqref),
            formula1: formula1.map(str::to_string),
        }
    }

    pub fn applies_to(
        &self,
        cell: CellRef,
    ) -> bool {
        self.sqref.iter().any(|range| range.contains(cell))
    }
}

/// An opened workbook document.
///
/// Handles are scoped: dropping one closes the document without saving.
pub trait Workbook {
    fn sheet_names(&self) -> Vec<String>;

    /// Name of the sheet that was active when the document was saved.
    fn active_sheet(&self) -> String;

    /// Validation rules of `sheet` in declaration order.
    fn data_validations(
        &self,
        sheet: &str,
    ) -> Vec<ValidationRule>;

    fn cell(
        &self,
        sheet: &str,
        at: CellRef,
    ) -> CellValue;

    /// Highest used column and row of `sheet`, or `None` if it holds no cells.
    fn extent(
        &self,
        sheet: &str,
    ) -> Option<CellRef>;

    fn set_cell(
        &mut self,
        sheet: &str,
        at: CellRef,
        value: CellValue,
    ) -> Result<(), WorkbookError>;

    /// Persists the document back to the path it was opened from.
    fn save(&mut self) -> Result<(), WorkbookError>;

    fn has_sheet(
        &self,
        name: &str,
    ) -> bool {
        self.sheet_names().iter().any(|sheet| sheet == name)
    }
}
