//! In-memory workbook and backend.
//!
//! Mirrors the behaviour of a real document closely enough to drive the
//! resolver and the calculator in tests: formula cells keep both their
//! formula text and a cached value, and saving writes back into the
//! backend's path-keyed store.

use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use super::{CellRef, CellValue, OpenMode, ValidationRule, Workbook, WorkbookBackend, WorkbookError};

type DocumentStore = Arc<Mutex<HashMap<PathBuf, MemoryWorkbook>>>;

#[derive(Debug, Clone, Default, PartialEq)]
struct MemoryCell {
    value: CellValue,
    formula: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct MemorySheet {
    name: String,
    cells: BTreeMap<CellRef, MemoryCell>,
    validations: Vec<ValidationRule>,
}

impl MemorySheet {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: BTreeMap::new(),
            validations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct Origin {
    path: PathBuf,
    store: DocumentStore,
}

/// A workbook held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryWorkbook {
    sheets: Vec<MemorySheet>,
    active: usize,
    mode: OpenMode,
    origin: Option<Origin>,
}

impl MemoryWorkbook {
    /// Creates a workbook with a single, active sheet.
    pub fn new(first_sheet: &str) -> Self {
        Self {
            sheets: vec![MemorySheet::new(first_sheet)],
            active: 0,
            mode: OpenMode::CachedValues,
            origin: None,
        }
    }

    pub fn with_sheet(
        mut self,
        name: &str,
    ) -> Self {
        if !self.has_sheet(name) {
            self.sheets.push(MemorySheet::new(name));
        }
        self
    }

    /// Makes `name` the active sheet, adding it if needed.
    pub fn with_active_sheet(
        mut self,
        name: &str,
    ) -> Self {
        self = self.with_sheet(name);
        self.active = self.index_of(name).unwrap_or(0);
        self
    }

    pub fn with_cell(
        mut self,
        sheet: &str,
        at: CellRef,
        value: impl Into<CellValue>,
    ) -> Self {
        self.sheet_entry(sheet).cells.insert(
            at,
            MemoryCell {
                value: value.into(),
                formula: None,
            },
        );
        self
    }

    /// Adds a formula cell whose last computed value is `cached`.
    pub fn with_formula(
        mut self,
        sheet: &str,
        at: CellRef,
        formula: &str,
        cached: impl Into<CellValue>,
    ) -> Self {
        self.sheet_entry(sheet).cells.insert(
            at,
            MemoryCell {
                value: cached.into(),
                formula: Some(formula.trim_start_matches('=').to_string()),
            },
        );
        self
    }

    pub fn with_validation(
        mut self,
        sheet: &str,
        sqref: &str,
        formula1: Option<&str>,
    ) -> Self {
        self.sheet_entry(sheet)
            .validations
            .push(ValidationRule::new(sqref, formula1));
        self
    }

    fn index_of(
        &self,
        name: &str,
    ) -> Option<usize> {
        self.sheets.iter().position(|sheet| sheet.name == name)
    }

    fn sheet(
        &self,
        name: &str,
    ) -> Option<&MemorySheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    fn sheet_entry(
        &mut self,
        name: &str,
    ) -> &mut MemorySheet {
        let index = match self.index_of(name) {
            Some(index) => index,
            None => {
                self.sheets.push(MemorySheet::new(name));
                self.sheets.len() - 1
            }
        };
        &mut self.sheets[index]
    }

    fn detached(&self) -> Self {
        Self {
            origin: None,
            ..self.clone()
        }
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }

    fn active_sheet(&self) -> String {
        self.sheets
            .get(self.active)
            .map(|sheet| sheet.name.clone())
            .unwrap_or_default()
    }

    fn data_validations(
        &self,
        sheet: &str,
    ) -> Vec<ValidationRule> {
        self.sheet(sheet)
            .map(|sheet| sheet.validations.clone())
            .unwrap_or_default()
    }

    fn cell(
        &self,
        sheet: &str,
        at: CellRef,
    ) -> CellValue {
        let Some(cell) = self.sheet(sheet).and_then(|sheet| sheet.cells.get(&at)) else {
            return CellValue::Empty;
        };
        match (&cell.formula, self.mode) {
            (Some(formula), OpenMode::Formulas) => CellValue::Text(format!("={formula}")),
            _ => cell.value.clone(),
        }
    }

    fn extent(
        &self,
        sheet: &str,
    ) -> Option<CellRef> {
        let sheet = self.sheet(sheet)?;
        sheet
            .cells
            .iter()
            .filter(|(_, cell)| !cell.value.is_empty() || cell.formula.is_some())
            .map(|(at, _)| *at)
            .reduce(|acc, at| CellRef::new(acc.col.max(at.col), acc.row.max(at.row)))
    }

    fn set_cell(
        &mut self,
        sheet: &str,
        at: CellRef,
        value: CellValue,
    ) -> Result<(), WorkbookError> {
        let index = self
            .index_of(sheet)
            .ok_or_else(|| WorkbookError::UnknownSheet(sheet.to_string()))?;
        self.sheets[index].cells.insert(
            at,
            MemoryCell {
                value,
                formula: None,
            },
        );
        Ok(())
    }

    fn save(&mut self) -> Result<(), WorkbookError> {
        let origin = self.origin.as_ref().ok_or_else(|| {
            WorkbookError::Configuration("workbook was not opened from a backend".to_string())
        })?;
        lock(&origin.store).insert(origin.path.clone(), self.detached());
        Ok(())
    }
}

/// Path-keyed store of [`MemoryWorkbook`]s.
///
/// Clones share the same store, so a test can keep a handle and inspect
/// what the calculator saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    documents: DocumentStore,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &self,
        path: impl Into<PathBuf>,
        book: MemoryWorkbook,
    ) {
        lock(&self.documents).insert(path.into(), book.detached());
    }

    /// A snapshot of the document stored at `path`.
    pub fn document(
        &self,
        path: &Path,
    ) -> Option<MemoryWorkbook> {
        lock(&self.documents).get(path).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.documents).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WorkbookBackend for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn open(
        &self,
        path: &Path,
        mode: OpenMode,
    ) -> Result<Box<dyn Workbook>, WorkbookError> {
        let mut book = self
            .document(path)
            .ok_or_else(|| WorkbookError::NotFound(path.to_path_buf()))?;
        book.mode = mode;
        book.origin = Some(Origin {
            path: path.to_path_buf(),
            store: Arc::clone(&self.documents),
        });
        Ok(Box::new(book))
    }

    fn exists(
        &self,
        path: &Path,
    ) -> bool {
        lock(&self.documents).contains_key(path)
    }

    fn copy(
        &self,
        from: &Path,
        to: &Path,
    ) -> Result<(), WorkbookError> {
        let mut documents = lock(&self.documents);
        let book = documents
            .get(from)
            .cloned()
            .ok_or_else(|| WorkbookError::NotFound(from.to_path_buf()))?;
        documents.insert(to.to_path_buf(), book);
        Ok(())
    }
}

fn lock(store: &DocumentStore) -> MutexGuard<'_, HashMap<PathBuf, MemoryWorkbook>> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(text: &str) -> CellRef {
        text.parse().unwrap()
    }

    #[test]
    fn open_mode_controls_formula_cells() {
        let backend = MemoryBackend::new();
        backend.insert(
            "book.xlsx",
            MemoryWorkbook::new("Plan1").with_formula("Plan1", at("B6"), "=B4*2", 40.0),
        );

        let formulas = backend.open(Path::new("book.xlsx"), OpenMode::Formulas).unwrap();
        let cached = backend
            .open(Path::new("book.xlsx"), OpenMode::CachedValues)
            .unwrap();

        assert_eq!(formulas.cell("Plan1", at("B6")), CellValue::from("=B4*2"));
        assert_eq!(cached.cell("Plan1", at("B6")), CellValue::Number(40.0));
    }

    #[test]
    fn save_writes_back_to_the_store() {
        let backend = MemoryBackend::new();
        backend.insert("book.xlsx", MemoryWorkbook::new("Plan1"));

        let mut book = backend.open(Path::new("book.xlsx"), OpenMode::Formulas).unwrap();
        book.set_cell("Plan1", at("B3"), "Simples".into()).unwrap();

        let before = backend.document(Path::new("book.xlsx")).unwrap();
        assert_eq!(before.cell("Plan1", at("B3")), CellValue::Empty);

        book.save().unwrap();
        let after = backend.document(Path::new("book.xlsx")).unwrap();
        assert_eq!(after.cell("Plan1", at("B3")), CellValue::from("Simples"));
    }

    #[test]
    fn detached_workbook_cannot_save() {
        let mut book = MemoryWorkbook::new("Plan1");

        assert!(matches!(book.save(), Err(WorkbookError::Configuration(_))));
    }

    #[test]
    fn writing_to_unknown_sheet_fails() {
        let mut book = MemoryWorkbook::new("Plan1");

        let err = book.set_cell("Nope", at("A1"), CellValue::Number(1.0)).unwrap_err();
        assert!(matches!(err, WorkbookError::UnknownSheet(name) if name == "Nope"));
    }

    #[test]
    fn extent_ignores_blank_cells() {
        let book = MemoryWorkbook::new("Plan1")
            .with_cell("Plan1", at("C2"), "x")
            .with_cell("Plan1", at("A9"), "")
            .with_cell("Plan1", at("B5"), 1.0);

        assert_eq!(book.extent("Plan1"), Some(at("C5")));
        assert_eq!(MemoryWorkbook::new("Empty").extent("Empty"), None);
    }

    #[test]
    fn copy_overwrites_destination() {
        let backend = MemoryBackend::new();
        backend.insert("a.xlsx", MemoryWorkbook::new("A"));
        backend.insert("b.xlsx", MemoryWorkbook::new("B"));

        backend.copy(Path::new("a.xlsx"), Path::new("b.xlsx")).unwrap();

        let copied = backend.document(Path::new("b.xlsx")).unwrap();
        assert_eq!(copied.sheet_names(), vec!["A".to_string()]);
        assert!(matches!(
            backend.copy(Path::new("missing.xlsx"), Path::new("b.xlsx")),
            Err(WorkbookError::NotFound(_))
        ));
    }

    #[test]
    fn active_sheet_can_be_changed() {
        let book = MemoryWorkbook::new("Listas").with_active_sheet("Plan1");

        assert_eq!(book.active_sheet(), "Plan1");
        assert_eq!(book.sheet_names(), vec!["Listas".to_string(), "Plan1".to_string()]);
    }
}
