use std::path::Path;

use orcamento_core::workbook::{OpenMode, Workbook, WorkbookBackend, WorkbookError};
use tracing::debug;

use crate::workbook::XlsxWorkbook;

/// [`WorkbookBackend`] for `.xlsx` documents.
///
/// Register this with an [`orcamento_core::BackendRegistry`] to make the
/// `"xlsx"` backend available:
///
/// ```rust
/// use orcamento_core::BackendRegistry;
/// use orcamento_xlsx::XlsxBackend;
///
/// let mut registry = BackendRegistry::new();
/// registry.register(Box::new(XlsxBackend));
/// assert_eq!(registry.available_backends(), vec!["xlsx"]);
/// ```
pub struct XlsxBackend;

impl WorkbookBackend for XlsxBackend {
    fn backend_name(&self) -> &'static str {
        "xlsx"
    }

    /// Reads the whole document into memory. The file itself is not held
    /// open once this returns.
    fn open(
        &self,
        path: &Path,
        mode: OpenMode,
    ) -> Result<Box<dyn Workbook>, WorkbookError> {
        if !path.is_file() {
            return Err(WorkbookError::NotFound(path.to_path_buf()));
        }
        debug!(path = %path.display(), ?mode, "opening xlsx");
        let book = XlsxWorkbook::read(path, mode)?;
        Ok(Box::new(book))
    }
}
