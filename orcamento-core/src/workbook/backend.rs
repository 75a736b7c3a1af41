use std::{collections::HashMap, io, path::Path};

use super::{OpenMode, Workbook, WorkbookError};

/// One implementation per document format. Each backend crate exports a
/// single unit struct that implements this trait and is registered with a
/// [`BackendRegistry`] at startup.
pub trait WorkbookBackend: Send + Sync {
    /// Unique, lowercase identifier for this backend (e.g. `"xlsx"`).
    fn backend_name(&self) -> &'static str;

    /// Open the document at `path`.
    ///
    /// # Errors
    /// * [`WorkbookError::NotFound`] when nothing exists at `path`.
    /// * [`WorkbookError::Format`] when the file cannot be parsed.
    fn open(
        &self,
        path: &Path,
        mode: OpenMode,
    ) -> Result<Box<dyn Workbook>, WorkbookError>;

    fn exists(
        &self,
        path: &Path,
    ) -> bool {
        path.is_file()
    }

    /// Copy a document, replacing whatever is at `to`.
    fn copy(
        &self,
        from: &Path,
        to: &Path,
    ) -> Result<(), WorkbookError> {
        std::fs::copy(from, to).map(|_| ()).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound if !from.exists() => WorkbookError::NotFound(from.to_path_buf()),
            _ => WorkbookError::Io(e),
        })
    }
}

/// Registry of [`WorkbookBackend`] instances, keyed by backend name.
///
/// Typical lifetime:
/// 1. Create with `BackendRegistry::new()`.
/// 2. Call `register` once per known backend.
/// 3. Call `get` with the name from the configuration.
pub struct BackendRegistry {
    backends: HashMap<&'static str, Box<dyn WorkbookBackend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
        }
    }

    /// Register a backend. A backend with the same name is silently replaced.
    pub fn register(
        &mut self,
        backend: Box<dyn WorkbookBackend>,
    ) {
        self.backends.insert(backend.backend_name(), backend);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.backends.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// # Errors
    /// [`WorkbookError::Configuration`] when no backend is registered under `name`.
    pub fn get(
        &self,
        name: &str,
    ) -> Result<&dyn WorkbookBackend, WorkbookError> {
        self.backends
            .get(name)
            .map(|backend| backend.as_ref())
            .ok_or_else(|| {
                WorkbookError::Configuration(format!(
                    "unknown backend '{name}'; available: {:?}",
                    self.available_backends()
                ))
            })
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}
