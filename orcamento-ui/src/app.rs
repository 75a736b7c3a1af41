use orcamento_core::{
    BackendRegistry, BudgetInputs, BudgetQuote, Calculator, CellMap, DropdownCache,
    TemplatePaths, WorkbookError,
};
use orcamento_xlsx::XlsxBackend;
use tracing::{info, warn};

use crate::config::AppConfig;

/// Builds a registry pre-populated with all known workbook backends.
///
/// Add new backends here as they are implemented.
pub fn build_registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register(Box::new(XlsxBackend));
    registry
}

/// Everything a running form needs outside the GUI: the chosen backend,
/// template locations, cell layout and the dropdown values read at startup.
pub struct BudgetSession {
    registry: BackendRegistry,
    backend: String,
    paths: TemplatePaths,
    cells: CellMap,
    dropdowns: DropdownCache,
}

impl BudgetSession {
    pub fn start(config: &AppConfig) -> Result<Self, WorkbookError> {
        Self::with_registry(config, build_registry())
    }

    /// # Errors
    /// [`WorkbookError::Configuration`] when `config.backend` is not registered.
    pub fn with_registry(
        config: &AppConfig,
        registry: BackendRegistry,
    ) -> Result<Self, WorkbookError> {
        let backend = registry.get(&config.backend)?;
        let dropdowns = DropdownCache::from_template(backend, &config.template, &config.cells);
        info!(
            backend = backend.backend_name(),
            template = %config.template.display(),
            "session started"
        );

        Ok(Self {
            backend: config.backend.clone(),
            paths: config.template_paths(),
            cells: config.cells.clone(),
            dropdowns,
            registry,
        })
    }

    pub fn dropdowns(&self) -> &DropdownCache {
        &self.dropdowns
    }

    pub fn calculate(
        &self,
        inputs: &BudgetInputs,
    ) -> BudgetQuote {
        match self.registry.get(&self.backend) {
            Ok(backend) => Calculator::new(backend, &self.paths, &self.cells).calculate(inputs),
            Err(error) => {
                warn!(%error, "backend vanished; results zeroed");
                BudgetQuote::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use orcamento_core::{CellRef, FieldKey, MemoryBackend, MemoryWorkbook};
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(text: &str) -> CellRef {
        text.parse().unwrap()
    }

    fn memory_config() -> AppConfig {
        AppConfig {
            backend: "memory".into(),
            template: PathBuf::from("interface.xlsx"),
            scratch: PathBuf::from("interface_runtime.xlsx"),
            ..AppConfig::default()
        }
    }

    fn memory_registry(backend: &MemoryBackend) -> BackendRegistry {
        let mut registry = BackendRegistry::new();
        registry.register(Box::new(backend.clone()));
        registry
    }

    #[test]
    fn default_registry_offers_xlsx() {
        assert_eq!(build_registry().available_backends(), vec!["xlsx"]);
    }

    #[test]
    fn unknown_backend_is_a_configuration_error() {
        let config = AppConfig {
            backend: "ods".into(),
            ..AppConfig::default()
        };

        let result = BudgetSession::start(&config);

        assert!(matches!(result, Err(WorkbookError::Configuration(_))));
    }

    #[test]
    fn session_loads_dropdowns_and_calculates() {
        let backend = MemoryBackend::new();
        backend.insert(
            "interface.xlsx",
            MemoryWorkbook::new("Orçamento")
                .with_validation("Orçamento", "B7", Some("\"Cartão,À Vista\""))
                .with_cell("Orçamento", at("B6"), 42.0),
        );
        let session = BudgetSession::with_registry(&memory_config(), memory_registry(&backend))
            .unwrap();

        assert_eq!(session.dropdowns().values(FieldKey::PaymentMethod), ["Cartão", "À Vista"]);

        let display = session.calculate(&BudgetInputs::default()).display();

        assert_eq!(display.freight, "R$ 42,00");
        assert!(backend.document(Path::new("interface_runtime.xlsx")).is_some());
    }

    #[test]
    fn missing_template_gives_empty_dropdowns() {
        let backend = MemoryBackend::new();
        let session = BudgetSession::with_registry(&memory_config(), memory_registry(&backend))
            .unwrap();

        assert_eq!(session.dropdowns(), &DropdownCache::default());
        assert_eq!(session.calculate(&BudgetInputs::default()), BudgetQuote::default());
    }
}
