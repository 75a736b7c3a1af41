//! One compute cycle: copy the template, write the inputs, read the outputs.
//!
//! Formula evaluation is delegated entirely to whichever spreadsheet engine
//! last opened and saved the template. The values read back are the cached
//! results stored in the file, so they reflect the inputs of that last
//! recalculation rather than the inputs just written.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{
    models::{BudgetInputs, BudgetQuote, CellMap, FieldKey, OutputKey},
    workbook::{CellValue, OpenMode, WorkbookBackend, WorkbookError},
};

/// Locations of the master template and its disposable working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePaths {
    pub template: PathBuf,
    pub scratch: PathBuf,
}

pub struct Calculator<'a> {
    backend: &'a dyn WorkbookBackend,
    paths: &'a TemplatePaths,
    cells: &'a CellMap,
}

impl<'a> Calculator<'a> {
    pub fn new(
        backend: &'a dyn WorkbookBackend,
        paths: &'a TemplatePaths,
        cells: &'a CellMap,
    ) -> Self {
        Self {
            backend,
            paths,
            cells,
        }
    }

    /// Runs the cycle and returns a fresh quote.
    ///
    /// Never fails: a missing template or any I/O problem yields a quote with
    /// every output absent.
    pub fn calculate(
        &self,
        inputs: &BudgetInputs,
    ) -> BudgetQuote {
        if !self.backend.exists(&self.paths.template) {
            warn!(template = %self.paths.template.display(), "template missing; results zeroed");
            return BudgetQuote::default();
        }

        match self.run(inputs) {
            Ok(quote) => {
                info!(?quote, "calculation finished");
                quote
            }
            Err(error) => {
                warn!(%error, "calculation failed; results zeroed");
                BudgetQuote::default()
            }
        }
    }

    fn run(
        &self,
        inputs: &BudgetInputs,
    ) -> Result<BudgetQuote, WorkbookError> {
        let scratch = self.paths.scratch.as_path();
        self.backend.copy(&self.paths.template, scratch)?;
        self.write_inputs(scratch, inputs)?;
        self.read_outputs(scratch)
    }

    fn write_inputs(
        &self,
        scratch: &Path,
        inputs: &BudgetInputs,
    ) -> Result<(), WorkbookError> {
        let mut book = self.backend.open(scratch, OpenMode::Formulas)?;
        let sheet = book.active_sheet();

        let values: [(FieldKey, CellValue); 7] = [
            (FieldKey::Payer, inputs.payer.as_str().into()),
            (FieldKey::Price, inputs.price.into()),
            (FieldKey::Quantity, inputs.quantity.into()),
            (FieldKey::PaymentMethod, inputs.payment_method.as_str().into()),
            (FieldKey::CardBrand, inputs.card_brand.as_str().into()),
            (FieldKey::Installments, inputs.installments.as_str().into()),
            (FieldKey::State, inputs.state.as_str().into()),
        ];
        for (key, value) in values {
            let at = self.cells.input(key);
            debug!(field = %key, %at, ?value, "writing input");
            book.set_cell(&sheet, at, value)?;
        }
        book.save()
    }

    fn read_outputs(
        &self,
        scratch: &Path,
    ) -> Result<BudgetQuote, WorkbookError> {
        let book = self.backend.open(scratch, OpenMode::CachedValues)?;
        let sheet = book.active_sheet();
        let read = |key| Some(book.cell(&sheet, self.cells.output(key)));

        Ok(BudgetQuote {
            freight: read(OutputKey::Freight),
            default_charge: read(OutputKey::DefaultCharge),
            total: read(OutputKey::Total),
            unit_value: read(OutputKey::UnitValue),
        })
    }
}
