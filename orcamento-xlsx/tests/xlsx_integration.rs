//! Integration tests that run the resolver and the calculator against real
//! `.xlsx` files written to a temporary directory.

use std::path::{Path, PathBuf};

use orcamento_core::{
    BudgetInputs, BudgetQuote, Calculator, CellMap, CellRef, CellValue, DropdownCache, FieldKey,
    OpenMode, OutputKey, TemplatePaths, WorkbookBackend, dropdown_values,
};
use orcamento_xlsx::XlsxBackend;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use umya_spreadsheet::{DataValidation, DataValidationValues, DataValidations, Worksheet};

fn add_list_validation(
    sheet: &mut Worksheet,
    sqref: &str,
    formula1: &str,
) {
    if sheet.get_data_validations_mut().is_none() {
        sheet.set_data_validations(DataValidations::default());
    }
    let mut dv = DataValidation::default();
    dv.set_type(DataValidationValues::List);
    dv.get_sequence_of_references_mut().set_sqref(sqref);
    dv.set_formula1(formula1);
    sheet
        .get_data_validations_mut()
        .expect("validations initialised above")
        .add_data_validation_list(dv);
}

/// Writes a small template resembling `interface.xlsx` and returns its path.
fn write_template(dir: &TempDir) -> PathBuf {
    let mut book = umya_spreadsheet::new_file();

    let lists = book.new_sheet("Listas Auxiliares").expect("new sheet");
    lists.get_cell_mut("A1").set_value_string("AC");
    lists.get_cell_mut("A2").set_value_string("AL");
    lists.get_cell_mut("A3").set_value_string("AM");

    let sheet = book.get_sheet_by_name_mut("Sheet1").expect("default sheet");
    add_list_validation(sheet, "B3", "\"Contribuinte,Não contribuinte\"");
    add_list_validation(sheet, "B7", "\"Cartão,À Vista\"");
    add_list_validation(sheet, "B8", "$K$1:$K$3");
    add_list_validation(sheet, "B9", "Parcelas!$A$1:$A$2");
    add_list_validation(sheet, "B10", "'Listas Auxiliares'!$A$1:$A$3");
    sheet.get_cell_mut("K1").set_value_string("Visa");
    sheet.get_cell_mut("K2").set_value_string("Master");

    sheet.get_cell_mut("B6").set_value_number(12.5);
    sheet.get_cell_mut("B14").set_value_number(3);
    sheet.get_cell_mut("B15").set_formula("B4*B5+B6+B14");

    let path = dir.path().join("interface.xlsx");
    umya_spreadsheet::writer::xlsx::write(&book, &path).expect("write template");
    path
}

fn inputs() -> BudgetInputs {
    BudgetInputs {
        payer: "Contribuinte".into(),
        price: 1234.56,
        quantity: 10,
        payment_method: "Cartão".into(),
        card_brand: "Visa".into(),
        installments: "3".into(),
        state: "AM".into(),
    }
}

fn at(text: &str) -> CellRef {
    text.parse().unwrap()
}

#[test]
fn resolves_every_formula_shape_from_disk() {
    let dir = TempDir::new().unwrap();
    let template = write_template(&dir);

    let cache = DropdownCache::from_template(&XlsxBackend, &template, &CellMap::default());

    assert_eq!(cache.values(FieldKey::Payer), ["Contribuinte", "Não contribuinte"]);
    assert_eq!(cache.values(FieldKey::PaymentMethod), ["Cartão", "À Vista"]);
    assert_eq!(cache.values(FieldKey::CardBrand), ["Visa", "Master"]);
    assert_eq!(cache.values(FieldKey::State), ["AC", "AL", "AM"]);
}

#[test]
fn missing_source_sheet_falls_back_to_validation_sheet() {
    let dir = TempDir::new().unwrap();
    let template = write_template(&dir);

    let book = XlsxBackend.open(&template, OpenMode::CachedValues).unwrap();
    let values = dropdown_values(book.as_ref(), "Sheet1", at("B9"));

    // `Parcelas` does not exist, so A1:A2 is read from Sheet1, which is empty there.
    assert!(values.is_empty());
}

#[test]
fn uncovered_cell_has_no_dropdown() {
    let dir = TempDir::new().unwrap();
    let template = write_template(&dir);

    let book = XlsxBackend.open(&template, OpenMode::CachedValues).unwrap();

    assert!(dropdown_values(book.as_ref(), "Sheet1", at("C3")).is_empty());
}

#[test]
fn formulas_mode_reports_formula_text() {
    let dir = TempDir::new().unwrap();
    let template = write_template(&dir);

    let book = XlsxBackend.open(&template, OpenMode::Formulas).unwrap();

    assert_eq!(book.cell("Sheet1", at("B15")), CellValue::from("=B4*B5+B6+B14"));
    assert_eq!(book.cell("Sheet1", at("B6")), CellValue::Number(12.5));
}

#[test]
fn calculate_writes_inputs_to_scratch_copy() {
    let dir = TempDir::new().unwrap();
    let paths = TemplatePaths {
        template: write_template(&dir),
        scratch: dir.path().join("interface_runtime.xlsx"),
    };
    let cells = CellMap::default();

    Calculator::new(&XlsxBackend, &paths, &cells).calculate(&inputs());

    let scratch = XlsxBackend.open(&paths.scratch, OpenMode::Formulas).unwrap();
    assert_eq!(scratch.cell("Sheet1", at("B3")), CellValue::from("Contribuinte"));
    assert_eq!(scratch.cell("Sheet1", at("B4")), CellValue::Number(1234.56));
    assert_eq!(scratch.cell("Sheet1", at("B5")), CellValue::Number(10.0));
    assert_eq!(scratch.cell("Sheet1", at("B9")), CellValue::from("3"));
    assert_eq!(scratch.cell("Sheet1", at("B10")), CellValue::from("AM"));

    let template = XlsxBackend.open(&paths.template, OpenMode::Formulas).unwrap();
    assert_eq!(template.cell("Sheet1", at("B3")), CellValue::Empty);
}

#[test]
fn calculate_reads_cached_outputs() {
    let dir = TempDir::new().unwrap();
    let paths = TemplatePaths {
        template: write_template(&dir),
        scratch: dir.path().join("interface_runtime.xlsx"),
    };
    let cells = CellMap::default();

    let display = Calculator::new(&XlsxBackend, &paths, &cells)
        .calculate(&inputs())
        .display();

    assert_eq!(display.freight, "R$ 12,50");
    assert_eq!(display.default_charge, "R$ 3,00");
    // Never recalculated by a spreadsheet engine, so no cached total exists.
    assert_eq!(display.total, "R$ 0,00");
    assert_eq!(display.get(OutputKey::UnitValue), "R$ 0,00");
}

#[test]
fn calculate_without_template_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let paths = TemplatePaths {
        template: dir.path().join("interface.xlsx"),
        scratch: dir.path().join("interface_runtime.xlsx"),
    };
    let cells = CellMap::default();

    let display = Calculator::new(&XlsxBackend, &paths, &cells)
        .calculate(&inputs())
        .display();

    for key in OutputKey::ALL {
        assert_eq!(display.get(key), "R$ 0,00");
    }
    assert!(!Path::new(&paths.scratch).exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn corrupt_template_degrades_to_empty_dropdowns_and_zero_results() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("interface.xlsx");
    std::fs::write(&template, b"not a zip archive").unwrap();
    let paths = TemplatePaths {
        template: template.clone(),
        scratch: dir.path().join("interface_runtime.xlsx"),
    };
    let cells = CellMap::default();

    let cache = DropdownCache::from_template(&XlsxBackend, &template, &cells);
    let quote = Calculator::new(&XlsxBackend, &paths, &cells).calculate(&inputs());

    assert_eq!(cache, DropdownCache::default());
    assert_eq!(quote, BudgetQuote::default());
}
