use super::OutputKey;
use crate::{format::format_currency, workbook::CellValue};

/// Values collected from the form, ready to be written to the template.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BudgetInputs {
    pub payer: String,
    pub price: f64,
    pub quantity: i64,
    pub payment_method: String,
    pub card_brand: String,
    pub installments: String,
    pub state: String,
}

/// Raw output cells of one calculation. `None` means the value could not be
/// read at all (for example, the template is missing).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BudgetQuote {
    pub freight: Option<CellValue>,
    pub default_charge: Option<CellValue>,
    pub total: Option<CellValue>,
    pub unit_value: Option<CellValue>,
}

impl BudgetQuote {
    pub fn display(&self) -> QuoteDisplay {
        QuoteDisplay {
            freight: format_currency(self.freight.as_ref()),
            default_charge: format_currency(self.default_charge.as_ref()),
            total: format_currency(self.total.as_ref()),
            unit_value: format_currency(self.unit_value.as_ref()),
        }
    }
}

/// Currency strings shown in the results panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteDisplay {
    pub freight: String,
    pub default_charge: String,
    pub total: String,
    pub unit_value: String,
}

impl QuoteDisplay {
    pub fn get(
        &self,
        key: OutputKey,
    ) -> &str {
        match key {
            OutputKey::Freight => &self.freight,
            OutputKey::DefaultCharge => &self.default_charge,
            OutputKey::Total => &self.total,
            OutputKey::UnitValue => &self.unit_value,
        }
    }
}

impl Default for QuoteDisplay {
    fn default() -> Self {
        BudgetQuote::default().display()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_quote_displays_zeroes() {
        let display = QuoteDisplay::default();

        for key in OutputKey::ALL {
            assert_eq!(display.get(key), "R$ 0,00");
        }
    }

    #[test]
    fn display_formats_each_output() {
        let quote = BudgetQuote {
            freight: Some(CellValue::Number(35.0)),
            default_charge: None,
            total: Some(CellValue::Number(2150.4)),
            unit_value: Some(CellValue::from("#DIV/0!")),
        };

        let display = quote.display();
        assert_eq!(display.freight, "R$ 35,00");
        assert_eq!(display.default_charge, "R$ 0,00");
        assert_eq!(display.total, "R$ 2.150,40");
        assert_eq!(display.unit_value, "R$ 0,00");
    }
}
