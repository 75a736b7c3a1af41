//! State behind the budget form, independent of any GUI toolkit.

use tracing::debug;

use crate::{
    dropdown::DropdownCache,
    format::{parse_locale_float, parse_locale_int},
    models::{BudgetInputs, FieldKey},
};

/// `true` when the payment method is an up-front ("à vista") payment.
pub fn is_cash_payment(payment_method: &str) -> bool {
    payment_method.to_lowercase().contains("vista")
}

/// A read-only dropdown: the value can only be one of `options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceField {
    options: Vec<String>,
    selected: String,
    enabled: bool,
}

impl ChoiceField {
    /// Starts on the first option; an empty option list becomes `[""]`.
    pub fn new(options: Vec<String>) -> Self {
        let options = if options.is_empty() {
            vec![String::new()]
        } else {
            options
        };
        Self {
            selected: options[0].clone(),
            options,
            enabled: true,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.options.iter().position(|option| *option == self.selected)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetForm {
    payer: ChoiceField,
    price: String,
    quantity: String,
    payment_method: ChoiceField,
    card_brand: ChoiceField,
    installments: ChoiceField,
    state: ChoiceField,
}

impl BudgetForm {
    pub fn new(dropdowns: &DropdownCache) -> Self {
        let choice = |key| ChoiceField::new(dropdowns.values(key).to_vec());
        let mut form = Self {
            payer: choice(FieldKey::Payer),
            price: String::new(),
            quantity: String::new(),
            payment_method: choice(FieldKey::PaymentMethod),
            card_brand: choice(FieldKey::CardBrand),
            installments: choice(FieldKey::Installments),
            state: choice(FieldKey::State),
        };
        form.apply_payment_rule();
        form
    }

    pub fn choice(
        &self,
        key: FieldKey,
    ) -> Option<&ChoiceField> {
        match key {
            FieldKey::Payer => Some(&self.payer),
            FieldKey::PaymentMethod => Some(&self.payment_method),
            FieldKey::CardBrand => Some(&self.card_brand),
            FieldKey::Installments => Some(&self.installments),
            FieldKey::State => Some(&self.state),
            FieldKey::Price | FieldKey::Quantity => None,
        }
    }

    fn choice_mut(
        &mut self,
        key: FieldKey,
    ) -> Option<&mut ChoiceField> {
        match key {
            FieldKey::Payer => Some(&mut self.payer),
            FieldKey::PaymentMethod => Some(&mut self.payment_method),
            FieldKey::CardBrand => Some(&mut self.card_brand),
            FieldKey::Installments => Some(&mut self.installments),
            FieldKey::State => Some(&mut self.state),
            FieldKey::Price | FieldKey::Quantity => None,
        }
    }

    /// Current text of any field.
    pub fn value(
        &self,
        key: FieldKey,
    ) -> &str {
        match key {
            FieldKey::Price => &self.price,
            FieldKey::Quantity => &self.quantity,
            _ => self.choice(key).map(ChoiceField::selected).unwrap_or_default(),
        }
    }

    pub fn is_enabled(
        &self,
        key: FieldKey,
    ) -> bool {
        self.choice(key).is_none_or(ChoiceField::is_enabled)
    }

    /// Selects `value` in a dropdown.
    ///
    /// Returns `false` (leaving the form untouched) when the field is not a
    /// dropdown, is disabled, or does not offer `value`.
    pub fn select(
        &mut self,
        key: FieldKey,
        value: &str,
    ) -> bool {
        let Some(field) = self.choice_mut(key) else {
            return false;
        };
        if !field.enabled || !field.options.iter().any(|option| option == value) {
            debug!(field = %key, value, enabled = field.enabled, "selection rejected");
            return false;
        }
        field.selected = value.to_string();

        if key == FieldKey::PaymentMethod {
            self.apply_payment_rule();
        }
        true
    }

    /// Sets a free-text field. Returns `false` for dropdown fields.
    pub fn set_text(
        &mut self,
        key: FieldKey,
        value: &str,
    ) -> bool {
        match key {
            FieldKey::Price => self.price = value.to_string(),
            FieldKey::Quantity => self.quantity = value.to_string(),
            _ => return false,
        }
        true
    }

    /// Card brand and installments are locked while paying up front.
    /// Their selected values are kept.
    fn apply_payment_rule(&mut self) {
        let enabled = !is_cash_payment(&self.payment_method.selected);
        self.card_brand.enabled = enabled;
        self.installments.enabled = enabled;
    }

    pub fn inputs(&self) -> BudgetInputs {
        BudgetInputs {
            payer: self.payer.selected.clone(),
            price: parse_locale_float(Some(&self.price)),
            quantity: parse_locale_int(Some(&self.quantity)),
            payment_method: self.payment_method.selected.clone(),
            card_brand: self.card_brand.selected.clone(),
            installments: self.installments.selected.clone(),
            state: self.state.selected.clone(),
        }
    }
}
