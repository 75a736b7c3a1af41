use std::fmt;

/// The seven form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    Payer,
    Price,
    Quantity,
    PaymentMethod,
    CardBrand,
    Installments,
    State,
}

impl FieldKey {
    pub const ALL: [FieldKey; 7] = [
        Self::Payer,
        Self::Price,
        Self::Quantity,
        Self::PaymentMethod,
        Self::CardBrand,
        Self::Installments,
        Self::State,
    ];

    /// Fields whose values come from a dropdown.
    pub const CHOICES: [FieldKey; 5] = [
        Self::Payer,
        Self::PaymentMethod,
        Self::CardBrand,
        Self::Installments,
        Self::State,
    ];

    /// Label shown next to the field.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Payer => "Contribuinte",
            Self::Price => "Preço",
            Self::Quantity => "Quantidade",
            Self::PaymentMethod => "Pagamento",
            Self::CardBrand => "Bandeira",
            Self::Installments => "Parcelas",
            Self::State => "Estado",
        }
    }

    /// Key of the dropdown cache entry backing this field.
    pub fn cache_key(&self) -> &'static str {
        match self {
            Self::Payer => "contribuinte",
            Self::Price => "preco",
            Self::Quantity => "quantidade",
            Self::PaymentMethod => "pagamento",
            Self::CardBrand => "bandeira",
            Self::Installments => "parcelas",
            Self::State => "estado",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.cache_key())
    }
}

/// The four values read back after a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKey {
    Freight,
    DefaultCharge,
    Total,
    UnitValue,
}

impl OutputKey {
    pub const ALL: [OutputKey; 4] = [
        Self::Freight,
        Self::DefaultCharge,
        Self::Total,
        Self::UnitValue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Freight => "Frete",
            Self::DefaultCharge => "Default",
            Self::Total => "Total Cliente",
            Self::UnitValue => "Valor Unitário",
        }
    }
}
