use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use super::{FieldKey, OutputKey};
use crate::workbook::CellRef;

/// Where each input is written and each output is read in the template.
///
/// The defaults match the shipped `interface.xlsx`; a configuration file may
/// override any of them with A1 references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellMap {
    #[serde(with = "a1")]
    pub payer: CellRef,
    #[serde(with = "a1")]
    pub price: CellRef,
    #[serde(with = "a1")]
    pub quantity: CellRef,
    #[serde(with = "a1")]
    pub payment_method: CellRef,
    #[serde(with = "a1")]
    pub card_brand: CellRef,
    #[serde(with = "a1")]
    pub installments: CellRef,
    #[serde(with = "a1")]
    pub state: CellRef,

    #[serde(with = "a1")]
    pub freight: CellRef,
    #[serde(with = "a1")]
    pub default_charge: CellRef,
    #[serde(with = "a1")]
    pub total: CellRef,
    #[serde(with = "a1")]
    pub unit_value: CellRef,
}

impl Default for CellMap {
    fn default() -> Self {
        Self {
            payer: CellRef::new(2, 3),
            price: CellRef::new(2, 4),
            quantity: CellRef::new(2, 5),
            payment_method: CellRef::new(2, 7),
            card_brand: CellRef::new(2, 8),
            installments: CellRef::new(2, 9),
            state: CellRef::new(2, 10),
            freight: CellRef::new(2, 6),
            default_charge: CellRef::new(2, 14),
            total: CellRef::new(2, 15),
            unit_value: CellRef::new(9, 4),
        }
    }
}

impl CellMap {
    pub fn input(
        &self,
        key: FieldKey,
    ) -> CellRef {
        match key {
            FieldKey::Payer => self.payer,
            FieldKey::Price => self.price,
            FieldKey::Quantity => self.quantity,
            FieldKey::PaymentMethod => self.payment_method,
            FieldKey::CardBrand => self.card_brand,
            FieldKey::Installments => self.installments,
            FieldKey::State => self.state,
        }
    }

    pub fn output(
        &self,
        key: OutputKey,
    ) -> CellRef {
        match key {
            OutputKey::Freight => self.freight,
            OutputKey::DefaultCharge => self.default_charge,
            OutputKey::Total => self.total,
            OutputKey::UnitValue => self.unit_value,
        }
    }
}

mod a1 {
    use super::*;

    pub fn serialize<S: Serializer>(
        cell: &CellRef,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&cell.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CellRef, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
