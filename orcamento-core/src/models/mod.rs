mod cell_map;
mod field;
mod quote;

pub use cell_map::CellMap;
pub use field::{FieldKey, OutputKey};
pub use quote::{BudgetInputs, BudgetQuote, QuoteDisplay};
