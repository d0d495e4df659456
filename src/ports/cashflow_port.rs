//! Cashflow definition source port trait.

use crate::domain::document::CashflowDocument;
use crate::domain::error::CashflowError;

pub trait CashflowPort {
    fn load(&self) -> Result<Vec<CashflowDocument>, CashflowError>;

    fn save(&self, documents: &[CashflowDocument]) -> Result<(), CashflowError>;
}
