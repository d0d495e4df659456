//! JSON file cashflow adapter.
//!
//! A file holds either a single cashflow document or a list of them.

use crate::domain::document::{CashflowDocument, parse_documents};
use crate::domain::error::CashflowError;
use crate::ports::cashflow_port::CashflowPort;
use std::fs;
use std::path::PathBuf;

pub struct JsonFileAdapter {
    path: PathBuf,
}

impl JsonFileAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CashflowPort for JsonFileAdapter {
    fn load(&self) -> Result<Vec<CashflowDocument>, CashflowError> {
        let content = fs::read_to_string(&self.path)?;
        let documents = parse_documents(&content)?;
        log::debug!(
            "loaded {} cashflows from {}",
            documents.len(),
            self.path.display()
        );
        Ok(documents)
    }

    /// Always writes a list, pretty-printed.
    fn save(&self, documents: &[CashflowDocument]) -> Result<(), CashflowError> {
        let json = serde_json::to_string_pretty(documents)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
