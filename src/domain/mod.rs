//! Core domain types and logic.

pub mod cashflow;
pub mod describe;
pub mod document;
pub mod error;
pub mod limited;
pub mod projection;
pub mod settings;
