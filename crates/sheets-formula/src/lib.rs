//! sheets_formula - Formula language for the sheets engine.
//!
//! Cell text is lexed, parsed once into an [`formula::Expr`] and evaluated on
//! demand against whatever grid owns the cell.

pub mod builtins;
pub mod error;
pub mod formula;

pub use error::{FormulaError, Result};
