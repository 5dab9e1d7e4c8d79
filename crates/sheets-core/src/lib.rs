//! sheets-core - UI-agnostic cell store, evaluation engine and storage.

pub mod cell;
pub mod error;
pub mod sheet;
pub mod storage;
pub mod store;

pub use cell::{Cell, DEFAULT_CELL};
pub use error::{Result, SheetError};
pub use sheet::Sheet;

pub use sheets_formula::formula::{CellAddress, Value};
