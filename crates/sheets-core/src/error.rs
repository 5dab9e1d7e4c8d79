//! Error types for sheets core.

use sheets_formula::formula::CellAddress;
use thiserror::Error;

/// Errors raised by sheet operations and storage.
///
/// Formula problems are not errors here: they live in the cell as
/// [`Value::Error`](sheets_formula::formula::Value) data.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Address {address} is outside the {rows}x{columns} sheet")]
    AddressOutOfBounds {
        address: CellAddress,
        rows: usize,
        columns: usize,
    },
}

pub type Result<T> = std::result::Result<T, SheetError>;
