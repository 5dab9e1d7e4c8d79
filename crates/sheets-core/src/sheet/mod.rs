//! Sheet state and logic: evaluation, edits, resizing and persistence.

mod eval;
mod io;
mod ops;
mod state;

pub use eval::CYCLE_MESSAGE;
pub use state::{DEFAULT_COLUMNS, DEFAULT_ROWS, Sheet};
