//! Error types for formula lexing and parsing.
//!
//! These are raised once, when a formula is set. The cell keeps its text and
//! stores the message as an error expression; evaluation-time problems are
//! never errors of this type, they are [`Value::Error`](crate::formula::Value) data.

use thiserror::Error;

/// Errors that can occur while turning formula text into an expression tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Invalid symbol {symbol} at position {position}")]
    InvalidSymbol { symbol: char, position: usize },

    #[error("Non-terminated string found starting from position {0}")]
    NonTerminatedString(usize),

    #[error("Invalid cell reference: {0}")]
    InvalidCellReference(String),

    #[error("Unable to parse {0} as number")]
    NumberFormat(String),

    #[error("Unmatched {0} bracket")]
    UnmatchedBracket(&'static str),

    #[error("Unknown symbol {0}")]
    UnknownSymbol(String),

    #[error("Multiple expressions found")]
    MultipleExpressions,

    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("Formula nested deeper than {0} levels")]
    TooDeeplyNested(usize),
}

pub type Result<T> = std::result::Result<T, FormulaError>;
