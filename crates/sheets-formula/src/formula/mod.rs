//! Formula language API.
//!
//! - [`tokenize`] turns cell text into tokens.
//! - [`parse`] runs shunting-yard over the tokens and builds an [`Expr`].
//! - [`Expr::evaluate`] walks the tree against a cell lookup.

mod ast;
mod cell_ref;
mod format;
mod lexer;
mod parser;
mod value;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use cell_ref::{CellAddress, column_letters, column_number};
pub use format::{format_number, format_value};
pub use lexer::{Token, tokenize};
pub use parser::{MAX_NESTING, parse, parse_formula};
pub use value::Value;
