//! A single cell: formula text, its parsed tree and the memoized value.

use sheets_formula::formula::{CellAddress, Expr, Value, parse_formula};

/// A cell in the sheet.
///
/// The tree is parsed once, when the cell is created. `cached` is `None`
/// while the value needs computing.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub formula: String,
    pub expr: Expr,
    /// Distinct referenced addresses, sorted row-major.
    pub references: Vec<CellAddress>,
    pub cached: Option<Value>,
}

/// The cell returned for every valid address that was never set.
pub static DEFAULT_CELL: Cell = Cell::blank();

impl Cell {
    pub fn new(formula: &str) -> Cell {
        let expr = parse_formula(formula);
        let mut references: Vec<CellAddress> = expr.references().into_iter().collect();
        references.sort_unstable();
        Cell {
            formula: formula.to_string(),
            expr,
            references,
            cached: None,
        }
    }

    /// An empty, already evaluated cell.
    pub const fn blank() -> Cell {
        Cell {
            formula: String::new(),
            expr: Expr::Str(String::new()),
            references: Vec::new(),
            cached: Some(Value::empty()),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.formula.is_empty()
    }

    /// Whether any reference satisfies `pred`.
    pub fn references_any(&self, pred: impl Fn(CellAddress) -> bool) -> bool {
        self.references.iter().any(|addr| pred(*addr))
    }
}
