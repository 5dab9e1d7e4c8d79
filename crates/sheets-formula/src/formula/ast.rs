//! Expression tree and its evaluation.
//!
//! Evaluation takes a lookup function from address to value, so the same tree
//! can be evaluated against a memoizing grid or against nothing at all
//! ([`Expr::evaluate_detached`]).

use std::collections::HashSet;

use super::cell_ref::CellAddress;
use super::value::Value;
use crate::builtins::Builtin;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negate,
    Plus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// A parsed formula.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    Reference(CellAddress),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        function: Builtin,
        args: Vec<Expr>,
    },
    /// A formula that failed to lex or parse; evaluates to this message.
    Error(String),
}

impl Expr {
    pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Evaluate the tree, reading cells through `lookup`. Recursive; parsed
    /// trees are at most [`MAX_NESTING`](super::parser::MAX_NESTING) deep.
    pub fn evaluate(&self, lookup: &dyn Fn(CellAddress) -> Value) -> Value {
        match self {
            Expr::Number(n) => Value::Number(*n),
            Expr::Str(s) => Value::Str(s.clone()),
            Expr::Reference(addr) => lookup(*addr),
            Expr::Unary { op, operand } => op.apply(operand.evaluate(lookup)),
            Expr::Binary { op, left, right } => {
                op.apply(left.evaluate(lookup), right.evaluate(lookup))
            }
            Expr::Call { function, args } => {
                let values: Vec<Value> = args.iter().map(|arg| arg.evaluate(lookup)).collect();
                function.apply(&values)
            }
            Expr::Error(message) => Value::Error(message.clone()),
        }
    }

    /// Evaluate without any grid: every reference is an error.
    pub fn evaluate_detached(&self) -> Value {
        self.evaluate(&|addr| Value::Error(format!("Incorrect reference {}", addr)))
    }

    /// Every address this expression reads, without evaluating anything.
    pub fn references(&self) -> HashSet<CellAddress> {
        let mut out = HashSet::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references(&self, out: &mut HashSet<CellAddress>) {
        match self {
            Expr::Reference(addr) => {
                out.insert(*addr);
            }
            Expr::Unary { operand, .. } => operand.collect_references(out),
            Expr::Binary { left, right, .. } => {
                left.collect_references(out);
                right.collect_references(out);
            }
            Expr::Call { args, .. } => {
                for arg in args {
                    arg.collect_references(out);
                }
            }
            Expr::Number(_) | Expr::Str(_) | Expr::Error(_) => {}
        }
    }
}
