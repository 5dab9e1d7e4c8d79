//! Operator-precedence (shunting-yard) parser.
//!
//! Two passes: infix tokens to reverse Polish notation, then RPN to an
//! [`Expr`] tree. Function names sit on the operator stack with the highest
//! precedence and their bracket pair is the argument list; arity comes from
//! the builtin table, so a wrong argument count shows up as a stack underflow
//! or leftover expressions.

use log::trace;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::cell_ref::CellAddress;
use super::lexer::{Token, tokenize};
use crate::builtins::Builtin;
use crate::error::{FormulaError, Result};

const FUNCTION_PRECEDENCE: u8 = 10;
const UNARY_PRECEDENCE: u8 = 8;
const PRODUCT_PRECEDENCE: u8 = 6;
const SUM_PRECEDENCE: u8 = 4;

/// Entries of the operator stack.
#[derive(Clone, Debug, PartialEq)]
enum Pending {
    Unary(UnaryOp),
    Binary(BinaryOp),
    Function(String),
    LeftBracket,
}

impl Pending {
    fn precedence(&self) -> u8 {
        match self {
            Pending::Function(_) => FUNCTION_PRECEDENCE,
            Pending::Unary(_) => UNARY_PRECEDENCE,
            Pending::Binary(BinaryOp::Multiply | BinaryOp::Divide) => PRODUCT_PRECEDENCE,
            Pending::Binary(BinaryOp::Add | BinaryOp::Subtract) => SUM_PRECEDENCE,
            Pending::LeftBracket => 0,
        }
    }

    /// The RPN item this entry flushes to; brackets produce nothing.
    fn into_rpn(self) -> Option<Rpn> {
        match self {
            Pending::Unary(op) => Some(Rpn::Unary(op)),
            Pending::Binary(op) => Some(Rpn::Binary(op)),
            Pending::Function(name) => Some(Rpn::Function(name)),
            Pending::LeftBracket => None,
        }
    }
}

/// Reverse Polish notation items.
#[derive(Clone, Debug, PartialEq)]
enum Rpn {
    Number(f64),
    Str(String),
    Reference(CellAddress),
    Unary(UnaryOp),
    Binary(BinaryOp),
    Function(String),
}

/// Move entries from the operator stack to the output while `pred` holds for the top.
fn flush_while(delayed: &mut Vec<Pending>, rpn: &mut Vec<Rpn>, pred: impl Fn(&Pending) -> bool) {
    while delayed.last().is_some_and(&pred) {
        rpn.extend(delayed.pop().and_then(Pending::into_rpn));
    }
}

/// Lex and parse cell text. Any lexer or parser error becomes an
/// [`Expr::Error`] carrying the message, so the result always evaluates.
pub fn parse_formula(text: &str) -> Expr {
    match tokenize(text).and_then(|tokens| parse(&tokens)) {
        Ok(expr) => expr,
        Err(err) => {
            trace!("formula {:?} rejected: {}", text, err);
            Expr::Error(err.to_string())
        }
    }
}

/// Parse a token stream into an expression tree.
pub fn parse(tokens: &[Token]) -> Result<Expr> {
    let rpn = to_rpn(tokens)?;
    build_tree(rpn)
}

fn to_rpn(tokens: &[Token]) -> Result<Vec<Rpn>> {
    let mut delayed: Vec<Pending> = Vec::new();
    let mut rpn: Vec<Rpn> = Vec::with_capacity(tokens.len());

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Number(n) => rpn.push(Rpn::Number(*n)),
            Token::Str(s) => rpn.push(Rpn::Str(s.clone())),
            Token::CellRef(addr) => rpn.push(Rpn::Reference(*addr)),
            Token::Ident(name) => delayed.push(Pending::Function(name.clone())),
            Token::LeftBracket => delayed.push(Pending::LeftBracket),
            Token::RightBracket => {
                flush_while(&mut delayed, &mut rpn, |top| *top != Pending::LeftBracket);
                if delayed.pop().is_none() {
                    return Err(FormulaError::UnmatchedBracket("right"));
                }
                if matches!(delayed.last(), Some(Pending::Function(_))) {
                    rpn.extend(delayed.pop().and_then(Pending::into_rpn));
                }
            }
            Token::Comma => {
                flush_while(&mut delayed, &mut rpn, |top| *top != Pending::LeftBracket);
            }
            Token::Plus | Token::Minus | Token::Asterisk | Token::Slash => {
                let unary = i == 0 || !tokens[i - 1].ends_operand();
                let incoming = match token {
                    Token::Plus if unary => Pending::Unary(UnaryOp::Plus),
                    Token::Minus if unary => Pending::Unary(UnaryOp::Negate),
                    Token::Plus => Pending::Binary(BinaryOp::Add),
                    Token::Minus => Pending::Binary(BinaryOp::Subtract),
                    Token::Asterisk => Pending::Binary(BinaryOp::Multiply),
                    _ => Pending::Binary(BinaryOp::Divide),
                };
                flush_while(&mut delayed, &mut rpn, |top| {
                    *top != Pending::LeftBracket && top.precedence() >= incoming.precedence()
                });
                delayed.push(incoming);
            }
        }
    }

    while let Some(top) = delayed.pop() {
        match top.into_rpn() {
            Some(item) => rpn.push(item),
            None => return Err(FormulaError::UnmatchedBracket("left")),
        }
    }

    Ok(rpn)
}

/// Deepest expression tree a formula may build. Tree walks recurse, so the
/// depth is capped here instead of by the stack.
pub const MAX_NESTING: usize = 512;

/// A finished subtree and its depth.
type Node = (Expr, usize);

fn pop_node(nodes: &mut Vec<Node>) -> Result<Node> {
    nodes.pop().ok_or(FormulaError::UnexpectedEndOfInput)
}

fn build_tree(rpn: Vec<Rpn>) -> Result<Expr> {
    let mut nodes: Vec<Node> = Vec::new();

    for item in rpn {
        let node = match item {
            Rpn::Number(n) => (Expr::Number(n), 1),
            Rpn::Str(s) => (Expr::Str(s), 1),
            Rpn::Reference(addr) => (Expr::Reference(addr), 1),
            Rpn::Unary(op) => {
                let (operand, depth) = pop_node(&mut nodes)?;
                (Expr::unary(op, operand), depth + 1)
            }
            Rpn::Binary(op) => {
                let (right, right_depth) = pop_node(&mut nodes)?;
                let (left, left_depth) = pop_node(&mut nodes)?;
                (
                    Expr::binary(op, left, right),
                    left_depth.max(right_depth) + 1,
                )
            }
            Rpn::Function(name) => {
                let function =
                    Builtin::lookup(&name).ok_or(FormulaError::UnknownSymbol(name))?;
                let mut args = Vec::with_capacity(function.arity());
                let mut depth = 0;
                for _ in 0..function.arity() {
                    let (arg, arg_depth) = pop_node(&mut nodes)?;
                    depth = depth.max(arg_depth);
                    args.push(arg);
                }
                args.reverse();
                (Expr::Call { function, args }, depth + 1)
            }
        };
        if node.1 > MAX_NESTING {
            return Err(FormulaError::TooDeeplyNested(MAX_NESTING));
        }
        nodes.push(node);
    }

    match nodes.len() {
        0 => Ok(Expr::Str(String::new())),
        1 => pop_node(&mut nodes).map(|(expr, _)| expr),
        _ => Err(FormulaError::MultipleExpressions),
    }
}
