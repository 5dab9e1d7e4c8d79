//! Built-in functions and operator bodies.
//!
//! The function table is fixed: `sin/1`, `max/2`, `substr/3`, `pi/0`, `pow/2`.
//! Names are resolved at parse time, so an unknown name never reaches evaluation.
//! Every body checks its own operand kinds and returns a [`Value::Error`] on
//! mismatch instead of failing.

use crate::formula::{BinaryOp, UnaryOp, Value};

/// A function callable from formulas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    Sin,
    Max,
    Substr,
    Pi,
    Pow,
}

impl Builtin {
    pub const ALL: [Builtin; 5] = [
        Builtin::Sin,
        Builtin::Max,
        Builtin::Substr,
        Builtin::Pi,
        Builtin::Pow,
    ];

    /// Resolve a function name. Names are case-sensitive.
    pub fn lookup(name: &str) -> Option<Builtin> {
        Builtin::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Sin => "sin",
            Builtin::Max => "max",
            Builtin::Substr => "substr",
            Builtin::Pi => "pi",
            Builtin::Pow => "pow",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Builtin::Pi => 0,
            Builtin::Sin => 1,
            Builtin::Max | Builtin::Pow => 2,
            Builtin::Substr => 3,
        }
    }

    /// Apply to already evaluated arguments. Parsed formulas always pass
    /// `arity()` arguments; any other count from a direct caller is an error value.
    pub fn apply(self, args: &[Value]) -> Value {
        if args.len() != self.arity() {
            return Value::Error(format!(
                "{} expects {} arguments, got {}",
                self.name(),
                self.arity(),
                args.len()
            ));
        }
        match self {
            Builtin::Sin => number_unary(&args[0], f64::sin),
            Builtin::Max => number_binary(&args[0], &args[1], f64::max),
            Builtin::Substr => substring(&args[0], &args[1], &args[2]),
            Builtin::Pi => Value::Number(std::f64::consts::PI),
            Builtin::Pow => number_binary(&args[0], &args[1], f64::powf),
        }
    }
}

impl UnaryOp {
    pub fn apply(self, operand: Value) -> Value {
        match self {
            UnaryOp::Negate => number_unary(&operand, |a| -a),
            UnaryOp::Plus => number_unary(&operand, |a| a),
        }
    }
}

impl BinaryOp {
    /// IEEE-754 semantics throughout: `x / 0` is infinite and `0 / 0` is NaN.
    pub fn apply(self, left: Value, right: Value) -> Value {
        match self {
            BinaryOp::Add => number_binary(&left, &right, |a, b| a + b),
            BinaryOp::Subtract => number_binary(&left, &right, |a, b| a - b),
            BinaryOp::Multiply => number_binary(&left, &right, |a, b| a * b),
            BinaryOp::Divide => number_binary(&left, &right, |a, b| a / b),
        }
    }
}

fn number_unary(x: &Value, op: impl Fn(f64) -> f64) -> Value {
    match x.expect_number() {
        Ok(a) => Value::Number(op(a)),
        Err(err) => err,
    }
}

fn number_binary(left: &Value, right: &Value, op: impl Fn(f64, f64) -> f64) -> Value {
    let a = match left.expect_number() {
        Ok(a) => a,
        Err(err) => return err,
    };
    let b = match right.expect_number() {
        Ok(b) => b,
        Err(err) => return err,
    };
    Value::Number(op(a, b))
}

/// A number usable as a string index: finite, integral and within `i32`.
fn whole_number(x: &Value) -> Option<i64> {
    let n = x.as_number()?;
    let in_range = n >= i32::MIN as f64 && n <= i32::MAX as f64;
    (n.fract() == 0.0 && in_range).then_some(n as i64)
}

/// `substr(s, begin, end)`: characters `[begin, end)` of `s`.
fn substring(s: &Value, begin: &Value, end: &Value) -> Value {
    let Some(text) = s.as_str() else {
        return Value::unexpected("a string", s);
    };
    let Some(b) = whole_number(begin) else {
        return Value::unexpected("whole number", begin);
    };
    let Some(e) = whole_number(end) else {
        return Value::unexpected("whole number", end);
    };

    let length = text.chars().count() as i64;
    if b < 0 || e > length || b > e {
        return Value::Error(format!("begin {}, end {}, length {}", b, e, length));
    }
    Value::Str(text.chars().skip(b as usize).take((e - b) as usize).collect())
}
