//! Values produced by evaluating an expression.

/// Result of evaluating a formula.
///
/// Errors are ordinary data: they flow through arithmetic and function calls
/// and every operator re-checks its operand kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Str(String),
    Error(String),
}

impl Value {
    /// The value of a blank cell.
    pub const fn empty() -> Value {
        Value::Str(String::new())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Error message, if this is an error value.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Value::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Numeric coercion shared by operators and builtins.
    /// On mismatch the error value to return is handed back in `Err`.
    pub fn expect_number(&self) -> Result<f64, Value> {
        self.as_number()
            .ok_or_else(|| Value::unexpected("number", self))
    }

    /// `Expected <what>, but got <repr>`, where errors show up as just `Error`.
    pub fn unexpected(expected: &str, actual: &Value) -> Value {
        let repr = match actual {
            Value::Error(_) => "Error".to_string(),
            other => format!("{:?}", other),
        };
        Value::Error(format!("Expected {}, but got {}", expected, repr))
    }
}
