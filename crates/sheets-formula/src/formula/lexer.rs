//! Formula lexer: raw cell text to a token stream.
//!
//! Text that does not start with `=` is a plain literal (number or string).
//! Otherwise the rest is scanned left to right. Minus signs are always emitted
//! as [`Token::Minus`]; the parser decides between unary and binary.

use std::fmt;

use super::cell_ref::{CellAddress, column_number};
use crate::error::{FormulaError, Result};

const COLUMN_LETTERS_LIMIT: usize = 6;
const ROW_DIGITS_LIMIT: usize = 8;

/// Tokens recognized by the formula lexer.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Str(String),
    CellRef(CellAddress),
    Ident(String),
    Plus,
    Minus,
    Asterisk,
    Slash,
    LeftBracket,
    RightBracket,
    Comma,
}

impl Token {
    /// Whether this token can be the last token of an operand.
    /// A `+`/`-` following such a token is binary; otherwise it is unary.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_) | Token::Str(_) | Token::CellRef(_) | Token::RightBracket
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::CellRef(addr) => write!(f, "{}", addr),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Asterisk => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LeftBracket => write!(f, "("),
            Token::RightBracket => write!(f, ")"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// Tokenize cell text.
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    match text.strip_prefix('=') {
        Some(formula) => Lexer::new(formula).run(),
        None => Ok(vec![literal(text)]),
    }
}

/// Non-formula text is a number if the whole of it reads as one, else a string.
fn literal(text: &str) -> Token {
    match parse_plain_number(text) {
        Some(n) => Token::Number(n),
        None => Token::Str(text.to_string()),
    }
}

/// Accepts decimal and exponent forms, surrounding whitespace, and the
/// spelled-out `Infinity` / `NaN`. Rejects Rust-only spellings such as `inf`.
fn parse_plain_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let unsigned = trimmed.trim_start_matches(['+', '-']);
    match unsigned {
        "Infinity" | "NaN" => trimmed.parse().ok(),
        _ if unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') => {
            trimmed.parse().ok()
        }
        _ => None,
    }
}

struct Lexer {
    chars: Vec<char>,
    current: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(formula: &str) -> Self {
        Lexer {
            chars: formula.chars().collect(),
            current: 0,
            tokens: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.current).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += 1;
        Some(c)
    }

    fn run(mut self) -> Result<Vec<Token>> {
        while let Some(c) = self.peek() {
            let start = self.current;
            let token = match c {
                ' ' | '\t' | '\n' => {
                    self.current += 1;
                    continue;
                }
                '+' => self.fixed(Token::Plus),
                '-' => self.fixed(Token::Minus),
                '*' => self.fixed(Token::Asterisk),
                '/' => self.fixed(Token::Slash),
                '(' => self.fixed(Token::LeftBracket),
                ')' => self.fixed(Token::RightBracket),
                ',' => self.fixed(Token::Comma),
                '"' => Token::Str(self.read_string(start)?),
                c if c.is_ascii_digit() => Token::Number(self.read_number()?),
                'A'..='Z' => Token::CellRef(self.read_cell_ref()?),
                c if c.is_alphabetic() => Token::Ident(self.read_ident()),
                symbol => {
                    return Err(FormulaError::InvalidSymbol {
                        symbol,
                        position: start,
                    });
                }
            };
            self.tokens.push(token);
        }
        Ok(self.tokens)
    }

    fn fixed(&mut self, token: Token) -> Token {
        self.current += 1;
        token
    }

    /// Reads a `"`-delimited string. `\"` is an escaped quote; any other
    /// backslash is kept as-is.
    fn read_string(&mut self, start: usize) -> Result<String> {
        self.current += 1;
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(FormulaError::NonTerminatedString(start)),
                Some('"') => return Ok(value),
                Some('\\') if self.peek() == Some('"') => {
                    self.current += 1;
                    value.push('"');
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn take_while(&mut self, limit: usize, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while out.len() < limit {
            match self.peek() {
                Some(c) if pred(c) => {
                    out.push(c);
                    self.current += 1;
                }
                _ => break,
            }
        }
        out
    }

    fn read_number(&mut self) -> Result<f64> {
        let mut text = self.take_while(usize::MAX, |c| c.is_ascii_digit());
        if self.peek() == Some('.') {
            self.current += 1;
            text.push('.');
            text.push_str(&self.take_while(usize::MAX, |c| c.is_ascii_digit()));
        }
        text.parse::<f64>()
            .map_err(|_| FormulaError::NumberFormat(text.clone()))
    }

    /// Reads `LETTERS DIGITS`: up to 6 uppercase letters for the column and up
    /// to 8 digits for the 1-indexed row.
    fn read_cell_ref(&mut self) -> Result<CellAddress> {
        let start = self.current;
        let letters = self.take_while(COLUMN_LETTERS_LIMIT, |c| c.is_ascii_uppercase());
        let digits = self.take_while(ROW_DIGITS_LIMIT, |c| c.is_ascii_digit());

        if let Some(next) = self.peek().filter(|c| c.is_alphanumeric()) {
            return Err(FormulaError::InvalidCellReference(format!(
                "unexpected symbol {} at position {}",
                next, self.current
            )));
        }

        let row = digits
            .parse::<usize>()
            .ok()
            .and_then(|row| row.checked_sub(1))
            .ok_or_else(|| {
                FormulaError::InvalidCellReference(format!(
                    "no row number of at least 1 in {}{} at position {}",
                    letters, digits, start
                ))
            })?;
        let col = column_number(&letters)
            .and_then(|col| col.checked_sub(1))
            .ok_or_else(|| FormulaError::InvalidCellReference(letters.clone()))?;

        Ok(CellAddress::new(row, col))
    }

    fn read_ident(&mut self) -> String {
        self.take_while(usize::MAX, |c| c.is_alphabetic())
    }
}
