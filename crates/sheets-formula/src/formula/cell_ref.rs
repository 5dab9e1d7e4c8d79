//! Cell address parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell references
//! (e.g., "A1", "B2", "AA100") and zero-indexed row/column coordinates, plus the
//! bijective base-26 column letter codec (`A..Z, AA..`) used by formula text.
//!
//! # Examples
//!
//! ```
//! use sheets_formula::formula::CellAddress;
//!
//! let cell: CellAddress = "B3".parse().unwrap();
//! assert_eq!(cell.col, 1);  // 0-indexed
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::FormulaError;

/// A cell position by row and column indices (0-indexed).
///
/// Ordering is row-major, which gives saved files and exports a stable order.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellAddress {
    pub row: usize,
    pub col: usize,
}

fn a1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$").expect("valid A1 regex")
    })
}

impl CellAddress {
    pub const fn new(row: usize, col: usize) -> CellAddress {
        CellAddress { row, col }
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A1", "b2", "AA10").
    /// Returns None if the input is invalid or overflows.
    pub fn parse_a1(name: &str) -> Option<CellAddress> {
        let caps = a1_re().captures(name.trim())?;
        let letters = caps["letters"].to_ascii_uppercase();
        let col = column_number(&letters)?.checked_sub(1)?;
        let row = caps["numbers"].parse::<usize>().ok()?.checked_sub(1)?;
        Some(CellAddress::new(row, col))
    }

    /// Convert a column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

/// Encode a 1-based column number as letters (1 -> A, 27 -> AA). Zero encodes as "".
pub fn column_letters(number: usize) -> String {
    match number.checked_sub(1) {
        Some(col) => CellAddress::col_to_letters(col),
        None => String::new(),
    }
}

/// Decode uppercase column letters into a 1-based column number (A -> 1, AAA -> 703).
/// Returns None for empty input, non-uppercase letters, or overflow.
pub fn column_number(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    letters.bytes().try_fold(0usize, |acc, c| {
        if !c.is_ascii_uppercase() {
            return None;
        }
        acc.checked_mul(26)?.checked_add((c - b'A') as usize + 1)
    })
}

impl std::str::FromStr for CellAddress {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| FormulaError::InvalidCellReference(s.to_string()))
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellAddress::col_to_letters(self.col), self.row + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_a1_single_and_multi_letter_columns() {
        assert_eq!(CellAddress::parse_a1("A1"), Some(CellAddress::new(0, 0)));
        assert_eq!(CellAddress::parse_a1("Z1"), Some(CellAddress::new(0, 25)));
        assert_eq!(CellAddress::parse_a1("AA10"), Some(CellAddress::new(9, 26)));
        assert_eq!(CellAddress::parse_a1("ba1"), Some(CellAddress::new(0, 52)));
    }

    #[test]
    fn test_parse_a1_invalid_inputs() {
        assert!(CellAddress::parse_a1("").is_none());
        assert!(CellAddress::parse_a1("123").is_none());
        assert!(CellAddress::parse_a1("ABC").is_none());
        assert!(CellAddress::parse_a1("A0").is_none());
        assert!(CellAddress::parse_a1("A 1").is_none());
    }

    #[test]
    fn test_parse_a1_overflow_returns_none() {
        let huge = format!("{}1", "Z".repeat(40));
        assert!(CellAddress::parse_a1(&huge).is_none());
    }

    #[test]
    fn test_from_str_reports_input() {
        let err = "1A".parse::<CellAddress>().unwrap_err();
        assert_eq!(err, FormulaError::InvalidCellReference("1A".to_string()));
    }

    #[test]
    fn test_display_round_trip() {
        let addr = CellAddress::new(99, 702);
        assert_eq!(addr.to_string(), "AAA100");
        assert_eq!("AAA100".parse::<CellAddress>().unwrap(), addr);
    }

    #[test]
    fn test_column_number_known_values() {
        assert_eq!(column_number("A"), Some(1));
        assert_eq!(column_number("Z"), Some(26));
        assert_eq!(column_number("AAA"), Some(703));
        assert_eq!(column_number("ZZZZZZ"), Some(321_272_406));
        assert_eq!(column_number(""), None);
        assert_eq!(column_number("a"), None);
    }

    #[test]
    fn test_column_letters_zero_is_empty() {
        assert_eq!(column_letters(0), "");
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(703), "AAA");
    }

    #[test]
    fn test_col_to_letters_handles_max_usize() {
        let letters = CellAddress::col_to_letters(usize::MAX);
        assert!(!letters.is_empty());
        assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
    }

    proptest! {
        #[test]
        fn number_to_letters_and_back(n in 1usize..100_000_000) {
            prop_assert_eq!(column_number(&column_letters(n)), Some(n));
        }

        #[test]
        fn letters_to_number_and_back(letters in "[A-Z]{1,6}") {
            let number = column_number(&letters).unwrap();
            prop_assert_eq!(column_letters(number), letters);
        }
    }
}
