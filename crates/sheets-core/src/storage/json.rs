//! Sparse JSON save format.
//!
//! ```json
//! {"type": "SPARSE", "rowCount": 8, "columnCount": 3,
//!  "cells": [{"row": 0, "column": 0, "formula": "=1+1"}]}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Layout tag of a save document. Only the sparse layout exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveKind {
    #[default]
    #[serde(rename = "SPARSE")]
    Sparse,
}

/// One explicitly set cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellInfo {
    pub row: usize,
    pub column: usize,
    pub formula: String,
}

/// A saved sheet: its bounds and every set cell in row-major order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SparseSave {
    #[serde(rename = "type", default)]
    pub kind: SaveKind,
    pub row_count: usize,
    pub column_count: usize,
    #[serde(default)]
    pub cells: Vec<CellInfo>,
}

/// Pretty-printed JSON for a save document.
pub fn write_json(save: &SparseSave) -> Result<String> {
    Ok(serde_json::to_string_pretty(save)?)
}

pub fn parse_json(text: &str) -> Result<SparseSave> {
    Ok(serde_json::from_str(text)?)
}
