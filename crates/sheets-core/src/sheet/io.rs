use super::Sheet;
use crate::error::{Result, SheetError};
use crate::storage::{CellInfo, SaveKind, SparseSave, parse_json, write_json};
use log::debug;
use sheets_formula::formula::CellAddress;
use std::path::Path;

const MAX_SHEET_FILE_BYTES: u64 = 64 * 1_048_576; // 64 MiB

impl Sheet {
    /// Snapshot of the bounds and every set cell.
    pub fn to_save(&self) -> SparseSave {
        SparseSave {
            kind: SaveKind::Sparse,
            row_count: self.row_count(),
            column_count: self.column_count(),
            cells: self
                .cells()
                .map(|(addr, formula)| CellInfo {
                    row: addr.row,
                    column: addr.col,
                    formula: formula.to_string(),
                })
                .collect(),
        }
    }

    /// Rebuild a sheet by replaying every saved cell into a freshly sized store.
    pub fn from_save(save: &SparseSave) -> Result<Sheet> {
        let mut sheet = Sheet::new(save.row_count, save.column_count);
        for info in &save.cells {
            sheet.set_value(CellAddress::new(info.row, info.column), &info.formula)?;
        }
        debug!(
            "loaded {}x{} sheet with {} cells",
            sheet.row_count(),
            sheet.column_count(),
            save.cells.len()
        );
        Ok(sheet)
    }

    pub fn save(&self) -> Result<String> {
        write_json(&self.to_save())
    }

    pub fn load(json: &str) -> Result<Sheet> {
        Sheet::from_save(&parse_json(json)?)
    }

    pub fn save_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.save()?)?;
        Ok(())
    }

    pub fn load_file(path: &Path) -> Result<Sheet> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_SHEET_FILE_BYTES {
            return Err(SheetError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Refusing to read {}: sheet file too large ({} bytes, max {})",
                    path.display(),
                    meta.len(),
                    MAX_SHEET_FILE_BYTES
                ),
            )));
        }
        Sheet::load(&std::fs::read_to_string(path)?)
    }
}
