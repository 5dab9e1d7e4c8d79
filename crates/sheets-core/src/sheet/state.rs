use crate::error::{Result, SheetError};
use crate::store::CellStore;
use sheets_formula::formula::CellAddress;

/// Row count of a new sheet when none is configured.
pub const DEFAULT_ROWS: usize = 8;
/// Column count of a new sheet when none is configured.
pub const DEFAULT_COLUMNS: usize = 3;

/// A spreadsheet: the sparse cell store plus the evaluation engine on top.
///
/// Single-threaded. Every method runs to completion; `get_value` takes
/// `&mut self` because it memoizes.
#[derive(Clone, Debug)]
pub struct Sheet {
    pub(crate) store: CellStore,
}

impl Sheet {
    /// Create an empty sheet. Both dimensions are clamped to `[2, 10000]`.
    pub fn new(rows: usize, columns: usize) -> Self {
        Sheet {
            store: CellStore::new(rows, columns),
        }
    }

    pub fn row_count(&self) -> usize {
        self.store.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.store.column_count()
    }

    /// Whether `addr` lies within the current bounds.
    pub fn contains(&self, addr: CellAddress) -> bool {
        self.store.is_valid(addr)
    }

    /// The formula text last set at `addr`, or `""`.
    pub fn get_formula(&self, addr: CellAddress) -> &str {
        &self.store.cell(addr).formula
    }

    /// Explicitly set cells as `(address, formula)`, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (CellAddress, &str)> {
        self.store
            .iter()
            .map(|(addr, cell)| (addr, cell.formula.as_str()))
    }

    pub(crate) fn check_bounds(&self, addr: CellAddress) -> Result<()> {
        if self.contains(addr) {
            Ok(())
        } else {
            Err(SheetError::AddressOutOfBounds {
                address: addr,
                rows: self.row_count(),
                columns: self.column_count(),
            })
        }
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLUMNS)
    }
}
