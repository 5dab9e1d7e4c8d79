//! Sparse cell storage with reverse dependency edges.
//!
//! Only addresses that were set, or that are referenced by a set cell, have
//! an entry. Everything else reads as [`DEFAULT_CELL`].

use std::collections::{HashMap, HashSet};

use sheets_formula::formula::{CellAddress, Value};

use crate::cell::{Cell, DEFAULT_CELL};

/// Smallest allowed row or column count.
pub const MIN_DIMENSION: usize = 2;
/// Largest allowed row or column count.
pub const MAX_DIMENSION: usize = 10_000;

/// A stored cell plus the addresses whose formulas reference it.
#[derive(Clone, Debug)]
struct Entry {
    cell: Cell,
    dependants: HashSet<CellAddress>,
}

impl Entry {
    fn blank() -> Entry {
        Entry {
            cell: Cell::blank(),
            dependants: HashSet::new(),
        }
    }

    fn is_unused(&self) -> bool {
        self.cell.is_blank() && self.dependants.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct CellStore {
    entries: HashMap<CellAddress, Entry>,
    row_count: usize,
    column_count: usize,
}

/// Clamp a row or column count into `[MIN_DIMENSION, MAX_DIMENSION]`.
pub fn clamp_dimension(n: usize) -> usize {
    n.clamp(MIN_DIMENSION, MAX_DIMENSION)
}

impl CellStore {
    pub fn new(rows: usize, columns: usize) -> Self {
        CellStore {
            entries: HashMap::new(),
            row_count: clamp_dimension(rows),
            column_count: clamp_dimension(columns),
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn is_valid(&self, addr: CellAddress) -> bool {
        addr.row < self.row_count && addr.col < self.column_count
    }

    /// The cell at `addr`, or the shared blank cell.
    pub fn cell(&self, addr: CellAddress) -> &Cell {
        self.entries
            .get(&addr)
            .map(|entry| &entry.cell)
            .unwrap_or(&DEFAULT_CELL)
    }

    /// Addresses whose formulas reference `addr`, sorted row-major.
    pub fn dependants(&self, addr: CellAddress) -> Vec<CellAddress> {
        let mut out: Vec<CellAddress> = self
            .entries
            .get(&addr)
            .map(|entry| entry.dependants.iter().copied().collect())
            .unwrap_or_default();
        out.sort_unstable();
        out
    }

    /// Record that `dependant` references `dependee`.
    pub fn add_dependant(&mut self, dependant: CellAddress, dependee: CellAddress) {
        self.entries
            .entry(dependee)
            .or_insert_with(Entry::blank)
            .dependants
            .insert(dependant);
    }

    /// Drop the edge `dependant -> dependee`. A blank entry left with no
    /// dependants is removed.
    pub fn remove_dependant(&mut self, dependant: CellAddress, dependee: CellAddress) {
        if let Some(entry) = self.entries.get_mut(&dependee) {
            entry.dependants.remove(&dependant);
            if entry.is_unused() {
                self.entries.remove(&dependee);
            }
        }
    }

    /// Put `cell` at `addr`, keeping the existing dependants.
    pub fn replace(&mut self, addr: CellAddress, cell: Cell) {
        let entry = self.entries.entry(addr).or_insert_with(Entry::blank);
        entry.cell = cell;
        if entry.is_unused() {
            self.entries.remove(&addr);
        }
    }

    /// Clear the memoized value at `addr`. Unset addresses have nothing to clear.
    pub fn invalidate(&mut self, addr: CellAddress) {
        if let Some(entry) = self.entries.get_mut(&addr) {
            entry.cell.cached = None;
        }
    }

    pub fn cache(&mut self, addr: CellAddress, value: Value) {
        self.entries
            .entry(addr)
            .or_insert_with(Entry::blank)
            .cell
            .cached = Some(value);
    }

    /// Set new bounds, clamped. Entries are not touched.
    pub fn resize(&mut self, rows: usize, columns: usize) {
        self.row_count = clamp_dimension(rows);
        self.column_count = clamp_dimension(columns);
    }

    /// Addresses of stored cells with at least one reference matching `pred`,
    /// sorted row-major.
    pub fn cells_referencing(&self, pred: impl Fn(CellAddress) -> bool) -> Vec<CellAddress> {
        let mut out: Vec<CellAddress> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.cell.references_any(&pred))
            .map(|(addr, _)| *addr)
            .collect();
        out.sort_unstable();
        out
    }

    /// Remove every entry outside the current bounds, along with the edges
    /// its formula created. An out-of-range address still referenced from
    /// inside the bounds keeps a blank entry so its dependants survive.
    /// Returns the dropped addresses that had formulas.
    pub fn drop_out_of_bounds(&mut self) -> Vec<CellAddress> {
        let mut outside: Vec<CellAddress> = self
            .entries
            .keys()
            .copied()
            .filter(|addr| !self.is_valid(*addr))
            .collect();
        outside.sort_unstable();

        let mut dropped = Vec::new();
        for addr in outside {
            let Some(entry) = self.entries.get_mut(&addr) else {
                continue;
            };
            let old = std::mem::replace(&mut entry.cell, Cell::blank());
            if !old.is_blank() {
                dropped.push(addr);
            }
            for referenced in &old.references {
                self.remove_dependant(addr, *referenced);
            }
            if self.entries.get(&addr).is_some_and(Entry::is_unused) {
                self.entries.remove(&addr);
            }
        }
        dropped
    }

    /// Explicitly set cells (non-empty formula), in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellAddress, &Cell)> {
        let mut cells: Vec<(CellAddress, &Cell)> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.cell.is_blank())
            .map(|(addr, entry)| (*addr, &entry.cell))
            .collect();
        cells.sort_unstable_by_key(|(addr, _)| *addr);
        cells.into_iter()
    }

    /// Number of stored entries, including blank placeholders.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
