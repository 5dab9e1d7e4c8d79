use std::collections::HashSet;
use std::ops::Range;

use log::{debug, trace};
use sheets_formula::formula::CellAddress;

use super::Sheet;
use crate::cell::Cell;
use crate::error::Result;
use crate::store::clamp_dimension;

/// Whether `addr` has its row or its column inside the given band.
fn in_band(addr: CellAddress, rows: &Range<usize>, columns: &Range<usize>) -> bool {
    rows.contains(&addr.row) || columns.contains(&addr.col)
}

impl Sheet {
    /// Set the formula text at `addr`.
    ///
    /// Returns every address whose value was invalidated, `addr` included.
    /// Writing the current formula again is a no-op and returns an empty set.
    pub fn set_value(
        &mut self,
        addr: CellAddress,
        formula: &str,
    ) -> Result<HashSet<CellAddress>> {
        self.check_bounds(addr)?;

        let old = self.store.cell(addr);
        if old.formula == formula {
            return Ok(HashSet::new());
        }
        let old_references = old.references.clone();
        let cell = Cell::new(formula);

        for reference in &old_references {
            if cell.references.binary_search(reference).is_err() {
                self.store.remove_dependant(addr, *reference);
            }
        }
        for reference in &cell.references {
            if old_references.binary_search(reference).is_err() {
                self.store.add_dependant(addr, *reference);
            }
        }
        self.store.replace(addr, cell);

        let invalidated = self.invalidate_all([addr]);
        debug!(
            "set {} to {:?}, {} cells invalidated",
            addr,
            formula,
            invalidated.len()
        );
        Ok(invalidated)
    }

    /// Clear cached values of `seeds` and everything that transitively
    /// depends on them. Returns the cleared addresses.
    pub(crate) fn invalidate_all(
        &mut self,
        seeds: impl IntoIterator<Item = CellAddress>,
    ) -> HashSet<CellAddress> {
        let mut stack: Vec<CellAddress> = seeds.into_iter().collect();
        let mut invalidated = HashSet::new();

        while let Some(top) = stack.pop() {
            if !invalidated.insert(top) {
                continue;
            }
            trace!("invalidating {}", top);
            self.store.invalidate(top);
            stack.extend(
                self.store
                    .dependants(top)
                    .into_iter()
                    .filter(|dependant| !invalidated.contains(dependant)),
            );
        }
        invalidated
    }

    /// Add `rows` rows and `columns` columns, up to 10000 each.
    ///
    /// Cells referencing the newly opened band are invalidated first.
    pub fn extend(&mut self, rows: usize, columns: usize) -> HashSet<CellAddress> {
        let (old_rows, old_columns) = (self.row_count(), self.column_count());
        let new_rows = clamp_dimension(old_rows.saturating_add(rows));
        let new_columns = clamp_dimension(old_columns.saturating_add(columns));

        let opened = (old_rows..new_rows, old_columns..new_columns);
        let seeds = self
            .store
            .cells_referencing(|r| in_band(r, &opened.0, &opened.1));
        let invalidated = self.invalidate_all(seeds);

        self.store.resize(new_rows, new_columns);
        debug!(
            "extended {}x{} to {}x{}, {} cells invalidated",
            old_rows,
            old_columns,
            new_rows,
            new_columns,
            invalidated.len()
        );
        invalidated
    }

    /// Remove `rows` rows and `columns` columns, down to 2 each.
    ///
    /// Cells referencing the closed band are invalidated, then every cell
    /// outside the new bounds is dropped. Returns the invalidated cells that
    /// are still in range.
    pub fn shrink(&mut self, rows: usize, columns: usize) -> HashSet<CellAddress> {
        let (old_rows, old_columns) = (self.row_count(), self.column_count());
        self.store.resize(
            old_rows.saturating_sub(rows),
            old_columns.saturating_sub(columns),
        );
        let (new_rows, new_columns) = (self.row_count(), self.column_count());

        let closed = (new_rows..old_rows, new_columns..old_columns);
        let seeds: Vec<CellAddress> = self
            .store
            .cells_referencing(|r| in_band(r, &closed.0, &closed.1))
            .into_iter()
            .filter(|addr| self.contains(*addr))
            .collect();
        let mut invalidated = self.invalidate_all(seeds);

        let dropped = self.store.drop_out_of_bounds();
        invalidated.retain(|addr| self.store.is_valid(*addr));
        debug!(
            "shrank {}x{} to {}x{}, dropped {} cells, {} cells invalidated",
            old_rows,
            old_columns,
            new_rows,
            new_columns,
            dropped.len(),
            invalidated.len()
        );
        invalidated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SheetError;
    use crate::store::{MAX_DIMENSION, MIN_DIMENSION};
    use sheets_formula::formula::Value;

    fn addr(a1: &str) -> CellAddress {
        a1.parse().unwrap()
    }

    fn set(addrs: &[&str]) -> HashSet<CellAddress> {
        addrs.iter().map(|a1| addr(a1)).collect()
    }

    #[test]
    fn test_set_value_returns_transitive_dependants() {
        let mut sheet = Sheet::new(10, 5);
        sheet.set_value(addr("A1"), "1").unwrap();
        sheet.set_value(addr("B1"), "=A1+1").unwrap();
        sheet.set_value(addr("C1"), "=B1+1").unwrap();
        sheet.set_value(addr("D1"), "=5").unwrap();
        assert_eq!(sheet.get_value(addr("C1")), Value::Number(3.0));

        let invalidated = sheet.set_value(addr("A1"), "10").unwrap();
        assert_eq!(invalidated, set(&["A1", "B1", "C1"]));
        assert_eq!(sheet.get_value(addr("C1")), Value::Number(12.0));
    }

    #[test]
    fn test_same_formula_is_a_no_op() {
        let mut sheet = Sheet::new(10, 5);
        sheet.set_value(addr("A1"), "1").unwrap();
        sheet.set_value(addr("B1"), "=A1*2").unwrap();
        assert_eq!(sheet.get_value(addr("B1")), Value::Number(2.0));

        assert!(sheet.set_value(addr("A1"), "1").unwrap().is_empty());
        assert_eq!(sheet.store.cell(addr("B1")).cached, Some(Value::Number(2.0)));
    }

    #[test]
    fn test_new_formula_moves_dependant_edges() {
        let mut sheet = Sheet::new(10, 5);
        sheet.set_value(addr("C1"), "=A1").unwrap();
        sheet.set_value(addr("C1"), "=B1").unwrap();

        assert!(sheet.store.dependants(addr("A1")).is_empty());
        assert_eq!(sheet.store.dependants(addr("B1")), vec![addr("C1")]);
        assert_eq!(sheet.set_value(addr("A1"), "3").unwrap(), set(&["A1"]));
        assert_eq!(sheet.set_value(addr("B1"), "3").unwrap(), set(&["B1", "C1"]));
    }

    #[test]
    fn test_dependant_set_before_its_referent() {
        let mut sheet = Sheet::new(10, 5);
        sheet.set_value(addr("B1"), "=A1*2").unwrap();
        assert!(sheet.is_error(addr("B1")));

        assert_eq!(sheet.set_value(addr("A1"), "4").unwrap(), set(&["A1", "B1"]));
        assert_eq!(sheet.get_value(addr("B1")), Value::Number(8.0));
    }

    #[test]
    fn test_clearing_a_cell() {
        let mut sheet = Sheet::new(10, 5);
        sheet.set_value(addr("A1"), "=B1").unwrap();
        sheet.set_value(addr("A1"), "").unwrap();
        assert_eq!(sheet.get_formula(addr("A1")), "");
        assert_eq!(sheet.get_value(addr("A1")), Value::empty());
        assert_eq!(sheet.store.entry_count(), 0);
    }

    #[test]
    fn test_set_value_out_of_bounds() {
        let mut sheet = Sheet::new(2, 2);
        let err = sheet.set_value(addr("C1"), "1").unwrap_err();
        assert!(matches!(
            err,
            SheetError::AddressOutOfBounds {
                rows: 2,
                columns: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_cycle_resolves_after_edit() {
        let mut sheet = Sheet::new(10, 5);
        sheet.set_value(addr("A1"), "=B1+1").unwrap();
        let invalidated = sheet.set_value(addr("B1"), "=A1+1").unwrap();
        assert_eq!(invalidated, set(&["A1", "B1"]));
        assert!(sheet.is_error(addr("B1")));
        assert!(sheet.is_error(addr("A1")));

        sheet.set_value(addr("B1"), "1").unwrap();
        assert_eq!(sheet.get_value(addr("A1")), Value::Number(2.0));
    }

    #[test]
    fn test_resize_clamps() {
        let mut sheet = Sheet::new(8, 3);
        sheet.shrink(100, 100);
        assert_eq!(sheet.row_count(), MIN_DIMENSION);
        assert_eq!(sheet.column_count(), MIN_DIMENSION);
        sheet.extend(usize::MAX, 20_000);
        assert_eq!(sheet.row_count(), MAX_DIMENSION);
        assert_eq!(sheet.column_count(), MAX_DIMENSION);
    }

    #[test]
    fn test_extend_invalidates_cells_referencing_opened_band() {
        let mut sheet = Sheet::new(8, 3);
        sheet.set_value(addr("A1"), "=D1").unwrap();
        sheet.set_value(addr("B1"), "=A1").unwrap();
        sheet.set_value(addr("C1"), "=A2").unwrap();
        assert!(sheet.is_error(addr("B1")));
        sheet.get_value(addr("C1"));

        let invalidated = sheet.extend(0, 1);
        assert_eq!(invalidated, set(&["A1", "B1"]));
        assert_eq!(sheet.column_count(), 4);
        assert_eq!(sheet.get_value(addr("A1")), Value::empty());
    }

    #[test]
    fn test_edit_in_opened_band_reaches_old_dependants() {
        let mut sheet = Sheet::new(8, 3);
        sheet.set_value(addr("A1"), "=D1*2").unwrap();
        sheet.extend(0, 1);
        let invalidated = sheet.set_value(addr("D1"), "21").unwrap();
        assert_eq!(invalidated, set(&["D1", "A1"]));
        assert_eq!(sheet.get_value(addr("A1")), Value::Number(42.0));
    }

    #[test]
    fn test_shrink_invalidates_then_drops() {
        let mut sheet = Sheet::new(8, 4);
        sheet.set_value(addr("D1"), "5").unwrap();
        sheet.set_value(addr("A1"), "=D1").unwrap();
        sheet.set_value(addr("A2"), "=A1").unwrap();
        assert_eq!(sheet.get_value(addr("A2")), Value::Number(5.0));

        let invalidated = sheet.shrink(0, 1);
        assert_eq!(invalidated, set(&["A1", "A2"]));
        assert_eq!(
            sheet.get_value(addr("A2")),
            Value::Error("Invalid address D1".into())
        );
        assert_eq!(sheet.get_formula(addr("D1")), "");
        assert_eq!(sheet.cells().count(), 2);
    }

    #[test]
    fn test_shrink_then_extend_keeps_dependant_edges() {
        let mut sheet = Sheet::new(8, 4);
        sheet.set_value(addr("D1"), "5").unwrap();
        sheet.set_value(addr("A1"), "=D1+1").unwrap();
        sheet.shrink(0, 1);
        sheet.extend(0, 1);
        assert_eq!(
            sheet.get_value(addr("A1")),
            Value::Error("Expected number, but got Str(\"\")".into())
        );

        let invalidated = sheet.set_value(addr("D1"), "1").unwrap();
        assert_eq!(invalidated, set(&["D1", "A1"]));
        assert_eq!(sheet.get_value(addr("A1")), Value::Number(2.0));
    }

    #[test]
    fn test_shrink_drops_edges_of_removed_cells() {
        let mut sheet = Sheet::new(8, 4);
        sheet.set_value(addr("D1"), "=A1").unwrap();
        sheet.shrink(0, 1);
        assert_eq!(sheet.set_value(addr("A1"), "1").unwrap(), set(&["A1"]));
    }
}
