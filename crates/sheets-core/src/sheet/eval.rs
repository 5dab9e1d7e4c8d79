use std::collections::{HashMap, HashSet};

use log::{error, trace, warn};
use sheets_formula::formula::{CellAddress, Value, format_value};

use super::Sheet;

/// Value cached for cells caught in a reference cycle.
pub const CYCLE_MESSAGE: &str = "Part of reference cycle";

/// Per-call DFS marking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Visit {
    NotVisited,
    Entered,
    Left,
}

fn invalid_address(addr: CellAddress) -> Value {
    Value::Error(format!("Invalid address {}", addr))
}

impl Sheet {
    /// Value of the cell at `addr`, computing and caching whatever it needs.
    ///
    /// The walk is an explicit-stack DFS. A cell is entered on its first pop
    /// (its in-range references are pushed above it) and computed on its
    /// second, when every reference is cached. Reaching an entered cell again
    /// is a cycle: the traversal stops and the cycle error is cached at `addr`
    /// and at each cell of the cycle.
    pub fn get_value(&mut self, addr: CellAddress) -> Value {
        if !self.contains(addr) {
            return invalid_address(addr);
        }
        if let Some(value) = &self.store.cell(addr).cached {
            return value.clone();
        }

        let mut visits: HashMap<CellAddress, Visit> = HashMap::new();
        let mut stack = vec![addr];

        while let Some(&top) = stack.last() {
            let cell = self.store.cell(top);
            let visit = visits.get(&top).copied().unwrap_or(Visit::NotVisited);
            match visit {
                _ if cell.cached.is_some() => {
                    stack.pop();
                }
                Visit::Left => {
                    stack.pop();
                }
                Visit::Entered => {
                    stack.pop();
                    visits.insert(top, Visit::Left);
                    let value = cell.expr.evaluate(&|reference| self.resolve(reference));
                    trace!("computed {} = {:?}", top, value);
                    self.store.cache(top, value);
                }
                Visit::NotVisited => {
                    visits.insert(top, Visit::Entered);
                    let back_edge = cell
                        .references
                        .iter()
                        .copied()
                        .find(|r| visits.get(r) == Some(&Visit::Entered));
                    if let Some(target) = back_edge {
                        return self.mark_cycle(addr, target, &stack, &visits);
                    }
                    stack.extend(
                        cell.references
                            .iter()
                            .copied()
                            .filter(|r| self.store.is_valid(*r)),
                    );
                }
            }
        }

        self.resolve(addr)
    }

    /// Display text for the cell at `addr`.
    pub fn get_visible_value(&mut self, addr: CellAddress) -> String {
        format_value(&self.get_value(addr))
    }

    pub fn is_error(&mut self, addr: CellAddress) -> bool {
        self.get_value(addr).is_error()
    }

    /// Lookup used while computing a cell. In-range references are cached by
    /// the time their dependant is computed.
    fn resolve(&self, addr: CellAddress) -> Value {
        if !self.contains(addr) {
            return invalid_address(addr);
        }
        let cached = self.store.cell(addr).cached.clone();
        debug_assert!(cached.is_some(), "{} read before it was computed", addr);
        cached.unwrap_or_else(|| {
            error!("{} read before it was computed", addr);
            Value::Error(format!("Unresolved reference {}", addr))
        })
    }

    /// Cache the cycle error at `requested` and on the entered path from
    /// `target` to the top of the stack.
    fn mark_cycle(
        &mut self,
        requested: CellAddress,
        target: CellAddress,
        stack: &[CellAddress],
        visits: &HashMap<CellAddress, Visit>,
    ) -> Value {
        let start = stack.iter().rposition(|a| *a == target).unwrap_or(0);
        let mut members: HashSet<CellAddress> = stack[start..]
            .iter()
            .copied()
            .filter(|a| visits.get(a) == Some(&Visit::Entered))
            .collect();
        members.insert(requested);
        warn!(
            "reference cycle through {} while evaluating {} ({} cells marked)",
            target,
            requested,
            members.len()
        );

        let value = Value::Error(CYCLE_MESSAGE.to_string());
        for member in members {
            self.store.cache(member, value.clone());
        }
        value
    }
}
