//! Cell storage
//!
//! [`CellStore`] is the lookup seam formula evaluation reads through.
//! [`SheetMemory`] is the in-memory implementation used by the recalculation
//! driver and the CLI.

use std::borrow::Cow;

use ahash::AHashMap;

use crate::error::Result;
use crate::{Cell, CellAddress};

/// Read access to cells by label
pub trait CellStore {
    /// Look up a cell by label.
    ///
    /// Lookup never fails: a label that names no stored cell (or is not a
    /// label at all) yields an empty [`Cell`].
    fn lookup(&self, label: &str) -> Cow<'_, Cell>;
}

/// Sparse in-memory storage for a sheet's cells
///
/// Only cells that have been written are stored.
#[derive(Debug, Default, Clone)]
pub struct SheetMemory {
    cells: AHashMap<CellAddress, Cell>,
}

impl SheetMemory {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell's formula tokens, creating the cell if needed
    pub fn set_formula<I, S>(&mut self, label: &str, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let addr = CellAddress::parse(label)?;
        self.cells.entry(addr).or_default().set_formula(tokens);
        Ok(())
    }

    /// Store a computed value for a cell, creating the cell if needed
    pub fn set_value(&mut self, label: &str, value: f64) -> Result<()> {
        let addr = CellAddress::parse(label)?;
        self.cells.entry(addr).or_default().set_value(value);
        Ok(())
    }

    /// Store an error message for a cell (empty clears it)
    pub fn set_error<S: Into<String>>(&mut self, label: &str, error: S) -> Result<()> {
        let addr = CellAddress::parse(label)?;
        self.cells.entry(addr).or_default().set_error(error);
        Ok(())
    }

    /// Get a stored cell
    pub fn cell(&self, label: &str) -> Option<&Cell> {
        let addr = CellAddress::parse(label).ok()?;
        self.cells.get(&addr)
    }

    /// Get a stored cell mutably
    pub fn cell_mut(&mut self, label: &str) -> Option<&mut Cell> {
        let addr = CellAddress::parse(label).ok()?;
        self.cells.get_mut(&addr)
    }

    /// Remove a cell, returning it if it was stored
    pub fn clear(&mut self, label: &str) -> Option<Cell> {
        let addr = CellAddress::parse(label).ok()?;
        self.cells.remove(&addr)
    }

    /// Labels of all stored cells in row-major order
    pub fn labels(&self) -> Vec<String> {
        let mut addrs: Vec<CellAddress> = self.cells.keys().copied().collect();
        addrs.sort_unstable();
        addrs.iter().map(CellAddress::to_a1_string).collect()
    }

    /// Number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

impl CellStore for SheetMemory {
    fn lookup(&self, label: &str) -> Cow<'_, Cell> {
        match self.cell(label) {
            Some(cell) => Cow::Borrowed(cell),
            None => Cow::Owned(Cell::default()),
        }
    }
}
