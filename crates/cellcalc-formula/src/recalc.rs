//! Cell recalculation
//!
//! Evaluates cells stored in a [`SheetMemory`] and writes the value and
//! error message back onto each cell. Cells are recalculated in the order
//! given; working out a dependency order (and rejecting cycles) is left to
//! the caller.

use crate::evaluator::{Evaluation, Evaluator};
use cellcalc_core::{CellAddress, SheetMemory};
use thiserror::Error;
use tracing::debug;

/// Errors from the recalculation driver
#[derive(Debug, Error)]
pub enum RecalcError {
    /// The label is not a valid cell address
    #[error(transparent)]
    Address(#[from] cellcalc_core::Error),
}

/// Statistics from a recalculation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecalcStats {
    /// Number of cells recalculated
    pub cells_calculated: usize,
    /// Number of cells left carrying an error
    pub errors: usize,
}

/// Recalculate one cell and store its value and error.
///
/// A label with no stored cell is evaluated as an empty formula and the
/// outcome is stored on a new cell.
pub fn recalculate_cell(
    memory: &mut SheetMemory,
    label: &str,
) -> Result<Evaluation, RecalcError> {
    CellAddress::parse(label)?;

    let formula: Vec<String> = memory
        .cell(label)
        .map(|cell| cell.formula().to_vec())
        .unwrap_or_default();

    let outcome = Evaluator::new(&*memory).evaluate(formula.as_slice());

    memory.set_value(label, outcome.value)?;
    memory.set_error(label, outcome.error_message())?;

    debug!(
        label,
        value = outcome.value,
        error = %outcome.error_message(),
        "recalculated cell"
    );
    Ok(outcome)
}

/// Recalculate cells in the given order
pub fn recalculate_in_order<I, S>(
    memory: &mut SheetMemory,
    labels: I,
) -> Result<RecalcStats, RecalcError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut stats = RecalcStats::default();

    for label in labels {
        let outcome = recalculate_cell(memory, label.as_ref())?;
        stats.cells_calculated += 1;
        if !outcome.is_ok() {
            stats.errors += 1;
        }
    }

    Ok(stats)
}
