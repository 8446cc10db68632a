//! Cell label validation

use crate::CellAddress;

/// Decides whether a formula token names a cell.
pub trait LabelValidator {
    /// Returns true if `token` is a well-formed cell label
    fn is_valid_label(&self, token: &str) -> bool;
}

/// The default validator: strict upper-case A1 labels within sheet bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct A1Labels;

impl LabelValidator for A1Labels {
    fn is_valid_label(&self, token: &str) -> bool {
        CellAddress::parse(token).is_ok()
    }
}

impl<F> LabelValidator for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid_label(&self, token: &str) -> bool {
        self(token)
    }
}
