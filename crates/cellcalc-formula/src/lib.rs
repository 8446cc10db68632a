//! # cellcalc-formula
//!
//! Formula evaluation for cellcalc.
//!
//! This crate provides:
//! - Token classification (string atoms → [`Token`])
//! - Formula evaluation with `+ - * /` precedence, parenthesised groups and
//!   cell references ([`Evaluator`])
//! - The fixed formula error taxonomy ([`FormulaError`])
//! - Cell recalculation against a [`SheetMemory`](cellcalc_core::SheetMemory)
//!
//! ## Example
//!
//! ```rust
//! use cellcalc_core::SheetMemory;
//! use cellcalc_formula::{Evaluator, FormulaError};
//!
//! let sheet = SheetMemory::new();
//! let mut evaluator = Evaluator::new(&sheet);
//!
//! let outcome = evaluator.evaluate(&["2", "+", "3", "*", "4"]);
//! assert_eq!(outcome.value, 14.0);
//!
//! let outcome = evaluator.evaluate(&["5", "/", "0"]);
//! assert_eq!(outcome.error, Some(FormulaError::DivideByZero));
//! assert_eq!(evaluator.error(), "divide by zero");
//! ```

pub mod error;
pub mod evaluator;
pub mod recalc;
pub mod token;

pub use error::FormulaError;
pub use evaluator::{Evaluation, Evaluator};
#[cfg(feature = "serde")]
pub use evaluator::serialize_number;
pub use recalc::{recalculate_cell, recalculate_in_order, RecalcError, RecalcStats};
pub use token::{
    classify_all, is_cell_reference_token, is_numeric_token, parse_number_prefix, Operator, Token,
};
