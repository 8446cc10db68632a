//! # cellcalc-core
//!
//! Core data structures for the cellcalc spreadsheet engine.
//!
//! This crate provides the types formula evaluation reads through:
//! - [`CellAddress`] - A1 cell labels
//! - [`LabelValidator`] - Decides whether a token names a cell
//! - [`Cell`] - A cell's formula tokens, cached value and error
//! - [`CellStore`] and [`SheetMemory`] - Cell lookup by label
//!
//! ## Example
//!
//! ```rust
//! use cellcalc_core::{CellStore, SheetMemory};
//!
//! let mut sheet = SheetMemory::new();
//! sheet.set_formula("A1", ["1", "+", "2"]).unwrap();
//! sheet.set_value("A1", 3.0).unwrap();
//!
//! let cell = sheet.lookup("A1");
//! assert_eq!(cell.value(), 3.0);
//! assert_eq!(cell.error(), "");
//! ```

pub mod address;
pub mod cell;
pub mod error;
pub mod label;
pub mod memory;

// Re-exports for convenience
pub use address::CellAddress;
pub use cell::Cell;
pub use error::{Error, Result};
pub use label::{A1Labels, LabelValidator};
pub use memory::{CellStore, SheetMemory};

/// Maximum number of rows in a sheet
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a sheet
pub const MAX_COLS: u16 = 16_384;
