//! The cell record held by a sheet

/// A single cell: its token formula, the last computed value and the last error
///
/// The error is an empty string when the cell has none. A cell with a
/// non-empty, error-free formula carries a usable value; an empty cell
/// has value 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    formula: Vec<String>,
    value: f64,
    error: String,
}

impl Cell {
    /// Create a cell holding a formula that has not been computed yet
    pub fn with_formula<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            formula: tokens.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// The formula tokens, in evaluation order
    pub fn formula(&self) -> &[String] {
        &self.formula
    }

    /// The last computed value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The last error message, empty when there is none
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Check if the cell carries an error
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// Check if the cell has no formula
    pub fn is_empty(&self) -> bool {
        self.formula.is_empty()
    }

    /// Replace the formula. The cached value and error are left as they are
    /// until the cell is recomputed.
    pub fn set_formula<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formula = tokens.into_iter().map(Into::into).collect();
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    pub fn set_error<S: Into<String>>(&mut self, error: S) {
        self.error = error.into();
    }

    pub fn clear_error(&mut self) {
        self.error.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cell_is_empty() {
        let cell = Cell::default();
        assert!(cell.is_empty());
        assert_eq!(cell.value(), 0.0);
        assert_eq!(cell.error(), "");
        assert!(!cell.has_error());
    }

    #[test]
    fn test_cell_setters() {
        let mut cell = Cell::with_formula(["1", "+", "2"]);
        assert_eq!(cell.formula(), ["1", "+", "2"]);

        cell.set_value(3.0);
        cell.set_error("divide by zero");
        assert_eq!(cell.value(), 3.0);
        assert!(cell.has_error());

        cell.clear_error();
        assert_eq!(cell.error(), "");
    }
}
