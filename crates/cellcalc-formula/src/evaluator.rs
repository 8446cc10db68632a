//! Formula evaluator
//!
//! Evaluates a token sequence left to right with two precedence levels.
//! `*` and `/` fold straight into the top of a value stack while `+` and `-`
//! push a new signed entry, so summing the stack at the end of a group
//! yields the usual precedence. Parenthesised groups are evaluated by
//! recursing over the tokens between the matching parentheses.

use crate::error::FormulaError;
use crate::token::{self, classify_all, Operator, Token};
use cellcalc_core::{A1Labels, CellStore, LabelValidator};
use tracing::{debug, trace};

/// Outcome of evaluating a formula
///
/// A value is always present. When `error` is set the value may still be
/// meaningful: a formula that ends in an operator records
/// [`FormulaError::InvalidFormula`] but keeps the value computed so far.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Evaluation {
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_number"))]
    pub value: f64,
    pub error: Option<FormulaError>,
}

impl Evaluation {
    pub fn ok(value: f64) -> Self {
        Self { value, error: None }
    }

    pub fn failed(value: f64, error: FormulaError) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// The error message, or an empty string when there is none
    pub fn error_message(&self) -> String {
        self.error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}

/// Serialize a number, writing non-finite values as the strings
/// `"Infinity"`, `"-Infinity"` and `"NaN"` instead of `null`
#[cfg(feature = "serde")]
pub fn serialize_number<S: serde::Serializer>(
    value: &f64,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if value.is_sign_positive() {
        serializer.serialize_str("Infinity")
    } else {
        serializer.serialize_str("-Infinity")
    }
}

impl Default for Evaluation {
    fn default() -> Self {
        Self::ok(0.0)
    }
}

/// Per-group scan state: the operand being built, the operator that will
/// combine it with the stack, the stack itself and any error recorded
/// without stopping the scan.
struct FoldState {
    stack: Vec<f64>,
    num: f64,
    pending: Operator,
    error: Option<FormulaError>,
}

impl FoldState {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            num: 0.0,
            pending: Operator::Add,
            error: None,
        }
    }

    /// Fold the current operand into the stack using the pending operator,
    /// then make `next` the pending operator.
    fn commit(&mut self, next: Option<Operator>) -> Result<(), FormulaError> {
        match self.pending {
            Operator::Add => self.stack.push(self.num),
            Operator::Sub => self.stack.push(-self.num),
            Operator::Mul => {
                let top = self.stack.pop().unwrap_or_default();
                self.stack.push(top * self.num);
            }
            Operator::Div => {
                if self.num == 0.0 {
                    return Err(FormulaError::DivideByZero);
                }
                let top = self.stack.pop().unwrap_or_default();
                self.stack.push(top / self.num);
            }
        }
        self.num = 0.0;
        if let Some(op) = next {
            self.pending = op;
        }
        Ok(())
    }

    fn finish(self) -> Evaluation {
        // Pop order, top of stack first
        let value = self.stack.iter().rev().fold(0.0, |acc, v| acc + v);
        Evaluation {
            value,
            error: self.error,
        }
    }
}

/// Evaluates token formulas against a [`CellStore`]
///
/// The evaluator keeps the outcome of its last [`evaluate`](Self::evaluate)
/// call for the [`result`](Self::result) and [`error`](Self::error)
/// accessors. [`compute`](Self::compute) evaluates without touching that
/// state and only needs a shared reference.
///
/// # Example
///
/// ```rust
/// use cellcalc_core::SheetMemory;
/// use cellcalc_formula::Evaluator;
///
/// let mut sheet = SheetMemory::new();
/// sheet.set_formula("A1", ["4"]).unwrap();
/// sheet.set_value("A1", 4.0).unwrap();
///
/// let mut evaluator = Evaluator::new(&sheet);
/// evaluator.evaluate(&["(", "A1", "+", "1", ")", "*", "2"]);
/// assert_eq!(evaluator.result(), 10.0);
/// assert_eq!(evaluator.error(), "");
/// ```
pub struct Evaluator<'a, S: CellStore + ?Sized, V: LabelValidator = A1Labels> {
    store: &'a S,
    labels: V,
    last: Evaluation,
}

impl<'a, S: CellStore + ?Sized> Evaluator<'a, S> {
    /// Create an evaluator that recognises A1 labels
    pub fn new(store: &'a S) -> Self {
        Self::with_validator(store, A1Labels)
    }
}

impl<'a, S: CellStore + ?Sized, V: LabelValidator> Evaluator<'a, S, V> {
    /// Create an evaluator with a custom label validator
    pub fn with_validator(store: &'a S, labels: V) -> Self {
        Self {
            store,
            labels,
            last: Evaluation::default(),
        }
    }

    /// Classify and evaluate raw tokens, keeping the outcome
    pub fn evaluate<T: AsRef<str>>(&mut self, formula: &[T]) -> Evaluation {
        let tokens = classify_all(formula, &self.labels);
        self.evaluate_tokens(&tokens)
    }

    /// Evaluate classified tokens, keeping the outcome
    pub fn evaluate_tokens(&mut self, tokens: &[Token]) -> Evaluation {
        self.last = self.compute(tokens);
        self.last.clone()
    }

    /// Evaluate classified tokens without recording the outcome
    pub fn compute(&self, tokens: &[Token]) -> Evaluation {
        trace!(tokens = tokens.len(), "evaluating formula");
        let outcome = self.evaluate_group(tokens);
        if let Some(err) = &outcome.error {
            debug!(error = %err, value = outcome.value, "formula evaluation recorded an error");
        }
        outcome
    }

    /// The value from the last `evaluate` call (0 before any call)
    pub fn result(&self) -> f64 {
        self.last.value
    }

    /// The error message from the last `evaluate` call, empty when none
    pub fn error(&self) -> String {
        self.last.error_message()
    }

    pub fn last(&self) -> &Evaluation {
        &self.last
    }

    pub fn is_numeric_token(&self, token: &str) -> bool {
        token::is_numeric_token(token)
    }

    pub fn is_cell_reference_token(&self, token: &str) -> bool {
        token::is_cell_reference_token(token, &self.labels)
    }

    /// Resolve a cell label to its value.
    ///
    /// A referenced cell's error is passed on as is, except "empty formula".
    /// A cell with no formula is reported as [`FormulaError::InvalidCell`].
    pub fn resolve_reference(&self, label: &str) -> Result<f64, FormulaError> {
        let cell = self.store.lookup(label);

        match FormulaError::from_message(cell.error()) {
            None | Some(FormulaError::EmptyFormula) => {}
            Some(err) => {
                debug!(label, error = %err, "referenced cell carries an error");
                return Err(err);
            }
        }

        if cell.formula().is_empty() {
            return Err(FormulaError::InvalidCell);
        }

        Ok(cell.value())
    }

    fn evaluate_group(&self, tokens: &[Token]) -> Evaluation {
        let Some(last) = tokens.len().checked_sub(1) else {
            return Evaluation::failed(0.0, FormulaError::EmptyFormula);
        };

        let mut state = FoldState::new();
        let mut i = 0;

        while i < tokens.len() {
            let token = &tokens[i];

            match token {
                Token::Number(n) => state.num = *n,
                Token::CellRef(label) => match self.resolve_reference(label) {
                    Ok(value) => state.num = value,
                    Err(err) => return Evaluation::failed(0.0, err),
                },
                Token::OpenParen => {
                    if i == last {
                        return Evaluation::failed(state.num, FormulaError::InvalidFormula);
                    }
                    if tokens[i + 1] == Token::CloseParen {
                        return Evaluation::failed(0.0, FormulaError::MissingParentheses);
                    }

                    // Without a match the group runs to the end of the slice
                    let close = matching_paren(tokens, i);
                    let inner = self.evaluate_group(&tokens[i + 1..close]);
                    state.num = inner.value;
                    if inner.error.is_some() {
                        state.error = inner.error;
                    }
                    i = close;
                }
                Token::Operator(_) | Token::CloseParen | Token::Other(_) => {}
            }

            if i == last || token.is_operator() {
                if let Err(err) = state.commit(token.operator()) {
                    return Evaluation::failed(f64::INFINITY, err);
                }
            }

            i += 1;
        }

        if tokens[last].is_operator() {
            state.error = Some(FormulaError::InvalidFormula);
        }

        state.finish()
    }
}

/// Index of the parenthesis closing the one at `open`, or `tokens.len()`
/// when it is never closed.
fn matching_paren(tokens: &[Token], open: usize) -> usize {
    let mut depth = 1usize;
    for (j, token) in tokens.iter().enumerate().skip(open + 1) {
        match token {
            Token::OpenParen => depth += 1,
            Token::CloseParen => depth -= 1,
            _ => {}
        }
        if depth == 0 {
            return j;
        }
    }
    tokens.len()
}
