//! Formula tokens
//!
//! A formula arrives as a sequence of string atoms already split from the
//! raw text. [`Token::classify`] tags each atom once so the evaluator never
//! re-inspects strings.

use cellcalc_core::LabelValidator;
use lazy_regex::regex_is_match;
use std::fmt;

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// Parse an operator from its symbol
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Sub),
            "*" => Some(Operator::Mul),
            "/" => Some(Operator::Div),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A classified formula token
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal (digits and decimal points), already parsed
    Number(f64),
    /// One of `+ - * /`
    Operator(Operator),
    OpenParen,
    CloseParen,
    /// A cell label such as `A1`
    CellRef(String),
    /// Anything else. Contributes no operand but still counts as a token.
    Other(String),
}

impl Token {
    /// Classify a raw token.
    ///
    /// Numeric literals are tried first, then cell labels, then the single
    /// symbol tokens.
    ///
    /// ```rust
    /// use cellcalc_core::A1Labels;
    /// use cellcalc_formula::{Operator, Token};
    ///
    /// assert_eq!(Token::classify("1.2.3", &A1Labels), Token::Number(1.2));
    /// assert_eq!(Token::classify("B7", &A1Labels), Token::CellRef("B7".into()));
    /// assert_eq!(Token::classify("*", &A1Labels), Token::Operator(Operator::Mul));
    /// ```
    pub fn classify<V: LabelValidator + ?Sized>(raw: &str, labels: &V) -> Token {
        if is_numeric_token(raw) {
            return Token::Number(parse_number_prefix(raw));
        }
        if labels.is_valid_label(raw) {
            return Token::CellRef(raw.to_string());
        }
        match raw {
            "(" => Token::OpenParen,
            ")" => Token::CloseParen,
            _ => match Operator::from_symbol(raw) {
                Some(op) => Token::Operator(op),
                None => Token::Other(raw.to_string()),
            },
        }
    }

    /// The operator carried by this token, if any
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Token::Operator(op) => Some(*op),
            _ => None,
        }
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, Token::Operator(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Operator(op) => write!(f, "{}", op),
            Token::OpenParen => f.write_str("("),
            Token::CloseParen => f.write_str(")"),
            Token::CellRef(label) => f.write_str(label),
            Token::Other(raw) => f.write_str(raw),
        }
    }
}

/// Classify a whole token sequence
pub fn classify_all<S, V>(tokens: &[S], labels: &V) -> Vec<Token>
where
    S: AsRef<str>,
    V: LabelValidator + ?Sized,
{
    tokens
        .iter()
        .map(|t| Token::classify(t.as_ref(), labels))
        .collect()
}

/// Check if a token is composed only of ASCII digits and decimal points
pub fn is_numeric_token(token: &str) -> bool {
    regex_is_match!(r"^[0-9.]+$", token)
}

/// Check if a token names a cell according to `labels`
pub fn is_cell_reference_token<V: LabelValidator + ?Sized>(token: &str, labels: &V) -> bool {
    labels.is_valid_label(token)
}

/// Parse the longest leading `digits[.digits]` prefix of a numeric token.
///
/// `"1.2.3"` parses as `1.2`. A prefix with no digit at all (`"."`) is NaN.
pub fn parse_number_prefix(token: &str) -> f64 {
    let bytes = token.as_bytes();
    let count_digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let int_digits = count_digits(0);
    let mut end = int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(end + 1);
        end += 1 + frac_digits;
    }

    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }
    token[..end].parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellcalc_core::A1Labels;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numeric_token() {
        assert!(is_numeric_token("42"));
        assert!(is_numeric_token("3.14"));
        assert!(is_numeric_token("1.2.3"));
        assert!(is_numeric_token("."));
        assert!(!is_numeric_token(""));
        assert!(!is_numeric_token("-1"));
        assert!(!is_numeric_token("1e5"));
        assert!(!is_numeric_token("A1"));
        assert!(!is_numeric_token("١٢")); // Non-ASCII digits
    }

    #[test]
    fn test_parse_number_prefix() {
        assert_eq!(parse_number_prefix("42"), 42.0);
        assert_eq!(parse_number_prefix("1.2.3"), 1.2);
        assert_eq!(parse_number_prefix(".5"), 0.5);
        assert_eq!(parse_number_prefix("5."), 5.0);
        assert_eq!(parse_number_prefix("007"), 7.0);
        assert!(parse_number_prefix(".").is_nan());
        assert!(parse_number_prefix("..5").is_nan());
    }

    #[test]
    fn test_classify() {
        let tokens = classify_all(&["3", "+", "A1", "(", ")", "-", "/", "x"], &A1Labels);
        assert_eq!(
            tokens,
            vec![
                Token::Number(3.0),
                Token::Operator(Operator::Add),
                Token::CellRef("A1".into()),
                Token::OpenParen,
                Token::CloseParen,
                Token::Operator(Operator::Sub),
                Token::Operator(Operator::Div),
                Token::Other("x".into()),
            ]
        );
    }

    #[test]
    fn test_classify_custom_validator() {
        let labels = |t: &str| t.starts_with('@');
        assert_eq!(Token::classify("@total", &labels), Token::CellRef("@total".into()));
        assert_eq!(Token::classify("A1", &labels), Token::Other("A1".into()));
        assert!(is_cell_reference_token("@x", &labels));
    }

    #[test]
    fn test_operator_symbols() {
        for sym in ["+", "-", "*", "/"] {
            let op = Operator::from_symbol(sym).unwrap();
            assert_eq!(op.symbol(), sym);
        }
        assert_eq!(Operator::from_symbol("^"), None);
        assert_eq!(Token::Operator(Operator::Mul).to_string(), "*");
    }
}
