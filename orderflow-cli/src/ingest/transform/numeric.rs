//! Lenient decimal parsing for quantity and amount cells

use std::str::FromStr;

use rust_decimal::Decimal;

use super::validate::is_present;

/// Outcome of reading one numeric cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericCell {
    /// Empty or a null token; contributes 0 silently
    Blank,
    Value(Decimal),
    /// Text that is not a number; contributes 0 and is counted
    Unparsable,
}

impl NumericCell {
    pub fn value(&self) -> Decimal {
        match self {
            NumericCell::Value(d) => *d,
            NumericCell::Blank | NumericCell::Unparsable => Decimal::ZERO,
        }
    }
}

/// Parse a cell, tolerating currency symbols, thousands separators and
/// accounting-style negatives such as `(1,250.00)`
pub fn parse_number(cell: &str) -> NumericCell {
    if !is_present(cell) {
        return NumericCell::Blank;
    }

    let s = cell.trim();
    let (negative, s) = match s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, s),
    };

    let cleaned: String = s
        .trim_start_matches("Rs.")
        .trim_start_matches("INR")
        .chars()
        .filter(|c| !matches!(c, ',' | '₹' | '$' | '€' | '£' | '\u{a0}') && !c.is_whitespace())
        .collect();

    let parsed = Decimal::from_str(&cleaned).or_else(|_| Decimal::from_scientific(&cleaned));
    match parsed {
        Ok(d) if negative => NumericCell::Value(-d),
        Ok(d) => NumericCell::Value(d),
        Err(_) => NumericCell::Unparsable,
    }
}

/// Canonical text form for sums (no trailing zeros)
pub fn format_decimal(d: Decimal) -> String {
    d.normalize().to_string()
}
