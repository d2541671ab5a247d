//! Dollar amount parsing and disclosed-scale detection.

use serde::{Deserialize, Serialize};

/// Parses a disclosed dollar amount.
///
/// Strips currency symbols, thousands separators and whitespace.
/// Parenthesized values are negative. Anything unparseable yields `None`.
///
/// ```
/// use bdc_extract::html::parse_dollar_amount;
///
/// assert_eq!(parse_dollar_amount("$ 1,234.50"), Some(1234.5));
/// assert_eq!(parse_dollar_amount("(1,234)"), Some(-1234.0));
/// assert_eq!(parse_dollar_amount("—"), None);
/// ```
#[must_use]
pub fn parse_dollar_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$' && *c != ',')
        .collect();

    let (negative, digits) = match cleaned.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, cleaned.as_str()),
    };

    let value: f64 = digits.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Parses a percentage cell (e.g. `"1.5%"`) as a plain number.
#[must_use]
pub fn parse_percentage(raw: &str) -> Option<f64> {
    parse_dollar_amount(&raw.replace('%', ""))
}

/// Unit a table's amounts are disclosed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueScale {
    /// Amounts in thousands of dollars.
    Thousands,
    /// Amounts in millions of dollars.
    Millions,
}

impl ValueScale {
    /// Factor converting a disclosed amount to dollars.
    #[must_use]
    pub const fn multiplier(&self) -> f64 {
        match self {
            Self::Thousands => 1_000.0,
            Self::Millions => 1_000_000.0,
        }
    }
}

/// Amounts at or above this median are assumed to be disclosed in thousands.
pub const MILLIONS_THRESHOLD: f64 = 1_000.0;

/// Scale inferred from a sample of disclosed amounts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleDetection {
    /// Inferred unit.
    pub scale: ValueScale,
    /// Median of the positive samples, if any.
    pub median: Option<f64>,
    /// Number of positive samples considered.
    pub samples: usize,
    /// Samples fall on both sides of the threshold in similar proportion.
    pub mixed: bool,
}

/// Infers the disclosed scale from sampled amounts.
///
/// Only positive samples count. A median below [`MILLIONS_THRESHOLD`] means
/// millions; otherwise, or without samples, thousands. Tables whose samples
/// straddle the threshold (at least a quarter on each side) are flagged as
/// mixed but still resolved by the median.
#[must_use]
pub fn detect_scale(samples: &[f64]) -> ScaleDetection {
    let mut positive: Vec<f64> = samples.iter().copied().filter(|v| *v > 0.0).collect();
    if positive.is_empty() {
        return ScaleDetection {
            scale: ValueScale::Thousands,
            median: None,
            samples: 0,
            mixed: false,
        };
    }

    positive.sort_by(f64::total_cmp);
    let median = positive[positive.len() / 2];
    let below = positive.iter().filter(|v| **v < MILLIONS_THRESHOLD).count();
    let above = positive.len() - below;

    ScaleDetection {
        scale: if median < MILLIONS_THRESHOLD {
            ValueScale::Millions
        } else {
            ValueScale::Thousands
        },
        median: Some(median),
        samples: positive.len(),
        mixed: below.min(above) * 4 >= positive.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dollar_amount() {
        assert_eq!(parse_dollar_amount("1234.56"), Some(1234.56));
        assert_eq!(parse_dollar_amount("$1,234"), Some(1234.0));
        assert_eq!(parse_dollar_amount(" ( 12.5 ) "), Some(-12.5));
        assert_eq!(parse_dollar_amount("1\u{a0}000"), Some(1000.0));
        assert_eq!(parse_dollar_amount(""), None);
        assert_eq!(parse_dollar_amount("$"), None);
        assert_eq!(parse_dollar_amount("n/a"), None);
        assert_eq!(parse_dollar_amount("inf"), None);
    }

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage("1.5%"), Some(1.5));
        assert_eq!(parse_percentage("(0.2)%"), Some(-0.2));
    }

    #[test]
    fn test_scale_from_median() {
        let millions = detect_scale(&[400.0, 450.0, 500.0]);
        assert_eq!(millions.median, Some(450.0));
        assert_eq!(millions.scale, ValueScale::Millions);
        assert_eq!(millions.scale.multiplier(), 1_000_000.0);

        let thousands = detect_scale(&[4_000.0, 4_500.0, 5_000.0]);
        assert_eq!(thousands.median, Some(4_500.0));
        assert_eq!(thousands.scale.multiplier(), 1_000.0);
        assert!(!thousands.mixed);
    }

    #[test]
    fn test_scale_defaults_and_mixed_flag() {
        let empty = detect_scale(&[0.0, -5.0]);
        assert_eq!(empty.scale, ValueScale::Thousands);
        assert_eq!(empty.samples, 0);

        let mixed = detect_scale(&[5.0, 10.0, 20_000.0, 30_000.0]);
        assert!(mixed.mixed);
        assert_eq!(mixed.scale, ValueScale::Thousands);
    }
}
