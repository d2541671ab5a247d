//! Fact normalization.
//!
//! Strips namespace qualifiers from concept identifiers and maps recognized
//! facts onto canonical [`Field`]s. Unrecognized concepts are dropped
//! silently: most facts in a filing have nothing to do with holdings.

use bdc_core::TaggedFact;
use chrono::NaiveDate;

use crate::concepts::{Field, ValueKind};

/// Strips everything up to and including the last `:` of a concept identifier.
///
/// A concept without a namespace separator is returned unchanged.
#[must_use]
pub fn normalize_concept(concept: &str) -> &str {
    concept.rsplit_once(':').map_or(concept, |(_, bare)| bare)
}

/// Reduces an extensible enumeration reference to a readable label.
///
/// `http://example.com/2024#SeniorSecuredFirstLienMember` becomes
/// `SeniorSecuredFirstLien`. Values without a fragment are returned as-is.
#[must_use]
pub fn parse_enum_uri(uri: &str) -> String {
    let uri = uri.trim();
    match uri.rsplit_once('#') {
        Some((_, fragment)) => fragment.strip_suffix("Member").unwrap_or(fragment).to_string(),
        None => uri.to_string(),
    }
}

/// A fact value after normalization.
#[derive(Clone, Debug, PartialEq)]
pub enum FactValue {
    /// Pre-parsed numeric value.
    Number(f64),
    /// Textual value (enumerations already reduced to labels).
    Text(String),
}

impl FactValue {
    /// Numeric interpretation, parsing text when needed.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().replace(',', "").parse().ok(),
        }
    }

    /// Textual interpretation. Empty strings are treated as absent.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Number(n) => Some(n.to_string()),
            Self::Text(s) if s.trim().is_empty() => None,
            Self::Text(s) => Some(s.trim().to_string()),
        }
    }

    /// Date interpretation (leading `YYYY-MM-DD`).
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => {
                let s = s.trim();
                NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok()
            }
        }
    }

    /// Boolean interpretation.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Number(n) => Some(*n != 0.0),
            Self::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            },
        }
    }
}

/// A tagged fact mapped onto a canonical field.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedFact {
    /// Canonical field.
    pub field: Field,
    /// Normalized value.
    pub value: FactValue,
    /// Context the fact belongs to.
    pub context_ref: String,
    /// Duration start.
    pub period_start: Option<NaiveDate>,
    /// Duration end.
    pub period_end: Option<NaiveDate>,
    /// Instant date.
    pub period_instant: Option<NaiveDate>,
}

impl NormalizedFact {
    /// Reporting date of the fact: the instant, else the duration end.
    #[must_use]
    pub fn reported_date(&self) -> Option<NaiveDate> {
        self.period_instant.or(self.period_end)
    }
}

/// Maps a tagged fact onto its canonical field, if the concept is recognized.
///
/// Enumeration fields are reduced to their member label; other fields prefer
/// the pre-parsed numeric value over the raw text.
#[must_use]
pub fn normalize_fact(fact: &TaggedFact) -> Option<NormalizedFact> {
    let field = Field::from_concept(normalize_concept(&fact.concept))?;

    let value = match (field.kind(), fact.numeric_value) {
        (ValueKind::Enumeration, _) => FactValue::Text(parse_enum_uri(&fact.value)),
        (_, Some(n)) => FactValue::Number(n),
        (_, None) => FactValue::Text(fact.value.trim().to_string()),
    };

    Some(NormalizedFact {
        field,
        value,
        context_ref: fact.context_ref.clone(),
        period_start: fact.period_start,
        period_end: fact.period_end,
        period_instant: fact.period_instant,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_concept() {
        assert_eq!(normalize_concept("us-gaap:InvestmentOwnedAtFairValue"), "InvestmentOwnedAtFairValue");
        assert_eq!(normalize_concept("arcc:Custom"), "Custom");
        assert_eq!(normalize_concept("a:b:Concept"), "Concept");
        assert_eq!(normalize_concept("InvestmentOwnedAtCost"), "InvestmentOwnedAtCost");
        assert_eq!(normalize_concept(""), "");
    }

    #[test]
    fn test_parse_enum_uri() {
        assert_eq!(
            parse_enum_uri("http://www.arcc.com/20231231#FirstLienSeniorSecuredLoanMember"),
            "FirstLienSeniorSecuredLoan"
        );
        assert_eq!(parse_enum_uri("http://fasb.org/us-gaap/2024#Sofr"), "Sofr");
        assert_eq!(parse_enum_uri("Plain Label"), "Plain Label");
    }

    #[test]
    fn test_normalize_fact_prefers_numeric() {
        let fact = TaggedFact::new("us-gaap:InvestmentOwnedAtFairValue", "1,250", "c-1")
            .with_numeric(1_250_000.0);
        let normalized = normalize_fact(&fact).unwrap();
        assert_eq!(normalized.field, Field::FairValue);
        assert_eq!(normalized.value, FactValue::Number(1_250_000.0));

        let text_only = TaggedFact::new("us-gaap:InvestmentOwnedAtCost", " 900 ", "c-1");
        assert_eq!(normalize_fact(&text_only).unwrap().value.as_f64(), Some(900.0));
    }

    #[test]
    fn test_normalize_fact_enumeration_and_unknown() {
        let fact = TaggedFact::new(
            "us-gaap:InvestmentTypeExtensibleEnumeration",
            "http://x.com/2024#SeniorSecuredLoanMember",
            "c-1",
        );
        assert_eq!(
            normalize_fact(&fact).unwrap().value,
            FactValue::Text("SeniorSecuredLoan".to_string())
        );

        let other = TaggedFact::new("us-gaap:Assets", "100", "c-1");
        assert!(normalize_fact(&other).is_none());
    }

    #[test]
    fn test_value_interpretations() {
        assert_eq!(
            FactValue::Text("2029-06-30".to_string()).as_date(),
            NaiveDate::from_ymd_opt(2029, 6, 30)
        );
        assert_eq!(FactValue::Text("true".to_string()).as_flag(), Some(true));
        assert_eq!(FactValue::Text("n/a".to_string()).as_flag(), None);
        assert_eq!(FactValue::Text("   ".to_string()).as_text(), None);
    }
}
