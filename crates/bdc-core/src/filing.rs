//! Filing descriptors and tagged-fact structures.
//!
//! - [`FormType`] - periodic report form (10-K / 10-Q)
//! - [`FilingDescriptor`] - one filing located by a filing source
//! - [`TaggedFact`] - a single machine-readable disclosed value
//! - [`XbrlContext`] - period and dimension qualifiers of a fact
//! - [`FactSet`] - all facts and contexts of one filing

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::BdcError;

/// Periodic report form type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormType {
    /// Annual report.
    #[default]
    #[serde(rename = "10-K")]
    TenK,
    /// Quarterly report.
    #[serde(rename = "10-Q")]
    TenQ,
}

impl FormType {
    /// Returns the form code as filed.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TenK => "10-K",
            Self::TenQ => "10-Q",
        }
    }

    /// Returns the amended form code (e.g. "10-K/A").
    #[must_use]
    pub const fn amended(&self) -> &'static str {
        match self {
            Self::TenK => "10-K/A",
            Self::TenQ => "10-Q/A",
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormType {
    type Err = BdcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "10-K" | "10K" => Ok(Self::TenK),
            "10-Q" | "10Q" => Ok(Self::TenQ),
            other => Err(BdcError::InvalidParameter(format!("Unsupported form type: {other}"))),
        }
    }
}

/// A filing located by a filing source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingDescriptor {
    /// Filer CIK (no leading zeros).
    pub cik: String,
    /// Accession number with dashes (e.g. "0001287750-24-000012").
    pub accession_number: String,
    /// Date the filing was accepted.
    pub filing_date: NaiveDate,
    /// Form code as filed, amendments included.
    pub form: String,
    /// Period the report covers, when the source supplies it.
    pub report_date: Option<NaiveDate>,
    /// File name of the primary HTML document.
    pub primary_document: Option<String>,
}

impl FilingDescriptor {
    /// Accession number without dashes, as used in archive paths.
    #[must_use]
    pub fn accession_compact(&self) -> String {
        self.accession_number.replace('-', "")
    }
}

/// A single tagged value from a filing's XBRL instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaggedFact {
    /// Concept identifier, usually namespace-qualified (e.g. "us-gaap:InvestmentOwnedAtFairValue").
    pub concept: String,
    /// Raw textual value.
    pub value: String,
    /// Pre-parsed numeric value, present for unit-bearing facts.
    pub numeric_value: Option<f64>,
    /// Identifier of the context qualifying this fact.
    pub context_ref: String,
    /// Duration period start.
    pub period_start: Option<NaiveDate>,
    /// Duration period end.
    pub period_end: Option<NaiveDate>,
    /// Instant period date.
    pub period_instant: Option<NaiveDate>,
}

impl TaggedFact {
    /// Creates a fact with a concept, raw value and context reference.
    #[must_use]
    pub fn new(
        concept: impl Into<String>,
        value: impl Into<String>,
        context_ref: impl Into<String>,
    ) -> Self {
        Self {
            concept: concept.into(),
            value: value.into(),
            context_ref: context_ref.into(),
            ..Default::default()
        }
    }

    /// Sets the pre-parsed numeric value.
    #[must_use]
    pub const fn with_numeric(mut self, value: f64) -> Self {
        self.numeric_value = Some(value);
        self
    }

    /// Sets the instant period.
    #[must_use]
    pub const fn with_instant(mut self, date: NaiveDate) -> Self {
        self.period_instant = Some(date);
        self
    }

    /// Sets a duration period.
    #[must_use]
    pub const fn with_duration(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.period_start = Some(start);
        self.period_end = Some(end);
        self
    }
}

/// A dimension qualifier (axis and member) on a context.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    /// Axis identifier (e.g. "us-gaap:InvestmentIdentifierAxis").
    pub key: String,
    /// Member or typed value.
    pub value: String,
}

impl Dimension {
    /// Creates a dimension.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Period and dimension qualifiers shared by a group of facts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XbrlContext {
    /// Context identifier referenced by facts.
    pub id: String,
    /// Dimension qualifiers in document order.
    pub dimensions: Vec<Dimension>,
    /// Duration period start.
    pub period_start: Option<NaiveDate>,
    /// Duration period end.
    pub period_end: Option<NaiveDate>,
    /// Instant period date.
    pub period_instant: Option<NaiveDate>,
}

impl XbrlContext {
    /// Creates a context with no dimensions.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Adds a dimension qualifier.
    #[must_use]
    pub fn with_dimension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.push(Dimension::new(key, value));
        self
    }

    /// Returns the value of the dimension with exactly this key.
    #[must_use]
    pub fn dimension(&self, key: &str) -> Option<&str> {
        self.dimensions
            .iter()
            .find(|d| d.key == key)
            .map(|d| d.value.as_str())
    }
}

/// All tagged facts and contexts of one filing.
#[derive(Clone, Debug, Default)]
pub struct FactSet {
    /// Facts in document order.
    pub facts: Vec<TaggedFact>,
    contexts: HashMap<String, XbrlContext>,
}

impl FactSet {
    /// Creates a fact set from facts and contexts.
    #[must_use]
    pub fn new(facts: Vec<TaggedFact>, contexts: impl IntoIterator<Item = XbrlContext>) -> Self {
        Self {
            facts,
            contexts: contexts.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    /// Looks up a context by reference.
    #[must_use]
    pub fn context(&self, id: &str) -> Option<&XbrlContext> {
        self.contexts.get(id)
    }

    /// Number of facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns true if the set holds no facts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Number of distinct contexts.
    #[must_use]
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_type_parse() {
        assert_eq!("10-K".parse::<FormType>().unwrap(), FormType::TenK);
        assert_eq!("10q".parse::<FormType>().unwrap(), FormType::TenQ);
        assert!("8-K".parse::<FormType>().is_err());
        assert_eq!(FormType::TenQ.amended(), "10-Q/A");
    }

    #[test]
    fn test_context_lookup() {
        let ctx = XbrlContext::new("c-1")
            .with_dimension("us-gaap:InvestmentIdentifierAxis", "Acme Inc, Software 1");
        let facts = FactSet::new(
            vec![TaggedFact::new("us-gaap:InvestmentOwnedAtFairValue", "100", "c-1")],
            vec![ctx],
        );

        let found = facts.context("c-1").unwrap();
        assert_eq!(
            found.dimension("us-gaap:InvestmentIdentifierAxis"),
            Some("Acme Inc, Software 1")
        );
        assert!(facts.context("c-2").is_none());
        assert_eq!(facts.len(), 1);
    }

    #[test]
    fn test_accession_compact() {
        let filing = FilingDescriptor {
            cik: "1287750".to_string(),
            accession_number: "0001287750-24-000012".to_string(),
            filing_date: NaiveDate::from_ymd_opt(2024, 2, 7).unwrap(),
            form: "10-K".to_string(),
            report_date: None,
            primary_document: None,
        };
        assert_eq!(filing.accession_compact(), "000128775024000012");
    }
}
