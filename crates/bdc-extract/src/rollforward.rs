//! Affiliated investment roll-forward extraction.

use bdc_core::{FactSet, XbrlContext};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::assemble::resolve_investment_id;
use crate::concepts::{ConceptCategory, Field};
use crate::facts::{NormalizedFact, normalize_fact};

/// Period-over-period activity for one affiliated investment.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RollforwardEntry {
    /// Investment identifier.
    pub investment_id: String,
    /// Fair value at period end.
    pub fair_value: Option<f64>,
    /// Gross additions during the period.
    pub gross_additions: Option<f64>,
    /// Gross reductions during the period.
    pub gross_reductions: Option<f64>,
    /// Realized gain or loss.
    pub realized_gain_loss: Option<f64>,
    /// Unrealized gain or loss.
    pub unrealized_gain_loss: Option<f64>,
    /// Interest income.
    pub interest_income: Option<f64>,
    /// Dividend income.
    pub dividend_income: Option<f64>,
    /// Start of the activity period.
    pub period_start: Option<NaiveDate>,
    /// End of the activity period.
    pub period_end: Option<NaiveDate>,
}

impl RollforwardEntry {
    fn set(&mut self, field: Field, value: Option<f64>) {
        let slot = match field {
            Field::FairValue => &mut self.fair_value,
            Field::GrossAdditions => &mut self.gross_additions,
            Field::GrossReductions => &mut self.gross_reductions,
            Field::RealizedGainLoss => &mut self.realized_gain_loss,
            Field::UnrealizedGainLoss => &mut self.unrealized_gain_loss,
            Field::InterestIncome => &mut self.interest_income,
            Field::DividendIncome => &mut self.dividend_income,
            _ => return,
        };
        *slot = value;
    }
}

/// A roll-forward fact not attributable to a single investment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregateFact {
    /// Canonical field.
    pub field: Field,
    /// Raw value as reported.
    pub value: String,
    /// Start of the activity period.
    pub period_start: Option<NaiveDate>,
    /// End of the activity period.
    pub period_end: Option<NaiveDate>,
}

/// Affiliated roll-forward of a filing.
#[derive(Clone, Debug, PartialEq)]
pub enum AffiliatedRollforward {
    /// Activity pivoted per investment identifier.
    ByInvestment(Vec<RollforwardEntry>),
    /// Filing-level totals, when no fact carries an investment identifier.
    Aggregate(Vec<AggregateFact>),
}

impl AffiliatedRollforward {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::ByInvestment(rows) => rows.len(),
            Self::Aggregate(rows) => rows.len(),
        }
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn is_affiliated(context: Option<&XbrlContext>) -> bool {
    context.is_some_and(|ctx| {
        ctx.dimensions
            .iter()
            .any(|d| d.key.contains("Affiliated") || d.value.contains("Affiliated"))
    })
}

/// Extracts affiliated roll-forward activity.
///
/// Considers fair-value facts whose context carries an affiliation dimension
/// plus every roll-forward concept. Rows are pivoted per investment
/// identifier with the last value winning; when no fact carries an
/// identifier the de-duplicated filing-level facts are returned instead.
#[must_use]
pub fn extract_affiliated_rollforward(facts: &FactSet) -> AffiliatedRollforward {
    let selected: Vec<NormalizedFact> = facts
        .facts
        .iter()
        .filter_map(normalize_fact)
        .filter(|f| match f.field.category() {
            ConceptCategory::Rollforward => true,
            _ => f.field == Field::FairValue && is_affiliated(facts.context(&f.context_ref)),
        })
        .collect();

    let mut order: Vec<RollforwardEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for fact in &selected {
        let Some(id) = facts.context(&fact.context_ref).and_then(resolve_investment_id) else {
            continue;
        };
        let slot = *index.entry(id.to_string()).or_insert_with(|| {
            order.push(RollforwardEntry {
                investment_id: id.to_string(),
                ..Default::default()
            });
            order.len() - 1
        });
        let entry = &mut order[slot];
        entry.set(fact.field, fact.value.as_f64());
        entry.period_start = fact.period_start;
        entry.period_end = fact.reported_date();
    }

    if !order.is_empty() || selected.is_empty() {
        debug!("Affiliated roll-forward: {} investments", order.len());
        return AffiliatedRollforward::ByInvestment(order);
    }

    let mut aggregates: Vec<AggregateFact> = Vec::new();
    for fact in selected {
        let row = AggregateFact {
            field: fact.field,
            value: fact.value.as_text().unwrap_or_default(),
            period_start: fact.period_start,
            period_end: fact.reported_date(),
        };
        if !aggregates.contains(&row) {
            aggregates.push(row);
        }
    }
    debug!("Affiliated roll-forward: {} aggregate facts", aggregates.len());
    AffiliatedRollforward::Aggregate(aggregates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::INVESTMENT_IDENTIFIER_AXIS;
    use bdc_core::TaggedFact;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_pivot_by_investment_last_value_wins() {
        let contexts = vec![
            XbrlContext::new("aff")
                .with_dimension(INVESTMENT_IDENTIFIER_AXIS, "Acme Inc 1")
                .with_dimension("srt:AffiliatedEntityAxis", "AffiliatedIssuerMember"),
            XbrlContext::new("plain").with_dimension(INVESTMENT_IDENTIFIER_AXIS, "Beta LLC 1"),
        ];
        let facts = vec![
            TaggedFact::new("us-gaap:InvestmentOwnedAtFairValue", "100", "aff")
                .with_numeric(100.0)
                .with_instant(date(2024, 12, 31)),
            TaggedFact::new(
                "us-gaap:InvestmentsInAndAdvancesToAffiliatesAtFairValueGrossAdditions",
                "10",
                "aff",
            )
            .with_numeric(10.0)
            .with_duration(date(2024, 1, 1), date(2024, 12, 31)),
            TaggedFact::new(
                "us-gaap:InvestmentsInAndAdvancesToAffiliatesAtFairValueGrossAdditions",
                "12",
                "aff",
            )
            .with_numeric(12.0)
            .with_duration(date(2024, 1, 1), date(2024, 12, 31)),
            TaggedFact::new("us-gaap:InvestmentOwnedAtFairValue", "999", "plain").with_numeric(999.0),
        ];

        let result = extract_affiliated_rollforward(&FactSet::new(facts, contexts));
        let AffiliatedRollforward::ByInvestment(rows) = result else {
            panic!("expected per-investment rows");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].investment_id, "Acme Inc 1");
        assert_eq!(rows[0].fair_value, Some(100.0));
        assert_eq!(rows[0].gross_additions, Some(12.0));
        assert_eq!(rows[0].period_start, Some(date(2024, 1, 1)));
        assert_eq!(rows[0].period_end, Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_aggregate_fallback_deduplicates() {
        let contexts = vec![XbrlContext::new("fy")];
        let fact = TaggedFact::new("us-gaap:InterestIncomeOperating", "5000", "fy")
            .with_numeric(5000.0)
            .with_duration(date(2024, 1, 1), date(2024, 12, 31));
        let facts = vec![fact.clone(), fact];

        let result = extract_affiliated_rollforward(&FactSet::new(facts, contexts));
        let AffiliatedRollforward::Aggregate(rows) = result else {
            panic!("expected aggregate rows");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].field, Field::InterestIncome);
        assert_eq!(rows[0].value, "5000");
    }

    #[test]
    fn test_no_facts() {
        let result = extract_affiliated_rollforward(&FactSet::default());
        assert!(result.is_empty());
    }
}
