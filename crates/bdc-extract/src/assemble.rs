//! Investment assembly from tagged facts.
//!
//! Facts are grouped by the investment identifier found in their context's
//! dimensions. Within a group the first value seen for each field is kept;
//! later values for the same field are ignored regardless of period or
//! specificity.

use bdc_core::{
    Dimension, FactSet, InvestmentRecord, RecordSource, XbrlContext, clean_company_name,
};
use chrono::NaiveDate;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::classify::{classify_affiliation, classify_asset_class};
use crate::concepts::Field;
use crate::facts::{FactValue, normalize_fact};

/// Dimension key carrying the investment identifier in compliant filings.
pub const INVESTMENT_IDENTIFIER_AXIS: &str = "us-gaap:InvestmentIdentifierAxis";

static TRAILING_POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s+(\d+)$").expect("static regex"));

/// Resolves the investment identifier of a context.
///
/// Uses [`INVESTMENT_IDENTIFIER_AXIS`] when present, else the first dimension
/// whose key mentions "Identifier" or "Investment".
#[must_use]
pub fn resolve_investment_id(context: &XbrlContext) -> Option<&str> {
    context
        .dimension(INVESTMENT_IDENTIFIER_AXIS)
        .or_else(|| {
            context
                .dimensions
                .iter()
                .find(|d| d.key.contains("Identifier") || d.key.contains("Investment"))
                .map(|d| d.value.as_str())
        })
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

/// Components of a composite investment identifier label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedIdentifier {
    /// Portfolio company name.
    pub company_name: String,
    /// Industry, when the label carries one.
    pub industry: Option<String>,
    /// Position number distinguishing tranches of the same company.
    pub position: u32,
}

/// Parses a `"Name, Industry N"` identifier label.
///
/// The trailing number defaults to 1 when absent. Without a `", "` separator
/// the whole remaining label is the company name.
///
/// ```
/// use bdc_extract::parse_investment_identifier;
///
/// let parsed = parse_investment_identifier("3Pillar Global Inc, Software & Services 2");
/// assert_eq!(parsed.company_name, "3Pillar Global Inc");
/// assert_eq!(parsed.industry.as_deref(), Some("Software & Services"));
/// assert_eq!(parsed.position, 2);
/// ```
#[must_use]
pub fn parse_investment_identifier(label: &str) -> ParsedIdentifier {
    let label = label.trim();
    if label.is_empty() {
        return ParsedIdentifier {
            company_name: "Unknown".to_string(),
            industry: None,
            position: 1,
        };
    }

    let (base, position) = match TRAILING_POSITION.captures(label) {
        Some(caps) => {
            let position = caps[2].parse().unwrap_or(1);
            (caps.get(1).map_or(label, |m| m.as_str()), position)
        }
        None => (label, 1),
    };

    match base.rsplit_once(", ") {
        Some((company, industry)) => ParsedIdentifier {
            company_name: company.trim().to_string(),
            industry: Some(industry.trim().to_string()).filter(|i| !i.is_empty()),
            position,
        },
        None => ParsedIdentifier {
            company_name: base.to_string(),
            industry: None,
            position,
        },
    }
}

/// One investment position assembled from tagged facts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssembledInvestment {
    /// Identifier from the context dimensions.
    pub investment_id: String,
    /// First value seen per field.
    pub fields: BTreeMap<Field, FactValue>,
    /// Period end from the first fact that supplied one.
    pub period_end: Option<NaiveDate>,
    /// Dimensions of the first context seen for this investment.
    pub dimensions: Vec<Dimension>,
}

impl AssembledInvestment {
    /// Raw value of a field.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FactValue> {
        self.fields.get(&field)
    }

    fn number(&self, field: Field) -> Option<f64> {
        self.get(field).and_then(FactValue::as_f64)
    }

    fn text(&self, field: Field) -> Option<String> {
        self.get(field).and_then(FactValue::as_text)
    }

    fn date(&self, field: Field) -> Option<NaiveDate> {
        self.get(field).and_then(FactValue::as_date)
    }

    fn flag(&self, field: Field) -> Option<bool> {
        self.get(field).and_then(FactValue::as_flag)
    }

    /// Converts into the canonical record, classifying asset class and affiliation.
    #[must_use]
    pub fn into_record(self) -> InvestmentRecord {
        let parsed = parse_investment_identifier(&self.investment_id);
        let company = if parsed.company_name == "Unknown" {
            self.text(Field::IssuerName).unwrap_or(parsed.company_name)
        } else {
            parsed.company_name
        };

        let investment_type = self.text(Field::InvestmentType);
        let principal = self.number(Field::Principal);
        let shares = self.number(Field::Shares);
        let asset_class =
            classify_asset_class(investment_type.as_deref(), principal.is_some(), shares.is_some());
        let affiliation_category =
            classify_affiliation(self.text(Field::Affiliation).as_deref(), &self.dimensions);

        InvestmentRecord {
            company_name: clean_company_name(&company),
            industry: parsed.industry.or_else(|| self.text(Field::Industry)),
            investment_type,
            asset_class,
            affiliation_category,
            fair_value: self.number(Field::FairValue),
            cost: self.number(Field::Cost),
            principal,
            shares,
            interest_rate: self.number(Field::InterestRate),
            rate_type: self.text(Field::RateType),
            spread: self.number(Field::Spread),
            floor: self.number(Field::Floor),
            pik_rate: self.number(Field::PikRate),
            cash_rate: self.number(Field::CashRate),
            maturity_date: self.date(Field::MaturityDate),
            acquisition_date: self.date(Field::AcquisitionDate),
            pct_net_assets: self.number(Field::PctNetAssets),
            is_restricted: self.flag(Field::IsRestricted),
            is_level3: self.flag(Field::IsLevel3),
            is_non_income: self.flag(Field::IsNonIncome),
            period_end: self.period_end,
            source: RecordSource::Xbrl,
            investment_id: self.investment_id,
            ..Default::default()
        }
    }
}

/// Groups recognized position facts by investment identifier.
///
/// Investments are returned in the order their identifier was first seen.
/// Facts whose context has no resolvable identifier are entity-level totals
/// and are skipped.
#[must_use]
pub fn assemble_investments(facts: &FactSet) -> Vec<AssembledInvestment> {
    let mut order: Vec<AssembledInvestment> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for fact in &facts.facts {
        let Some(normalized) = normalize_fact(fact) else {
            continue;
        };
        if !normalized.field.is_position_field() {
            continue;
        }
        let Some(context) = facts.context(&normalized.context_ref) else {
            continue;
        };
        let Some(id) = resolve_investment_id(context) else {
            continue;
        };

        let slot = *index.entry(id.to_string()).or_insert_with(|| {
            order.push(AssembledInvestment {
                investment_id: id.to_string(),
                dimensions: context.dimensions.clone(),
                ..Default::default()
            });
            order.len() - 1
        });
        let investment = &mut order[slot];

        if investment.period_end.is_none() {
            investment.period_end = normalized.reported_date();
        }
        investment
            .fields
            .entry(normalized.field)
            .or_insert(normalized.value);
    }

    order
}

/// Result of extracting records from tagged facts.
#[derive(Clone, Debug, Default)]
pub struct XbrlExtraction {
    /// One record per investment identifier.
    pub records: Vec<InvestmentRecord>,
    /// Non-fatal problems encountered.
    pub warnings: Vec<String>,
}

impl XbrlExtraction {
    /// Number of records whose asset class could not be determined.
    #[must_use]
    pub fn unknown_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.asset_class == bdc_core::AssetClass::Unknown)
            .count()
    }
}

/// Extracts canonical records from a filing's tagged facts.
///
/// A filing without any resolvable investment identifier yields no records
/// and a warning; this is the normal outcome for pre-XBRL schedules.
#[must_use]
pub fn extract_from_facts(facts: &FactSet) -> XbrlExtraction {
    let assembled = assemble_investments(facts);
    let mut extraction = XbrlExtraction::default();

    if assembled.is_empty() {
        let message = format!(
            "No investment identifiers found among {} facts; schedule is not tagged per position",
            facts.len()
        );
        warn!("{}", message);
        extraction.warnings.push(message);
        return extraction;
    }

    debug!("Assembled {} investments from {} facts", assembled.len(), facts.len());
    extraction.records = assembled
        .into_iter()
        .map(AssembledInvestment::into_record)
        .collect();

    let unknown = extraction.unknown_count();
    if unknown > 0 {
        let samples: Vec<&str> = extraction
            .records
            .iter()
            .filter(|r| r.asset_class == bdc_core::AssetClass::Unknown)
            .take(5)
            .map(|r| r.investment_id.as_str())
            .collect();
        let message = format!(
            "{} investments could not be classified as debt or equity (e.g. {})",
            unknown,
            samples.join("; ")
        );
        warn!("{}", message);
        extraction.warnings.push(message);
    }

    extraction
}
