//! Core data types for portfolio holdings.
//!
//! This module defines the canonical record every extraction path produces:
//!
//! - [`AssetClass`] - Debt / Equity / Unknown
//! - [`AffiliationCategory`] - the issuer's affiliation with the filer
//! - [`RecordSource`] - which disclosure format a record came from
//! - [`InvestmentRecord`] - one disclosed holding line item

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BdcError;

/// Asset class of a single position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetClass {
    /// Loans, notes, bonds and other credit instruments.
    Debt,
    /// Stock, units, warrants and other ownership interests.
    Equity,
    /// Neither the investment type nor field presence gave a signal.
    #[default]
    Unknown,
}

impl AssetClass {
    /// Returns the display label used in storage and interchange.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debt => "Debt",
            Self::Equity => "Equity",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = BdcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Debt" => Ok(Self::Debt),
            "Equity" => Ok(Self::Equity),
            "Unknown" => Ok(Self::Unknown),
            other => Err(BdcError::Parse(format!("Invalid asset class: {other}"))),
        }
    }
}

/// Affiliation of a portfolio company with the reporting filer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AffiliationCategory {
    /// No affiliation signal found, or explicitly unaffiliated.
    #[default]
    Unaffiliated,
    /// Affiliated issuer without a control qualifier.
    Affiliate,
    /// Affiliated but not controlled.
    #[serde(rename = "Non-Controlled Affiliate")]
    NonControlledAffiliate,
    /// Controlled affiliate.
    #[serde(rename = "Controlled Affiliate")]
    ControlledAffiliate,
}

impl AffiliationCategory {
    /// Returns the display label used in storage and interchange.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unaffiliated => "Unaffiliated",
            Self::Affiliate => "Affiliate",
            Self::NonControlledAffiliate => "Non-Controlled Affiliate",
            Self::ControlledAffiliate => "Controlled Affiliate",
        }
    }
}

impl fmt::Display for AffiliationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AffiliationCategory {
    type Err = BdcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unaffiliated" => Ok(Self::Unaffiliated),
            "Affiliate" => Ok(Self::Affiliate),
            "Non-Controlled Affiliate" => Ok(Self::NonControlledAffiliate),
            "Controlled Affiliate" => Ok(Self::ControlledAffiliate),
            other => Err(BdcError::Parse(format!("Invalid affiliation category: {other}"))),
        }
    }
}

/// Disclosure format a record was extracted from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordSource {
    /// Tagged XBRL facts grouped by investment identifier.
    #[default]
    Xbrl,
    /// Raw HTML Schedule of Investments tables.
    Html,
}

impl FromStr for RecordSource {
    type Err = BdcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xbrl" => Ok(Self::Xbrl),
            "html" => Ok(Self::Html),
            other => Err(BdcError::Parse(format!("Invalid record source: {other}"))),
        }
    }
}

// Empty or unrecognized labels fall back to the default variant so partially
// populated interchange files still load.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()).unwrap_or_default())
}

/// One disclosed holding line item for one filer, one portfolio company,
/// one reporting period.
///
/// Monetary fields are in dollars. Every optional field is `None` when the
/// disclosure did not supply it; the interchange CSV writes those as empty
/// cells.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentRecord {
    /// Opaque identifier from the source context, or a synthesized key for HTML rows.
    pub investment_id: String,
    /// Reporting filer's name.
    pub filer_name: Option<String>,
    /// Reporting filer's CIK.
    pub filer_cik: Option<String>,
    /// Portfolio company name as disclosed (cleaned, case preserved).
    pub company_name: String,
    /// Business description, when the schedule carries one.
    pub business_description: Option<String>,
    /// Investment type, free text or enumerated label.
    pub investment_type: Option<String>,
    /// Industry label as disclosed.
    pub industry: Option<String>,
    /// Debt / Equity / Unknown.
    #[serde(deserialize_with = "lenient")]
    pub asset_class: AssetClass,
    /// Affiliation category, Unaffiliated when no signal was found.
    #[serde(deserialize_with = "lenient")]
    pub affiliation_category: AffiliationCategory,
    /// Fair value in dollars.
    pub fair_value: Option<f64>,
    /// Amortized cost in dollars.
    pub cost: Option<f64>,
    /// Principal amount in dollars (debt only).
    pub principal: Option<f64>,
    /// Share or unit count (equity only).
    pub shares: Option<f64>,
    /// All-in interest rate.
    pub interest_rate: Option<f64>,
    /// Variable rate type (e.g. SOFR).
    pub rate_type: Option<String>,
    /// Spread over the reference rate.
    pub spread: Option<f64>,
    /// Reference rate floor.
    pub floor: Option<f64>,
    /// Paid-in-kind rate.
    pub pik_rate: Option<f64>,
    /// Cash-pay rate.
    pub cash_rate: Option<f64>,
    /// Maturity date.
    pub maturity_date: Option<NaiveDate>,
    /// Acquisition date.
    pub acquisition_date: Option<NaiveDate>,
    /// Percentage of the filer's net assets.
    pub pct_net_assets: Option<f64>,
    /// Restricted security flag.
    pub is_restricted: Option<bool>,
    /// Valued with significant unobservable inputs.
    pub is_level3: Option<bool>,
    /// Non-income producing flag.
    pub is_non_income: Option<bool>,
    /// Reporting period end.
    pub period_end: Option<NaiveDate>,
    /// Disclosure format this record came from.
    #[serde(deserialize_with = "lenient")]
    pub source: RecordSource,
}

impl InvestmentRecord {
    /// Creates a record with the required identity fields.
    #[must_use]
    pub fn new(investment_id: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            investment_id: investment_id.into(),
            company_name: company_name.into(),
            ..Default::default()
        }
    }

    /// Attaches the reporting filer.
    #[must_use]
    pub fn with_filer(mut self, name: impl Into<String>, cik: Option<String>) -> Self {
        self.filer_name = Some(name.into());
        self.filer_cik = cik;
        self
    }

    /// Returns true if any of fair value, cost or principal is present.
    #[must_use]
    pub const fn has_values(&self) -> bool {
        self.fair_value.is_some() || self.cost.is_some() || self.principal.is_some()
    }

    /// Unrealized gain or loss (fair value minus cost), if both are known.
    #[must_use]
    pub fn unrealized_gain_loss(&self) -> Option<f64> {
        match (self.fair_value, self.cost) {
            (Some(fv), Some(cost)) => Some(fv - cost),
            _ => None,
        }
    }
}
