//! Concept dictionary.
//!
//! Maps bare (namespace-free) concept names to the canonical fields of an
//! investment position. Anything not listed here is ignored by extraction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grouping of a recognized field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConceptCategory {
    /// Credit terms, reported only for debt positions.
    Debt,
    /// Share counts, reported only for equity positions.
    Equity,
    /// Valuation and descriptive fields reported for every position.
    Common,
    /// Activity on affiliated holdings.
    Rollforward,
}

/// How a field's raw value is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// Decimal number.
    Number,
    /// Calendar date (YYYY-MM-DD).
    Date,
    /// Boolean flag.
    Flag,
    /// Extensible enumeration reference, reduced to its member label.
    Enumeration,
}

/// Canonical field of an investment position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Principal amount outstanding.
    Principal,
    /// All-in interest rate.
    InterestRate,
    /// Spread over the reference rate.
    Spread,
    /// Reference rate floor.
    Floor,
    /// Paid-in-kind rate.
    PikRate,
    /// Cash-pay rate.
    CashRate,
    /// Maturity date.
    MaturityDate,
    /// Variable rate type (e.g. SOFR).
    RateType,
    /// Share or unit count.
    Shares,
    /// Fair value.
    FairValue,
    /// Amortized cost.
    Cost,
    /// Percentage of net assets.
    PctNetAssets,
    /// Acquisition date.
    AcquisitionDate,
    /// Issuer name enumeration.
    IssuerName,
    /// Investment type enumeration.
    InvestmentType,
    /// Industry sector enumeration.
    Industry,
    /// Issuer affiliation enumeration.
    Affiliation,
    /// Restricted security flag.
    IsRestricted,
    /// Significant unobservable input (level 3) flag.
    IsLevel3,
    /// Non-income producing flag.
    IsNonIncome,
    /// Gross additions to affiliated investments.
    GrossAdditions,
    /// Gross reductions of affiliated investments.
    GrossReductions,
    /// Realized gain or loss.
    RealizedGainLoss,
    /// Unrealized gain or loss.
    UnrealizedGainLoss,
    /// Interest income.
    InterestIncome,
    /// Dividend income.
    DividendIncome,
}

impl Field {
    /// Every recognized field, in dictionary order.
    pub const ALL: [Self; 26] = [
        Self::Principal,
        Self::InterestRate,
        Self::Spread,
        Self::Floor,
        Self::PikRate,
        Self::CashRate,
        Self::MaturityDate,
        Self::RateType,
        Self::Shares,
        Self::FairValue,
        Self::Cost,
        Self::PctNetAssets,
        Self::AcquisitionDate,
        Self::IssuerName,
        Self::InvestmentType,
        Self::Industry,
        Self::Affiliation,
        Self::IsRestricted,
        Self::IsLevel3,
        Self::IsNonIncome,
        Self::GrossAdditions,
        Self::GrossReductions,
        Self::RealizedGainLoss,
        Self::UnrealizedGainLoss,
        Self::InterestIncome,
        Self::DividendIncome,
    ];

    /// Bare concept name this field is reported under.
    #[must_use]
    pub const fn concept(&self) -> &'static str {
        match self {
            Self::Principal => "InvestmentOwnedBalancePrincipalAmount",
            Self::InterestRate => "InvestmentInterestRate",
            Self::Spread => "InvestmentBasisSpreadVariableRate",
            Self::Floor => "InvestmentInterestRateFloor",
            Self::PikRate => "InvestmentInterestRatePaidInKind",
            Self::CashRate => "InvestmentInterestRatePaidInCash",
            Self::MaturityDate => "InvestmentMaturityDate",
            Self::RateType => "InvestmentVariableInterestRateTypeExtensibleEnumeration",
            Self::Shares => "InvestmentOwnedBalanceShares",
            Self::FairValue => "InvestmentOwnedAtFairValue",
            Self::Cost => "InvestmentOwnedAtCost",
            Self::PctNetAssets => "InvestmentOwnedPercentOfNetAssets",
            Self::AcquisitionDate => "InvestmentAcquisitionDate",
            Self::IssuerName => "InvestmentIssuerNameExtensibleEnumeration",
            Self::InvestmentType => "InvestmentTypeExtensibleEnumeration",
            Self::Industry => "InvestmentIndustrySectorExtensibleEnumeration",
            Self::Affiliation => "InvestmentIssuerAffiliationExtensibleEnumeration",
            Self::IsRestricted => "InvestmentRestrictionStatus",
            Self::IsLevel3 => "InvestmentSignificantUnobservableInput",
            Self::IsNonIncome => "InvestmentNonIncomeProducing",
            Self::GrossAdditions => "InvestmentsInAndAdvancesToAffiliatesAtFairValueGrossAdditions",
            Self::GrossReductions => "InvestmentsInAndAdvancesToAffiliatesAtFairValueGrossReductions",
            Self::RealizedGainLoss => "DebtAndEquitySecuritiesRealizedGainLoss",
            Self::UnrealizedGainLoss => "DebtAndEquitySecuritiesUnrealizedGainLoss",
            Self::InterestIncome => "InterestIncomeOperating",
            Self::DividendIncome => "DividendIncomeOperating",
        }
    }

    /// Looks up the field for a bare concept name.
    #[must_use]
    pub fn from_concept(bare: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.concept() == bare)
    }

    /// Category of this field.
    #[must_use]
    pub const fn category(&self) -> ConceptCategory {
        match self {
            Self::Principal
            | Self::InterestRate
            | Self::Spread
            | Self::Floor
            | Self::PikRate
            | Self::CashRate
            | Self::MaturityDate
            | Self::RateType => ConceptCategory::Debt,
            Self::Shares => ConceptCategory::Equity,
            Self::GrossAdditions
            | Self::GrossReductions
            | Self::RealizedGainLoss
            | Self::UnrealizedGainLoss
            | Self::InterestIncome
            | Self::DividendIncome => ConceptCategory::Rollforward,
            _ => ConceptCategory::Common,
        }
    }

    /// How the raw value of this field is interpreted.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::MaturityDate | Self::AcquisitionDate => ValueKind::Date,
            Self::IsRestricted | Self::IsLevel3 | Self::IsNonIncome => ValueKind::Flag,
            Self::RateType
            | Self::IssuerName
            | Self::InvestmentType
            | Self::Industry
            | Self::Affiliation => ValueKind::Enumeration,
            _ => ValueKind::Number,
        }
    }

    /// Snake-case column name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Principal => "principal",
            Self::InterestRate => "interest_rate",
            Self::Spread => "spread",
            Self::Floor => "floor",
            Self::PikRate => "pik_rate",
            Self::CashRate => "cash_rate",
            Self::MaturityDate => "maturity_date",
            Self::RateType => "rate_type",
            Self::Shares => "shares",
            Self::FairValue => "fair_value",
            Self::Cost => "cost",
            Self::PctNetAssets => "pct_net_assets",
            Self::AcquisitionDate => "acquisition_date",
            Self::IssuerName => "issuer_name",
            Self::InvestmentType => "investment_type",
            Self::Industry => "industry",
            Self::Affiliation => "affiliation",
            Self::IsRestricted => "is_restricted",
            Self::IsLevel3 => "is_level3",
            Self::IsNonIncome => "is_non_income",
            Self::GrossAdditions => "gross_additions",
            Self::GrossReductions => "gross_reductions",
            Self::RealizedGainLoss => "realized_gain_loss",
            Self::UnrealizedGainLoss => "unrealized_gain_loss",
            Self::InterestIncome => "interest_income",
            Self::DividendIncome => "dividend_income",
        }
    }

    /// Returns true for fields describing a single position (not roll-forward activity).
    #[must_use]
    pub const fn is_position_field(&self) -> bool {
        !matches!(self.category(), ConceptCategory::Rollforward)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
