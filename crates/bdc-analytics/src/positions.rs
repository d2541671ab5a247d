//! Analytics input rows.

use bdc_core::{InvestmentRecord, normalize_company_name};
use bdc_extract::classify_industry;
use bdc_store::Holding;
use serde::Serialize;

/// One position as seen by the analytics layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PositionRow {
    /// Filer key (ticker, CIK or name).
    pub filer: String,
    /// Normalized company name.
    pub company: String,
    /// Industry label or code, `None` when unclassified.
    pub industry: Option<String>,
    /// Fair value in dollars.
    pub fair_value: Option<f64>,
}

impl PositionRow {
    /// Creates a row, normalizing the company name.
    #[must_use]
    pub fn new(filer: impl Into<String>, company: &str, fair_value: Option<f64>) -> Self {
        Self {
            filer: filer.into(),
            company: normalize_company_name(company),
            industry: None,
            fair_value,
        }
    }

    /// Sets the industry.
    #[must_use]
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    /// Builds a row from an extracted record held by `filer`.
    ///
    /// The disclosed industry wins; otherwise the business description is
    /// classified by keyword.
    #[must_use]
    pub fn from_record(filer: impl Into<String>, record: &InvestmentRecord) -> Self {
        let industry = record
            .industry
            .as_deref()
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| classify_industry(record.business_description.as_deref()));
        Self::new(filer, &record.company_name, record.fair_value).with_industry(industry)
    }

    /// True when the row has no usable industry.
    #[must_use]
    pub fn is_unclassified(&self) -> bool {
        self.industry
            .as_deref()
            .is_none_or(|i| i.eq_ignore_ascii_case("unknown"))
    }
}

impl From<&Holding> for PositionRow {
    fn from(holding: &Holding) -> Self {
        Self {
            filer: holding.filer_ticker.clone(),
            company: holding.company.clone(),
            industry: holding.industry.clone(),
            fair_value: holding.fair_value,
        }
    }
}

/// Builds rows from records, keyed by each record's filer name.
///
/// Records without a filer name are keyed by `default_filer`.
#[must_use]
pub fn rows_from_records(records: &[InvestmentRecord], default_filer: &str) -> Vec<PositionRow> {
    records
        .iter()
        .map(|r| PositionRow::from_record(r.filer_name.as_deref().unwrap_or(default_filer), r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_record_industry_fallback() {
        let mut r = InvestmentRecord::new("x", "Acme Holdings, LLC (4)");
        r.business_description = Some("Cloud software".to_string());
        let row = PositionRow::from_record("ARCC", &r);
        assert_eq!(row.company, "acme");
        assert_eq!(row.industry.as_deref(), Some("Software/Technology"));

        r.industry = Some("Healthcare".to_string());
        assert_eq!(PositionRow::from_record("ARCC", &r).industry.as_deref(), Some("Healthcare"));

        let bare = PositionRow::from_record("ARCC", &InvestmentRecord::new("y", "Beta LLC"));
        assert!(bare.is_unclassified());
    }
}
