//! Portfolio summary statistics.

use bdc_core::{AssetClass, InvestmentRecord, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

/// One line of a portfolio summary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryRow {
    /// Row group (e.g. "Asset Class", "Industry (Debt)", "Total").
    pub category: String,
    /// Row label within the group.
    pub subcategory: String,
    /// Aggregate fair value.
    pub fair_value: Option<f64>,
    /// Aggregate cost.
    pub cost: Option<f64>,
    /// Fair value minus cost, on the total row.
    pub unrealized_gain_loss: Option<f64>,
    /// Number of records in the row.
    pub count: usize,
}

impl SummaryRow {
    fn new(category: impl Into<String>, subcategory: impl Into<String>, count: usize) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
            fair_value: None,
            cost: None,
            unrealized_gain_loss: None,
            count,
        }
    }
}

/// Aggregated view of one filer's extracted holdings.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PortfolioSummary {
    /// Summary lines in presentation order.
    pub rows: Vec<SummaryRow>,
    /// Records whose asset class is Unknown (excluded from the totals).
    pub unknown_count: usize,
}

fn sum<'a>(records: impl Iterator<Item = &'a InvestmentRecord>, f: fn(&InvestmentRecord) -> Option<f64>) -> f64 {
    records.filter_map(f).sum()
}

impl PortfolioSummary {
    /// Builds the summary from extracted records.
    ///
    /// Totals cover debt and equity positions; Unknown records are only
    /// counted, so classification regressions stay visible.
    #[must_use]
    pub fn from_records(records: &[InvestmentRecord]) -> Self {
        let classified: Vec<&InvestmentRecord> = records
            .iter()
            .filter(|r| r.asset_class != AssetClass::Unknown)
            .collect();
        let mut rows = Vec::new();

        for (class, label) in [(AssetClass::Debt, "Debt Investments"), (AssetClass::Equity, "Equity Investments")] {
            let group: Vec<&InvestmentRecord> =
                classified.iter().copied().filter(|r| r.asset_class == class).collect();
            if group.is_empty() {
                continue;
            }
            let mut row = SummaryRow::new("Asset Class", label, group.len());
            row.fair_value = Some(sum(group.iter().copied(), |r| r.fair_value));
            row.cost = Some(sum(group.iter().copied(), |r| r.cost));
            rows.push(row);
        }

        for class in [AssetClass::Debt, AssetClass::Equity] {
            let mut by_industry: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
            for record in classified.iter().filter(|r| r.asset_class == class) {
                if let Some(industry) = record.industry.as_deref().filter(|i| !i.is_empty()) {
                    let entry = by_industry.entry(industry).or_default();
                    entry.0 += record.fair_value.unwrap_or(0.0);
                    entry.1 += 1;
                }
            }
            for (industry, (fair_value, count)) in by_industry {
                let mut row = SummaryRow::new(format!("Industry ({class})"), industry, count);
                row.fair_value = Some(fair_value);
                rows.push(row);
            }
        }

        let mut by_affiliation: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for record in &classified {
            let entry = by_affiliation.entry(record.affiliation_category.as_str()).or_default();
            entry.0 += record.fair_value.unwrap_or(0.0);
            entry.1 += 1;
        }
        for (affiliation, (fair_value, count)) in by_affiliation {
            let mut row = SummaryRow::new("Affiliation", affiliation, count);
            row.fair_value = Some(fair_value);
            rows.push(row);
        }

        let total_fv = sum(classified.iter().copied(), |r| r.fair_value);
        let total_cost = sum(classified.iter().copied(), |r| r.cost);
        let mut total = SummaryRow::new("Total", "All Investments", classified.len());
        total.fair_value = Some(total_fv);
        total.cost = Some(total_cost);
        total.unrealized_gain_loss = (total_cost != 0.0).then_some(total_fv - total_cost);
        rows.push(total);

        let issuers: BTreeSet<&str> = classified.iter().map(|r| r.company_name.as_str()).collect();
        rows.push(SummaryRow::new("Metrics", "Unique Portfolio Companies", issuers.len()));

        let unknown_count = records.len() - classified.len();
        rows.push(SummaryRow::new("Classification Quality", "Unknown Asset Class", unknown_count));

        Self { rows, unknown_count }
    }

    /// Finds a row by category and subcategory.
    #[must_use]
    pub fn row(&self, category: &str, subcategory: &str) -> Option<&SummaryRow> {
        self.rows
            .iter()
            .find(|r| r.category == category && r.subcategory == subcategory)
    }

    /// Writes the summary as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdc_core::AffiliationCategory;

    fn record(name: &str, class: AssetClass, industry: &str, fv: f64, cost: f64) -> InvestmentRecord {
        let mut r = InvestmentRecord::new(format!("{name} 1"), name);
        r.asset_class = class;
        r.industry = Some(industry.to_string());
        r.fair_value = Some(fv);
        r.cost = Some(cost);
        r
    }

    #[test]
    fn test_summary_totals() {
        let mut equity = record("Acme Inc", AssetClass::Equity, "Software", 50.0, 40.0);
        equity.affiliation_category = AffiliationCategory::ControlledAffiliate;
        let records = vec![
            record("Acme Inc", AssetClass::Debt, "Software", 100.0, 90.0),
            record("Beta LLC", AssetClass::Debt, "Healthcare", 200.0, 210.0),
            equity,
            record("Mystery", AssetClass::Unknown, "Other", 1_000.0, 1_000.0),
        ];

        let summary = PortfolioSummary::from_records(&records);
        assert_eq!(summary.unknown_count, 1);

        let debt = summary.row("Asset Class", "Debt Investments").unwrap();
        assert_eq!(debt.fair_value, Some(300.0));
        assert_eq!(debt.count, 2);

        let software = summary.row("Industry (Debt)", "Software").unwrap();
        assert_eq!(software.fair_value, Some(100.0));

        let controlled = summary.row("Affiliation", "Controlled Affiliate").unwrap();
        assert_eq!(controlled.count, 1);

        let total = summary.row("Total", "All Investments").unwrap();
        assert_eq!(total.fair_value, Some(350.0));
        assert_eq!(total.unrealized_gain_loss, Some(10.0));
        assert_eq!(total.count, 3);

        assert_eq!(summary.row("Metrics", "Unique Portfolio Companies").unwrap().count, 2);
        assert_eq!(summary.row("Classification Quality", "Unknown Asset Class").unwrap().count, 1);
    }

    #[test]
    fn test_summary_csv() {
        let summary = PortfolioSummary::from_records(&[]);
        let mut out = Vec::new();
        summary.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("category,subcategory,fair_value,cost,unrealized_gain_loss,count"));
        assert!(text.contains("Total,All Investments,0.0,0.0,,0"));
    }
}
