//! Herfindahl-Hirschman industry concentration.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::positions::PositionRow;

/// HHI below this is Low.
pub const MODERATE_THRESHOLD: f64 = 1500.0;
/// HHI at or above this is High.
pub const HIGH_THRESHOLD: f64 = 2500.0;

/// Concentration bucket of an HHI value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ConcentrationLevel {
    /// Diversified, HHI < 1500.
    Low,
    /// HHI in [1500, 2500).
    Moderate,
    /// HHI ≥ 2500.
    High,
}

impl ConcentrationLevel {
    /// Buckets an HHI value.
    #[must_use]
    pub fn from_hhi(hhi: f64) -> Self {
        if hhi < MODERATE_THRESHOLD {
            Self::Low
        } else if hhi < HIGH_THRESHOLD {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Display label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

impl fmt::Display for ConcentrationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sum of squared shares × 10 000.
///
/// ```
/// use bdc_analytics::hhi;
///
/// assert_eq!(hhi(&[0.5, 0.5]).round(), 5000.0);
/// ```
#[must_use]
pub fn hhi(shares: &[f64]) -> f64 {
    shares.iter().map(|s| s * s).sum::<f64>() * 10_000.0
}

/// Industry concentration of one filer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConcentrationReport {
    /// Filer key.
    pub filer: String,
    /// Herfindahl-Hirschman index, 0 to 10 000.
    pub hhi: f64,
    /// Bucket of `hhi`.
    pub level: ConcentrationLevel,
    /// Classified industries held.
    pub industry_count: usize,
    /// Classified companies held.
    pub company_count: usize,
    /// Share of the three largest industries, percent.
    pub top3_share: f64,
    /// Largest industry.
    pub largest_industry: String,
    /// Share of the largest industry, percent.
    pub largest_share: f64,
    /// Classified fair value the shares are computed over.
    pub classified_fair_value: f64,
}

/// Concentration report per filer, sorted by filer.
///
/// Positions are first summed per company and industry so several tranches
/// of one company count once. Unclassified positions are excluded. Filers
/// with no positive classified fair value get no report.
#[must_use]
pub fn concentration_reports(positions: &[PositionRow]) -> Vec<ConcentrationReport> {
    let mut by_company: BTreeMap<(&str, &str, &str), f64> = BTreeMap::new();
    for row in positions.iter().filter(|r| !r.is_unclassified()) {
        let Some(industry) = row.industry.as_deref() else {
            continue;
        };
        *by_company
            .entry((row.filer.as_str(), industry, row.company.as_str()))
            .or_insert(0.0) += row.fair_value.unwrap_or(0.0);
    }

    let mut by_filer: BTreeMap<&str, BTreeMap<&str, (f64, usize)>> = BTreeMap::new();
    for ((filer, industry, _), fair_value) in by_company {
        let entry = by_filer.entry(filer).or_default().entry(industry).or_insert((0.0, 0));
        entry.0 += fair_value;
        entry.1 += 1;
    }

    by_filer
        .into_iter()
        .filter_map(|(filer, industries)| report(filer, &industries))
        .collect()
}

fn report(filer: &str, industries: &BTreeMap<&str, (f64, usize)>) -> Option<ConcentrationReport> {
    let total: f64 = industries.values().map(|(fv, _)| fv).sum();
    if total <= 0.0 {
        return None;
    }

    let mut shares: Vec<(&str, f64)> = industries
        .iter()
        .map(|(industry, (fv, _))| (*industry, fv / total))
        .collect();
    shares.sort_by(|a, b| b.1.total_cmp(&a.1));

    let values: Vec<f64> = shares.iter().map(|(_, s)| *s).collect();
    let index = hhi(&values);
    let (largest_industry, largest) = shares[0];

    Some(ConcentrationReport {
        filer: filer.to_string(),
        hhi: index,
        level: ConcentrationLevel::from_hhi(index),
        industry_count: shares.len(),
        company_count: industries.values().map(|(_, n)| n).sum(),
        top3_share: values.iter().take(3).sum::<f64>() * 100.0,
        largest_industry: largest_industry.to_string(),
        largest_share: largest * 100.0,
        classified_fair_value: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(filer: &str, company: &str, industry: &str, fv: f64) -> PositionRow {
        PositionRow::new(filer, company, Some(fv)).with_industry(industry)
    }

    #[test]
    fn test_levels() {
        assert_eq!(ConcentrationLevel::from_hhi(1000.0), ConcentrationLevel::Low);
        assert_eq!(ConcentrationLevel::from_hhi(1500.0), ConcentrationLevel::Moderate);
        assert_eq!(ConcentrationLevel::from_hhi(2500.0), ConcentrationLevel::High);
    }

    #[test]
    fn test_two_equal_industries() {
        let reports = concentration_reports(&[
            row("A", "One", "Software", 50.0),
            row("A", "Two", "Healthcare", 50.0),
        ]);
        assert_eq!(reports.len(), 1);
        assert!((reports[0].hhi - 5000.0).abs() < 1e-9);
        assert_eq!(reports[0].level, ConcentrationLevel::High);
        assert_eq!(reports[0].industry_count, 2);
    }

    #[test]
    fn test_three_industries() {
        let reports = concentration_reports(&[
            row("A", "One", "Software", 34.0),
            row("A", "Two", "Healthcare", 33.0),
            row("A", "Three", "Energy", 33.0),
        ]);
        assert_eq!(reports[0].hhi.round(), 3334.0);
        assert_eq!(reports[0].level, ConcentrationLevel::High);
        assert_eq!(reports[0].largest_industry, "Software");
        assert!((reports[0].top3_share - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_uniform_ten_industries() {
        let rows: Vec<PositionRow> = (0..10)
            .map(|i| row("A", &format!("Company {i}"), &format!("Industry {i}"), 10.0))
            .collect();
        let report = &concentration_reports(&rows)[0];
        assert!((report.hhi - 1000.0).abs() < 1e-6);
        assert_eq!(report.level, ConcentrationLevel::Low);
        assert!((report.top3_share - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_excluded_and_tranches_merged() {
        let mut unknown = row("A", "Mystery", "Unknown", 1_000.0);
        let reports = concentration_reports(&[
            row("A", "Acme Inc", "Software", 30.0),
            row("A", "Acme Corp", "Software", 20.0),
            row("A", "Beta", "Energy", 50.0),
            unknown.clone(),
        ]);
        assert!((reports[0].hhi - 5000.0).abs() < 1e-9);
        assert_eq!(reports[0].company_count, 2);
        assert_eq!(reports[0].classified_fair_value, 100.0);

        unknown.industry = None;
        assert!(concentration_reports(&[unknown]).is_empty());
    }
}
