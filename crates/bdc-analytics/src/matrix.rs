//! Company × filer holdings matrix and the overlap measures derived from it.

use bdc_core::{BdcError, Result};
use polars::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::positions::PositionRow;

/// What a holdings matrix cell measures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatrixValue {
    /// 1.0 when the filer holds the company, else 0.0.
    #[default]
    Presence,
    /// Fair value summed over the filer's positions in the company.
    FairValue,
}

/// Companies (rows) × filers (columns).
///
/// Rows and columns are sorted by name. A cell counts as held when its value
/// is positive.
#[derive(Clone, Debug, PartialEq)]
pub struct HoldingsMatrix {
    companies: Vec<String>,
    filers: Vec<String>,
    values: Vec<Vec<f64>>,
}

/// A company held by several filers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommonHolding {
    /// Normalized company name.
    pub company: String,
    /// Number of filers holding it.
    pub holder_count: usize,
    /// Holding filers, in column order.
    pub holders: Vec<String>,
}

/// Filer × filer shared company counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlapMatrix {
    filers: Vec<String>,
    counts: Vec<Vec<usize>>,
}

/// Per-filer overlap totals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilerOverlap {
    /// Filer key.
    pub filer: String,
    /// Companies held.
    pub total_companies: usize,
    /// Companies also held by another filer.
    pub shared_companies: usize,
    /// Shared as a percentage of total, one decimal.
    pub pct_shared: f64,
}

impl HoldingsMatrix {
    /// Pivots positions into a matrix.
    ///
    /// Rows with an empty company name are ignored. Under
    /// [`MatrixValue::Presence`] only positions with a non-zero fair value
    /// mark the company as held; under [`MatrixValue::FairValue`] the summed
    /// fair value must be positive.
    #[must_use]
    pub fn build(positions: &[PositionRow], value: MatrixValue) -> Self {
        let mut cells: BTreeMap<(&str, &str), f64> = BTreeMap::new();
        let mut companies = BTreeSet::new();
        let mut filers = BTreeSet::new();

        for row in positions.iter().filter(|r| !r.company.is_empty()) {
            companies.insert(row.company.as_str());
            filers.insert(row.filer.as_str());
            let cell = cells.entry((row.company.as_str(), row.filer.as_str())).or_insert(0.0);
            match value {
                MatrixValue::Presence => {
                    if row.fair_value.is_some_and(|v| v != 0.0) {
                        *cell = 1.0;
                    }
                }
                MatrixValue::FairValue => *cell += row.fair_value.unwrap_or(0.0),
            }
        }

        let companies: Vec<String> = companies.into_iter().map(str::to_string).collect();
        let filers: Vec<String> = filers.into_iter().map(str::to_string).collect();
        let values = companies
            .iter()
            .map(|c| {
                filers
                    .iter()
                    .map(|f| cells.get(&(c.as_str(), f.as_str())).copied().unwrap_or(0.0))
                    .collect()
            })
            .collect();

        debug!("Holdings matrix: {} companies x {} filers", companies.len(), filers.len());
        Self {
            companies,
            filers,
            values,
        }
    }

    /// Row labels.
    #[must_use]
    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    /// Column labels.
    #[must_use]
    pub fn filers(&self) -> &[String] {
        &self.filers
    }

    /// Cell value, `None` when either label is absent.
    #[must_use]
    pub fn value(&self, company: &str, filer: &str) -> Option<f64> {
        let i = self.companies.iter().position(|c| c == company)?;
        let j = self.filers.iter().position(|f| f == filer)?;
        Some(self.values[i][j])
    }

    fn held(&self, i: usize, j: usize) -> bool {
        self.values[i][j] > 0.0
    }

    fn holder_count(&self, i: usize) -> usize {
        (0..self.filers.len()).filter(|&j| self.held(i, j)).count()
    }

    /// Companies held by at least `min_holders` filers, most widely held first.
    #[must_use]
    pub fn common_holdings(&self, min_holders: usize) -> Vec<CommonHolding> {
        let mut common: Vec<CommonHolding> = self
            .companies
            .iter()
            .enumerate()
            .filter_map(|(i, company)| {
                let holders: Vec<String> = self
                    .filers
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| self.held(i, j))
                    .map(|(_, f)| f.clone())
                    .collect();
                (holders.len() >= min_holders.max(1)).then(|| CommonHolding {
                    company: company.clone(),
                    holder_count: holders.len(),
                    holders,
                })
            })
            .collect();
        common.sort_by(|a, b| b.holder_count.cmp(&a.holder_count));
        common
    }

    /// Binary holdings transposed against themselves.
    ///
    /// Cell (i, j) counts companies held by both filer i and filer j; the
    /// diagonal is each filer's total.
    #[must_use]
    pub fn overlap_matrix(&self) -> OverlapMatrix {
        let n = self.filers.len();
        let mut counts = vec![vec![0; n]; n];
        for i in 0..self.companies.len() {
            let held: Vec<usize> = (0..n).filter(|&j| self.held(i, j)).collect();
            for &a in &held {
                for &b in &held {
                    counts[a][b] += 1;
                }
            }
        }
        OverlapMatrix {
            filers: self.filers.clone(),
            counts,
        }
    }

    /// Total and shared company counts per filer, largest portfolio first.
    #[must_use]
    pub fn overlap_summary(&self) -> Vec<FilerOverlap> {
        let holder_counts: Vec<usize> = (0..self.companies.len()).map(|i| self.holder_count(i)).collect();
        let mut summary: Vec<FilerOverlap> = self
            .filers
            .iter()
            .enumerate()
            .map(|(j, filer)| {
                let held: Vec<usize> = (0..self.companies.len()).filter(|&i| self.held(i, j)).collect();
                let total = held.len();
                let shared = held.iter().filter(|&&i| holder_counts[i] > 1).count();
                let pct_shared = if total > 0 {
                    (shared as f64 / total as f64 * 1000.0).round() / 10.0
                } else {
                    0.0
                };
                FilerOverlap {
                    filer: filer.clone(),
                    total_companies: total,
                    shared_companies: shared,
                    pct_shared,
                }
            })
            .collect();
        summary.sort_by(|a, b| b.total_companies.cmp(&a.total_companies));
        summary
    }

    /// The matrix as a DataFrame: a `company` column plus one column per filer.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.filers.len() + 1);
        columns.push(Column::new("company".into(), self.companies.clone()));
        for (j, filer) in self.filers.iter().enumerate() {
            let values: Vec<f64> = self.values.iter().map(|row| row[j]).collect();
            columns.push(Column::new(filer.as_str().into(), values));
        }
        DataFrame::new(columns).map_err(|e| BdcError::Other(e.to_string()))
    }
}

impl OverlapMatrix {
    /// Row and column labels.
    #[must_use]
    pub fn filers(&self) -> &[String] {
        &self.filers
    }

    /// Shared company count of two filers.
    #[must_use]
    pub fn shared(&self, a: &str, b: &str) -> Option<usize> {
        let i = self.filers.iter().position(|f| f == a)?;
        let j = self.filers.iter().position(|f| f == b)?;
        Some(self.counts[i][j])
    }

    /// Counts in row-major order.
    #[must_use]
    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// The matrix as a DataFrame: a `filer` column plus one column per filer.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.filers.len() + 1);
        columns.push(Column::new("filer".into(), self.filers.clone()));
        for (j, filer) in self.filers.iter().enumerate() {
            let values: Vec<u64> = self.counts.iter().map(|row| row[j] as u64).collect();
            columns.push(Column::new(filer.as_str().into(), values));
        }
        DataFrame::new(columns).map_err(|e| BdcError::Other(e.to_string()))
    }
}
