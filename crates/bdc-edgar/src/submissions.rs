//! EDGAR submissions metadata and filing selection.

use bdc_core::{FilingDescriptor, FormType};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

/// Company filings from the EDGAR submissions API.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanySubmissions {
    /// Central Index Key.
    #[serde(default)]
    pub cik: String,
    /// Registrant name.
    #[serde(default)]
    pub name: String,
    /// Filing history.
    pub filings: FilingHistory,
}

/// Container for filing history data.
#[derive(Debug, Clone, Deserialize)]
pub struct FilingHistory {
    /// Recent filings.
    pub recent: RecentFilings,
}

/// Recent filings as parallel arrays, most recent first.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    /// Accession numbers.
    #[serde(default)]
    pub accession_number: Vec<String>,
    /// Form types (e.g. "10-K", "10-K/A").
    #[serde(default)]
    pub form: Vec<String>,
    /// Filing dates (`YYYY-MM-DD`).
    #[serde(default)]
    pub filing_date: Vec<String>,
    /// Report period dates, empty when not applicable.
    #[serde(default)]
    pub report_date: Vec<String>,
    /// Primary document file names.
    #[serde(default)]
    pub primary_document: Vec<String>,
}

/// Fiscal year a periodic report most likely covers.
///
/// Reports filed January through April cover the previous year.
#[must_use]
pub fn fiscal_year_of(filing_date: NaiveDate) -> i32 {
    if filing_date.month() <= 4 {
        filing_date.year() - 1
    } else {
        filing_date.year()
    }
}

fn parse_date(raw: Option<&String>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

impl CompanySubmissions {
    /// All recent filings as descriptors, most recent first.
    ///
    /// Entries with an unparseable filing date are skipped.
    #[must_use]
    pub fn filings(&self) -> Vec<FilingDescriptor> {
        let recent = &self.filings.recent;
        let cik = self.cik.trim_start_matches('0').to_string();

        let mut out: Vec<FilingDescriptor> = recent
            .accession_number
            .iter()
            .enumerate()
            .filter_map(|(i, accession)| {
                Some(FilingDescriptor {
                    cik: cik.clone(),
                    accession_number: accession.clone(),
                    filing_date: parse_date(recent.filing_date.get(i))?,
                    form: recent.form.get(i)?.clone(),
                    report_date: parse_date(recent.report_date.get(i)),
                    primary_document: recent.primary_document.get(i).filter(|d| !d.is_empty()).cloned(),
                })
            })
            .collect();

        out.sort_by(|a, b| b.filing_date.cmp(&a.filing_date));
        out
    }

    /// Selects the filing of `form` for a fiscal year, or the latest one.
    ///
    /// Amended filings are considered only when no original filing matches.
    #[must_use]
    pub fn select(&self, form: FormType, fiscal_year: Option<i32>) -> Option<FilingDescriptor> {
        let filings = self.filings();
        let matching = |code: &str| {
            filings
                .iter()
                .filter(|f| f.form == code)
                .find(|f| fiscal_year.is_none_or(|y| fiscal_year_of(f.filing_date) == y))
                .cloned()
        };
        matching(form.as_str()).or_else(|| matching(form.amended()))
    }
}
