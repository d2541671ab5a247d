//! Read-side queries over the portfolio database.

use bdc_core::{AssetClass, BdcError, Result};
use chrono::NaiveDate;
use rusqlite::{OptionalExtension, Row, params};
use serde::Serialize;
use tracing::instrument;

use crate::database::{DATE_FORMAT, PortfolioDatabase};

/// A stored position joined with its filer and company.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Holding {
    /// Filer ticker.
    pub filer_ticker: String,
    /// Filer name.
    pub filer_name: String,
    /// Portfolio company id.
    pub company_id: i64,
    /// Normalized company name.
    pub company: String,
    /// Business description.
    pub business_desc: Option<String>,
    /// Assigned industry code.
    pub industry: Option<String>,
    /// Investment type text.
    pub investment_type: Option<String>,
    /// Asset class.
    pub asset_class: AssetClass,
    /// Fair value in dollars.
    pub fair_value: Option<f64>,
    /// Cost in dollars.
    pub cost: Option<f64>,
    /// Principal in dollars.
    pub principal: Option<f64>,
    /// Reporting period end.
    pub period_end: NaiveDate,
}

/// A stored filer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilerRow {
    /// Ticker.
    pub ticker: String,
    /// Name.
    pub name: String,
    /// CIK without leading zeros.
    pub cik: Option<String>,
}

/// A stored portfolio company.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompanyRow {
    /// Id.
    pub id: i64,
    /// Normalized name.
    pub normalized_name: String,
    /// First business description seen.
    pub business_desc: Option<String>,
    /// Assigned industry code.
    pub assigned_industry: Option<String>,
    /// How the industry was assigned.
    pub classification_method: Option<String>,
}

/// A company held by two or more filers in one period.
///
/// Positions without a non-zero fair value do not count as held.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverlapCompany {
    /// Company id.
    pub company_id: i64,
    /// Normalized name.
    pub company: String,
    /// Assigned industry code.
    pub industry: Option<String>,
    /// Reporting period end.
    pub period_end: NaiveDate,
    /// Number of distinct holders.
    pub bdc_count: usize,
    /// Fair value summed across holders.
    pub total_fair_value: f64,
    /// Holder tickers, sorted.
    pub holders: Vec<String>,
}

/// Per-filer, per-period totals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilerSummary {
    /// Filer ticker.
    pub filer_ticker: String,
    /// Filer name.
    pub filer_name: String,
    /// Reporting period end.
    pub period_end: NaiveDate,
    /// Number of positions.
    pub positions: usize,
    /// Distinct companies held.
    pub total_companies: usize,
    /// Companies also held by another filer.
    pub shared_companies: usize,
    /// Total fair value.
    pub total_fair_value: f64,
}

/// Fair value held by one filer in one industry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndustryExposure {
    /// Filer ticker.
    pub filer_ticker: String,
    /// Industry code, `UNKNOWN` when unassigned.
    pub industry: String,
    /// Distinct companies.
    pub company_count: usize,
    /// Total fair value.
    pub total_fair_value: f64,
}

/// Row counts per table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    /// Filers.
    pub filers: usize,
    /// Portfolio companies.
    pub companies: usize,
    /// Positions.
    pub investments: usize,
}

fn storage(e: rusqlite::Error) -> BdcError {
    BdcError::Storage(e.to_string())
}

fn parse_date(raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn count(row: &Row<'_>, idx: usize) -> rusqlite::Result<usize> {
    let n: i64 = row.get(idx)?;
    Ok(usize::try_from(n).unwrap_or(0))
}

const HOLDINGS_SQL: &str = "
    SELECT i.filer_ticker, f.name, i.company_id, pc.normalized_name, pc.business_desc,
           pc.assigned_industry, i.investment_type, i.asset_class,
           i.fair_value, i.cost, i.principal, i.period_end
    FROM investment i
    JOIN filer f ON f.ticker = i.filer_ticker
    JOIN portfolio_company pc ON pc.id = i.company_id
    WHERE (?1 IS NULL OR i.period_end = ?1)
    ORDER BY i.filer_ticker, pc.normalized_name, i.investment_type";

impl PortfolioDatabase {
    /// All positions, optionally restricted to one period end.
    #[instrument(skip(self))]
    pub fn holdings(&self, period_end: Option<NaiveDate>) -> Result<Vec<Holding>> {
        let conn = self.conn()?;
        let period = period_end.map(|d| d.format(DATE_FORMAT).to_string());
        let mut stmt = conn.prepare(HOLDINGS_SQL).map_err(storage)?;
        let rows = stmt
            .query_map(params![period], |row| {
                let asset_class: String = row.get(7)?;
                let period_end: String = row.get(11)?;
                Ok(Holding {
                    filer_ticker: row.get(0)?,
                    filer_name: row.get(1)?,
                    company_id: row.get(2)?,
                    company: row.get(3)?,
                    business_desc: row.get(4)?,
                    industry: row.get(5)?,
                    investment_type: row.get(6)?,
                    asset_class: asset_class.parse().unwrap_or_default(),
                    fair_value: row.get(8)?,
                    cost: row.get(9)?,
                    principal: row.get(10)?,
                    period_end: parse_date(&period_end)?,
                })
            })
            .map_err(storage)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(storage)
    }

    /// Companies held by two or more filers within the same period,
    /// largest first. `None` returns every period.
    #[instrument(skip(self))]
    pub fn overlap_companies(&self, period_end: Option<NaiveDate>) -> Result<Vec<OverlapCompany>> {
        let conn = self.conn()?;
        let period = period_end.map(|d| d.format(DATE_FORMAT).to_string());
        let mut stmt = conn
            .prepare(
                "SELECT company_id, normalized_name, assigned_industry, period_end, bdc_count,
                        COALESCE(total_fair_value, 0.0), holders
                 FROM v_overlap_companies
                 WHERE (?1 IS NULL OR period_end = ?1)
                 ORDER BY period_end DESC, bdc_count DESC, total_fair_value DESC, normalized_name",
            )
            .map_err(storage)?;
        let rows = stmt
            .query_map(params![period], |row| {
                let period_end: String = row.get(3)?;
                let holders: String = row.get(6)?;
                let mut holders: Vec<String> = holders.split(',').map(str::to_string).collect();
                holders.sort();
                Ok(OverlapCompany {
                    company_id: row.get(0)?,
                    company: row.get(1)?,
                    industry: row.get(2)?,
                    period_end: parse_date(&period_end)?,
                    bdc_count: count(row, 4)?,
                    total_fair_value: row.get(5)?,
                    holders,
                })
            })
            .map_err(storage)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(storage)
    }

    /// Totals per filer and period.
    #[instrument(skip(self))]
    pub fn filer_summary(&self) -> Result<Vec<FilerSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT filer_ticker, filer_name, period_end, positions, total_companies,
                        shared_companies, COALESCE(total_fair_value, 0.0)
                 FROM v_filer_summary
                 ORDER BY filer_ticker, period_end",
            )
            .map_err(storage)?;
        let rows = stmt
            .query_map([], |row| {
                let period_end: String = row.get(2)?;
                Ok(FilerSummary {
                    filer_ticker: row.get(0)?,
                    filer_name: row.get(1)?,
                    period_end: parse_date(&period_end)?,
                    positions: count(row, 3)?,
                    total_companies: count(row, 4)?,
                    shared_companies: count(row, 5)?,
                    total_fair_value: row.get(6)?,
                })
            })
            .map_err(storage)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(storage)
    }

    /// Fair value per filer and industry, optionally for one filer.
    #[instrument(skip(self))]
    pub fn industry_concentration(&self, filer_ticker: Option<&str>) -> Result<Vec<IndustryExposure>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT filer_ticker, industry, company_count, COALESCE(total_fair_value, 0.0)
                 FROM v_industry_concentration
                 WHERE (?1 IS NULL OR filer_ticker = ?1)
                 ORDER BY filer_ticker, total_fair_value DESC",
            )
            .map_err(storage)?;
        let rows = stmt
            .query_map(params![filer_ticker], |row| {
                Ok(IndustryExposure {
                    filer_ticker: row.get(0)?,
                    industry: row.get(1)?,
                    company_count: count(row, 2)?,
                    total_fair_value: row.get(3)?,
                })
            })
            .map_err(storage)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(storage)
    }

    /// Looks up a company by its normalized name.
    pub fn company(&self, normalized_name: &str) -> Result<Option<CompanyRow>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, normalized_name, business_desc, assigned_industry, classification_method
             FROM portfolio_company WHERE normalized_name = ?1",
            params![normalized_name],
            |row| {
                Ok(CompanyRow {
                    id: row.get(0)?,
                    normalized_name: row.get(1)?,
                    business_desc: row.get(2)?,
                    assigned_industry: row.get(3)?,
                    classification_method: row.get(4)?,
                })
            },
        )
        .optional()
        .map_err(storage)
    }

    /// All filers, by ticker.
    pub fn filers(&self) -> Result<Vec<FilerRow>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT ticker, name, cik FROM filer ORDER BY ticker")
            .map_err(storage)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(FilerRow {
                    ticker: row.get(0)?,
                    name: row.get(1)?,
                    cik: row.get(2)?,
                })
            })
            .map_err(storage)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(storage)
    }

    /// Distinct period ends with stored positions, most recent first.
    pub fn periods(&self) -> Result<Vec<NaiveDate>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT DISTINCT period_end FROM investment ORDER BY period_end DESC")
            .map_err(storage)?;
        let rows = stmt
            .query_map([], |row| {
                let raw: String = row.get(0)?;
                parse_date(&raw)
            })
            .map_err(storage)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(storage)
    }

    /// Most recent period end with stored positions.
    pub fn latest_period(&self) -> Result<Option<NaiveDate>> {
        Ok(self.periods()?.first().copied())
    }

    fn table_count(&self, table: &str) -> Result<usize> {
        let conn = self.conn()?;
        let n: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .map_err(storage)?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    /// Number of filers.
    pub fn filer_count(&self) -> Result<usize> {
        self.table_count("filer")
    }

    /// Number of portfolio companies.
    pub fn company_count(&self) -> Result<usize> {
        self.table_count("portfolio_company")
    }

    /// Number of positions.
    pub fn investment_count(&self) -> Result<usize> {
        self.table_count("investment")
    }

    /// Row counts of every table.
    pub fn counts(&self) -> Result<TableCounts> {
        Ok(TableCounts {
            filers: self.filer_count()?,
            companies: self.company_count()?,
            investments: self.investment_count()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdc_core::InvestmentRecord;

    fn record(company: &str, fair_value: f64, description: Option<&str>) -> InvestmentRecord {
        let mut r = InvestmentRecord::new(format!("{company} 1"), company);
        r.fair_value = Some(fair_value);
        r.business_description = description.map(str::to_string);
        r
    }

    fn seeded() -> PortfolioDatabase {
        let db = PortfolioDatabase::in_memory().unwrap();
        let period = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let a = db.get_or_create_filer("Alpha Fund", None).unwrap();
        let b = db.get_or_create_filer("Beta Fund", None).unwrap();

        db.add_record(&a, &record("Acme Inc", 10.0, Some("Cloud software")), period).unwrap();
        db.add_record(&a, &record("Gamma LLC", 4.0, Some("Hospital operator")), period).unwrap();
        db.add_record(&b, &record("Acme Corp", 5.0, None), period).unwrap();
        db.add_record(&b, &record("Delta Co", 6.0, None), period).unwrap();
        db
    }

    #[test]
    fn test_holdings() {
        let db = seeded();
        let all = db.holdings(None).unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].filer_ticker, "AF");
        assert_eq!(all[0].company, "acme");
        assert_eq!(all[0].industry.as_deref(), Some("SOFTWARE"));

        let none = db.holdings(NaiveDate::from_ymd_opt(2023, 12, 31)).unwrap();
        assert!(none.is_empty());
        assert_eq!(db.periods().unwrap(), vec![NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()]);
    }

    #[test]
    fn test_overlap_companies() {
        let db = seeded();
        let overlap = db.overlap_companies(None).unwrap();
        assert_eq!(overlap.len(), 1);
        assert_eq!(overlap[0].company, "acme");
        assert_eq!(overlap[0].period_end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(overlap[0].bdc_count, 2);
        assert_eq!(overlap[0].total_fair_value, 15.0);
        assert_eq!(overlap[0].holders, vec!["AF".to_string(), "BF".to_string()]);
    }

    #[test]
    fn test_zero_or_missing_fair_value_is_not_shared() {
        let db = seeded();
        let period = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let c = db.get_or_create_filer("Capital Corp", None).unwrap();
        db.add_record(&c, &record("Gamma LLC", 0.0, None), period).unwrap();
        let mut unvalued = InvestmentRecord::new("Delta Co 1", "Delta Co");
        unvalued.fair_value = None;
        db.add_record(&c, &unvalued, period).unwrap();

        let overlap = db.overlap_companies(Some(period)).unwrap();
        let names: Vec<&str> = overlap.iter().map(|o| o.company.as_str()).collect();
        assert_eq!(names, ["acme"]);

        let summary = db.filer_summary().unwrap();
        let capital = summary.iter().find(|s| s.filer_ticker == c).unwrap();
        assert_eq!(capital.positions, 2);
        assert_eq!(capital.total_companies, 0);
        assert_eq!(capital.shared_companies, 0);
        let alpha = summary.iter().find(|s| s.filer_ticker == "AF").unwrap();
        assert_eq!(alpha.shared_companies, 1);
    }

    #[test]
    fn test_overlap_is_per_period() {
        let db = PortfolioDatabase::in_memory().unwrap();
        let prior = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let latest = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let a = db.get_or_create_filer("Alpha Fund", None).unwrap();
        let b = db.get_or_create_filer("Beta Fund", None).unwrap();
        db.add_record(&a, &record("Acme Inc", 10.0, None), prior).unwrap();
        db.add_record(&b, &record("Acme Corp", 5.0, None), latest).unwrap();

        assert!(db.overlap_companies(None).unwrap().is_empty());
        assert_eq!(db.latest_period().unwrap(), Some(latest));
        let summary = db.filer_summary().unwrap();
        assert!(summary.iter().all(|s| s.shared_companies == 0));

        db.add_record(&a, &record("Acme Inc", 12.0, None), latest).unwrap();
        let overlap = db.overlap_companies(Some(latest)).unwrap();
        assert_eq!(overlap.len(), 1);
        assert_eq!(overlap[0].total_fair_value, 17.0);
        assert!(db.overlap_companies(Some(prior)).unwrap().is_empty());
    }

    #[test]
    fn test_filer_summary() {
        let db = seeded();
        let summary = db.filer_summary().unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].filer_ticker, "AF");
        assert_eq!(summary[0].total_companies, 2);
        assert_eq!(summary[0].shared_companies, 1);
        assert_eq!(summary[0].total_fair_value, 14.0);
    }

    #[test]
    fn test_industry_concentration() {
        let db = seeded();
        let alpha = db.industry_concentration(Some("AF")).unwrap();
        assert_eq!(alpha.len(), 2);
        assert_eq!(alpha[0].industry, "SOFTWARE");
        assert_eq!(alpha[1].industry, "HEALTHCARE_SERVICES");

        let beta = db.industry_concentration(Some("BF")).unwrap();
        assert_eq!(beta.len(), 2);
        assert_eq!(beta[0].industry, "UNKNOWN");
        assert_eq!(beta[0].total_fair_value, 6.0);

        assert_eq!(db.industry_concentration(None).unwrap().len(), 4);
    }

    #[test]
    fn test_counts() {
        let db = seeded();
        let counts = db.counts().unwrap();
        assert_eq!(counts.filers, 2);
        assert_eq!(counts.companies, 3);
        assert_eq!(counts.investments, 4);
        assert_eq!(db.filers().unwrap()[1].name, "Beta Fund");
    }
}
