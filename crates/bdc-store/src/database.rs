//! SQLite portfolio database.
//!
//! Filers and portfolio companies are created on first sight. Positions are
//! keyed by (filer, company, investment type, period end) and written with a
//! three-way branch: identical values are skipped, changed values update the
//! existing row, new keys insert. Every write commits on its own.

use bdc_core::{
    AssetClass, BdcError, InvestmentRecord, Result, lookup_filer_by_cik, normalize_company_name,
    read_records_from_path,
};
use bdc_extract::{classify_asset_class, classify_industry, industry_code};
use chrono::NaiveDate;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

use crate::ticker::derive_ticker;

/// Schema applied when a database is opened.
pub const SCHEMA: &str = include_str!("../schema.sql");

/// Classification method recorded for keyword-assigned industries.
const KEYWORD_METHOD: &str = "KEYWORD";

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Outcome of writing one position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new row was inserted.
    Inserted(i64),
    /// An existing row with different values was updated in place.
    Updated(i64),
    /// An identical row already existed, or the insert hit a constraint.
    Skipped,
}

/// A position to be written.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPosition {
    /// Filer ticker.
    pub filer_ticker: String,
    /// Portfolio company id.
    pub company_id: i64,
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

/// Counts from a bulk load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Rows read.
    pub rows: usize,
    /// Distinct filers touched.
    pub filers: usize,
    /// Distinct companies touched.
    pub companies: usize,
    /// Positions inserted.
    pub inserted: usize,
    /// Positions updated.
    pub updated: usize,
    /// Positions skipped as duplicates or unusable rows.
    pub skipped: usize,
}

impl LoadStats {
    /// Records one write outcome.
    pub const fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted(_) => self.inserted += 1,
            UpsertOutcome::Updated(_) => self.updated += 1,
            UpsertOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// SQLite-backed store of filers, portfolio companies and positions.
#[derive(Debug)]
pub struct PortfolioDatabase {
    conn: Mutex<Connection>,
}

fn storage(e: rusqlite::Error) -> BdcError {
    BdcError::Storage(e.to_string())
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(e, rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Industry code for a company: the reported label first, else keywords in
/// the business description.
fn assign_industry(description: Option<&str>, industry: Option<&str>) -> Option<&'static str> {
    let from_label = non_empty(industry).and_then(industry_code);
    match from_label {
        Some(code) if code != "OTHER" => Some(code),
        _ => non_empty(description)
            .and_then(|d| industry_code(classify_industry(Some(d))))
            .filter(|code| *code != "OTHER" || from_label.is_none())
            .or(from_label),
    }
}

impl PortfolioDatabase {
    /// Opens (or creates) a database file and applies the schema.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or the schema fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).map_err(storage)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.apply_schema(SCHEMA)?;
        Ok(db)
    }

    /// Creates an in-memory database.
    ///
    /// Useful for testing; data is lost when the database is dropped.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(storage)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.apply_schema(SCHEMA)?;
        Ok(db)
    }

    /// Applies a schema file, e.g. a customized copy of [`SCHEMA`].
    ///
    /// A missing or unreadable file is a [`BdcError::Schema`] error.
    pub fn init_schema_from(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let sql = std::fs::read_to_string(path)
            .map_err(|e| BdcError::Schema(format!("{}: {}", path.display(), e)))?;
        self.apply_schema(&sql)
    }

    fn apply_schema(&self, sql: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(sql)
            .map_err(|e| BdcError::Schema(e.to_string()))?;
        debug!("Portfolio database schema initialized");
        Ok(())
    }

    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| BdcError::Storage(e.to_string()))
    }

    /// Returns the ticker of a filer, creating the filer on first sight.
    ///
    /// Looks up by CIK first, then by name. New filers take their registry
    /// ticker when the CIK is a well-known one, else a symbol derived from the
    /// name; a numeric suffix resolves collisions.
    #[instrument(skip(self))]
    pub fn get_or_create_filer(&self, name: &str, cik: Option<&str>) -> Result<String> {
        let conn = self.conn()?;
        let cik = non_empty(cik).map(|c| c.trim_start_matches('0').to_string());

        if let Some(cik) = &cik {
            let found: Option<String> = conn
                .query_row("SELECT ticker FROM filer WHERE cik = ?1", params![cik], |row| row.get(0))
                .optional()
                .map_err(storage)?;
            if let Some(ticker) = found {
                return Ok(ticker);
            }
        }

        let found: Option<String> = conn
            .query_row("SELECT ticker FROM filer WHERE name = ?1", params![name], |row| row.get(0))
            .optional()
            .map_err(storage)?;
        if let Some(ticker) = found {
            return Ok(ticker);
        }

        let base = cik
            .as_deref()
            .and_then(|c| c.parse::<u64>().ok())
            .and_then(lookup_filer_by_cik)
            .map(|known| known.ticker.to_string())
            .unwrap_or_else(|| derive_ticker(name));
        let base = if base.is_empty() { "FILER".to_string() } else { base };

        let mut ticker = base.clone();
        let mut suffix = 2;
        loop {
            let taken: bool = conn
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM filer WHERE ticker = ?1)",
                    params![ticker],
                    |row| row.get(0),
                )
                .map_err(storage)?;
            if !taken {
                break;
            }
            ticker = format!("{base}{suffix}");
            suffix += 1;
        }

        conn.execute(
            "INSERT INTO filer (ticker, name, cik) VALUES (?1, ?2, ?3)",
            params![ticker, name, cik],
        )
        .map_err(storage)?;
        info!("Created filer {} ({})", ticker, name);
        Ok(ticker)
    }

    /// Returns the id of a portfolio company, creating it on first sight.
    ///
    /// Companies are keyed by normalized name. An existing company only gains
    /// a business description when it has none; nothing else is overwritten.
    #[instrument(skip(self, description))]
    pub fn get_or_create_company(
        &self,
        name: &str,
        description: Option<&str>,
        industry: Option<&str>,
    ) -> Result<i64> {
        let normalized = normalize_company_name(name);
        if normalized.is_empty() {
            return Err(BdcError::InvalidParameter(format!(
                "Company name {:?} normalizes to nothing",
                name
            )));
        }
        let description = non_empty(description);
        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM portfolio_company WHERE normalized_name = ?1",
                params![normalized],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage)?;

        if let Some(id) = existing {
            if let Some(description) = description {
                conn.execute(
                    "UPDATE portfolio_company
                     SET business_desc = COALESCE(business_desc, ?1),
                         updated_at = CURRENT_TIMESTAMP
                     WHERE id = ?2",
                    params![description, id],
                )
                .map_err(storage)?;
            }
            return Ok(id);
        }

        let code = assign_industry(description, industry);
        conn.execute(
            "INSERT INTO portfolio_company
             (normalized_name, business_desc, assigned_industry, classification_method)
             VALUES (?1, ?2, ?3, ?4)",
            params![normalized, description, code, code.map(|_| KEYWORD_METHOD)],
        )
        .map_err(storage)?;
        let id = conn.last_insert_rowid();
        debug!("Created company {} ({:?})", normalized, code);
        Ok(id)
    }

    /// Writes one position.
    ///
    /// Identical values under the same business key are skipped, different
    /// values update the existing row, and a new key inserts. A constraint
    /// violation on insert is reported as skipped.
    #[instrument(skip(self, position), fields(filer = %position.filer_ticker, company = position.company_id))]
    pub fn add_investment(&self, position: &NewPosition) -> Result<UpsertOutcome> {
        let conn = self.conn()?;
        let period = position.period_end.format(DATE_FORMAT).to_string();

        let existing: Option<(i64, Option<f64>, Option<f64>, Option<f64>)> = conn
            .query_row(
                "SELECT id, fair_value, cost, principal FROM investment
                 WHERE filer_ticker = ?1 AND company_id = ?2
                 AND COALESCE(investment_type, '') = COALESCE(?3, '')
                 AND period_end = ?4",
                params![
                    position.filer_ticker,
                    position.company_id,
                    position.investment_type,
                    period
                ],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()
            .map_err(storage)?;

        if let Some((id, fair_value, cost, principal)) = existing {
            if fair_value == position.fair_value
                && cost == position.cost
                && principal == position.principal
            {
                return Ok(UpsertOutcome::Skipped);
            }
            conn.execute(
                "UPDATE investment
                 SET fair_value = ?1, cost = ?2, principal = ?3, asset_class = ?4,
                     updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?5",
                params![
                    position.fair_value,
                    position.cost,
                    position.principal,
                    position.asset_class.as_str(),
                    id
                ],
            )
            .map_err(storage)?;
            debug!("Updated position {}", id);
            return Ok(UpsertOutcome::Updated(id));
        }

        let inserted = conn.execute(
            "INSERT INTO investment
             (filer_ticker, company_id, investment_type, asset_class,
              fair_value, cost, principal, period_end)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                position.filer_ticker,
                position.company_id,
                position.investment_type,
                position.asset_class.as_str(),
                position.fair_value,
                position.cost,
                position.principal,
                period
            ],
        );
        match inserted {
            Ok(_) => Ok(UpsertOutcome::Inserted(conn.last_insert_rowid())),
            Err(e) if is_constraint_violation(&e) => {
                warn!("Position insert hit a constraint, skipping: {}", e);
                Ok(UpsertOutcome::Skipped)
            }
            Err(e) => Err(storage(e)),
        }
    }

    /// Writes one extracted record: filer, company and position.
    ///
    /// The record's own period end is used when present, else
    /// `default_period_end`. An Unknown asset class is re-derived from the
    /// record's type and amounts.
    pub fn add_record(
        &self,
        filer_ticker: &str,
        record: &InvestmentRecord,
        default_period_end: NaiveDate,
    ) -> Result<UpsertOutcome> {
        let company_id = self.get_or_create_company(
            &record.company_name,
            record.business_description.as_deref(),
            record.industry.as_deref(),
        )?;

        let asset_class = match record.asset_class {
            AssetClass::Unknown => classify_asset_class(
                record.investment_type.as_deref(),
                record.principal.is_some(),
                record.shares.is_some(),
            ),
            known => known,
        };

        self.add_investment(&NewPosition {
            filer_ticker: filer_ticker.to_string(),
            company_id,
            investment_type: non_empty(record.investment_type.as_deref()).map(str::to_string),
            asset_class,
            fair_value: record.fair_value,
            cost: record.cost,
            principal: record.principal,
            period_end: record.period_end.unwrap_or(default_period_end),
        })
    }

    /// Loads records in the CSV interchange format.
    ///
    /// Rows need a filer name and a company name; rows without one are
    /// counted as skipped.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load_from_csv(&self, path: impl AsRef<Path>, default_period_end: NaiveDate) -> Result<LoadStats> {
        let records = read_records_from_path(path)?;
        let mut stats = LoadStats {
            rows: records.len(),
            ..Default::default()
        };
        let mut filers = HashSet::new();
        let mut companies = HashSet::new();

        for record in &records {
            let Some(filer_name) = non_empty(record.filer_name.as_deref()) else {
                stats.skipped += 1;
                continue;
            };
            if normalize_company_name(&record.company_name).is_empty() {
                stats.skipped += 1;
                continue;
            }

            let ticker = self.get_or_create_filer(filer_name, record.filer_cik.as_deref())?;
            let outcome = self.add_record(&ticker, record, default_period_end)?;
            stats.record(outcome);

            filers.insert(ticker);
            companies.insert(normalize_company_name(&record.company_name));
        }

        stats.filers = filers.len();
        stats.companies = companies.len();
        info!(
            "Loaded {} rows: {} inserted, {} updated, {} skipped",
            stats.rows, stats.inserted, stats.updated, stats.skipped
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdc_core::write_records_to_path;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn position(db: &PortfolioDatabase, fair_value: f64) -> NewPosition {
        let ticker = db.get_or_create_filer("Ares Capital Corporation", Some("1287750")).unwrap();
        let company_id = db.get_or_create_company("Acme Holdings, LLC (4)", None, None).unwrap();
        NewPosition {
            filer_ticker: ticker,
            company_id,
            investment_type: Some("First Lien Loan".to_string()),
            asset_class: AssetClass::Debt,
            fair_value: Some(fair_value),
            cost: Some(90.0),
            principal: Some(100.0),
            period_end: date(2024, 12, 31),
        }
    }

    #[test]
    fn test_database_initialization() {
        let db = PortfolioDatabase::in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_upsert_three_way() {
        let db = PortfolioDatabase::in_memory().unwrap();
        let first = db.add_investment(&position(&db, 95.0)).unwrap();
        assert!(matches!(first, UpsertOutcome::Inserted(_)));

        let again = db.add_investment(&position(&db, 95.0)).unwrap();
        assert_eq!(again, UpsertOutcome::Skipped);

        let restated = db.add_investment(&position(&db, 97.0)).unwrap();
        let UpsertOutcome::Inserted(id) = first else {
            unreachable!()
        };
        assert_eq!(restated, UpsertOutcome::Updated(id));
        assert_eq!(db.investment_count().unwrap(), 1);
    }

    #[test]
    fn test_missing_type_is_one_key() {
        let db = PortfolioDatabase::in_memory().unwrap();
        let mut p = position(&db, 95.0);
        p.investment_type = None;
        assert!(matches!(db.add_investment(&p).unwrap(), UpsertOutcome::Inserted(_)));
        assert_eq!(db.add_investment(&p).unwrap(), UpsertOutcome::Skipped);
        assert_eq!(db.investment_count().unwrap(), 1);
    }

    #[test]
    fn test_filer_lookup_and_derivation() {
        let db = PortfolioDatabase::in_memory().unwrap();
        assert_eq!(db.get_or_create_filer("Ares Capital Corporation", Some("0001287750")).unwrap(), "ARCC");
        assert_eq!(db.get_or_create_filer("Renamed Ares", Some("1287750")).unwrap(), "ARCC");
        assert_eq!(db.get_or_create_filer("Alpha Beta Credit", None).unwrap(), "ABC");
        assert_eq!(db.get_or_create_filer("Alpha Beta Credit", None).unwrap(), "ABC");
        assert_eq!(db.get_or_create_filer("Another Big Capital", None).unwrap(), "ABC2");
        assert_eq!(db.filer_count().unwrap(), 3);
    }

    #[test]
    fn test_company_description_first_write_wins() {
        let db = PortfolioDatabase::in_memory().unwrap();
        let id = db.get_or_create_company("Acme Inc", None, None).unwrap();
        assert_eq!(db.get_or_create_company("Acme Corp", Some("Cloud software"), None).unwrap(), id);
        assert_eq!(db.get_or_create_company("ACME", Some("Restaurants"), None).unwrap(), id);

        let company = db.company("acme").unwrap().unwrap();
        assert_eq!(company.business_desc.as_deref(), Some("Cloud software"));
        assert_eq!(company.assigned_industry, None);

        db.get_or_create_company("Beta LLC", Some("Hospital operator"), None).unwrap();
        let beta = db.company("beta").unwrap().unwrap();
        assert_eq!(beta.assigned_industry.as_deref(), Some("HEALTHCARE_SERVICES"));
        assert_eq!(beta.classification_method.as_deref(), Some("KEYWORD"));
    }

    #[test]
    fn test_empty_company_name_rejected() {
        let db = PortfolioDatabase::in_memory().unwrap();
        assert!(db.get_or_create_company("  ", None, None).is_err());
    }

    #[test]
    fn test_load_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.csv");

        let mut a = InvestmentRecord::new("Acme Inc 1", "Acme Inc")
            .with_filer("Ares Capital Corporation", Some("1287750".to_string()));
        a.investment_type = Some("Senior Secured Loan".to_string());
        a.fair_value = Some(10.0);
        let mut b = InvestmentRecord::new("Acme Corp 1", "Acme Corp")
            .with_filer("Golub Capital BDC", None);
        b.fair_value = Some(5.0);
        b.period_end = Some(date(2024, 9, 30));
        let orphan = InvestmentRecord::new("x", "Orphan LLC");
        write_records_to_path(&path, &[a.clone(), b, orphan, a]).unwrap();

        let db = PortfolioDatabase::in_memory().unwrap();
        let stats = db.load_from_csv(&path, date(2024, 12, 31)).unwrap();
        assert_eq!(stats.rows, 4);
        assert_eq!(stats.inserted, 2);
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.filers, 2);
        assert_eq!(stats.companies, 1);
        assert_eq!(db.company_count().unwrap(), 1);
    }

    #[test]
    fn test_init_schema_from_missing_file() {
        let db = PortfolioDatabase::in_memory().unwrap();
        let err = db.init_schema_from("/nonexistent/schema.sql").unwrap_err();
        assert!(matches!(err, BdcError::Schema(_)));
    }

    #[test]
    fn test_init_schema_from_file_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.sql");
        std::fs::write(&path, SCHEMA).unwrap();
        let db = PortfolioDatabase::in_memory().unwrap();
        db.init_schema_from(&path).unwrap();
        assert_eq!(db.investment_count().unwrap(), 0);
    }

    #[test]
    fn test_new_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bdc.db");
        let db = PortfolioDatabase::new(&path).unwrap();
        db.get_or_create_filer("Alpha Beta Credit", None).unwrap();
        assert!(path.exists());
    }
}
