//! Sequential extract-and-load pipeline.
//!
//! Each job locates one filing, extracts its holdings, and writes them to the
//! portfolio database. Jobs run strictly one after another. A failing job is
//! recorded in its [`JobOutcome`] and never stops the run.

use bdc_core::{
    BdcError, FilerRef, FilingDescriptor, FilingSource, InvestmentRecord, RecordSource,
    Result, lookup_filer, normalize_company_name, write_records_to_path,
};
use bdc_edgar::EdgarClient;
use bdc_extract::{
    PortfolioSummary, extract_affiliated_rollforward, extract_from_facts, extract_from_html,
};
use bdc_store::{LoadStats, PortfolioDatabase};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{ExtractionStrategy, PipelineConfig};

/// One (filer, fiscal year) unit of work.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Job {
    /// Ticker or CIK.
    pub ticker: String,
    /// Fiscal year, latest filing when `None`.
    pub fiscal_year: Option<i32>,
}

impl Job {
    /// Creates a job.
    #[must_use]
    pub fn new(ticker: impl Into<String>, fiscal_year: Option<i32>) -> Self {
        Self {
            ticker: ticker.into().trim().to_uppercase(),
            fiscal_year,
        }
    }

    /// Every ticker × year combination, tickers outermost.
    ///
    /// An empty year list means one latest-filing job per ticker.
    #[must_use]
    pub fn matrix(tickers: &[String], years: &[i32]) -> Vec<Self> {
        tickers
            .iter()
            .flat_map(|t| {
                if years.is_empty() {
                    vec![Self::new(t.as_str(), None)]
                } else {
                    years.iter().map(|y| Self::new(t.as_str(), Some(*y))).collect()
                }
            })
            .collect()
    }

    fn year_label(&self) -> String {
        year_label(self.fiscal_year)
    }
}

fn year_label(fiscal_year: Option<i32>) -> String {
    fiscal_year.map_or_else(|| "latest".to_string(), |y| y.to_string())
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.ticker, self.year_label())
    }
}

/// Final state of a job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Holdings were extracted and written.
    Success,
    /// No filing or no holdings were found.
    NoData,
    /// The job failed.
    Error,
}

impl JobStatus {
    /// Returns the status label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NoData => "no_data",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one job.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JobOutcome {
    /// Ticker or CIK.
    pub ticker: String,
    /// Requested fiscal year.
    pub fiscal_year: Option<i32>,
    /// Final state.
    pub status: JobStatus,
    /// Reason for a non-success status.
    pub message: Option<String>,
    /// Accession number of the filing used.
    pub accession_number: Option<String>,
    /// Filing date of the filing used.
    pub filing_date: Option<NaiveDate>,
    /// Period end applied to records that carry none.
    pub period_end: Option<NaiveDate>,
    /// Disclosure format the holdings came from.
    pub source: Option<RecordSource>,
    /// Records extracted.
    pub holdings_extracted: usize,
    /// Positions inserted.
    pub inserted: usize,
    /// Positions updated.
    pub updated: usize,
    /// Positions skipped.
    pub skipped: usize,
    /// Records whose asset class could not be determined.
    pub unknown_asset_class: usize,
    /// Rows of the affiliated roll-forward found in the tagged facts.
    pub affiliated_rollforward: usize,
    /// Asset-class, industry and affiliation totals of the extracted records.
    pub summary: Option<PortfolioSummary>,
}

impl JobOutcome {
    fn pending(job: &Job) -> Self {
        Self {
            ticker: job.ticker.clone(),
            fiscal_year: job.fiscal_year,
            status: JobStatus::Error,
            message: None,
            accession_number: None,
            filing_date: None,
            period_end: None,
            source: None,
            holdings_extracted: 0,
            inserted: 0,
            updated: 0,
            skipped: 0,
            unknown_asset_class: 0,
            affiliated_rollforward: 0,
            summary: None,
        }
    }

    fn finish(mut self, status: JobStatus, message: Option<String>) -> Self {
        self.status = status;
        self.message = message;
        self
    }

    /// Positions written (inserted or updated).
    #[must_use]
    pub const fn positions_written(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Outcomes of a run, in job order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// One outcome per job.
    pub outcomes: Vec<JobOutcome>,
}

impl RunSummary {
    /// Successful jobs.
    pub fn successes(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| o.status == JobStatus::Success)
    }

    /// Jobs that found no data or failed.
    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| o.status != JobStatus::Success)
    }

    /// Total records extracted across jobs.
    #[must_use]
    pub fn holdings_extracted(&self) -> usize {
        self.outcomes.iter().map(|o| o.holdings_extracted).sum()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processed: {}", self.outcomes.len())?;
        writeln!(f, "  Success: {}", self.successes().count())?;
        writeln!(f, "  Failed:  {}", self.failures().count())?;
        for o in self.successes() {
            writeln!(
                f,
                "  {} ({}): {} extracted -> {} inserted, {} updated, {} skipped, {} unknown class",
                o.ticker,
                year_label(o.fiscal_year),
                o.holdings_extracted,
                o.inserted,
                o.updated,
                o.skipped,
                o.unknown_asset_class
            )?;
        }
        for o in self.failures() {
            writeln!(
                f,
                "  {} ({}): {} {}",
                o.ticker,
                year_label(o.fiscal_year),
                o.status,
                o.message.as_deref().unwrap_or("")
            )?;
        }
        Ok(())
    }
}

/// Period end applied to records without their own.
///
/// December 31 of the requested fiscal year; else the filing's report date;
/// else December 31 of the year the filing date implies (filings made
/// January through April cover the previous year).
#[must_use]
pub fn default_period_end(fiscal_year: Option<i32>, filing: &FilingDescriptor) -> NaiveDate {
    let year_end = |y: i32| NaiveDate::from_ymd_opt(y, 12, 31).unwrap_or(filing.filing_date);
    if let Some(year) = fiscal_year {
        return year_end(year);
    }
    if let Some(report_date) = filing.report_date {
        return report_date;
    }
    let filed = filing.filing_date;
    year_end(if filed.month() <= 4 { filed.year() - 1 } else { filed.year() })
}

/// Records pulled from one filing.
#[derive(Debug)]
struct Extracted {
    records: Vec<InvestmentRecord>,
    source: RecordSource,
    affiliated_rollforward: usize,
}

/// Runs jobs against a filing source and a portfolio database.
#[derive(Debug, Clone)]
pub struct Pipeline {
    source: Arc<dyn FilingSource>,
    db: Arc<PortfolioDatabase>,
    config: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline.
    #[must_use]
    pub fn new(source: Arc<dyn FilingSource>, db: Arc<PortfolioDatabase>, config: PipelineConfig) -> Self {
        Self { source, db, config }
    }

    /// Builds a pipeline reading from SEC EDGAR and writing to `config.db_path`.
    pub fn edgar(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let client = EdgarClient::new(&config.user_agent)?;
        let db = PortfolioDatabase::new(&config.db_path)?;
        info!(
            "Pipeline ready: {} via {} into {}",
            config.form,
            config.strategy,
            config.db_path.display()
        );
        Ok(Self::new(Arc::new(client), Arc::new(db), config))
    }

    /// The database jobs write to.
    #[must_use]
    pub fn database(&self) -> &PortfolioDatabase {
        &self.db
    }

    /// Runs jobs one after another.
    pub async fn run(&self, jobs: &[Job]) -> RunSummary {
        let mut summary = RunSummary::default();
        for (i, job) in jobs.iter().enumerate() {
            info!("[{}/{}] {}", i + 1, jobs.len(), job);
            summary.outcomes.push(self.run_job(job).await);
        }
        summary
    }

    /// Runs one job. Failures are captured in the outcome.
    pub async fn run_job(&self, job: &Job) -> JobOutcome {
        let mut outcome = JobOutcome::pending(job);
        match self.process(job, &mut outcome).await {
            Ok(status) => {
                let message = (status == JobStatus::NoData)
                    .then(|| "No investments extracted".to_string());
                outcome.finish(status, message)
            }
            Err(BdcError::FilingNotFound { .. } | BdcError::FilerNotFound(_))
                if outcome.accession_number.is_none() =>
            {
                let message = format!("No {} filing found", self.config.form);
                warn!("{}: {}", job, message);
                outcome.finish(JobStatus::NoData, Some(message))
            }
            Err(e) => {
                warn!("{} failed: {}", job, e);
                outcome.finish(JobStatus::Error, Some(e.to_string()))
            }
        }
    }

    async fn process(&self, job: &Job, outcome: &mut JobOutcome) -> Result<JobStatus> {
        let filer = FilerRef::new(job.ticker.as_str());
        let filing = self
            .source
            .find_filing(&filer, self.config.form, job.fiscal_year)
            .await?;
        info!(
            "{}: filing {} ({}) [{}]",
            job, filing.accession_number, filing.filing_date, filing.form
        );
        outcome.accession_number = Some(filing.accession_number.clone());
        outcome.filing_date = Some(filing.filing_date);
        let period_end = default_period_end(job.fiscal_year, &filing);
        outcome.period_end = Some(period_end);

        let Extracted {
            records,
            source,
            affiliated_rollforward,
        } = self.extract(&filing).await?;
        outcome.affiliated_rollforward = affiliated_rollforward;
        if records.is_empty() {
            warn!("{}: no investments extracted", job);
            return Ok(JobStatus::NoData);
        }
        outcome.source = Some(source);
        outcome.holdings_extracted = records.len();
        let summary = PortfolioSummary::from_records(&records);
        outcome.unknown_asset_class = summary.unknown_count;
        if outcome.unknown_asset_class > 0 {
            warn!(
                "{}: {} of {} holdings have an unknown asset class",
                job,
                outcome.unknown_asset_class,
                records.len()
            );
        }

        let filer_name = self.filer_name(&filer).await;
        let records: Vec<InvestmentRecord> = records
            .into_iter()
            .map(|r| r.with_filer(filer_name.as_str(), Some(filing.cik.clone())))
            .collect();

        if let Some(dir) = &self.config.export_dir {
            let path = dir.join(format!("{}_{}.csv", job.ticker, job.year_label()));
            std::fs::create_dir_all(dir)?;
            write_records_to_path(&path, &records)?;
            let summary_path = dir.join(format!("{}_{}_summary.csv", job.ticker, job.year_label()));
            summary.write_csv(File::create(&summary_path)?)?;
            info!("{}: wrote {} and {}", job, path.display(), summary_path.display());
        }
        outcome.summary = Some(summary);

        let ticker = self.db.get_or_create_filer(&filer_name, Some(&filing.cik))?;
        let mut stats = LoadStats {
            rows: records.len(),
            ..Default::default()
        };
        for record in &records {
            if normalize_company_name(&record.company_name).is_empty() {
                stats.skipped += 1;
                continue;
            }
            stats.record(self.db.add_record(&ticker, record, period_end)?);
        }
        outcome.inserted = stats.inserted;
        outcome.updated = stats.updated;
        outcome.skipped = stats.skipped;
        info!(
            "{}: {} extracted, {} inserted, {} updated, {} skipped",
            job, stats.rows, stats.inserted, stats.updated, stats.skipped
        );
        Ok(JobStatus::Success)
    }

    /// Tagged facts first unless the strategy is HTML only. Under
    /// [`ExtractionStrategy::XbrlThenHtml`] a filing without tagged holdings,
    /// or whose facts cannot be fetched or parsed, falls back to the HTML
    /// schedule.
    async fn extract(&self, filing: &FilingDescriptor) -> Result<Extracted> {
        let mut affiliated_rollforward = 0;
        if self.config.strategy != ExtractionStrategy::Html {
            match self.source.facts(filing).await {
                Ok(facts) => {
                    affiliated_rollforward = extract_affiliated_rollforward(&facts).len();
                    let extraction = extract_from_facts(&facts);
                    if !extraction.records.is_empty() || self.config.strategy == ExtractionStrategy::Xbrl {
                        return Ok(Extracted {
                            records: extraction.records,
                            source: RecordSource::Xbrl,
                            affiliated_rollforward,
                        });
                    }
                    info!("No tagged holdings in {}, reading HTML schedule", filing.accession_number);
                }
                Err(e) if self.config.strategy == ExtractionStrategy::XbrlThenHtml => {
                    warn!(
                        "Tagged facts of {} unavailable ({}), reading HTML schedule",
                        filing.accession_number, e
                    );
                }
                Err(e) => return Err(e),
            }
        }

        let document = self.source.document(filing).await?;
        let extraction = extract_from_html(&document, &self.config.table_scan);
        Ok(Extracted {
            records: extraction.records,
            source: RecordSource::Html,
            affiliated_rollforward,
        })
    }

    async fn filer_name(&self, filer: &FilerRef) -> String {
        if let Some(known) = lookup_filer(filer.as_str()) {
            return known.name.to_string();
        }
        match self.source.filer_name(filer).await {
            Ok(Some(name)) => name,
            Ok(None) => filer.to_string(),
            Err(e) => {
                warn!("Could not resolve name of {}: {}", filer, e);
                filer.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bdc_core::{FactSet, FormType, TaggedFact, XbrlContext};
    use bdc_extract::{INVESTMENT_IDENTIFIER_AXIS, TableScanConfig};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn filing(filed: NaiveDate, report: Option<NaiveDate>) -> FilingDescriptor {
        FilingDescriptor {
            cik: "1287750".to_string(),
            accession_number: "0001287750-25-000010".to_string(),
            filing_date: filed,
            form: "10-K".to_string(),
            report_date: report,
            primary_document: Some("arcc-20241231.htm".to_string()),
        }
    }

    #[derive(Debug)]
    struct StubSource {
        /// `None` makes `facts` fail as an unreadable instance would.
        facts: Option<FactSet>,
        document: String,
    }

    #[async_trait]
    impl FilingSource for StubSource {
        fn name(&self) -> &str {
            "stub"
        }

        async fn find_filing(
            &self,
            filer: &FilerRef,
            form: FormType,
            fiscal_year: Option<i32>,
        ) -> Result<FilingDescriptor> {
            match (filer.as_str(), fiscal_year) {
                ("ARCC", Some(2024) | None) => Ok(filing(date(2025, 2, 5), None)),
                ("BOOM", _) => Err(BdcError::Network("connection reset".to_string())),
                _ => Err(BdcError::FilingNotFound {
                    filer: filer.to_string(),
                    form: form.to_string(),
                    year: fiscal_year,
                }),
            }
        }

        async fn facts(&self, _filing: &FilingDescriptor) -> Result<FactSet> {
            self.facts
                .clone()
                .ok_or_else(|| BdcError::Parse("XML parse error at byte 10".to_string()))
        }

        async fn document(&self, _filing: &FilingDescriptor) -> Result<String> {
            Ok(self.document.clone())
        }
    }

    fn tagged() -> FactSet {
        let (facts, contexts) = tagged_parts();
        FactSet::new(facts, contexts)
    }

    fn tagged_parts() -> (Vec<TaggedFact>, Vec<XbrlContext>) {
        let contexts = vec![
            XbrlContext::new("c-1").with_dimension(INVESTMENT_IDENTIFIER_AXIS, "Acme Inc, Software 1"),
            XbrlContext::new("c-2").with_dimension(INVESTMENT_IDENTIFIER_AXIS, "Beta LLC, Energy 1"),
        ];
        let facts = vec![
            TaggedFact::new("us-gaap:InvestmentOwnedAtFairValue", "100", "c-1").with_numeric(100.0),
            TaggedFact::new("us-gaap:InvestmentOwnedBalancePrincipalAmount", "110", "c-1")
                .with_numeric(110.0),
            TaggedFact::new("us-gaap:InvestmentOwnedAtFairValue", "50", "c-2").with_numeric(50.0),
        ];
        (facts, contexts)
    }

    fn schedule() -> String {
        let rows: String = [
            ("Acme LLC", "Software", "First Lien Term Loan", "1,000", "990", "985"),
            ("Beta Inc.", "Healthcare", "Senior Secured Note", "2,000", "2,000", "1,900"),
        ]
        .iter()
        .map(|(c, d, t, p, cost, fv)| {
            format!("<tr><td>{c}</td><td>{d}</td><td>{t}</td><td>{p}</td><td>{cost}</td><td>{fv}</td></tr>")
        })
        .collect();
        format!(
            "<html><p>Consolidated Schedule of Investments</p><table>\
             <tr><th>Portfolio Company</th><th>Business Description</th><th>Investment</th>\
             <th>Principal</th><th>Cost</th><th>Fair Value</th></tr>{rows}</table></html>"
        )
    }

    fn pipeline(facts: FactSet, strategy: ExtractionStrategy) -> Pipeline {
        pipeline_with(Some(facts), String::new(), strategy)
    }

    fn pipeline_with(facts: Option<FactSet>, document: String, strategy: ExtractionStrategy) -> Pipeline {
        let source = StubSource { facts, document };
        let config = PipelineConfig {
            strategy,
            table_scan: TableScanConfig {
                min_table_bytes: 200,
                min_entity_mentions: 1,
                ..TableScanConfig::default()
            },
            ..Default::default()
        };
        Pipeline::new(
            Arc::new(source),
            Arc::new(PortfolioDatabase::in_memory().unwrap()),
            config,
        )
    }

    #[test]
    fn test_default_period_end() {
        let f = filing(date(2025, 2, 5), None);
        assert_eq!(default_period_end(Some(2023), &f), date(2023, 12, 31));
        assert_eq!(default_period_end(None, &f), date(2024, 12, 31));
        assert_eq!(
            default_period_end(None, &filing(date(2024, 8, 1), None)),
            date(2024, 12, 31)
        );
        assert_eq!(
            default_period_end(None, &filing(date(2024, 8, 1), Some(date(2024, 6, 30)))),
            date(2024, 6, 30)
        );
    }

    #[test]
    fn test_job_matrix() {
        let tickers = vec!["arcc".to_string(), "FSK".to_string()];
        assert_eq!(Job::matrix(&tickers, &[]).len(), 2);
        let jobs = Job::matrix(&tickers, &[2023, 2024]);
        assert_eq!(jobs.len(), 4);
        assert_eq!(jobs[0], Job::new("ARCC", Some(2023)));
        assert_eq!(jobs[3].to_string(), "FSK (2024)");
    }

    #[tokio::test]
    async fn test_successful_job_is_idempotent() {
        let pipeline = pipeline(tagged(), ExtractionStrategy::XbrlThenHtml);
        let job = Job::new("ARCC", Some(2024));

        let first = pipeline.run_job(&job).await;
        assert_eq!(first.status, JobStatus::Success);
        assert_eq!(first.source, Some(RecordSource::Xbrl));
        assert_eq!(first.holdings_extracted, 2);
        assert_eq!(first.inserted, 2);
        assert_eq!(first.unknown_asset_class, 1);
        assert_eq!(first.period_end, Some(date(2024, 12, 31)));
        let summary = first.summary.as_ref().unwrap();
        assert_eq!(summary.unknown_count, 1);
        let debt = summary.row("Asset Class", "Debt Investments").unwrap();
        assert_eq!(debt.count, 1);
        assert_eq!(debt.fair_value, Some(100.0));

        let second = pipeline.run_job(&job).await;
        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped, 2);

        let filers = pipeline.database().filers().unwrap();
        assert_eq!(filers.len(), 1);
        assert_eq!(filers[0].ticker, "ARCC");
        assert_eq!(filers[0].name, "Ares Capital Corporation");
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_run() {
        let pipeline = pipeline(tagged(), ExtractionStrategy::Xbrl);
        let jobs = vec![
            Job::new("BOOM", None),
            Job::new("ARCC", Some(2019)),
            Job::new("ARCC", Some(2024)),
        ];
        let summary = pipeline.run(&jobs).await;

        let statuses: Vec<JobStatus> = summary.outcomes.iter().map(|o| o.status).collect();
        assert_eq!(statuses, vec![JobStatus::Error, JobStatus::NoData, JobStatus::Success]);
        assert!(summary.outcomes[0].message.as_deref().unwrap().contains("connection reset"));
        assert_eq!(summary.successes().count(), 1);
        assert_eq!(summary.failures().count(), 2);
        assert!(summary.to_string().contains("Processed: 3"));
    }

    #[tokio::test]
    async fn test_untagged_filing_without_tables_is_no_data() {
        let pipeline = pipeline(FactSet::default(), ExtractionStrategy::XbrlThenHtml);
        let outcome = pipeline.run_job(&Job::new("ARCC", None)).await;
        assert_eq!(outcome.status, JobStatus::NoData);
        assert_eq!(outcome.accession_number.as_deref(), Some("0001287750-25-000010"));
        assert_eq!(pipeline.database().investment_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_facts_fall_back_to_html() {
        let pipeline = pipeline_with(None, schedule(), ExtractionStrategy::XbrlThenHtml);
        let outcome = pipeline.run_job(&Job::new("ARCC", Some(2024))).await;
        assert_eq!(outcome.status, JobStatus::Success);
        assert_eq!(outcome.source, Some(RecordSource::Html));
        assert_eq!(outcome.holdings_extracted, 2);
        assert_eq!(outcome.inserted, 2);
        assert_eq!(outcome.summary.as_ref().unwrap().unknown_count, 0);
    }

    #[tokio::test]
    async fn test_unreadable_facts_fail_tagged_only_jobs() {
        let pipeline = pipeline_with(None, schedule(), ExtractionStrategy::Xbrl);
        let outcome = pipeline.run_job(&Job::new("ARCC", Some(2024))).await;
        assert_eq!(outcome.status, JobStatus::Error);
        assert!(outcome.message.as_deref().unwrap().contains("XML parse error"));
        assert_eq!(pipeline.database().investment_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_outcome_counts_affiliated_rollforward_and_exports_summary() {
        let (mut facts, mut contexts) = tagged_parts();
        contexts.push(XbrlContext::new("fy"));
        facts.push(
            TaggedFact::new("us-gaap:InterestIncomeOperating", "5000", "fy")
                .with_numeric(5000.0)
                .with_duration(date(2024, 1, 1), date(2024, 12, 31)),
        );
        let facts = FactSet::new(facts, contexts);
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline(facts, ExtractionStrategy::Xbrl);
        pipeline.config.export_dir = Some(dir.path().to_path_buf());

        let outcome = pipeline.run_job(&Job::new("ARCC", Some(2024))).await;
        assert_eq!(outcome.status, JobStatus::Success);
        assert_eq!(outcome.holdings_extracted, 2);
        assert_eq!(outcome.affiliated_rollforward, 1);

        assert!(dir.path().join("ARCC_2024.csv").exists());
        let summary = std::fs::read_to_string(dir.path().join("ARCC_2024_summary.csv")).unwrap();
        assert!(summary.contains("Classification Quality,Unknown Asset Class,,,,1"));
    }
}
