//! BDC CLI binary.
//!
//! Runs the extraction pipeline, bulk loads and the overlap reports.

use bdc::analytics::{
    HoldingsMatrix, MatrixValue, PositionRow, concentration_reports, write_common_holdings,
    write_concentration, write_overlap_matrix, write_overlap_summary, write_to_path,
};
use bdc::{
    ExtractionStrategy, FormType, Job, KNOWN_FILERS, Pipeline, PipelineConfig, PortfolioDatabase,
    filers::xbrl_compliant_tickers,
};
use chrono::{Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bdc")]
#[command(about = "BDC Schedule of Investments extraction and overlap analysis", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Portfolio database file (overrides the configuration)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Schema file to apply on top of the embedded schema
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract holdings from filings and load them into the database
    Run {
        /// Tickers or CIKs
        tickers: Vec<String>,

        /// Fiscal years (repeatable); latest filing when omitted
        #[arg(long = "year")]
        years: Vec<i32>,

        /// Add every known filer with tagged schedules
        #[arg(long)]
        compliant: bool,

        /// Extraction strategy: xbrl, html or xbrl_then_html
        #[arg(long)]
        strategy: Option<ExtractionStrategy>,

        /// Form type: 10-K or 10-Q
        #[arg(long)]
        form: Option<FormType>,

        /// Write each filing's records as CSV into this directory
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },

    /// Load records from a CSV export
    LoadCsv {
        /// CSV file in the record interchange format
        path: PathBuf,

        /// Period end for rows without one (default: last December 31)
        #[arg(long)]
        period_end: Option<NaiveDate>,
    },

    /// Write overlap and concentration reports
    Overlap {
        /// Minimum number of holders for a common holding
        #[arg(long, default_value = "2")]
        min_holders: usize,

        /// Period end to compare (default: the latest stored period)
        #[arg(long)]
        period_end: Option<NaiveDate>,

        /// Report directory
        #[arg(long, default_value = "output")]
        output: PathBuf,

        /// Common holdings to print
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// Show database contents
    Status,

    /// List known filers
    List,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = PipelineConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    match cli.command {
        Commands::Run {
            tickers,
            years,
            compliant,
            strategy,
            form,
            export_dir,
        } => {
            if let Some(strategy) = strategy {
                config.strategy = strategy;
            }
            if let Some(form) = form {
                config.form = form;
            }
            if export_dir.is_some() {
                config.export_dir = export_dir;
            }
            run_pipeline(config, cli.schema.as_deref(), tickers, &years, compliant).await?;
        }
        Commands::LoadCsv { path, period_end } => {
            let db = open_database(&config.db_path, cli.schema.as_deref())?;
            let period_end = period_end.unwrap_or_else(last_year_end);
            let stats = db.load_from_csv(&path, period_end)?;
            println!("Loaded {} ({} rows)", path.display(), stats.rows);
            println!("  Filers:    {}", stats.filers);
            println!("  Companies: {}", stats.companies);
            println!("  Inserted:  {}", stats.inserted);
            println!("  Updated:   {}", stats.updated);
            println!("  Skipped:   {}", stats.skipped);
        }
        Commands::Overlap {
            min_holders,
            period_end,
            output,
            top,
        } => {
            let db = open_database(&config.db_path, cli.schema.as_deref())?;
            overlap_reports(&db, min_holders, period_end, &output, top)?;
        }
        Commands::Status => {
            let db = open_database(&config.db_path, cli.schema.as_deref())?;
            print_status(&db, &config.db_path)?;
        }
        Commands::List => list_filers(),
    }

    Ok(())
}

fn open_database(path: &Path, schema: Option<&Path>) -> bdc::Result<PortfolioDatabase> {
    let db = PortfolioDatabase::new(path)?;
    if let Some(schema) = schema {
        db.init_schema_from(schema)?;
    }
    Ok(db)
}

fn last_year_end() -> NaiveDate {
    let year = Utc::now().year() - 1;
    NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or_default()
}

async fn run_pipeline(
    config: PipelineConfig,
    schema: Option<&Path>,
    mut tickers: Vec<String>,
    years: &[i32],
    compliant: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if compliant {
        tickers.extend(xbrl_compliant_tickers().map(str::to_string));
    }
    let mut seen = std::collections::HashSet::new();
    tickers.retain(|t| seen.insert(t.trim().to_uppercase()));
    if tickers.is_empty() {
        return Err("No tickers given; pass tickers or --compliant".into());
    }

    if schema.is_some() {
        open_database(&config.db_path, schema)?;
    }
    let pipeline = Pipeline::edgar(config)?;
    let jobs = Job::matrix(&tickers, years);
    info!("Running {} job(s)", jobs.len());

    let summary = pipeline.run(&jobs).await;
    println!("\n{summary}");
    if summary.failures().count() > 0 {
        warn!("{} job(s) did not load any holdings", summary.failures().count());
    }

    let counts = pipeline.database().counts()?;
    println!(
        "Database: {} filers, {} companies, {} positions",
        counts.filers, counts.companies, counts.investments
    );
    Ok(())
}

fn overlap_reports(
    db: &PortfolioDatabase,
    min_holders: usize,
    period_end: Option<NaiveDate>,
    output: &Path,
    top: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(period_end) = report_period(db, period_end)? else {
        println!("No holdings in the database.");
        return Ok(());
    };
    let holdings = db.holdings(Some(period_end))?;
    if holdings.is_empty() {
        println!("No holdings for period {period_end}.");
        return Ok(());
    }
    info!("Comparing holdings for period {}", period_end);
    let rows: Vec<PositionRow> = holdings.iter().map(PositionRow::from).collect();

    let matrix = HoldingsMatrix::build(&rows, MatrixValue::Presence);
    let common = matrix.common_holdings(min_holders);
    let overlap = matrix.overlap_matrix();
    let summary = matrix.overlap_summary();
    let concentration = concentration_reports(&rows);

    write_to_path(output.join("common_holdings.csv"), |f| write_common_holdings(f, &common))?;
    write_to_path(output.join("overlap_matrix.csv"), |f| write_overlap_matrix(f, &overlap))?;
    write_to_path(output.join("overlap_summary.csv"), |f| write_overlap_summary(f, &summary))?;
    write_to_path(output.join("concentration.csv"), |f| write_concentration(f, &concentration))?;

    println!(
        "Period {}: {} filers, {} companies, {} held by {}+ filers",
        period_end,
        matrix.filers().len(),
        matrix.companies().len(),
        common.len(),
        min_holders
    );
    println!("\n{:<40} {:>7}  Holders", "Company", "Count");
    println!("{}", "-".repeat(70));
    for holding in common.iter().take(top) {
        println!(
            "{:<40} {:>7}  {}",
            holding.company,
            holding.holder_count,
            holding.holders.join(", ")
        );
    }

    println!("\n{:<8} {:>10} {:>8} {:>8}", "Filer", "Companies", "Shared", "%");
    for row in &summary {
        println!(
            "{:<8} {:>10} {:>8} {:>7.1}%",
            row.filer, row.total_companies, row.shared_companies, row.pct_shared
        );
    }

    println!("\n{:<8} {:>7} {:<10} {:>6}", "Filer", "HHI", "Level", "Top 3");
    for report in &concentration {
        println!(
            "{:<8} {:>7.0} {:<10} {:>5.1}%",
            report.filer,
            report.hhi,
            report.level.as_str(),
            report.top3_share
        );
    }

    println!("\nReports written to {}", output.display());
    Ok(())
}

/// Period the overlap reports compare: the requested one, else the latest.
fn report_period(db: &PortfolioDatabase, requested: Option<NaiveDate>) -> bdc::Result<Option<NaiveDate>> {
    match requested {
        Some(period) => Ok(Some(period)),
        None => db.latest_period(),
    }
}

fn print_status(db: &PortfolioDatabase, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let counts = db.counts()?;
    println!("Database: {}", path.display());
    println!("  Filers:    {}", counts.filers);
    println!("  Companies: {}", counts.companies);
    println!("  Positions: {}", counts.investments);

    let periods = db.periods()?;
    if !periods.is_empty() {
        let labels: Vec<String> = periods.iter().map(ToString::to_string).collect();
        println!("  Periods:   {}", labels.join(", "));
    }

    let summary = db.filer_summary()?;
    if !summary.is_empty() {
        println!(
            "\n{:<8} {:<12} {:>9} {:>9} {:>7} {:>16}",
            "Filer", "Period", "Positions", "Companies", "Shared", "Fair value"
        );
        for row in &summary {
            println!(
                "{:<8} {:<12} {:>9} {:>9} {:>7} {:>16.0}",
                row.filer_ticker,
                row.period_end.to_string(),
                row.positions,
                row.total_companies,
                row.shared_companies,
                row.total_fair_value
            );
        }
    }

    let overlap = db.overlap_companies(periods.first().copied())?;
    if let Some(company) = overlap.first() {
        println!("\nMost widely held at {}:", company.period_end);
        for company in overlap.iter().take(10) {
            println!(
                "  {:<40} {} filers  {}",
                company.company,
                company.bdc_count,
                company.holders.join(", ")
            );
        }
    }
    Ok(())
}

fn list_filers() {
    println!("{:<6} {:>10}  {:<5} Name", "Ticker", "CIK", "XBRL");
    for filer in KNOWN_FILERS {
        println!(
            "{:<6} {:>10}  {:<5} {}",
            filer.ticker,
            filer.cik,
            if filer.xbrl_compliant { "yes" } else { "no" },
            filer.name
        );
    }
}
