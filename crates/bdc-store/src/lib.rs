#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/bdc/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! ```no_run
//! use bdc_store::PortfolioDatabase;
//! use chrono::NaiveDate;
//!
//! # fn main() -> bdc_core::Result<()> {
//! let db = PortfolioDatabase::new("data/bdc.db")?;
//! let period = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
//! let stats = db.load_from_csv("data/ARCC_2024.csv", period)?;
//! println!("{} inserted, {} skipped", stats.inserted, stats.skipped);
//!
//! for company in db.overlap_companies(Some(period))? {
//!     println!("{} held by {}", company.company, company.holders.join(", "));
//! }
//! # Ok(())
//! # }
//! ```

/// Database handle and write path.
pub mod database;
/// Read-side queries and view rows.
pub mod queries;
/// Ticker derivation for new filers.
pub mod ticker;

// Re-export commonly used items at crate root
pub use database::{LoadStats, NewPosition, PortfolioDatabase, SCHEMA, UpsertOutcome};
pub use queries::{
    CompanyRow, FilerRow, FilerSummary, Holding, IndustryExposure, OverlapCompany, TableCounts,
};
pub use ticker::derive_ticker;
