#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/bdc/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Schedule of Investments extraction for Business Development Companies.
//!
//! This crate re-exports the core types, the EDGAR source, the portfolio
//! database and the analytics, and provides a [`Pipeline`] that runs
//! (filer, fiscal year) jobs from filing to stored positions.
//!
//! # Example
//!
//! ```no_run
//! use bdc::{Job, Pipeline, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> bdc::Result<()> {
//!     let config = PipelineConfig::load(None)?;
//!     let pipeline = Pipeline::edgar(config)?;
//!
//!     let jobs = Job::matrix(&["ARCC".to_string(), "MAIN".to_string()], &[2024]);
//!     let summary = pipeline.run(&jobs).await;
//!     println!("{summary}");
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use bdc_core::*;

// Extraction, source, storage and analytics
pub use bdc_analytics as analytics;
pub use bdc_edgar::EdgarClient;
pub use bdc_extract as extract;
pub use bdc_store as store;
pub use bdc_store::{LoadStats, PortfolioDatabase};

/// Pipeline configuration.
pub mod config;
/// Sequential extract-and-load pipeline.
pub mod pipeline;

pub use config::{ExtractionStrategy, PipelineConfig};
pub use pipeline::{Job, JobOutcome, JobStatus, Pipeline, RunSummary, default_period_end};
