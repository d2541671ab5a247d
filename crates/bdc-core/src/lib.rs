#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/bdc/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and contracts for BDC holdings extraction.
//!
//! This crate provides the foundational abstractions shared by every stage:
//!
//! - [`InvestmentRecord`](types::InvestmentRecord) - Canonical per-position record
//! - [`FilingSource`](source::FilingSource) - Contract for locating filings and reading their contents
//! - [`FactSet`](filing::FactSet) - Tagged facts and contexts of one filing
//! - [`normalize_company_name`](names::normalize_company_name) - Identity key for portfolio companies
//! - [`interchange`] - CSV interchange format

/// Error types for extraction, storage and analytics.
pub mod error;
/// Registry of well-known BDC filers.
pub mod filers;
/// Filing descriptors, tagged facts and contexts.
pub mod filing;
/// CSV reading and writing of investment records.
pub mod interchange;
/// Company name normalization.
pub mod names;
/// Filing-source contract.
pub mod source;
/// Core data types (InvestmentRecord, AssetClass, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{BdcError, Result};
pub use filers::{KNOWN_FILERS, KnownFiler, lookup_filer, lookup_filer_by_cik};
pub use filing::{Dimension, FactSet, FilingDescriptor, FormType, TaggedFact, XbrlContext};
pub use interchange::{read_records, read_records_from_path, write_records, write_records_to_path};
pub use names::{clean_company_name, normalize_company_name};
pub use source::{FilerRef, FilingSource};
pub use types::{AffiliationCategory, AssetClass, InvestmentRecord, RecordSource};
