#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/bdc/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # Example
//!
//! ```no_run
//! use bdc_core::{FilerRef, FilingSource, FormType};
//! use bdc_edgar::EdgarClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EdgarClient::new("Research Project research@example.com")?;
//!
//!     let filing = client
//!         .find_filing(&FilerRef::new("ARCC"), FormType::TenK, Some(2024))
//!         .await?;
//!     let facts = client.facts(&filing).await?;
//!     println!("{} facts in {}", facts.len(), filing.accession_number);
//!
//!     Ok(())
//! }
//! ```

/// Rate-limited EDGAR client implementing `FilingSource`.
pub mod client;
/// XBRL instance parsing.
pub mod instance;
/// Submissions metadata and filing selection.
pub mod submissions;

// Re-export commonly used items at crate root
pub use client::EdgarClient;
pub use instance::{instance_file_name, parse_instance};
pub use submissions::{CompanySubmissions, fiscal_year_of};
