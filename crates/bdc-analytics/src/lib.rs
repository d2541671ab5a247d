#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/bdc/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! ```
//! use bdc_analytics::{HoldingsMatrix, MatrixValue, PositionRow};
//!
//! let rows = vec![
//!     PositionRow::new("A", "Acme Inc", Some(10.0)),
//!     PositionRow::new("A", "Beta LLC", Some(4.0)),
//!     PositionRow::new("B", "Acme Corp", Some(5.0)),
//!     PositionRow::new("B", "Gamma Co", Some(6.0)),
//! ];
//! let matrix = HoldingsMatrix::build(&rows, MatrixValue::Presence);
//! let common = matrix.common_holdings(2);
//! assert_eq!(common.len(), 1);
//! assert_eq!(common[0].company, "acme");
//! assert_eq!(common[0].holders, vec!["A", "B"]);
//! ```

/// Herfindahl-Hirschman industry concentration.
pub mod concentration;
/// Holdings and overlap matrices.
pub mod matrix;
/// Analytics input rows.
pub mod positions;
/// CSV report writers.
pub mod report;

// Re-export commonly used items at crate root
pub use concentration::{ConcentrationLevel, ConcentrationReport, concentration_reports, hhi};
pub use matrix::{CommonHolding, FilerOverlap, HoldingsMatrix, MatrixValue, OverlapMatrix};
pub use positions::{PositionRow, rows_from_records};
pub use report::{
    write_common_holdings, write_concentration, write_overlap_matrix, write_overlap_summary,
    write_to_path,
};
