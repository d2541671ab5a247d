#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/bdc/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Investment assembly from tagged facts.
pub mod assemble;
/// Asset-class, affiliation and industry classifiers.
pub mod classify;
/// Canonical field dictionary.
pub mod concepts;
/// Fact normalization.
pub mod facts;
/// HTML table extraction.
pub mod html;
/// Affiliated roll-forward extraction.
pub mod rollforward;
/// Portfolio summary statistics.
pub mod summary;

// Re-export commonly used items at crate root
pub use assemble::{
    AssembledInvestment, INVESTMENT_IDENTIFIER_AXIS, ParsedIdentifier, XbrlExtraction,
    assemble_investments, extract_from_facts, parse_investment_identifier, resolve_investment_id,
};
pub use classify::{
    OTHER_SECTOR, UNKNOWN_SECTOR, classify_affiliation, classify_asset_class, classify_industry,
    industry_code,
};
pub use concepts::{ConceptCategory, Field, ValueKind};
pub use facts::{FactValue, NormalizedFact, normalize_concept, normalize_fact, parse_enum_uri};
pub use html::{HtmlExtraction, TableScanConfig, extract_from_html};
pub use rollforward::{
    AffiliatedRollforward, AggregateFact, RollforwardEntry, extract_affiliated_rollforward,
};
pub use summary::{PortfolioSummary, SummaryRow};
