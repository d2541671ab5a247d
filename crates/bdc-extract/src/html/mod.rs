//! HTML Schedule of Investments extraction.
//!
//! Fallback for filings whose holdings are not tagged per position. The raw
//! document is triaged for candidate tables, each table is parsed into a cell
//! grid, and a carry-forward row walk turns the grid into records.
//!
//! Per-table failures are logged and skipped; a document without qualifying
//! tables yields an empty result with a warning.

pub mod amount;
pub mod scan;
pub mod table;
pub mod walk;

use bdc_core::{InvestmentRecord, RecordSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::classify::classify_asset_class;

pub use amount::{
    MILLIONS_THRESHOLD, ScaleDetection, ValueScale, detect_scale, parse_dollar_amount,
    parse_percentage,
};
pub use scan::{CandidateTable, find_candidate_tables};
pub use table::parse_table;
pub use walk::{ColumnRoles, ColumnSpan, HtmlHolding, TableWalk, WalkState, walk_table};

/// Thresholds for locating and reading holdings tables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableScanConfig {
    /// Heading marking the start of the schedule.
    pub heading: String,
    /// Tables at or below this serialized size are ignored.
    pub min_table_bytes: usize,
    /// Tables need more than this many legal-entity suffix mentions.
    pub min_entity_mentions: usize,
    /// Maximum number of candidate tables per document.
    pub max_candidates: usize,
    /// Bytes searched after the heading.
    pub search_window_bytes: usize,
    /// Rows searched for the header row.
    pub header_rows: usize,
    /// Data rows sampled for scale detection.
    pub scale_sample_rows: usize,
}

impl Default for TableScanConfig {
    fn default() -> Self {
        Self {
            heading: "schedule of investments".to_string(),
            min_table_bytes: 50_000,
            min_entity_mentions: 5,
            max_candidates: 30,
            search_window_bytes: 10_000_000,
            header_rows: 3,
            scale_sample_rows: 50,
        }
    }
}

/// Result of extracting records from a raw document.
#[derive(Clone, Debug, Default)]
pub struct HtmlExtraction {
    /// Records in document order.
    pub records: Vec<InvestmentRecord>,
    /// Candidate tables found.
    pub tables_scanned: usize,
    /// Candidate tables that yielded a header and were walked.
    pub tables_parsed: usize,
    /// Non-fatal problems encountered.
    pub warnings: Vec<String>,
}

impl HtmlExtraction {
    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }
}

fn to_record(holding: HtmlHolding, position: usize) -> InvestmentRecord {
    let mut record = InvestmentRecord::new(
        format!("{} {}", holding.company_name, position),
        holding.company_name,
    );
    record.asset_class = classify_asset_class(
        holding.investment_type.as_deref(),
        holding.principal.is_some(),
        false,
    );
    record.business_description = holding.business_description;
    record.investment_type = holding.investment_type;
    record.principal = holding.principal;
    record.cost = holding.cost;
    record.fair_value = holding.fair_value;
    record.pct_net_assets = holding.pct_net_assets;
    record.source = RecordSource::Html;
    record
}

/// Extracts holdings records from a raw filing document.
///
/// Record identifiers are synthesized as `"<company> <n>"`, `n` counting
/// that company's rows across the whole document.
#[must_use]
pub fn extract_from_html(document: &str, config: &TableScanConfig) -> HtmlExtraction {
    let candidates = find_candidate_tables(document, config);
    let mut extraction = HtmlExtraction {
        tables_scanned: candidates.len(),
        ..Default::default()
    };

    if candidates.is_empty() {
        extraction.warn(format!(
            "No qualifying holdings tables in document ({} bytes)",
            document.len()
        ));
        return extraction;
    }
    debug!("Found {} candidate tables", candidates.len());

    let mut positions: HashMap<String, usize> = HashMap::new();

    for (index, candidate) in candidates.iter().enumerate() {
        let walked = parse_table(candidate.slice(document)).and_then(|rows| {
            walk_table(&rows, config.header_rows, config.scale_sample_rows)
        });
        let walk = match walked {
            Ok(walk) => walk,
            Err(e) => {
                debug!("Skipping table {} at byte {}: {}", index, candidate.start, e);
                continue;
            }
        };
        extraction.tables_parsed += 1;

        if walk.scale.mixed {
            extraction.warn(format!(
                "Table {} mixes amounts on both sides of {}; assuming {:?} from median {:?}",
                index, MILLIONS_THRESHOLD, walk.scale.scale, walk.scale.median
            ));
        }

        for holding in walk.holdings {
            let n = positions.entry(holding.company_name.clone()).or_insert(0);
            *n += 1;
            extraction.records.push(to_record(holding, *n));
        }
    }

    if extraction.tables_parsed == 0 {
        extraction.warn(format!(
            "None of {} candidate tables had a recognizable header row",
            extraction.tables_scanned
        ));
    } else {
        info!(
            "Extracted {} holdings from {} of {} tables",
            extraction.records.len(),
            extraction.tables_parsed,
            extraction.tables_scanned
        );
    }

    extraction
}
