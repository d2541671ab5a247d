//! Candidate table discovery.

use super::TableScanConfig;

const ENTITY_SUFFIXES: [&str; 3] = ["LLC", "Inc.", "Corp."];
const CLOSE_TAG: &str = "</table>";

/// A `<table>` block that looks like part of a holdings schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CandidateTable {
    /// Byte offset of the opening tag.
    pub start: usize,
    /// Byte offset just past the closing tag.
    pub end: usize,
    /// Count of legal-entity suffix occurrences inside the block.
    pub entity_mentions: usize,
}

impl CandidateTable {
    /// Serialized size of the block in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.end - self.start
    }

    /// The block's HTML.
    #[must_use]
    pub fn slice<'a>(&self, document: &'a str) -> &'a str {
        &document[self.start..self.end]
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Byte offset of the schedule heading, or 0 when the heading is absent.
#[must_use]
pub fn schedule_start(lowered: &str, heading: &str) -> usize {
    lowered.find(&heading.to_ascii_lowercase()).unwrap_or(0)
}

/// Locates holdings-table candidates in a raw document.
///
/// The search begins at the schedule heading (document start if missing) and
/// covers at most `search_window_bytes`. A table qualifies when it exceeds
/// `min_table_bytes`, contains more than `min_entity_mentions` legal-entity
/// suffixes and mentions "fair value" or "principal".
#[must_use]
pub fn find_candidate_tables(document: &str, config: &TableScanConfig) -> Vec<CandidateTable> {
    // ASCII lowering keeps byte offsets aligned with the original text.
    let lowered = document.to_ascii_lowercase();
    let start = schedule_start(&lowered, &config.heading);
    let end = floor_char_boundary(document, start.saturating_add(config.search_window_bytes));

    let mut candidates = Vec::new();
    let mut cursor = start;

    while cursor < end && candidates.len() < config.max_candidates {
        let Some(open) = lowered[cursor..end].find("<table").map(|i| cursor + i) else {
            break;
        };
        let close = match lowered[open..end].find(CLOSE_TAG) {
            Some(i) => open + i + CLOSE_TAG.len(),
            None => end,
        };
        cursor = close;

        let block = &document[open..close];
        if block.len() <= config.min_table_bytes {
            continue;
        }
        let mentions: usize = ENTITY_SUFFIXES.iter().map(|s| block.matches(s).count()).sum();
        if mentions <= config.min_entity_mentions {
            continue;
        }
        let lowered_block = &lowered[open..close];
        if !lowered_block.contains("fair value") && !lowered_block.contains("principal") {
            continue;
        }

        candidates.push(CandidateTable {
            start: open,
            end: close,
            entity_mentions: mentions,
        });
    }

    candidates
}
