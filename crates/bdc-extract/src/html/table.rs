//! Minimal HTML table parsing.
//!
//! Produces a grid of cell texts. Cells spanning several columns are
//! repeated across every spanned column so column positions line up
//! between header and data rows.

use bdc_core::{BdcError, Result};
use regex::Regex;
use std::sync::LazyLock;

static ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)(?:</tr\s*>|$)").expect("static regex"));

static CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<t([dh])\b([^>]*)>(.*?)</t[dh]\s*>").expect("static regex")
});

static COLSPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)colspan\s*=\s*["']?\s*(\d+)"#).expect("static regex")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("static regex"));

static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("static regex"));

const MAX_COLSPAN: usize = 64;

/// Decodes the character entities common in filing documents.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    let named = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&rsquo;", "\u{2019}")
        .replace("&lsquo;", "\u{2018}")
        .replace("&mdash;", "\u{2014}")
        .replace("&ndash;", "\u{2013}");

    let numeric = NUMERIC_ENTITY.replace_all(&named, |caps: &regex::Captures<'_>| {
        let code = &caps[1];
        let parsed = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse().ok(),
        };
        parsed
            .and_then(char::from_u32)
            .map_or_else(|| caps[0].to_string(), |c| c.to_string())
    });

    // Last, so "&amp;nbsp;" decodes to "&nbsp;" and not a space.
    numeric.replace("&amp;", "&")
}

/// Extracts the visible text of a cell: tags removed, entities decoded,
/// whitespace collapsed.
#[must_use]
pub fn cell_text(inner_html: &str) -> String {
    let stripped = TAG.replace_all(inner_html, " ");
    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn colspan(attributes: &str) -> usize {
    COLSPAN
        .captures(attributes)
        .and_then(|caps| caps[1].parse::<usize>().ok())
        .map_or(1, |n| n.clamp(1, MAX_COLSPAN))
}

/// Parses a `<table>` block into rows of cell texts.
///
/// Rows without any cell are dropped. Fails when the block contains no rows.
pub fn parse_table(table_html: &str) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    for row in ROW.captures_iter(table_html) {
        let mut cells = Vec::new();
        for cell in CELL.captures_iter(&row[1]) {
            let text = cell_text(&cell[3]);
            let span = colspan(&cell[2]);
            cells.extend(std::iter::repeat_n(text, span));
        }
        if !cells.is_empty() {
            rows.push(cells);
        }
    }

    if rows.is_empty() {
        return Err(BdcError::Parse("Table contains no rows".to_string()));
    }
    Ok(rows)
}
