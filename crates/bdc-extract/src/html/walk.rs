//! Header detection, column roles and the carry-forward row walk.
//!
//! Schedules come in two layouts: one row per holding, or a company row
//! followed by several detail rows. Both are handled by carrying the most
//! recent company name forward until another qualifying name appears.

use bdc_core::{BdcError, Result, clean_company_name};

use super::amount::{ScaleDetection, detect_scale, parse_dollar_amount, parse_percentage};

const SKIP_PATTERNS: [&str; 4] = ["total", "subtotal", "investments", "affiliate"];
const MIN_NAME_LEN: usize = 3;

/// Contiguous columns covered by one header cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSpan {
    /// First column index.
    pub start: usize,
    /// Number of columns.
    pub len: usize,
}

impl ColumnSpan {
    fn cells<'a>(&self, row: &'a [String]) -> impl Iterator<Item = &'a str> {
        row.iter()
            .skip(self.start)
            .take(self.len)
            .map(String::as_str)
    }

    fn text(&self, row: &[String]) -> Option<String> {
        self.cells(row)
            .map(str::trim)
            .find(|c| !c.is_empty())
            .map(str::to_string)
    }

    fn amount(&self, row: &[String]) -> Option<f64> {
        self.cells(row).find_map(parse_dollar_amount)
    }

    fn percentage(&self, row: &[String]) -> Option<f64> {
        self.cells(row).find_map(parse_percentage)
    }
}

/// Column assignment for each recognized header role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColumnRoles {
    /// Portfolio company name.
    pub company: Option<ColumnSpan>,
    /// Business description.
    pub description: Option<ColumnSpan>,
    /// Investment type.
    pub investment_type: Option<ColumnSpan>,
    /// Principal amount.
    pub principal: Option<ColumnSpan>,
    /// Amortized cost.
    pub cost: Option<ColumnSpan>,
    /// Fair value.
    pub fair_value: Option<ColumnSpan>,
    /// Percentage of net assets.
    pub pct_net_assets: Option<ColumnSpan>,
}

impl ColumnRoles {
    /// Assigns roles from a header row, left to right.
    ///
    /// Each header cell is tested against the roles in a fixed order and
    /// takes the first role it matches; only the first column for a role is
    /// kept. Repeated cells (from column spans) extend that column's span.
    #[must_use]
    pub fn from_header(header: &[String]) -> Self {
        let mut roles = Self::default();
        let mut i = 0;

        while i < header.len() {
            let text = header[i].to_lowercase();
            let len = header[i..].iter().take_while(|h| **h == header[i]).count();
            let span = Some(ColumnSpan { start: i, len });
            i += len;

            if text.contains("company") {
                roles.company = roles.company.or(span);
            } else if text.contains("business") || text.contains("description") {
                roles.description = roles.description.or(span);
            } else if text.contains("investment") {
                roles.investment_type = roles.investment_type.or(span);
            } else if text.contains("principal") {
                roles.principal = roles.principal.or(span);
            } else if text.contains("cost") {
                roles.cost = roles.cost.or(span);
            } else if text.contains("fair value") {
                roles.fair_value = roles.fair_value.or(span);
            } else if text.contains("net assets") {
                roles.pct_net_assets = roles.pct_net_assets.or(span);
            }
        }

        roles
    }

    fn amount_spans(&self) -> impl Iterator<Item = ColumnSpan> {
        [self.fair_value, self.cost, self.principal].into_iter().flatten()
    }
}

/// Index of the header row among the first `max_rows` rows.
///
/// The header is the first row whose text mentions both "company" and
/// "fair value".
#[must_use]
pub fn find_header_row(rows: &[Vec<String>], max_rows: usize) -> Option<usize> {
    rows.iter().take(max_rows).position(|row| {
        let text = row.join(" ").to_lowercase();
        text.contains("company") && text.contains("fair value")
    })
}

/// Carry-forward state of the row walk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum WalkState {
    /// No company row seen yet.
    #[default]
    NoCompany,
    /// The most recent qualifying company row.
    HasCompany {
        /// Cleaned company name.
        name: String,
        /// Description from the same row, if any.
        description: Option<String>,
    },
}

fn is_skip_row(name: &str) -> bool {
    let lowered = name.to_lowercase();
    SKIP_PATTERNS.iter().any(|p| lowered.contains(p))
}

impl WalkState {
    /// Transitions on a row's company cell.
    ///
    /// A non-empty name of at least three characters that is not a subtotal
    /// or section label replaces the current company and its description.
    #[must_use]
    pub fn advance(self, row: &[String], roles: &ColumnRoles) -> Self {
        let Some(raw) = roles.company.and_then(|span| span.text(row)) else {
            return self;
        };
        if raw.chars().count() < MIN_NAME_LEN || is_skip_row(&raw) {
            return self;
        }

        let description = roles
            .description
            .and_then(|span| span.text(row))
            .filter(|d| d.chars().count() >= MIN_NAME_LEN);

        Self::HasCompany {
            name: clean_company_name(&raw),
            description,
        }
    }
}

/// One holding row, amounts already converted to dollars.
#[derive(Clone, Debug, PartialEq)]
pub struct HtmlHolding {
    /// Carried-forward company name.
    pub company_name: String,
    /// Carried-forward business description.
    pub business_description: Option<String>,
    /// Investment type text from this row.
    pub investment_type: Option<String>,
    /// Principal in dollars.
    pub principal: Option<f64>,
    /// Cost in dollars.
    pub cost: Option<f64>,
    /// Fair value in dollars.
    pub fair_value: Option<f64>,
    /// Percentage of net assets, as disclosed.
    pub pct_net_assets: Option<f64>,
}

/// Result of walking one parsed table.
#[derive(Clone, Debug, PartialEq)]
pub struct TableWalk {
    /// Holdings in row order.
    pub holdings: Vec<HtmlHolding>,
    /// Scale applied to the table's amounts.
    pub scale: ScaleDetection,
}

/// Walks a parsed table and emits one holding per qualifying row.
///
/// Fails when no header row is found within `header_rows` rows or the
/// header has no company column.
pub fn walk_table(rows: &[Vec<String>], header_rows: usize, sample_rows: usize) -> Result<TableWalk> {
    let header_idx = find_header_row(rows, header_rows).ok_or_else(|| {
        BdcError::Parse(format!("No header row in the first {header_rows} rows"))
    })?;
    let roles = ColumnRoles::from_header(&rows[header_idx]);
    if roles.company.is_none() {
        return Err(BdcError::Parse("Header row has no company column".to_string()));
    }

    let data = &rows[header_idx + 1..];
    let samples: Vec<f64> = data
        .iter()
        .take(sample_rows)
        .flat_map(|row| roles.amount_spans().filter_map(|span| span.amount(row)))
        .collect();
    let scale = detect_scale(&samples);
    let multiplier = scale.scale.multiplier();
    let scaled = |span: Option<ColumnSpan>, row: &[String]| {
        span.and_then(|s| s.amount(row)).map(|v| v * multiplier)
    };

    let (_, holdings) = data.iter().fold(
        (WalkState::NoCompany, Vec::new()),
        |(state, mut holdings), row| {
            let state = state.advance(row, &roles);

            let principal = scaled(roles.principal, row);
            let cost = scaled(roles.cost, row);
            let fair_value = scaled(roles.fair_value, row);
            let has_values = principal.is_some() || cost.is_some() || fair_value.is_some();

            if let WalkState::HasCompany { name, description } = &state
                && has_values
            {
                holdings.push(HtmlHolding {
                    company_name: name.clone(),
                    business_description: description.clone(),
                    investment_type: roles.investment_type.and_then(|s| s.text(row)),
                    principal,
                    cost,
                    fair_value,
                    pct_net_assets: roles.pct_net_assets.and_then(|s| s.percentage(row)),
                });
            }
            (state, holdings)
        },
    );

    Ok(TableWalk { holdings, scale })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::amount::ValueScale;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_header_detection_limited_to_first_rows() {
        let rows = vec![
            row(&["Schedule"]),
            row(&["(in thousands)"]),
            row(&["Portfolio Company", "Fair Value"]),
        ];
        assert_eq!(find_header_row(&rows, 3), Some(2));
        assert_eq!(find_header_row(&rows, 2), None);
    }

    #[test]
    fn test_first_column_wins_and_spans() {
        let header = row(&[
            "Portfolio Company",
            "Business Description",
            "Type of Investment",
            "Principal",
            "Amortized Cost",
            "Fair Value",
            "Fair Value",
            "% of Net Assets",
            "Fair Value",
        ]);
        let roles = ColumnRoles::from_header(&header);
        assert_eq!(roles.company, Some(ColumnSpan { start: 0, len: 1 }));
        assert_eq!(roles.description.map(|s| s.start), Some(1));
        assert_eq!(roles.investment_type.map(|s| s.start), Some(2));
        assert_eq!(roles.principal.map(|s| s.start), Some(3));
        assert_eq!(roles.cost.map(|s| s.start), Some(4));
        assert_eq!(roles.fair_value, Some(ColumnSpan { start: 5, len: 2 }));
        assert_eq!(roles.pct_net_assets.map(|s| s.start), Some(7));
    }

    #[test]
    fn test_state_transitions() {
        let roles = ColumnRoles::from_header(&row(&["Company", "Business Description", "Fair Value"]));
        let state = WalkState::NoCompany.advance(&row(&["Acme Inc. (3)", "Software", "1"]), &roles);
        assert_eq!(
            state,
            WalkState::HasCompany {
                name: "Acme Inc.".to_string(),
                description: Some("Software".to_string()),
            }
        );

        let kept = state.clone().advance(&row(&["Total Investments", "", "5"]), &roles);
        assert_eq!(kept, state);
        let kept = state.clone().advance(&row(&["", "", "5"]), &roles);
        assert_eq!(kept, state);
        let kept = state.clone().advance(&row(&["AB", "", "5"]), &roles);
        assert_eq!(kept, state);
    }

    #[test]
    fn test_walk_company_then_detail_rows() {
        let rows = vec![
            row(&["Company", "Investment", "Principal", "Cost", "Fair Value"]),
            row(&["Acme LLC", "", "", "", ""]),
            row(&["", "First Lien Loan", "100", "99", "98"]),
            row(&["", "Common Stock", "", "10", "12"]),
            row(&["Subtotal Acme", "", "", "109", "110"]),
            row(&["Beta Inc.", "Term Loan", "200", "(5)", "190"]),
        ];
        let walk = walk_table(&rows, 3, 50).unwrap();
        assert_eq!(walk.scale.scale, ValueScale::Millions);
        assert_eq!(walk.holdings.len(), 4);

        let first = &walk.holdings[0];
        assert_eq!(first.company_name, "Acme LLC");
        assert_eq!(first.investment_type.as_deref(), Some("First Lien Loan"));
        assert_eq!(first.fair_value, Some(98_000_000.0));

        // Subtotal rows keep the current company.
        assert_eq!(walk.holdings[2].company_name, "Acme LLC");
        assert_eq!(walk.holdings[3].company_name, "Beta Inc.");
        assert_eq!(walk.holdings[3].cost, Some(-5_000_000.0));
    }

    #[test]
    fn test_rows_before_first_company_are_dropped() {
        let rows = vec![
            row(&["Company", "Fair Value"]),
            row(&["", "5000"]),
            row(&["Acme Corp.", "4000"]),
        ];
        let walk = walk_table(&rows, 3, 50).unwrap();
        assert_eq!(walk.holdings.len(), 1);
        assert_eq!(walk.holdings[0].fair_value, Some(4_000_000.0));
    }

    #[test]
    fn test_reject_table_without_header() {
        let rows = vec![row(&["Total", "1"]), row(&["Net assets", "2"])];
        assert!(walk_table(&rows, 3, 50).is_err());
    }
}
