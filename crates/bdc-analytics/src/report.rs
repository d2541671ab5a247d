//! CSV report writers.

use bdc_core::Result;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::concentration::ConcentrationReport;
use crate::matrix::{CommonHolding, FilerOverlap, OverlapMatrix};

#[derive(Serialize)]
struct CommonHoldingRow<'a> {
    company: &'a str,
    holder_count: usize,
    holders: String,
}

#[derive(Serialize)]
struct ConcentrationRow<'a> {
    filer: &'a str,
    hhi: String,
    level: &'static str,
    industry_count: usize,
    company_count: usize,
    top3_share: String,
    largest_industry: &'a str,
    largest_share: String,
}

/// Writes common holdings, holders joined with `", "`.
pub fn write_common_holdings<W: Write>(writer: W, holdings: &[CommonHolding]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for h in holdings {
        wtr.serialize(CommonHoldingRow {
            company: &h.company,
            holder_count: h.holder_count,
            holders: h.holders.join(", "),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the overlap matrix with a leading `filer` column.
pub fn write_overlap_matrix<W: Write>(writer: W, matrix: &OverlapMatrix) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["filer".to_string()];
    header.extend(matrix.filers().iter().cloned());
    wtr.write_record(&header)?;

    for (filer, counts) in matrix.filers().iter().zip(matrix.counts()) {
        let mut record = vec![filer.clone()];
        record.extend(counts.iter().map(ToString::to_string));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the per-filer overlap summary.
pub fn write_overlap_summary<W: Write>(writer: W, summary: &[FilerOverlap]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in summary {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes concentration reports; HHI rounded to a whole number, shares to one decimal.
pub fn write_concentration<W: Write>(writer: W, reports: &[ConcentrationReport]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in reports {
        wtr.serialize(ConcentrationRow {
            filer: &r.filer,
            hhi: format!("{:.0}", r.hhi),
            level: r.level.as_str(),
            industry_count: r.industry_count,
            company_count: r.company_count,
            top3_share: format!("{:.1}", r.top3_share),
            largest_industry: &r.largest_industry,
            largest_share: format!("{:.1}", r.largest_share),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Creates `path` (and its parent directories) and runs `write` against it.
pub fn write_to_path<F>(path: impl AsRef<Path>, write: F) -> Result<()>
where
    F: FnOnce(File) -> Result<()>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write(File::create(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concentration::concentration_reports;
    use crate::matrix::{HoldingsMatrix, MatrixValue};
    use crate::positions::PositionRow;

    fn matrix() -> HoldingsMatrix {
        HoldingsMatrix::build(
            &[
                PositionRow::new("A", "Acme Inc", Some(10.0)),
                PositionRow::new("A", "Beta LLC", Some(4.0)),
                PositionRow::new("B", "Acme Corp", Some(5.0)),
            ],
            MatrixValue::Presence,
        )
    }

    fn written<F: FnOnce(&mut Vec<u8>) -> Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_common_holdings_csv() {
        let out = written(|b| write_common_holdings(b, &matrix().common_holdings(2)));
        assert_eq!(out, "company,holder_count,holders\nacme,2,\"A, B\"\n");
    }

    #[test]
    fn test_overlap_matrix_csv() {
        let out = written(|b| write_overlap_matrix(b, &matrix().overlap_matrix()));
        assert_eq!(out, "filer,A,B\nA,2,1\nB,1,1\n");
    }

    #[test]
    fn test_overlap_summary_csv() {
        let out = written(|b| write_overlap_summary(b, &matrix().overlap_summary()));
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("filer,total_companies,shared_companies,pct_shared"));
        assert_eq!(lines.next(), Some("A,2,1,50.0"));
        assert_eq!(lines.next(), Some("B,1,1,100.0"));
    }

    #[test]
    fn test_concentration_csv_to_path() {
        let reports = concentration_reports(&[
            PositionRow::new("A", "One", Some(50.0)).with_industry("Software"),
            PositionRow::new("A", "Two", Some(50.0)).with_industry("Energy"),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("concentration.csv");
        write_to_path(&path, |f| write_concentration(f, &reports)).unwrap();

        let out = std::fs::read_to_string(&path).unwrap();
        assert!(out.starts_with("filer,hhi,level,"));
        assert!(out.contains("A,5000,High,2,2,100.0,"));
    }
}
