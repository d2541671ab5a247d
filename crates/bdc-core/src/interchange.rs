//! CSV interchange format for investment records.
//!
//! One row per position with a header row naming the [`InvestmentRecord`]
//! fields. Absent values are written as empty cells. Readers accept files
//! with a subset of columns in any order; missing columns stay absent.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::InvestmentRecord;

/// Writes records as CSV with a header row.
///
/// Returns the number of rows written.
pub fn write_records<W: Write>(writer: W, records: &[InvestmentRecord]) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(records.len())
}

/// Reads records from CSV with a header row.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<InvestmentRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in rdr.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// Writes records to a CSV file, creating or truncating it.
pub fn write_records_to_path(path: impl AsRef<Path>, records: &[InvestmentRecord]) -> Result<usize> {
    let file = File::create(path)?;
    write_records(file, records)
}

/// Reads records from a CSV file.
pub fn read_records_from_path(path: impl AsRef<Path>) -> Result<Vec<InvestmentRecord>> {
    let file = File::open(path)?;
    read_records(file)
}
