//! Constituent CSV parsing.

use crate::error::{DataError, Result};
use csv::{ReaderBuilder, Trim};

/// Column holding the ticker of each constituent.
pub const SYMBOL_COLUMN: &str = "Symbol";

/// Extract the [`SYMBOL_COLUMN`] of a constituent file, in row order.
pub fn parse_symbols(payload: &str) -> Result<Vec<String>> {
    parse_column(payload, SYMBOL_COLUMN)
}

/// Extract one column of a CSV payload, in row order.
///
/// Header names are matched after trimming surrounding whitespace. Cell
/// values are returned as published; blank cells are skipped. Rows with a
/// different field count than the header are a parse error.
pub fn parse_column(payload: &str, column: &str) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .from_reader(payload.as_bytes());

    let position = reader
        .headers()?
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| DataError::MissingColumn {
            column: column.to_string(),
        })?;

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record?;
        match record.get(position) {
            Some(value) if !value.trim().is_empty() => values.push(value.to_string()),
            _ => continue,
        }
    }

    Ok(values)
}
