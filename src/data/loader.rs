// src/data/loader.rs
use crate::data::ListingsTable;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

const UTF8_BOM: char = '\u{feff}';

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("export has no header row")]
    Empty,
}

/// Decode HTML entities, then turn en/em dashes into a plain hyphen.
pub fn normalize_cell(raw: &str) -> String {
    let decoded: Cow<'_, str> = html_escape::decode_html_entities(raw);
    decoded.replace(['\u{2013}', '\u{2014}'], "-")
}

/// Read and parse the cached export at `path`.
pub fn load_table(path: &Path) -> Result<ListingsTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let table = parse_table(BufReader::new(file))?;
    debug!(path = %path.display(), rows = table.len(), "export parsed");

    let missing = table.missing_columns();
    if !missing.is_empty() {
        warn!(path = %path.display(), ?missing, "export lacks dashboard columns");
    }
    Ok(table)
}

/// Header row plus data rows, every field kept as text. Invalid UTF-8 is
/// replaced rather than rejected; blank lines are skipped.
pub fn parse_table<R: Read>(reader: R) -> Result<ListingsTable, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::Empty);
    }
    if let Some(first) = headers.first_mut() {
        if first.starts_with(UTF8_BOM) {
            *first = first.trim_start_matches(UTF8_BOM).to_string();
        }
    }

    let mut rows = Vec::new();
    for record in rdr.byte_records() {
        let record = record?;
        let row: Vec<String> = record
            .iter()
            .map(|field| normalize_cell(&String::from_utf8_lossy(field)))
            .collect();
        rows.push(row);
    }

    Ok(ListingsTable::new(headers, rows))
}
