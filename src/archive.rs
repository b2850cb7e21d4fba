//! Unpacking of the portal's zipped CSV payload.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use log::debug;
use serde::Serialize;

use crate::error::{Error, Result};

/// Delimited text with its header row split off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// All values of the named column; short rows yield empty strings.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }

    /// Rows keyed by header name.
    pub fn to_records(&self) -> Vec<BTreeMap<&str, &str>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter().map(String::as_str))
                    .collect()
            })
            .collect()
    }
}

/// Read the first entry (central directory order) of a zip archive as text.
///
/// Any further entries are ignored.
pub fn extract_first_entry(data: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    if archive.len() == 0 {
        return Err(Error::EmptyArchive);
    }
    if archive.len() > 1 {
        debug!("archive has {} entries, using the first", archive.len());
    }

    let mut file = archive.by_index(0)?;
    debug!("extracting {} ({} bytes)", file.name(), file.size());
    // Declared sizes come from the server; let the reader grow the buffer.
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// Parse comma-delimited text with a header row. Rows may be ragged.
pub fn parse_table(text: &str) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Table { headers, rows })
}

/// Split on `\n` and drop empty lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
