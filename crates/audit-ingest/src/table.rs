use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{IngestError, Result};

/// How many physical rows to probe when hunting for the header row.
/// Vendor exports put titles, legal boilerplate, and blank spacer rows
/// above the real header, but never more than a handful.
const HEADER_PROBE_ROWS: usize = 8;

/// A raw tabular section as read from disk: normalized headers and the data
/// rows below them. No typing has happened yet.
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Section name (file stem), used in logs and provenance.
    pub name: String,
    /// 0-based physical index of the detected header row.
    pub header_row_index: usize,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Cell at (row, col), empty string when the row is short.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map_or("", String::as_str)
    }
}

/// Keywords that identify the header row of a particular source. The
/// pricebook and billing normalizers each know what their headers look like;
/// ingest just applies the hints.
#[derive(Debug, Clone)]
pub struct HeaderHints {
    /// A row containing any of these (case-insensitive substring match)
    /// is the header.
    pub keywords: Vec<String>,
    /// A header row must have at least this many non-empty cells.
    pub min_filled: usize,
}

impl HeaderHints {
    pub fn new(keywords: &[&str], min_filled: usize) -> Self {
        Self {
            keywords: keywords.iter().map(|kw| kw.to_uppercase()).collect(),
            min_filled,
        }
    }

    fn matches(&self, row: &[String]) -> bool {
        let filled = row.iter().filter(|cell| !cell.is_empty()).count();
        if filled < self.min_filled {
            return false;
        }
        row.iter().any(|cell| {
            let upper = cell.to_uppercase();
            self.keywords.iter().any(|kw| upper.contains(kw))
        })
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// True when the cell parses as a number after vendor formatting
/// (currency symbols, thousands separators) is stripped.
pub fn is_numeric_cell(cell: &str) -> bool {
    let cleaned: String = cell
        .chars()
        .filter(|c| !matches!(c, '$' | '£' | '€' | ',' | ' '))
        .collect();
    !cleaned.is_empty() && cleaned.parse::<f64>().is_ok()
}

fn filled_count(row: &[String]) -> usize {
    row.iter().filter(|cell| !cell.is_empty()).count()
}

/// Statistical fallback when no hint keyword matches: a header row is
/// mostly-filled, mostly non-numeric text sitting directly above a row that
/// looks like data (some numbers or some blanks).
fn looks_like_header(row: &[String]) -> bool {
    let filled = filled_count(row);
    if row.is_empty() || filled * 5 < row.len() * 4 {
        return false;
    }
    let numeric = row.iter().filter(|cell| is_numeric_cell(cell)).count();
    let alpha = row
        .iter()
        .filter(|cell| cell.chars().any(|ch| ch.is_ascii_alphabetic()))
        .count();
    numeric * 10 <= filled && alpha * 2 >= filled
}

fn looks_like_data(row: &[String]) -> bool {
    let numeric = row.iter().filter(|cell| is_numeric_cell(cell)).count();
    let empty = row.len() - filled_count(row);
    numeric * 5 >= row.len() || empty * 5 >= row.len()
}

fn detect_header_row(rows: &[Vec<String>], hints: &HeaderHints) -> Option<usize> {
    let probe = rows.len().min(HEADER_PROBE_ROWS);
    for idx in 0..probe {
        if hints.matches(&rows[idx]) {
            return Some(idx);
        }
    }
    for idx in 0..probe {
        let next_is_data = rows
            .get(idx + 1)
            .is_some_and(|next| looks_like_data(next));
        if looks_like_header(&rows[idx]) && next_is_data {
            return Some(idx);
        }
    }
    None
}

/// Read one CSV section: skip blank rows, find the header, pad ragged data
/// rows to header width.
pub fn read_raw_table(path: &Path, hints: &HeaderHints) -> Result<RawTable> {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string();

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        raw_rows.push(row);
    }

    if raw_rows.is_empty() {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    }

    let header_index =
        detect_header_row(&raw_rows, hints).ok_or_else(|| IngestError::NoHeaderRow {
            path: path.to_path_buf(),
            probed: raw_rows.len().min(HEADER_PROBE_ROWS),
        })?;
    let headers: Vec<String> = raw_rows[header_index]
        .iter()
        .map(|value| normalize_header(value))
        .collect();

    let mut rows = Vec::with_capacity(raw_rows.len() - header_index - 1);
    for record in raw_rows.iter().skip(header_index + 1) {
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            row.push(record.get(idx).cloned().unwrap_or_default());
        }
        rows.push(row);
    }

    debug!(
        section = %name,
        header_row = header_index,
        columns = headers.len(),
        rows = rows.len(),
        "read raw table"
    );

    Ok(RawTable {
        name,
        header_row_index: header_index,
        headers,
        rows,
    })
}

/// Per-column shape of a raw table, used to sanity-check detected columns
/// (a tier-band column that is mostly text is a detection mistake).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub filled_ratio: f64,
    pub numeric_ratio: f64,
}

pub fn column_stats(table: &RawTable) -> Vec<ColumnStats> {
    let row_count = table.rows.len();
    (0..table.headers.len())
        .map(|col| {
            let mut filled = 0usize;
            let mut numeric = 0usize;
            for row in &table.rows {
                let cell = row.get(col).map_or("", String::as_str);
                if cell.is_empty() {
                    continue;
                }
                filled += 1;
                if is_numeric_cell(cell) {
                    numeric += 1;
                }
            }
            ColumnStats {
                filled_ratio: if row_count == 0 {
                    0.0
                } else {
                    filled as f64 / row_count as f64
                },
                numeric_ratio: if filled == 0 {
                    0.0
                } else {
                    numeric as f64 / filled as f64
                },
            }
        })
        .collect()
}
