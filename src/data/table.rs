use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

// ---------------------------------------------------------------------------
// IngestError – why a CSV could not become a Table
// ---------------------------------------------------------------------------

/// Failure to turn raw input into a [`Table`].
///
/// Any of these leaves the currently displayed dashboard untouched.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("input is empty (no header row)")]
    Empty,
    #[error("quoted field opened on line {line} is never closed")]
    UnterminatedQuote { line: usize },
    #[error("duplicate column name '{0}' in header")]
    DuplicateColumn(String),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Table – the parsed CSV
// ---------------------------------------------------------------------------

/// Parsed CSV: header names plus rows of raw cell text.
///
/// Every row holds exactly `columns.len()` cells; a missing cell is `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Parse CSV text. The first record is the header.
    pub fn parse_str(input: &str) -> Result<Self, IngestError> {
        Self::parse_bytes(input.as_bytes())
    }

    /// Parse fully-read CSV bytes.
    ///
    /// Ragged rows are normalised: short rows are padded with empty cells
    /// and long rows are truncated to the header width.
    pub fn parse_bytes(input: &[u8]) -> Result<Self, IngestError> {
        if let Some(line) = unterminated_quote(input) {
            return Err(IngestError::UnterminatedQuote { line });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        if columns.is_empty() || columns.iter().all(|c| c.trim().is_empty()) {
            return Err(IngestError::Empty);
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen.insert(col.as_str()) {
                return Err(IngestError::DuplicateColumn(col.clone()));
            }
        }

        let width = columns.len();
        let mut rows = Vec::new();
        for (row_no, result) in reader.records().enumerate() {
            let record = result?;
            if record.len() != width {
                log::debug!(
                    "CSV row {row_no}: {} cells for {width} columns, normalising",
                    record.len()
                );
            }
            let mut row: Vec<String> = record.iter().take(width).map(|c| c.to_string()).collect();
            row.resize(width, String::new());
            rows.push(row);
        }

        Ok(Table { columns, rows })
    }

    /// Column names in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in input order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact, case-sensitive name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Raw cells of one column, top to bottom. `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &str> + Clone + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_str()))
    }
}

/// Read a CSV file from disk to completion, then parse it.
pub fn load_file(path: &Path) -> Result<Table, IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Table::parse_bytes(&bytes)
}

/// Line of a quoted field that runs to end of input, if any.
///
/// The `csv` reader silently ends such a field at EOF. Only a quote at the
/// start of a field opens one; a bare quote inside an unquoted field, like
/// `2" pipe`, is literal text.
fn unterminated_quote(input: &[u8]) -> Option<usize> {
    let input = input.strip_prefix(b"\xef\xbb\xbf").unwrap_or(input);
    let mut line = 1;
    let mut opened_on = 0;
    let mut in_quotes = false;
    let mut field_start = true;

    let mut i = 0;
    while i < input.len() {
        let b = input[i];
        if in_quotes {
            match b {
                b'"' if input.get(i + 1) == Some(&b'"') => i += 1,
                b'"' => in_quotes = false,
                b'\n' => line += 1,
                _ => {}
            }
        } else {
            match b {
                b'"' if field_start => {
                    in_quotes = true;
                    opened_on = line;
                    field_start = false;
                }
                b',' | b'\r' => field_start = true,
                b'\n' => {
                    line += 1;
                    field_start = true;
                }
                _ => field_start = false,
            }
        }
        i += 1;
    }

    in_quotes.then_some(opened_on)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EQUIPMENT: &str = include_str!("../../tests/fixtures/equipment.csv");
    const RAGGED: &str = include_str!("../../tests/fixtures/ragged.csv");

    #[test]
    fn parses_header_and_rows_in_order() {
        let table = Table::parse_str(EQUIPMENT).unwrap();
        assert_eq!(
            table.columns(),
            ["Equipment Name", "Type", "Flowrate", "Pressure", "Temperature"]
        );
        assert_eq!(table.row_count(), 8);
        assert_eq!(table.rows()[0][0], "Pump-1");
        assert_eq!(table.rows()[7][0], "Pump, Booster");
    }

    #[test]
    fn ragged_rows_are_padded_and_truncated() {
        let table = Table::parse_str(RAGGED).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows()[0], ["Pump", "1.5", ""]);
        assert_eq!(table.rows()[1], ["Valve", "2.5", "3.5"]);
        assert!(table.rows().iter().all(|r| r.len() == 3));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(Table::parse_str(""), Err(IngestError::Empty)));
    }

    #[test]
    fn header_only_is_an_empty_table() {
        let table = Table::parse_str("Type,Flowrate\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn duplicate_header_is_rejected() {
        let err = Table::parse_str("Type,Type\nA,B\n").unwrap_err();
        assert!(matches!(err, IngestError::DuplicateColumn(c) if c == "Type"));
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let bytes: &[u8] = b"Type\n\xff\xfe\n";
        assert!(matches!(Table::parse_bytes(bytes), Err(IngestError::Csv(_))));
    }

    #[test]
    fn leading_bom_is_stripped_from_first_header() {
        let table = Table::parse_str("\u{feff}Type,Flowrate\nA,1\n").unwrap();
        assert_eq!(table.columns()[0], "Type");
        let counts = crate::data::charts::category_counts(&table, "Type");
        assert_eq!(counts.iter().collect::<Vec<_>>(), [("A", 1)]);
    }

    #[test]
    fn unclosed_quote_is_rejected() {
        let err = Table::parse_str("a,\"b\nc\n").unwrap_err();
        assert!(matches!(err, IngestError::UnterminatedQuote { line: 1 }));

        let err = Table::parse_str("Type\nPump\n\"Valve\n").unwrap_err();
        assert!(matches!(err, IngestError::UnterminatedQuote { line: 3 }));
    }

    #[test]
    fn closed_and_escaped_quotes_are_accepted() {
        let table = Table::parse_str("Name,Size\n\"Line \"\"A\"\"\nmain\",2\" pipe\n").unwrap();
        assert_eq!(table.rows()[0], ["Line \"A\"\nmain", "2\" pipe"]);
    }

    #[test]
    fn column_lookup_is_case_sensitive() {
        let table = Table::parse_str(EQUIPMENT).unwrap();
        assert!(table.column("type").is_none());
        let types: Vec<&str> = table.column("Type").unwrap().collect();
        assert_eq!(types[..3], ["Pump", "Compressor", "Valve"]);
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/definitely/not/here.csv");
        let err = load_file(path).unwrap_err();
        assert!(err.to_string().contains("here.csv"));
    }
}
