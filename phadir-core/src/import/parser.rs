//! Delimited text parsing.
//!
//! Files are comma- or tab-separated with optional double-quoted fields.
//! Inside quotes a doubled quote is a literal quote. Records never span
//! lines: the text is split on newlines first and each line is tokenized
//! on its own.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ImportSettings;
use crate::error::FileValidationError;

const QUOTE: char = '"';

/// Field separator of a delimited file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// `,`
    Comma,
    /// `\t`
    Tab,
}

impl Delimiter {
    /// Returns the separator character
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Tab => '\t',
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comma => f.write_str("comma"),
            Self::Tab => f.write_str("tab"),
        }
    }
}

/// Picks the delimiter for a file from its header line.
///
/// Only separators outside quoted spans are counted, so a quoted address such
/// as `"100 Main St, Apt 4"` does not tip the balance. Tab wins only with a
/// strictly greater count.
#[must_use]
pub fn detect_delimiter(header_line: &str) -> Delimiter {
    let mut in_quotes = false;
    let mut tabs = 0usize;
    let mut commas = 0usize;

    for c in header_line.chars() {
        match c {
            QUOTE => in_quotes = !in_quotes,
            '\t' if !in_quotes => tabs += 1,
            ',' if !in_quotes => commas += 1,
            _ => {}
        }
    }

    if tabs > commas {
        Delimiter::Tab
    } else {
        Delimiter::Comma
    }
}

/// Splits one line into trimmed fields.
///
/// A quote toggles quoted mode; a doubled quote inside quoted mode emits one
/// literal quote. The delimiter only ends a field outside quotes.
#[must_use]
pub fn tokenize_line(line: &str, delimiter: Delimiter) -> Vec<String> {
    let separator = delimiter.as_char();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == QUOTE {
            if in_quotes && chars.peek() == Some(&QUOTE) {
                current.push(QUOTE);
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if c == separator && !in_quotes {
            fields.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Returns the cleaned header names of a file without parsing its rows.
///
/// Used to drive mapping suggestions before committing to a full parse.
#[must_use]
pub fn extract_headers(text: &str, max_header_len: usize) -> Vec<String> {
    let Some(header_line) = non_blank_lines(text).next() else {
        return Vec::new();
    };
    let delimiter = detect_delimiter(header_line);
    clean_headers(tokenize_line(header_line, delimiter), max_header_len)
}

/// Normalizes a raw cell value.
///
/// Caps the value at `max_len` characters, then maps blank, `nan` and `null`
/// (any case) to `None`.
#[must_use]
pub fn normalize_cell(raw: &str, max_len: usize) -> Option<String> {
    let capped = truncate_chars(raw, max_len);
    let trimmed = capped.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("null")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// One data row aligned to the header positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    number: usize,
    cells: Vec<Option<String>>,
}

impl RawRow {
    /// Creates a row. `number` is the 1-based data row position.
    #[must_use]
    pub const fn new(number: usize, cells: Vec<Option<String>>) -> Self {
        Self { number, cells }
    }

    /// Returns the 1-based data row position (header excluded)
    #[must_use]
    pub const fn number(&self) -> usize {
        self.number
    }

    /// Returns the cell at a column position
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    /// Returns all cells
    #[must_use]
    pub fn cells(&self) -> &[Option<String>] {
        &self.cells
    }

    /// Returns the number of cells (always the header count for parsed rows)
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the row has no cells
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Headers and rows of a parsed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    /// Detected separator
    pub delimiter: Delimiter,
    /// Cleaned header names, one per column
    pub headers: Vec<String>,
    /// Data rows in file order
    pub rows: Vec<RawRow>,
}

impl ParsedFile {
    /// Returns the position of the first column with the given header
    #[must_use]
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Returns the number of data rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Parses delimited text into headers and rows.
#[derive(Debug, Clone, Copy)]
pub struct DelimitedParser {
    max_rows: usize,
    max_header_len: usize,
    max_cell_len: usize,
}

impl DelimitedParser {
    /// Creates a parser with explicit limits
    #[must_use]
    pub fn new(max_rows: usize, max_header_len: usize, max_cell_len: usize) -> Self {
        Self {
            max_rows,
            max_header_len: max_header_len.max(1),
            max_cell_len: max_cell_len.max(1),
        }
    }

    /// Creates a parser from settings
    #[must_use]
    pub fn from_settings(settings: &ImportSettings) -> Self {
        Self::new(
            settings.max_rows,
            settings.max_header_len,
            settings.max_cell_len,
        )
    }

    /// Parses the full text of a file.
    ///
    /// Blank lines are discarded. The first remaining line is the header.
    ///
    /// # Errors
    ///
    /// Returns `EmptyFile` for text without non-blank lines, `MissingHeader`
    /// if every header cell is blank, and `TooManyRecords` if the data rows
    /// exceed the ceiling.
    pub fn parse(&self, text: &str) -> Result<ParsedFile, FileValidationError> {
        let lines: Vec<&str> = non_blank_lines(text).collect();
        let Some((header_line, data_lines)) = lines.split_first() else {
            return Err(FileValidationError::EmptyFile);
        };

        if data_lines.len() > self.max_rows {
            return Err(FileValidationError::TooManyRecords {
                count: data_lines.len(),
                limit: self.max_rows,
            });
        }

        let delimiter = detect_delimiter(header_line);
        let raw_headers = tokenize_line(header_line, delimiter);
        if raw_headers
            .iter()
            .all(|h| clean_header(h, self.max_header_len).is_empty())
        {
            return Err(FileValidationError::MissingHeader);
        }
        let headers = clean_headers(raw_headers, self.max_header_len);

        let rows = data_lines
            .iter()
            .enumerate()
            .map(|(idx, line)| self.parse_row(idx + 1, line, delimiter, headers.len()))
            .collect();

        tracing::debug!(
            delimiter = %delimiter,
            columns = headers.len(),
            rows = data_lines.len(),
            "Parsed delimited file"
        );

        Ok(ParsedFile {
            delimiter,
            headers,
            rows,
        })
    }

    fn parse_row(&self, number: usize, line: &str, delimiter: Delimiter, width: usize) -> RawRow {
        let mut tokens = tokenize_line(line, delimiter).into_iter();
        let cells = (0..width)
            .map(|_| {
                tokens
                    .next()
                    .and_then(|raw| normalize_cell(&raw, self.max_cell_len))
            })
            .collect();
        RawRow::new(number, cells)
    }
}

impl Default for DelimitedParser {
    fn default() -> Self {
        Self::from_settings(&ImportSettings::default())
    }
}

fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.strip_prefix('\u{feff}')
        .unwrap_or(text)
        .lines()
        .filter(|line| !line.trim().is_empty())
}

fn clean_headers(raw: Vec<String>, max_len: usize) -> Vec<String> {
    raw.into_iter()
        .enumerate()
        .map(|(idx, header)| {
            let cleaned = clean_header(&header, max_len);
            if cleaned.is_empty() {
                placeholder_header(idx)
            } else {
                cleaned
            }
        })
        .collect()
}

/// Strips wrapping quotes and angle brackets, then caps the length
fn clean_header(raw: &str, max_len: usize) -> String {
    let without_brackets: String = raw.chars().filter(|c| *c != '<' && *c != '>').collect();
    let unquoted = without_brackets
        .trim()
        .trim_matches(|c| c == QUOTE || c == '\'')
        .trim();
    truncate_chars(unquoted, max_len).trim_end().to_string()
}

fn placeholder_header(index: usize) -> String {
    format!("Column {}", index + 1)
}

fn truncate_chars(value: &str, max_len: usize) -> &str {
    match value.char_indices().nth(max_len) {
        Some((byte_idx, _)) => &value[..byte_idx],
        None => value,
    }
}
