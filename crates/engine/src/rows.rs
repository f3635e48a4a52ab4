//! Row sequences and the naive CSV parser.
//!
//! A [`RowSequence`] is the unit every other module in this crate works on:
//! an ordered list of comma-joined record strings where element 0 is the
//! header. Rows are kept as raw strings so that fields the enrichment
//! pipeline never touches round-trip byte-for-byte.
//!
//! Parsing is deliberately naive: lines are split on `\n` / `\r\n` and
//! fields on `,`. Quoted fields with embedded commas are not supported.

use serde::Serialize;

/// Input accepted by [`parse`]: raw file text or an already-split row list.
#[derive(Debug, Clone, Copy)]
pub enum CsvInput<'a> {
    Text(&'a str),
    Rows(&'a [String]),
}

impl<'a> From<&'a str> for CsvInput<'a> {
    fn from(text: &'a str) -> Self {
        CsvInput::Text(text)
    }
}

impl<'a> From<&'a [String]> for CsvInput<'a> {
    fn from(rows: &'a [String]) -> Self {
        CsvInput::Rows(rows)
    }
}

/// Ordered CSV rows, header at position 0.
///
/// Data rows may be shorter than the header (missing trailing columns are
/// tolerated) and are never truncated when longer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RowSequence {
    rows: Vec<String>,
}

impl RowSequence {
    /// Wrap rows as-is. No blank-row filtering; use [`parse`] for that.
    pub fn new(rows: Vec<String>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total row count, header included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// The raw header row, if any.
    pub fn header_row(&self) -> Option<&str> {
        self.rows.first().map(String::as_str)
    }

    /// Header cells split verbatim on `,` (no trimming).
    pub fn header(&self) -> Vec<&str> {
        self.header_row().map(split_fields).unwrap_or_default()
    }

    /// Header cells with surrounding whitespace removed.
    pub fn header_trimmed(&self) -> Vec<String> {
        self.header().into_iter().map(|h| h.trim().to_string()).collect()
    }

    /// Every row after the header.
    pub fn data_rows(&self) -> &[String] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Data rows split into trimmed fields.
    pub fn data_fields_trimmed(&self) -> Vec<Vec<String>> {
        self.data_rows()
            .iter()
            .map(|row| split_fields(row).into_iter().map(|f| f.trim().to_string()).collect())
            .collect()
    }

    /// Rows joined with `\n`, no trailing newline. This is the export format.
    pub fn to_csv_string(&self) -> String {
        self.rows.join("\n")
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<String> {
        &mut self.rows
    }
}

/// Split one record on `,`. An empty row yields a single empty field.
pub fn split_fields(row: &str) -> Vec<&str> {
    row.split(',').collect()
}

/// Normalize CSV input into a [`RowSequence`], dropping empty and
/// whitespace-only rows. Returns an empty sequence when nothing is left.
pub fn parse<'a>(input: impl Into<CsvInput<'a>>) -> RowSequence {
    match input.into() {
        CsvInput::Text(text) => parse_text(text),
        CsvInput::Rows(rows) => parse_rows(rows.iter().map(String::as_str)),
    }
}

/// Split text on `\n` or `\r\n` and keep the non-blank lines.
pub fn parse_text(text: &str) -> RowSequence {
    let segments: Vec<&str> = text.split('\n').collect();
    let last = segments.len().saturating_sub(1);
    let lines = segments.into_iter().enumerate().map(|(i, line)| {
        // Only a CR that precedes an LF is a line terminator.
        if i < last {
            line.strip_suffix('\r').unwrap_or(line)
        } else {
            line
        }
    });
    parse_rows(lines)
}

/// Keep the non-blank rows of an already-split row list.
pub fn parse_rows<I, S>(rows: I) -> RowSequence
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let rows = rows
        .into_iter()
        .filter(|row| !row.as_ref().trim().is_empty())
        .map(|row| row.as_ref().to_string())
        .collect();
    RowSequence { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_lf_and_crlf() {
        let rows = parse("Name,Org\r\nAna,Acme\nBo,Beta\n");
        assert_eq!(rows.rows(), ["Name,Org", "Ana,Acme", "Bo,Beta"]);
    }

    #[test]
    fn parse_drops_blank_rows() {
        let rows = parse("Name,Org\n\n   \n\t\nAna,Acme\n\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.header_row(), Some("Name,Org"));
    }

    #[test]
    fn parse_empty_inputs() {
        assert!(parse("").is_empty());
        assert!(parse("\n\r\n  \n").is_empty());
        let none: Vec<String> = Vec::new();
        assert!(parse(none.as_slice()).is_empty());
    }

    #[test]
    fn parse_row_list_filters_directly() {
        let input = vec![
            "Name,Org".to_string(),
            "  ".to_string(),
            "Ana,Acme".to_string(),
        ];
        let rows = parse(input.as_slice());
        assert_eq!(rows.rows(), ["Name,Org", "Ana,Acme"]);
    }

    #[test]
    fn parse_keeps_fields_verbatim() {
        // No unquoting: the quoted comma splits the field.
        let rows = parse("a,b\n\"x,y\",z");
        assert_eq!(split_fields(&rows.data_rows()[0]), ["\"x", "y\"", "z"]);
    }

    #[test]
    fn lone_trailing_cr_is_kept() {
        let rows = parse("a,b\nc,d\r");
        assert_eq!(rows.data_rows(), ["c,d\r"]);
    }

    #[test]
    fn header_and_data_accessors() {
        let rows = parse("Name , Org\nAna, Acme ,extra\nBo");
        assert_eq!(rows.header(), ["Name ", " Org"]);
        assert_eq!(rows.header_trimmed(), ["Name", "Org"]);
        assert_eq!(
            rows.data_fields_trimmed(),
            vec![vec!["Ana", "Acme", "extra"], vec!["Bo"]]
        );
    }

    #[test]
    fn header_only_has_no_data_rows() {
        let rows = parse("Name,Org");
        assert!(rows.data_rows().is_empty());
        assert!(RowSequence::default().data_rows().is_empty());
    }

    #[test]
    fn csv_string_has_no_trailing_newline() {
        let rows = parse("a,b\r\nc,d\r\n");
        assert_eq!(rows.to_csv_string(), "a,b\nc,d");
    }
}
