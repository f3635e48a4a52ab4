//! Header reconciliation: locate-or-append a named column.

use crate::rows::{split_fields, RowSequence};

/// Ensure `column` exists in the header, appending `,{column}` when it is
/// missing. Only the header row changes; data rows are the merge step's job.
///
/// Matching is verbatim (no trimming, case-sensitive), so calling this twice
/// with the same name is a no-op the second time. Empty input is returned
/// unchanged.
pub fn ensure_column(mut rows: RowSequence, column: &str) -> RowSequence {
    if rows.is_empty() {
        return rows;
    }
    if column_index(&rows, column).is_none() {
        log::debug!("appending column {:?} to header", column);
        let header = &mut rows.rows_mut()[0];
        header.push(',');
        header.push_str(column);
    }
    rows
}

/// Verbatim index of `column` in the header.
pub fn column_index(rows: &RowSequence, column: &str) -> Option<usize> {
    rows.header().iter().position(|h| *h == column)
}

/// First header cell that contains `needle`, compared trimmed and
/// case-insensitively. This is how adapters find name / organization /
/// LinkedIn columns regardless of exact spelling.
pub fn find_column_containing(header: &[&str], needle: &str) -> Option<usize> {
    let needle = needle.to_lowercase();
    header
        .iter()
        .position(|h| h.trim().to_lowercase().contains(&needle))
}

/// Field at `index` of a record, trimmed. `None` when the row is too short.
pub fn field_at(row: &str, index: usize) -> Option<&str> {
    split_fields(row).get(index).map(|f| f.trim())
}
