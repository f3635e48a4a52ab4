//! Merge engine: write per-row enrichment values into a named column.
//!
//! Merging is copy-on-write. The input sequence is never touched; callers
//! swap the returned sequence in as their new working table.
//!
//! # Guarantees
//!
//! - The returned sequence has exactly as many rows as the input.
//! - Fields other than the one being written keep their value and order.
//! - A row with no value still gets an empty field so columns stay aligned.

use crate::header::{column_index, ensure_column};
use crate::rows::{split_fields, RowSequence};

/// Where a row's value lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Write at the reconciled header index, padding short rows first.
    #[default]
    Reconciled,
    /// The fixed-width layout: rows with fewer than `threshold` fields get
    /// the value appended; longer rows have field `slot` overwritten when a
    /// value is present.
    LegacyFixedWidth { threshold: usize, slot: usize },
}

impl MergeStrategy {
    /// The historical five-column layout (email in the fifth column).
    pub const LEGACY: MergeStrategy = MergeStrategy::LegacyFixedWidth {
        threshold: 5,
        slot: 4,
    };
}

/// Apply per-row values onto `rows` under `column`.
///
/// `per_row_value` receives the zero-based data-row index (row 1 of the
/// sequence is index 0). Empty strings are treated as absent.
pub fn apply_results<F>(
    rows: &RowSequence,
    column: &str,
    strategy: MergeStrategy,
    mut per_row_value: F,
) -> RowSequence
where
    F: FnMut(usize) -> Option<String>,
{
    let mut merged = ensure_column(rows.clone(), column);
    let Some(index) = column_index(&merged, column) else {
        // Only reachable for an empty sequence.
        return merged;
    };

    for (i, row) in merged.rows_mut().iter_mut().enumerate().skip(1) {
        let value = per_row_value(i - 1).filter(|v| !v.is_empty());
        *row = match strategy {
            MergeStrategy::Reconciled => write_at(row, index, value.as_deref()),
            MergeStrategy::LegacyFixedWidth { threshold, slot } => {
                write_fixed_width(row, threshold, slot, value.as_deref())
            }
        };
    }

    merged
}

/// Convenience over [`apply_results`] for values already collected in
/// data-row order. Rows past the end of `values` are treated as absent.
pub fn apply_values(
    rows: &RowSequence,
    column: &str,
    strategy: MergeStrategy,
    values: &[Option<String>],
) -> RowSequence {
    apply_results(rows, column, strategy, |i| values.get(i).cloned().flatten())
}

fn write_at(row: &str, index: usize, value: Option<&str>) -> String {
    let mut fields = split_fields(row);
    if fields.len() <= index {
        fields.resize(index + 1, "");
    }
    fields[index] = value.unwrap_or("");
    fields.join(",")
}

fn write_fixed_width(row: &str, threshold: usize, slot: usize, value: Option<&str>) -> String {
    let mut fields = split_fields(row);
    if fields.len() < threshold {
        return format!("{},{}", row, value.unwrap_or(""));
    }
    match value {
        Some(v) if slot < fields.len() => {
            fields[slot] = v;
            fields.join(",")
        }
        Some(v) => format!("{},{}", row, v),
        None => row.to_string(),
    }
}
