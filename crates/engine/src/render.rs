//! Plain-text grid rendering of a row sequence.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::rows::{split_fields, RowSequence};

/// Narrowest column the renderer will produce.
const MIN_COL_WIDTH: usize = 3;

/// Render `rows` as an aligned text grid, header first.
///
/// Returns `None` for an empty sequence so callers can skip output entirely.
/// Cells are trimmed; column widths follow the widest cell (by display
/// width) clamped to `[3, max_col_width]`, and wider cells are cut with `..`.
pub fn render_table(rows: &RowSequence, max_col_width: usize) -> Option<String> {
    if rows.is_empty() {
        return None;
    }

    let grid: Vec<Vec<&str>> = rows
        .rows()
        .iter()
        .map(|row| split_fields(row).into_iter().map(str::trim).collect())
        .collect();

    let num_cols = grid.iter().map(Vec::len).max().unwrap_or(0);
    let max_col_width = max_col_width.max(MIN_COL_WIDTH);
    let widths: Vec<usize> = (0..num_cols)
        .map(|c| {
            grid.iter()
                .map(|cells| cells.get(c).map(|s| display_width(s)).unwrap_or(0))
                .max()
                .unwrap_or(0)
                .clamp(MIN_COL_WIDTH, max_col_width)
        })
        .collect();

    let mut out = String::new();
    for (r, cells) in grid.iter().enumerate() {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad_right(cell, *w))
            .collect();
        out.push_str(line.join(" | ").trim_end());
        out.push('\n');

        if r == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&rule.join("-+-"));
            out.push('\n');
        }
    }
    Some(out)
}

/// Display width of a string, accounting for CJK double-width, emoji, etc.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `width` display columns, adding ".." if truncated.
pub fn truncate_display(s: &str, width: usize) -> String {
    if width < 3 {
        for ch in s.chars() {
            if ch.width().unwrap_or(0) <= width {
                return ch.to_string();
            }
        }
        return String::new();
    }

    if display_width(s) <= width {
        return s.to_string();
    }

    // Leave room for ".."
    let budget = width - 2;
    let mut used = 0;
    let mut end_byte = 0;
    for (i, ch) in s.char_indices() {
        let cw = ch.width().unwrap_or(0);
        if used + cw > budget {
            end_byte = i;
            break;
        }
        used += cw;
        end_byte = i + ch.len_utf8();
    }

    format!("{}..", &s[..end_byte])
}

/// Pad or truncate a string to exactly `width` display columns.
///
/// A cut inside a double-width character leaves the truncated text one
/// column short; it is padded back up to `width`.
pub fn pad_right(s: &str, width: usize) -> String {
    let fitted = if display_width(s) > width {
        truncate_display(s, width)
    } else {
        s.to_string()
    };
    let fw = display_width(&fitted);
    format!("{}{}", fitted, " ".repeat(width.saturating_sub(fw)))
}
