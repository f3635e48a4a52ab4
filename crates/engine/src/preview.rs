//! Template previews: `{Column}` placeholder substitution per data row.

use serde::Serialize;

use crate::rows::RowSequence;

/// One rendered email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    /// 1-based data row number ("Preview for Row N").
    pub row: usize,
    pub subject: String,
    pub body: String,
}

/// Render one preview per data row, in row order.
///
/// Every literal `{Header}` is replaced with that row's value at the header's
/// column index, or the empty string when the row is too short. Placeholders
/// naming no header are left as written. Headers are applied left to right.
pub fn render_preview(
    headers: &[String],
    data_rows: &[Vec<String>],
    subject_template: &str,
    body_template: &str,
) -> Vec<Preview> {
    data_rows
        .iter()
        .enumerate()
        .map(|(i, values)| Preview {
            row: i + 1,
            subject: fill_template(subject_template, headers, values),
            body: fill_template(body_template, headers, values),
        })
        .collect()
}

/// [`render_preview`] over a row sequence, with headers and values trimmed.
pub fn preview_rows(rows: &RowSequence, subject_template: &str, body_template: &str) -> Vec<Preview> {
    render_preview(
        &rows.header_trimmed(),
        &rows.data_fields_trimmed(),
        subject_template,
        body_template,
    )
}

/// Substitute `{Header}` placeholders in a single template.
pub fn fill_template(template: &str, headers: &[String], values: &[String]) -> String {
    let mut out = template.to_string();
    for (index, header) in headers.iter().enumerate() {
        let placeholder = format!("{{{}}}", header);
        if !out.contains(&placeholder) {
            continue;
        }
        let value = values.get(index).map(String::as_str).unwrap_or("");
        out = out.replace(&placeholder, value);
    }
    out
}

/// The placeholders a template author can use, `{Header}` per column,
/// deduplicated, in header order.
pub fn template_variables(rows: &RowSequence) -> Vec<String> {
    let mut vars: Vec<String> = Vec::new();
    for header in rows.header_trimmed() {
        let var = format!("{{{}}}", header);
        if !vars.contains(&var) {
            vars.push(var);
        }
    }
    vars
}
