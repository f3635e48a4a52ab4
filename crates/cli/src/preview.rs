//! `lgrid preview`: render the subject/body template for every row.

use std::path::PathBuf;

use leadgrid_engine::preview::{preview_rows, template_variables, Preview};
use leadgrid_engine::NoCsvLoaded;

use crate::app::{self, App};
use crate::CliError;

pub fn cmd_preview(
    app: &App,
    csv: Option<PathBuf>,
    subject: Option<String>,
    body: Option<String>,
    list_variables: bool,
    json: bool,
) -> Result<(), CliError> {
    let mut state = app.new_state();
    match &csv {
        Some(path) => app::load_into(&mut state, path)?,
        None => {
            let handoff = app.handoff();
            let text = handoff.load().map_err(CliError::io)?.unwrap_or_default();
            if !state.load(text.as_str()) {
                return Err(CliError::from(NoCsvLoaded)
                    .with_hint("pass a CSV, or run `lgrid emails <csv>` to save one"));
            }
            tracing::debug!(path = %handoff.path().display(), "using hand-off table");
        }
    }
    let rows = state.working();

    if list_variables {
        for var in template_variables(rows) {
            println!("{}", var);
        }
        return Ok(());
    }

    if subject.is_none() && body.is_none() {
        return Err(CliError::args("nothing to preview")
            .with_hint("pass --subject and/or --body, or --list-variables"));
    }

    let previews = preview_rows(
        rows,
        subject.as_deref().unwrap_or(""),
        body.as_deref().unwrap_or(""),
    );

    if json {
        let text = serde_json::to_string_pretty(&previews)
            .map_err(|e| CliError::io(format!("cannot serialize previews: {}", e)))?;
        println!("{}", text);
    } else {
        print!("{}", format_previews(&previews));
    }
    Ok(())
}

fn format_previews(previews: &[Preview]) -> String {
    let mut out = String::new();
    for (i, preview) in previews.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("── Preview for Row {} ──\n", preview.row));
        out.push_str(&format!("Subject: {}\n", preview.subject));
        if !preview.body.is_empty() {
            out.push('\n');
            out.push_str(&preview.body);
            out.push('\n');
        }
    }
    out
}
