//! `lgrid show`, `lgrid export`, `lgrid emails`.

use std::path::{Path, PathBuf};

use leadgrid_engine::events::TableEvent;
use leadgrid_engine::recipients::{collect_recipients, RecipientError};
use leadgrid_engine::render::render_table;

use crate::app::{self, App};
use crate::exit_codes;
use crate::CliError;

pub fn cmd_show(app: &App, csv: &Path) -> Result<(), CliError> {
    let max_width = app.settings.max_column_width;
    let mut state = app.new_state();
    // The printer is the table's only view; it redraws on every update.
    state.subscribe(move |event: &TableEvent| {
        let TableEvent::RowsUpdated { rows, .. } = event;
        if let Some(table) = render_table(rows, max_width) {
            print!("{}", table);
        }
    });

    let text = app::read_input(csv)?;
    // Empty input renders nothing and is not an error for `show`.
    if !state.load(text.as_str()) {
        tracing::debug!(csv = %csv.display(), "no rows; nothing to show");
    }
    Ok(())
}

pub fn cmd_export(app: &App, csv: &Path, out: Option<PathBuf>, quiet: bool) -> Result<(), CliError> {
    let mut state = app.new_state();
    app::load_into(&mut state, csv)?;

    let out = out.unwrap_or_else(|| PathBuf::from(&app.settings.export_file_name));
    let working = state.working();
    let label = app::write_output(&working.to_csv_string(), &out)?;
    if app::show_progress(quiet) && label != "stdout" {
        eprintln!("Exported {} rows to {}", working.len(), label);
    }
    Ok(())
}

pub fn cmd_emails(app: &App, csv: &Path, quiet: bool) -> Result<(), CliError> {
    let mut state = app.new_state();
    app::load_into(&mut state, csv)?;
    let working = state.working();

    let handoff = app.handoff();
    let recipients = collect_recipients(working).map_err(|e| {
        // A failed run must not leave an older table behind for `preview`.
        if let Err(clear_err) = handoff.clear() {
            tracing::warn!(error = %clear_err, "cannot remove stale hand-off table");
        }
        recipient_failure(e)
    })?;

    for address in &recipients {
        println!("{}", address);
    }

    handoff
        .save(&working.to_csv_string())
        .map_err(|e| CliError::io(format!("cannot save hand-off table: {}", e)))?;
    if app::show_progress(quiet) {
        eprintln!(
            "{} recipients; table saved for `lgrid preview`",
            recipients.len()
        );
    }
    Ok(())
}

fn recipient_failure(e: RecipientError) -> CliError {
    match e {
        RecipientError::NoData => CliError::args(e.to_string()),
        RecipientError::NoEmailColumn => CliError {
            code: exit_codes::EXIT_NO_RECIPIENTS,
            message: e.to_string(),
            hint: Some("run `lgrid enrich` first, or add a column whose header contains \"email\"".into()),
        },
        RecipientError::NoRecipients => CliError {
            code: exit_codes::EXIT_NO_RECIPIENTS,
            message: e.to_string(),
            hint: None,
        },
    }
}
