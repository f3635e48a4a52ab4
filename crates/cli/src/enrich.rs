//! `lgrid enrich`: call one or all adapters and merge their results.
//!
//! With `all`, the three HTTP calls run on scoped threads against the same
//! snapshot of the loaded table. Merging happens afterwards on this thread in
//! a fixed order (Apollo, ContactOut, ZeroBounce), so every merge builds on
//! the previous one and the result does not depend on which call finished
//! first. A failed adapter only costs its own column.

use std::path::{Path, PathBuf};
use std::thread;

use leadgrid_config::keys::{resolve_key, Provider};
use leadgrid_engine::events::{TableEvent, UpdateOrigin};
use leadgrid_engine::render::render_table;
use leadgrid_engine::RowSequence;

use crate::adapters::apollo::Apollo;
use crate::adapters::common::{exit_code_for, EnrichClient};
use crate::adapters::contactout::ContactOut;
use crate::adapters::zerobounce::ZeroBounce;
use crate::adapters::{self, AdapterError, EnrichmentAdapter, EnrichmentOutcome};
use crate::app::{self, App};
use crate::exit_codes;
use crate::{AdapterChoice, CliError};

/// Adapters for `choice`, in merge order.
fn adapters_for(app: &App, choice: AdapterChoice) -> Vec<Box<dyn EnrichmentAdapter>> {
    let s = &app.settings;
    let apollo = || Box::new(Apollo::with_base_url(s.apollo_base_url.clone())) as Box<dyn EnrichmentAdapter>;
    let contactout = || {
        Box::new(ContactOut::with_base_url(
            s.contactout_base_url.clone(),
            s.contactout_response_shape,
        )) as Box<dyn EnrichmentAdapter>
    };
    let zerobounce =
        || Box::new(ZeroBounce::with_base_url(s.zerobounce_base_url.clone())) as Box<dyn EnrichmentAdapter>;

    match choice {
        AdapterChoice::Apollo => vec![apollo()],
        AdapterChoice::Contactout => vec![contactout()],
        AdapterChoice::Zerobounce => vec![zerobounce()],
        AdapterChoice::All => vec![apollo(), contactout(), zerobounce()],
    }
}

/// Run every adapter against `rows`, concurrently when there is more than one.
/// Results come back in the order of `jobs`.
fn run_all(
    jobs: &[(Box<dyn EnrichmentAdapter>, Option<String>)],
    client: &EnrichClient,
    rows: &RowSequence,
) -> Vec<Result<EnrichmentOutcome, AdapterError>> {
    if let [(adapter, key)] = jobs {
        return vec![adapters::run(adapter.as_ref(), client, rows, key.as_deref())];
    }

    thread::scope(|scope| {
        let handles: Vec<_> = jobs
            .iter()
            .map(|(adapter, key)| {
                let adapter = adapter.as_ref();
                scope.spawn(move || adapters::run(adapter, client, rows, key.as_deref()))
            })
            .collect();

        handles
            .into_iter()
            .map(|h| {
                h.join()
                    .unwrap_or_else(|_| Err(AdapterError::Api("adapter thread panicked".into())))
            })
            .collect()
    })
}

pub fn cmd_enrich(
    app: &App,
    choice: AdapterChoice,
    csv: &Path,
    out: Option<PathBuf>,
    api_key: Option<String>,
    quiet: bool,
) -> Result<(), CliError> {
    if choice == AdapterChoice::All && api_key.is_some() {
        return Err(CliError::args("--api-key applies to a single adapter")
            .with_hint("use APOLLO_KEY / CONTACTOUT_KEY / ZEROBOUNCE_KEY or `lgrid keys set` with `all`"));
    }

    // 1. Load
    let mut state = app.new_state();
    state.subscribe(|event: &TableEvent| match event {
        TableEvent::RowsUpdated { rows, origin: UpdateOrigin::Loaded } => {
            tracing::debug!(rows = rows.len(), "table loaded");
        }
        TableEvent::RowsUpdated { rows, origin: UpdateOrigin::Merged { column } } => {
            tracing::debug!(rows = rows.len(), column = %column, "results merged");
        }
    });
    app::load_into(&mut state, csv)?;

    // 2. Resolve keys (missing keys fail inside the adapter run, before any request)
    let store = app.key_store();
    let jobs: Vec<(Box<dyn EnrichmentAdapter>, Option<String>)> = adapters_for(app, choice)
        .into_iter()
        .map(|adapter| {
            let lookup = resolve_key(api_key.as_deref(), adapter.provider(), &store);
            tracing::debug!(
                provider = adapter.provider().display_name(),
                source = lookup.source.as_str(),
                "key resolved"
            );
            (adapter, lookup.key)
        })
        .collect();

    // 3. Call
    let client = EnrichClient::new(app.settings.timeout_secs)?;
    let snapshot = state.working().clone();
    let results = run_all(&jobs, &client, &snapshot);

    // 4. Merge in fixed order
    let mut failures: Vec<(Provider, AdapterError)> = Vec::new();
    for ((adapter, _), result) in jobs.iter().zip(results) {
        let provider = adapter.provider();
        match result {
            Ok(outcome) => {
                state.apply(outcome.column, &outcome.values)?;
                if !quiet {
                    eprintln!("{}: {}", provider.display_name(), outcome.status);
                }
            }
            Err(err) => {
                if !quiet {
                    eprintln!("{}: error: {}", provider.display_name(), err);
                }
                failures.push((provider, err));
            }
        }
    }

    // A single adapter that failed has nothing to show.
    if let [(provider, err)] = failures.as_slice() {
        if jobs.len() == 1 {
            return Err(adapter_failure(*provider, err));
        }
    }

    // 5. Output
    let working = state.working();
    match &out {
        Some(path) => {
            let label = app::write_output(&working.to_csv_string(), path)?;
            if app::show_progress(quiet) && label != "stdout" {
                eprintln!("Wrote {} rows to {}", working.len(), label);
            }
        }
        None => {
            if let Some(table) = render_table(working, app.settings.max_column_width) {
                print!("{}", table);
            }
        }
    }

    if failures.is_empty() {
        return Ok(());
    }
    if failures.len() == jobs.len() {
        let (provider, err) = &failures[0];
        return Err(adapter_failure(*provider, err));
    }
    let names: Vec<&str> = failures.iter().map(|(p, _)| p.display_name()).collect();
    Err(CliError {
        code: exit_codes::EXIT_ENRICH_PARTIAL,
        message: format!("{} of {} adapters failed ({})", failures.len(), jobs.len(), names.join(", ")),
        hint: Some("results from the other adapters were kept".to_string()),
    })
}

fn adapter_failure(provider: Provider, err: &AdapterError) -> CliError {
    let hint = match err {
        AdapterError::MissingKey => Some(format!(
            "pass --api-key, set {}, or run `lgrid keys set`",
            provider.env_var()
        )),
        AdapterError::Http(401, _) | AdapterError::Http(403, _) => {
            Some(format!("check the {} key", provider.display_name()))
        }
        _ => None,
    };
    let message = match err {
        AdapterError::MissingKey => format!("missing {} API key", provider.display_name()),
        other => format!("{} failed: {}", provider.display_name(), other),
    };
    CliError { code: exit_code_for(err), message, hint }
}
