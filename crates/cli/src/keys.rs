//! `lgrid keys show` / `lgrid keys set`.

use leadgrid_config::keys::{mask_key, resolve_key, Provider};

use crate::app::App;
use crate::CliError;

pub fn cmd_keys_show(app: &App) -> Result<(), CliError> {
    let store = app.key_store();
    for provider in Provider::ALL {
        let lookup = resolve_key(None, provider, &store);
        let shown = lookup
            .key
            .as_deref()
            .map(mask_key)
            .unwrap_or_else(|| "(not set)".to_string());
        println!(
            "{:<11} {:<24} {}",
            provider.display_name(),
            shown,
            lookup.source.as_str()
        );
    }
    Ok(())
}

pub fn cmd_keys_set(
    app: &App,
    apollo: Option<String>,
    contactout: Option<String>,
    zerobounce: Option<String>,
) -> Result<(), CliError> {
    let updates: Vec<(Provider, String)> = [
        (Provider::Apollo, apollo),
        (Provider::ContactOut, contactout),
        (Provider::ZeroBounce, zerobounce),
    ]
    .into_iter()
    .filter_map(|(p, v)| v.map(|v| (p, v)))
    .collect();

    if updates.is_empty() {
        return Err(CliError::args("no keys given")
            .with_hint("use --apollo, --contactout and/or --zerobounce"));
    }

    let store = app.key_store();
    let mut keys = store.get_keys();
    let mut changed = Vec::with_capacity(updates.len());
    for (provider, value) in updates {
        let cleared = value.trim().is_empty();
        keys.set(provider, Some(value));
        changed.push((provider, cleared));
    }

    store.save_keys(&keys).map_err(CliError::io)?;
    tracing::debug!(path = %store.path().display(), "keys written");
    for (provider, cleared) in changed {
        eprintln!(
            "{} key {}",
            provider.display_name(),
            if cleared { "cleared" } else { "saved" }
        );
    }
    Ok(())
}
