//! `wayfinder keys` and `wayfinder config` handlers.

use anyhow::{Result, bail};
use tracing::info;

use wayfinder_config::{Config, ConfigValidator};
use wayfinder_resilience::KeyPoolStore;

use crate::cli::KeysAction;
use crate::wiring;

pub(crate) async fn handle_keys_command(config: &Config, action: KeysAction) -> Result<()> {
    let store = wiring::key_store(config);
    let pools = wiring::build_key_pools(config, store.as_ref()).await;

    match action {
        KeysAction::Status => {
            let report = wiring::status_report(&pools);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        KeysAction::Reset { provider } => {
            if let Some(wanted) = &provider {
                if !pools.iter().any(|(id, _)| id == wanted) {
                    bail!("unknown provider '{}'", wanted);
                }
            }
            for (id, pool) in &pools {
                if provider.as_ref().is_some_and(|p| p != id) {
                    continue;
                }
                pool.reset();
                store.save(id, &pool.snapshot()).await?;
                info!(provider = %id, credentials = pool.len(), "Key pool reset");
            }
        }
    }
    Ok(())
}

pub(crate) fn validate_config(config: &Config) -> Result<()> {
    let result = ConfigValidator::validate(config)?;
    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }
    if !result.is_valid() {
        bail!("configuration has {} error(s)", result.errors.len());
    }
    println!("configuration OK ({} provider(s))", config.providers.len());
    Ok(())
}
