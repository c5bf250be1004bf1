//! `wayfinder explore` handler.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use wayfinder_browser_cdp::CdpBrowserDriver;
use wayfinder_config::{Config, ConfigValidator};
use wayfinder_explorer::{ClickPolicy, Explorer, FileArtifactStore, RouterVision};

use crate::wiring;

pub(crate) async fn run_explore(
    config: &Config,
    seed_url: &str,
    budget: Option<u32>,
    output: Option<&Path>,
) -> Result<()> {
    let validation = ConfigValidator::validate(config)?;
    for warning in &validation.warnings {
        warn!("config {}: {}", warning.path, warning.message);
    }
    if !validation.is_valid() {
        for error in &validation.errors {
            tracing::error!("config {}: {}", error.path, error.message);
        }
        bail!("configuration has {} error(s)", validation.errors.len());
    }

    let router = wiring::build_router(config, wiring::key_store(config)).await;
    if router.routes().is_empty() {
        bail!("no providers configured; add a [providers.<id>] section");
    }

    let vision = RouterVision::new(Arc::new(router))
        .with_timeout(config.explorer.provider_timeout_secs);

    let driver = CdpBrowserDriver::connect(&config.browser.endpoint)
        .await
        .with_context(|| format!("connecting to browser at {}", config.browser.endpoint))?;
    let driver = Arc::new(driver);

    let artifacts_dir = wayfinder_config::ConfigLoader::expand_path(&config.artifacts.dir.to_string_lossy());
    let artifacts = Arc::new(FileArtifactStore::new(artifacts_dir));

    let explorer = Explorer::new(driver.clone(), Arc::new(vision), artifacts)
        .with_policy(ClickPolicy::new(config.policy.deny_keywords.iter().cloned()))
        .with_config(wiring::engine_config(&config.explorer));

    let step_budget = budget.unwrap_or(config.explorer.step_budget);
    let result = explorer.explore(seed_url, step_budget).await;

    if let Err(e) = driver.client().close().await {
        warn!("Failed to close browser tab: {}", e);
    }

    let report = result?;
    info!(
        steps = report.steps.len(),
        stop_reason = ?report.summary.stop_reason,
        elapsed_ms = report.summary.elapsed_ms,
        "Report ready"
    );

    let json = serde_json::to_string_pretty(&report)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
