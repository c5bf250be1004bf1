//! Breadth-first exploration loop.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use wayfinder_protocols::{
    ArtifactRef, ArtifactStore, BrowserDriver, BrowserError, CandidateElement, ExplorationTask,
    ExploreError, VisionError, VisionInterpreter,
};

use crate::config::EngineConfig;
use crate::fingerprint::{StateFingerprinter, StructuralFingerprinter};
use crate::frontier::{Enqueue, Frontier};
use crate::policy::ClickPolicy;
use crate::recorder::ManualStepRecorder;
use crate::summary::{ExplorationReport, RunSummary, StopReason};

/// Drives one browser page through an application, recording each new state.
///
/// The explorer itself holds no per-run state; frontier, visited set and
/// recorder live inside [`Explorer::explore`].
pub struct Explorer {
    driver: Arc<dyn BrowserDriver>,
    vision: Arc<dyn VisionInterpreter>,
    artifacts: Arc<dyn ArtifactStore>,
    fingerprinter: Box<dyn StateFingerprinter>,
    policy: ClickPolicy,
    config: EngineConfig,
}

/// Where one run currently is.
struct Run {
    frontier: Frontier,
    visited: HashSet<String>,
    recorder: ManualStepRecorder,
    summary: RunSummary,
}

impl Explorer {
    pub fn new(
        driver: Arc<dyn BrowserDriver>,
        vision: Arc<dyn VisionInterpreter>,
        artifacts: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            driver,
            vision,
            artifacts,
            fingerprinter: Box::new(StructuralFingerprinter),
            policy: ClickPolicy::default(),
            config: EngineConfig::default(),
        }
    }

    pub fn with_policy(mut self, policy: ClickPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_fingerprinter(mut self, fingerprinter: Box<dyn StateFingerprinter>) -> Self {
        self.fingerprinter = fingerprinter;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Explore from `seed_url` until the frontier empties, `step_budget`
    /// distinct states are recorded, or the run deadline passes.
    ///
    /// Only a failed seed navigation aborts the run; every other failure is
    /// logged, counted, and skipped.
    pub async fn explore(
        &self,
        seed_url: &str,
        step_budget: u32,
    ) -> Result<ExplorationReport, ExploreError> {
        let seed = validate_seed(seed_url)?;
        let started = Instant::now();
        let deadline = self.config.run_deadline.map(|d| started + d);

        let mut run = Run {
            frontier: Frontier::new(self.config.max_frontier),
            visited: HashSet::new(),
            recorder: ManualStepRecorder::new(),
            summary: RunSummary::default(),
        };
        run.frontier.push(ExplorationTask::navigate(&seed));
        run.summary.tasks_enqueued += 1;

        info!(seed = %seed, step_budget, "Exploration started");

        let mut is_seed = true;
        let stop_reason = loop {
            if run.recorder.len() >= step_budget as usize {
                break StopReason::BudgetExhausted;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break StopReason::DeadlineReached;
            }
            let Some(task) = run.frontier.pop() else {
                break StopReason::FrontierExhausted;
            };
            let seed_task = std::mem::take(&mut is_seed);

            debug!(task = %task.describe(), pending = run.frontier.len(), "Processing task");

            if let Err(e) = self.perform(&task).await {
                if seed_task {
                    error!(url = %seed, error = %e, "Seed navigation failed");
                    return Err(ExploreError::SeedNavigation { url: seed, source: e });
                }
                warn!(task = %task.describe(), error = %e, "Action failed, skipping task");
                run.summary.action_failures += 1;
                continue;
            }

            self.process_state(&task, &mut run).await;
        };

        let mut summary = run.summary;
        summary.states_visited = run.recorder.len() as u32;
        summary.stop_reason = stop_reason;
        summary.elapsed_ms = started.elapsed().as_millis() as u64;

        info!(
            states = summary.states_visited,
            enqueued = summary.tasks_enqueued,
            duplicates = summary.duplicates_skipped,
            action_failures = summary.action_failures,
            interpretation_failures = summary.interpretation_failures,
            stop_reason = ?summary.stop_reason,
            "Exploration finished"
        );

        Ok(ExplorationReport {
            seed_url: seed,
            steps: run.recorder.into_steps(),
            summary,
        })
    }

    /// Observe the page after a successful action and record it if new.
    async fn process_state(&self, task: &ExplorationTask, run: &mut Run) {
        if !self.config.settle.is_zero() {
            sleep(self.config.settle).await;
        }

        let (url, summary_text) = match self.read_state().await {
            Ok(state) => state,
            Err(e) => {
                warn!(task = %task.describe(), error = %e, "Could not read page state");
                run.summary.action_failures += 1;
                return;
            }
        };

        let fingerprint = self.fingerprinter.fingerprint(&url, &summary_text);
        if !run.visited.insert(fingerprint.clone()) {
            debug!(task = %task.describe(), url = %url, "State already visited");
            run.summary.duplicates_skipped += 1;
            return;
        }

        let step_index = run.recorder.len();
        let (artifact_ref, screenshot) = self.capture(step_index, &fingerprint, task).await;

        let elements = match screenshot {
            Some(bytes) => self.interpret(&bytes, task, run).await,
            None => {
                run.summary.interpretation_failures += 1;
                Vec::new()
            }
        };
        run.summary.elements_discovered += elements.len() as u32;

        let clickable: Vec<CandidateElement> = elements
            .iter()
            .filter(|element| match self.policy.denied_by(element) {
                Some(keyword) => {
                    debug!(element = %element.label(), keyword, "Element denied by policy");
                    run.summary.elements_denied += 1;
                    false
                }
                None => true,
            })
            .cloned()
            .collect();

        if let Err(e) = run.recorder.record(
            url.clone(),
            task.describe(),
            artifact_ref,
            elements,
            fingerprint,
        ) {
            warn!(error = %e, "Step not recorded");
            return;
        }

        for element in clickable {
            match run.frontier.push(ExplorationTask::click(url.clone(), element)) {
                Enqueue::Added => run.summary.tasks_enqueued += 1,
                Enqueue::Duplicate => run.summary.tasks_deduplicated += 1,
                Enqueue::Overflow => {
                    debug!(url = %url, "Frontier full, dropping task");
                    run.summary.frontier_overflow += 1;
                }
            }
        }

        info!(
            step = step_index,
            url = %url,
            pending = run.frontier.len(),
            "State recorded"
        );
    }

    async fn perform(&self, task: &ExplorationTask) -> Result<(), BrowserError> {
        let limit = self.config.action_timeout;
        match task {
            ExplorationTask::Navigate { url } => bounded(limit, self.driver.navigate(url)).await,
            ExplorationTask::Click { url, element } => {
                bounded(limit, self.driver.navigate(url)).await?;
                if !self.config.settle.is_zero() {
                    sleep(self.config.settle).await;
                }
                bounded(limit, self.driver.click(&element.bounds)).await
            }
        }
    }

    async fn read_state(&self) -> Result<(String, String), BrowserError> {
        let limit = self.config.action_timeout;
        let url = bounded(limit, self.driver.current_url()).await?;
        let summary = bounded(limit, self.driver.dom_structural_summary()).await?;
        Ok((url, summary))
    }

    /// Screenshot and store the current page.
    async fn capture(
        &self,
        step_index: usize,
        fingerprint: &str,
        task: &ExplorationTask,
    ) -> (Option<ArtifactRef>, Option<Vec<u8>>) {
        let bytes = match bounded(self.config.action_timeout, self.driver.screenshot()).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(task = %task.describe(), error = %e, "Screenshot failed");
                return (None, None);
            }
        };

        let short = fingerprint.get(..12).unwrap_or(fingerprint);
        let name = format!("step-{:04}-{}.png", step_index, short);
        match self.artifacts.put(&name, bytes.clone()).await {
            Ok(reference) => (Some(reference), Some(bytes)),
            Err(e) => {
                warn!(task = %task.describe(), error = %e, "Failed to store screenshot");
                (None, Some(bytes))
            }
        }
    }

    async fn interpret(
        &self,
        screenshot: &[u8],
        task: &ExplorationTask,
        run: &mut Run,
    ) -> Vec<CandidateElement> {
        let limit = self.config.vision_timeout;
        let result = match timeout(limit, self.vision.interpret(screenshot)).await {
            Ok(result) => result,
            Err(_) => Err(VisionError::Timeout(limit.as_secs())),
        };

        match result {
            Ok(interpretation) => {
                if let Some(provider) = interpretation.provider {
                    run.summary.providers_used.insert(provider);
                }
                interpretation.elements
            }
            Err(e) => {
                warn!(task = %task.describe(), error = %e, "Interpretation failed, recording empty step");
                run.summary.interpretation_failures += 1;
                Vec::new()
            }
        }
    }
}

async fn bounded<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, BrowserError>>,
) -> Result<T, BrowserError> {
    match timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(BrowserError::Timeout(limit.as_secs())),
    }
}

fn validate_seed(seed_url: &str) -> Result<String, ExploreError> {
    let parsed = url::Url::parse(seed_url.trim())
        .map_err(|e| ExploreError::InvalidSeed(format!("{}: {}", seed_url, e)))?;
    match parsed.scheme() {
        "http" | "https" | "file" => Ok(seed_url.trim().to_string()),
        other => Err(ExploreError::InvalidSeed(format!(
            "unsupported scheme '{}' in {}",
            other, seed_url
        ))),
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
