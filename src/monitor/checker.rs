//! Scheduler loop running the check cycle over all targets

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::interval;

use super::fetch::{FetchError, Fetcher};
use super::CheckResult;
use crate::extract::{extract, ExtractError};
use crate::notify::{AlertMessage, Notifier};
use crate::registry::{MonitoredTarget, TargetRegistry};

/// Failure of one target's check cycle
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),
}

/// Owns the registry and runs one pass over all targets per tick.
///
/// A pass is sequential: fetch, extract, evaluate, and conditionally alert
/// for each target in insertion order. Outcomes accumulate pass-locally and
/// are folded into the registry as one batch, followed by a single persist.
/// Any per-target failure is logged and contained; nothing aborts the pass.
pub struct RateLimitMonitor {
    registry: TargetRegistry,
    fetcher: Fetcher,
    notifier: Notifier,
}

impl RateLimitMonitor {
    pub fn new(registry: TargetRegistry, notifier: Notifier) -> Self {
        Self {
            registry,
            fetcher: Fetcher::new(),
            notifier,
        }
    }

    /// Replace the default fetcher (shorter timeouts in tests)
    pub fn with_fetcher(mut self, fetcher: Fetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    /// Run the loop until a shutdown signal arrives.
    ///
    /// The first pass runs immediately on start, so a configuration-only
    /// restart produces instant feedback; subsequent passes follow the tick.
    pub async fn run(mut self, check_interval: Duration, mut shutdown_rx: mpsc::Receiver<()>) {
        let mut ticker = interval(check_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_pass().await;
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Monitor shutting down");
                    break;
                }
            }
        }
    }

    /// Run one full pass over all targets
    pub async fn run_pass(&mut self) {
        let checked_at = Utc::now();
        let mut outcomes: Vec<(String, CheckResult)> = Vec::new();

        for target in self.registry.list() {
            match self.check_target(target).await {
                Ok(Some(result)) => {
                    if result.is_over(target.threshold) {
                        tracing::warn!(
                            target = %target.name,
                            remaining = result.remaining,
                            limit = result.limit,
                            usage = %format!("{:.1}%", result.usage * 100.0),
                            severity = %result.severity(),
                            "Rate limit threshold exceeded"
                        );
                        let message = AlertMessage::new(&target.name, &result, checked_at);
                        self.notifier.dispatch(&message).await;
                    } else {
                        tracing::info!(
                            target = %target.name,
                            remaining = result.remaining,
                            limit = result.limit,
                            usage = %format!("{:.1}%", result.usage * 100.0),
                            "Rate limit ok"
                        );
                    }
                    outcomes.push((target.name.clone(), result));
                }
                Ok(None) => {
                    tracing::warn!(
                        target = %target.name,
                        "No rate limit information found, skipping this cycle"
                    );
                }
                Err(e) => {
                    tracing::error!(target = %target.name, error = %e, "Check failed");
                }
            }
        }

        for (name, result) in outcomes {
            self.registry.record_result(&name, &result, checked_at);
        }
        if let Err(e) = self.registry.save() {
            tracing::error!(error = %e, "Failed to persist registry");
        }
    }

    /// Check a single target: fetch, extract, evaluate.
    ///
    /// `Ok(None)` means no recognized rate-limit shape in the response.
    async fn check_target(&self, target: &MonitoredTarget) -> Result<Option<CheckResult>, CheckError> {
        let outcome = self.fetcher.fetch(&target.endpoint, &target.headers).await?;
        let reading = extract(&outcome.headers, outcome.body.as_ref())?;
        Ok(reading.map(|r| CheckResult::new(r.remaining, r.limit)))
    }
}
