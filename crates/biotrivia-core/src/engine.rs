//! Hint loading orchestrator.
//!
//! Fetches raw markup for the current target on the tokio runtime, retries
//! transient source errors, and derives hint tiers. Requesting a new target
//! aborts the fetch for the previous one, so the last requested target wins.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinHandle;

use crate::error::SourceError;
use crate::hints::hints_from_markup;
use crate::model::{HintTiers, RawMarkup};
use crate::traits::MarkupSource;

/// Configuration for the hint loader.
#[derive(Debug, Clone)]
pub struct HintLoaderConfig {
    /// Retries on transient source errors.
    pub max_retries: u32,
    /// Delay before the first retry; doubles per retry.
    pub retry_delay: Duration,
}

impl Default for HintLoaderConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

struct InFlight {
    target: String,
    handle: JoinHandle<HintTiers>,
}

/// Loads hints for one target at a time.
pub struct HintLoader {
    source: Arc<dyn MarkupSource>,
    config: HintLoaderConfig,
    in_flight: Option<InFlight>,
}

impl HintLoader {
    pub fn new(source: Arc<dyn MarkupSource>, config: HintLoaderConfig) -> Self {
        Self {
            source,
            config,
            in_flight: None,
        }
    }

    /// Name of the underlying markup source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Start loading hints for `target`. A pending fetch for the same target
    /// is kept; a pending fetch for any other target is aborted.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request(&mut self, target: &str) {
        if self.pending_target() == Some(target) {
            return;
        }
        self.cancel();

        let source = Arc::clone(&self.source);
        let config = self.config.clone();
        let owned = target.to_string();
        let handle = tokio::spawn(async move { load_hints(source.as_ref(), &owned, &config).await });

        tracing::debug!(target_name = target, "hint fetch started");
        self.in_flight = Some(InFlight {
            target: target.to_string(),
            handle,
        });
    }

    /// Target of the pending fetch, if any.
    pub fn pending_target(&self) -> Option<&str> {
        self.in_flight.as_ref().map(|f| f.target.as_str())
    }

    /// Abort the pending fetch, if any.
    pub fn cancel(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            previous.handle.abort();
            tracing::debug!(target_name = %previous.target, "hint fetch aborted");
        }
    }

    /// Wait for the pending fetch. Returns `None` when nothing was
    /// requested. A failed task yields empty tiers.
    pub async fn wait(&mut self) -> Option<(String, HintTiers)> {
        let InFlight { target, handle } = self.in_flight.take()?;
        match handle.await {
            Ok(tiers) => Some((target, tiers)),
            Err(e) => {
                tracing::warn!("hint task for {target} did not finish: {e}");
                Some((target, HintTiers::default()))
            }
        }
    }
}

impl Drop for HintLoader {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Fetch and tier hints for `target`. Fetch failures degrade to empty tiers.
pub async fn load_hints(
    source: &dyn MarkupSource,
    target: &str,
    config: &HintLoaderConfig,
) -> HintTiers {
    match fetch_with_retry(source, target, config).await {
        Ok(raw) => {
            let tiers = hints_from_markup(&raw, target);
            if tiers.is_empty() {
                tracing::warn!("no hint text extracted for {target}");
            }
            tiers
        }
        Err(e) => {
            tracing::warn!("no hint available for {target}: {e:#}");
            HintTiers::default()
        }
    }
}

/// Fetch raw markup, retrying transient errors with exponential backoff.
pub async fn fetch_with_retry(
    source: &dyn MarkupSource,
    target: &str,
    config: &HintLoaderConfig,
) -> Result<RawMarkup> {
    let mut last_error = None;
    let mut retry_delay = config.retry_delay;

    for retry in 0..=config.max_retries {
        if retry > 0 {
            tokio::time::sleep(retry_delay).await;
            retry_delay = (retry_delay * 2).min(Duration::from_secs(60));
        }
        match source.fetch_raw_markup(target).await {
            Ok(raw) => return Ok(raw),
            Err(e) => {
                if let Some(source_err) = e.downcast_ref::<SourceError>() {
                    if source_err.is_permanent() {
                        return Err(e);
                    }
                    // Honor the source's retry-after hint
                    if let Some(ms) = source_err.retry_after_ms() {
                        retry_delay = Duration::from_millis(ms);
                    }
                }
                tracing::debug!(
                    source = source.name(),
                    retry,
                    "fetch for {target} failed: {e:#}"
                );
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error")))
}
