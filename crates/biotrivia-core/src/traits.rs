//! Core trait definitions for markup sources and target pools.
//!
//! Markup sources are implemented by the `biotrivia-sources` crate; pools
//! are implemented here by [`crate::pools::TieredPools`].

use async_trait::async_trait;

use crate::model::{Difficulty, RawMarkup};

// ---------------------------------------------------------------------------
// Markup source trait
// ---------------------------------------------------------------------------

/// Supplies raw article markup for a target name.
///
/// Implementations should return a [`crate::error::SourceError`] inside the
/// `anyhow::Error` so callers can tell permanent failures from transient
/// ones.
#[async_trait]
pub trait MarkupSource: Send + Sync {
    /// Human-readable source name (e.g. "wikipedia").
    fn name(&self) -> &str;

    /// Fetch the raw markup describing `target`.
    async fn fetch_raw_markup(&self, target: &str) -> anyhow::Result<RawMarkup>;
}

// ---------------------------------------------------------------------------
// Pool trait
// ---------------------------------------------------------------------------

/// Fixed, externally defined candidate pools keyed by difficulty.
pub trait PoolSource {
    /// Candidates for a difficulty tier.
    fn pool(&self, difficulty: Difficulty) -> &[String];

    /// Candidates for a level: 11+ hard, 6–10 medium, otherwise easy.
    fn pool_for_level(&self, level: u32) -> &[String] {
        self.pool(Difficulty::for_level(level))
    }
}
