//! Subcommand implementations and the helpers they share.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use biotrivia_core::engine::HintLoaderConfig;
use biotrivia_core::traits::MarkupSource;
use biotrivia_sources::{create_source, BiotriviaConfig, MockSource, SourceConfig};

pub mod check;
pub mod hints;
pub mod init;
pub mod normalize;
pub mod play;
pub mod summary;
pub mod validate;

/// Markup source for a command: the built-in samples when offline,
/// otherwise the configured source, switched to wikitext when `legacy`.
pub(crate) fn resolve_source(
    config: &BiotriviaConfig,
    offline: bool,
    legacy: bool,
) -> Result<Arc<dyn MarkupSource>> {
    if offline {
        return Ok(Arc::new(MockSource::sample()));
    }
    let mut source_config = config.source.clone();
    if legacy {
        if let SourceConfig::Wikipedia { legacy: l, .. } = &mut source_config {
            *l = true;
        }
    }
    create_source(&source_config)
}

pub(crate) fn loader_config(config: &BiotriviaConfig) -> HintLoaderConfig {
    HintLoaderConfig {
        max_retries: config.max_retries,
        retry_delay: Duration::from_millis(config.retry_delay_ms),
    }
}

/// Read a whole file, or stdin when no path is given.
pub(crate) fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

pub(crate) fn load_config(path: Option<PathBuf>) -> Result<BiotriviaConfig> {
    biotrivia_sources::load_config_from(path.as_deref())
}
