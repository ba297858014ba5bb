//! Source configuration and factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use biotrivia_core::traits::MarkupSource;

use crate::mock::MockSource;
use crate::wikipedia::{WikipediaSource, DEFAULT_TIMEOUT_SECS};

/// Configuration for the markup source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    Wikipedia {
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        user_agent: Option<String>,
        /// Fetch lead-section wikitext instead of rendered HTML.
        #[serde(default)]
        legacy: bool,
        #[serde(default = "default_timeout")]
        timeout_secs: u64,
    },
    Mock {
        /// Directory of `<name>.html` / `<name>.wiki` articles; built-in
        /// samples when absent.
        #[serde(default)]
        articles_dir: Option<PathBuf>,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Wikipedia {
            base_url: None,
            user_agent: None,
            legacy: false,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Top-level biotrivia configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiotriviaConfig {
    /// Where hint markup comes from.
    #[serde(default)]
    pub source: SourceConfig,
    /// Pool file; built-in pools when absent.
    #[serde(default)]
    pub pools: Option<PathBuf>,
    /// Max retries on transient fetch errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Output directory for run summaries.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    500
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./biotrivia-runs")
}

impl Default for BiotriviaConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            pools: None,
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            output_dir: default_output_dir(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Unset variables resolve to the empty string.
pub fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Resolve env vars in a source config.
fn resolve_source_config(config: &SourceConfig) -> SourceConfig {
    match config {
        SourceConfig::Wikipedia {
            base_url,
            user_agent,
            legacy,
            timeout_secs,
        } => SourceConfig::Wikipedia {
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            user_agent: user_agent.as_ref().map(|u| resolve_env_vars(u)),
            legacy: *legacy,
            timeout_secs: *timeout_secs,
        },
        SourceConfig::Mock { articles_dir } => SourceConfig::Mock {
            articles_dir: articles_dir.as_deref().map(resolve_path),
        },
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `biotrivia.toml` in the current directory
/// 2. `~/.config/biotrivia/config.toml`
///
/// Environment variable override: `BIOTRIVIA_WIKI_URL` sets the Wikipedia
/// base URL.
pub fn load_config_from(path: Option<&Path>) -> Result<BiotriviaConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("biotrivia.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => BiotriviaConfig::default(),
    };

    // Apply env var overrides
    if let Ok(url) = std::env::var("BIOTRIVIA_WIKI_URL") {
        if let SourceConfig::Wikipedia { base_url, .. } = &mut config.source {
            *base_url = Some(url);
        }
    }

    config.source = resolve_source_config(&config.source);
    config.pools = config.pools.as_deref().map(resolve_path);
    config.output_dir = resolve_path(&config.output_dir);

    Ok(config)
}

/// Parse a config TOML string.
pub fn parse_config_str(content: &str) -> Result<BiotriviaConfig> {
    Ok(toml::from_str::<BiotriviaConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("biotrivia"))
}

/// Create a markup source from its configuration.
pub fn create_source(config: &SourceConfig) -> Result<Arc<dyn MarkupSource>> {
    match config {
        SourceConfig::Wikipedia {
            base_url,
            user_agent,
            legacy,
            timeout_secs,
        } => Ok(Arc::new(
            WikipediaSource::new(base_url.clone(), user_agent.clone(), *timeout_secs)
                .with_legacy(*legacy),
        )),
        SourceConfig::Mock { articles_dir } => match articles_dir {
            Some(dir) => Ok(Arc::new(MockSource::from_dir(dir)?)),
            None => Ok(Arc::new(MockSource::sample())),
        },
    }
}
