//! The `biotrivia hints` command.

use std::path::PathBuf;

use anyhow::Result;

use biotrivia_core::engine::HintLoader;
use biotrivia_core::model::HintTier;

use super::{load_config, loader_config, resolve_source};

pub async fn execute(
    target: String,
    tier: Option<String>,
    legacy: bool,
    offline: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let tier = tier
        .map(|t| t.parse::<HintTier>().map_err(anyhow::Error::msg))
        .transpose()?;
    let config = load_config(config_path)?;
    let source = resolve_source(&config, offline, legacy)?;

    let mut loader = HintLoader::new(source, loader_config(&config));
    loader.request(&target);
    let Some((_, tiers)) = loader.wait().await else {
        anyhow::bail!("hint request for {target} was dropped");
    };

    if tiers.is_empty() {
        println!("No hint available for {target}.");
        return Ok(());
    }

    let selected = match tier {
        Some(t) => vec![t],
        None => vec![HintTier::Minimal, HintTier::Medium, HintTier::Full],
    };
    for (i, t) in selected.into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("[{t}]");
        println!("{}", tiers.get(t));
    }
    Ok(())
}
