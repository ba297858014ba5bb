//! The `biotrivia validate` command.

use std::path::PathBuf;

use anyhow::Result;

use biotrivia_core::pools::{parse_pools, validate_pools, TieredPools};

pub fn execute(pools_path: Option<PathBuf>) -> Result<()> {
    let (label, pools) = match &pools_path {
        Some(path) => (path.display().to_string(), parse_pools(path)?),
        None => ("built-in pools".to_string(), TieredPools::default()),
    };

    println!(
        "Pools: {label} (easy {}, medium {}, hard {})",
        pools.easy.len(),
        pools.medium.len(),
        pools.hard.len()
    );

    let warnings = validate_pools(&pools);
    for w in &warnings {
        let prefix = w
            .difficulty
            .map(|d| format!("  [{d}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Pools valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
