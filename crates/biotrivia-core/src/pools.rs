//! Tiered target pools.
//!
//! Built-in defaults, TOML loading, validation, and the draw that excludes
//! names already asked in the current run.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::matcher::target_key;
use crate::model::Difficulty;
use crate::traits::PoolSource;

/// Candidate names grouped by difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredPools {
    #[serde(default)]
    pub easy: Vec<String>,
    #[serde(default)]
    pub medium: Vec<String>,
    #[serde(default)]
    pub hard: Vec<String>,
}

impl PoolSource for TieredPools {
    fn pool(&self, difficulty: Difficulty) -> &[String] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }
}

impl TieredPools {
    /// Same single pool at every difficulty.
    pub fn uniform(names: &[&str]) -> Self {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        Self {
            easy: names.clone(),
            medium: names.clone(),
            hard: names,
        }
    }

    pub fn len(&self) -> usize {
        self.easy.len() + self.medium.len() + self.hard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TieredPools {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|n| n.to_string()).collect();
        Self {
            easy: owned(DEFAULT_EASY),
            medium: owned(DEFAULT_MEDIUM),
            hard: owned(DEFAULT_HARD),
        }
    }
}

const DEFAULT_EASY: &[&str] = &[
    "Albert Einstein",
    "Marie Curie",
    "Isaac Newton",
    "William Shakespeare",
    "Leonardo da Vinci",
    "Abraham Lincoln",
    "Cleopatra",
    "Mahatma Gandhi",
    "Charles Darwin",
    "Wolfgang Amadeus Mozart",
    "Nelson Mandela",
    "Martin Luther King Jr.",
    "Queen Victoria",
    "Pablo Picasso",
    "Napoleon",
];

const DEFAULT_MEDIUM: &[&str] = &[
    "Ada Lovelace",
    "Nikola Tesla",
    "Frida Kahlo",
    "Alan Turing",
    "Florence Nightingale",
    "Galileo Galilei",
    "Johann Sebastian Bach",
    "Vincent van Gogh",
    "Jane Austen",
    "Winston Churchill",
    "Genghis Khan",
    "Joan of Arc",
    "Ludwig van Beethoven",
    "Sigmund Freud",
    "Rosalind Franklin",
];

const DEFAULT_HARD: &[&str] = &[
    "Emmy Noether",
    "Srinivasa Ramanujan",
    "Hypatia",
    "Ibn Battuta",
    "Rosa Luxemburg",
    "Hedy Lamarr",
    "Lise Meitner",
    "Alexander von Humboldt",
    "Mary Anning",
    "Toussaint Louverture",
    "Hildegard of Bingen",
    "Zheng He",
    "Nikolai Lobachevsky",
    "Chien-Shiung Wu",
    "Grace Hopper",
];

/// Pick a name from `pool` whose key is not in `asked`. When every name has
/// been asked, repeats are allowed. `None` only for an empty pool.
pub fn select_target<R: Rng + ?Sized>(
    pool: &[String],
    asked: &[String],
    rng: &mut R,
) -> Option<String> {
    let fresh: Vec<&String> = pool
        .iter()
        .filter(|name| !asked.contains(&target_key(name)))
        .collect();
    if fresh.is_empty() {
        if !pool.is_empty() {
            tracing::debug!("pool exhausted, allowing repeats");
        }
        return pool.choose(rng).cloned();
    }
    fresh.choose(rng).map(|name| (*name).clone())
}

/// Intermediate TOML structure for pool files.
#[derive(Debug, Deserialize)]
struct TomlPoolFile {
    pools: TieredPools,
}

/// Parse a pool TOML file.
pub fn parse_pools(path: &Path) -> Result<TieredPools> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read pool file: {}", path.display()))?;

    parse_pools_str(&content, path)
}

/// Parse a pool TOML string (useful for testing).
pub fn parse_pools_str(content: &str, source_path: &Path) -> Result<TieredPools> {
    let parsed: TomlPoolFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let trim_all = |names: Vec<String>| -> Vec<String> {
        names
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect()
    };

    Ok(TieredPools {
        easy: trim_all(parsed.pools.easy),
        medium: trim_all(parsed.pools.medium),
        hard: trim_all(parsed.pools.hard),
    })
}

/// A warning from pool validation.
#[derive(Debug, Clone)]
pub struct PoolWarning {
    /// The tier the warning concerns, if any.
    pub difficulty: Option<Difficulty>,
    /// Warning message.
    pub message: String,
}

/// Validate pools for common issues.
pub fn validate_pools(pools: &TieredPools) -> Vec<PoolWarning> {
    let mut warnings = Vec::new();
    let tiers = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    // Empty tiers stall a run at that level range
    for difficulty in tiers {
        if pools.pool(difficulty).is_empty() {
            warnings.push(PoolWarning {
                difficulty: Some(difficulty),
                message: format!("{difficulty} pool is empty"),
            });
        }
    }

    // Names that can never be guessed
    for difficulty in tiers {
        for name in pools.pool(difficulty) {
            if target_key(name).is_empty() {
                warnings.push(PoolWarning {
                    difficulty: Some(difficulty),
                    message: format!("'{name}' has no letters to match against"),
                });
            }
        }
    }

    // Duplicates by key, within and across tiers
    let mut seen: HashMap<String, (Difficulty, &str)> = HashMap::new();
    for difficulty in tiers {
        for name in pools.pool(difficulty) {
            let key = target_key(name);
            if key.is_empty() {
                continue;
            }
            if let Some((first_tier, first_name)) = seen.get(&key) {
                warnings.push(PoolWarning {
                    difficulty: Some(difficulty),
                    message: format!(
                        "duplicate name: '{name}' ({difficulty}) matches '{first_name}' ({first_tier})"
                    ),
                });
            } else {
                seen.insert(key, (difficulty, name.as_str()));
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[pools]
easy = ["Marie Curie", "Albert Einstein"]
medium = ["Ada Lovelace"]
hard = ["  Emmy Noether  ", ""]
"#;

    #[test]
    fn parse_valid_toml() {
        let pools = parse_pools_str(VALID_TOML, &PathBuf::from("pools.toml")).unwrap();
        assert_eq!(pools.easy, vec!["Marie Curie", "Albert Einstein"]);
        assert_eq!(pools.hard, vec!["Emmy Noether"]);
        assert_eq!(pools.len(), 4);
    }

    #[test]
    fn parse_missing_tiers_default_empty() {
        let toml = "[pools]\neasy = [\"Cleopatra\"]\n";
        let pools = parse_pools_str(toml, &PathBuf::from("pools.toml")).unwrap();
        assert!(pools.medium.is_empty());
        let warnings = validate_pools(&pools);
        assert!(warnings.iter().any(|w| w.message == "medium pool is empty"));
        assert!(warnings.iter().any(|w| w.message == "hard pool is empty"));
    }

    #[test]
    fn parse_malformed_toml() {
        let result = parse_pools_str("pools = [not valid", &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pools.toml");
        std::fs::write(&path, VALID_TOML).unwrap();
        let pools = parse_pools(&path).unwrap();
        assert_eq!(pools.medium, vec!["Ada Lovelace"]);
        assert!(parse_pools(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn validate_duplicates_across_tiers() {
        let pools = TieredPools {
            easy: vec!["Frédéric Chopin".into()],
            medium: vec!["frederic chopin (composer)".into()],
            hard: vec!["42".into()],
        };
        let warnings = validate_pools(&pools);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
        assert!(warnings.iter().any(|w| w.message.contains("no letters")));
    }

    #[test]
    fn default_pools_are_clean() {
        let pools = TieredPools::default();
        assert!(validate_pools(&pools).is_empty());
        assert_eq!(pools.pool_for_level(1), pools.easy.as_slice());
        assert_eq!(pools.pool_for_level(6), pools.medium.as_slice());
        assert_eq!(pools.pool_for_level(11), pools.hard.as_slice());
    }

    #[test]
    fn select_excludes_asked_until_exhausted() {
        let pool: Vec<String> = vec!["Marie Curie".into(), "Ada Lovelace".into()];
        let mut rng = StdRng::seed_from_u64(7);
        let asked = vec![target_key("Marie Curie")];
        for _ in 0..20 {
            assert_eq!(
                select_target(&pool, &asked, &mut rng).as_deref(),
                Some("Ada Lovelace")
            );
        }
        let all_asked = vec![target_key("Marie Curie"), target_key("Ada Lovelace")];
        assert!(select_target(&pool, &all_asked, &mut rng).is_some());
        assert!(select_target(&[], &all_asked, &mut rng).is_none());
    }
}
