//! The `biotrivia play` command.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use biotrivia_core::apply_event;
use biotrivia_core::engine::HintLoader;
use biotrivia_core::model::{GameEvent, HintTier, HintTiers, RunState, RunStatus};
use biotrivia_core::pools::{parse_pools, validate_pools, TieredPools};
use biotrivia_core::report::{RunSummary, SavedRun};

use super::summary::print_run_table;
use super::{load_config, loader_config, resolve_source};

/// Targets that have built-in sample articles.
const OFFLINE_TARGETS: &[&str] = &["Marie Curie", "Ada Lovelace", "Albert Einstein"];

pub async fn execute(
    seed: Option<u64>,
    pools_path: Option<PathBuf>,
    offline: bool,
    no_save: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path)?;

    let pools = match pools_path.or_else(|| config.pools.clone()) {
        Some(path) => parse_pools(&path)?,
        None if offline => TieredPools::uniform(OFFLINE_TARGETS),
        None => TieredPools::default(),
    };
    for warning in validate_pools(&pools) {
        tracing::warn!("pools: {}", warning.message);
    }

    let source = resolve_source(&config, offline, false)?;
    let source_name = source.name().to_string();
    let mut loader = HintLoader::new(source, loader_config(&config));

    let seed = seed.unwrap_or_else(|| chrono::Utc::now().timestamp_micros() as u64);
    let mut state = apply_event(&pools, &RunState::default(), &GameEvent::Start { seed });

    println!("biotrivia v{} (seed {seed})", env!("CARGO_PKG_VERSION"));
    println!("Name the person. Type :hint for more, :quit to stop.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tiers = HintTiers::default();
    let mut question: Option<(u32, String)> = None;
    let mut asked_at = Instant::now();

    while state.status == RunStatus::Active {
        let Some(target) = state.current_target.clone() else {
            println!("No candidates for level {}.", state.level);
            break;
        };

        // A new question starts whenever the level or target changes
        let key = (state.level, target.clone());
        if question.as_ref() != Some(&key) {
            loader.request(&target);
            tiers = loader.wait().await.map(|(_, t)| t).unwrap_or_default();
            println!(
                "\nLevel {} ({}) | lives {} | score {}",
                state.level,
                state.difficulty(),
                state.lives,
                state.score
            );
            print_hint(&tiers, state.hint_tier());
            question = Some(key);
            asked_at = Instant::now();
        }

        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match line.trim() {
            "" => continue,
            ":quit" | ":q" => break,
            ":hint" | ":h" => {
                let before = state.hints_used;
                state = apply_event(&pools, &state, &GameEvent::RevealHint);
                if state.hints_used == before {
                    println!("No more hints for this one.");
                } else {
                    print_hint(&tiers, state.hint_tier());
                }
            }
            guess => {
                let correct_before = state.correct_count;
                state = apply_event(
                    &pools,
                    &state,
                    &GameEvent::Guess {
                        text: guess.to_string(),
                        elapsed_ms: asked_at.elapsed().as_millis() as u64,
                    },
                );
                if state.correct_count > correct_before {
                    let delta = state.log.last().map(|e| e.score_delta).unwrap_or(0);
                    println!("Correct! It was {target}. +{delta} points");
                } else {
                    println!("Wrong. Lives left: {}", state.lives);
                }
            }
        }
    }

    loader.cancel();

    match state.status {
        RunStatus::GameOver => {
            if let Some(target) = &state.current_target {
                println!("\nGame over! The answer was {target}.");
            }
        }
        _ => println!("\nRun ended."),
    }

    let summary = state
        .summary
        .clone()
        .unwrap_or_else(|| RunSummary::from_state(&state));
    print_run_table(&summary);

    if state.status == RunStatus::GameOver && !no_save {
        let saved = SavedRun::new(summary, seed, source_name);
        let path = saved.save_in(&config.output_dir)?;
        eprintln!("Run saved to: {}", path.display());
    }

    Ok(())
}

fn print_hint(tiers: &HintTiers, tier: HintTier) {
    let text = tiers.get(tier);
    if text.is_empty() {
        println!("[{tier}] (no hint available)");
    } else {
        println!("[{tier}]\n{text}");
    }
}
