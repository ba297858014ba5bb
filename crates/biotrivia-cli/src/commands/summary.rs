//! The `biotrivia summary` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use biotrivia_core::report::{load_runs_in, RunSummary, SavedRun};
use biotrivia_core::statistics::{compute_history_stats, HistoryStats};

pub fn execute(file: Option<PathBuf>, dir: Option<PathBuf>, format: String) -> Result<()> {
    match (file, dir) {
        (Some(path), _) => {
            let run = SavedRun::load_json(&path)?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&run)?);
            } else {
                println!(
                    "Run {} ({}, seed {}, source {})",
                    run.id,
                    run.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    run.seed,
                    run.source
                );
                print_run_table(&run.summary);
                print_log_table(&run.summary);
            }
        }
        (None, Some(dir)) => {
            let runs = load_runs_in(&dir)?;
            anyhow::ensure!(!runs.is_empty(), "no saved runs in {}", dir.display());
            let stats = compute_history_stats(&runs);
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_history_table(&stats);
            }
        }
        (None, None) => anyhow::bail!("pass --file or --dir"),
    }
    Ok(())
}

pub(crate) fn print_run_table(summary: &RunSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        "Level",
        "Score",
        "Correct",
        "Accuracy",
        "Best streak",
        "Hints",
        "Avg time",
    ]);
    table.add_row(vec![
        Cell::new(summary.final_level),
        Cell::new(summary.score),
        Cell::new(format!("{}/{}", summary.correct_count, summary.questions)),
        Cell::new(format!("{:.1}%", summary.accuracy * 100.0)),
        Cell::new(summary.best_streak),
        Cell::new(summary.total_hints),
        Cell::new(format!("{:.1}s", summary.average_time_ms as f64 / 1000.0)),
    ]);
    println!("{table}");
}

fn print_log_table(summary: &RunSummary) {
    if summary.log.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["#", "Target", "Guess", "Result", "Points", "Hints", "Time"]);
    for (i, entry) in summary.log.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&entry.target),
            Cell::new(&entry.guess),
            Cell::new(if entry.correct { "correct" } else { "wrong" }),
            Cell::new(entry.score_delta),
            Cell::new(entry.hints_used),
            Cell::new(format!("{}ms", entry.time_taken_ms)),
        ]);
    }
    println!("{table}");
}

fn print_history_table(stats: &HistoryStats) {
    let mut table = Table::new();
    table.set_header(vec![
        "Runs",
        "Best score",
        "Avg score",
        "Highest level",
        "Questions",
        "Accuracy",
    ]);
    table.add_row(vec![
        Cell::new(stats.runs),
        Cell::new(stats.best_score),
        Cell::new(format!("{:.1}", stats.average_score)),
        Cell::new(stats.highest_level),
        Cell::new(stats.questions_answered),
        Cell::new(format!("{:.1}%", stats.overall_accuracy * 100.0)),
    ]);
    println!("{table}");
}
