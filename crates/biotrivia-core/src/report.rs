//! Run summaries with JSON persistence.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{QuestionLogEntry, RunState};
use crate::statistics::{accuracy, average_time_ms, total_hints};

/// Final figures for a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Level the run ended on.
    pub final_level: u32,
    pub score: u32,
    /// Guesses graded during the run.
    pub questions: u32,
    pub correct_count: u32,
    /// Correct guesses over graded guesses, 0.0 when none were graded.
    pub accuracy: f64,
    pub best_streak: u32,
    pub total_hints: u32,
    pub average_time_ms: u64,
    /// Target held when the run ended.
    pub last_target: Option<String>,
    pub log: Vec<QuestionLogEntry>,
}

impl RunSummary {
    pub fn from_state(state: &RunState) -> Self {
        Self {
            final_level: state.level,
            score: state.score,
            questions: state.log.len() as u32,
            correct_count: state.correct_count,
            accuracy: accuracy(&state.log),
            best_streak: state.best_streak,
            total_hints: total_hints(&state.log),
            average_time_ms: average_time_ms(&state.log),
            last_target: state.current_target.clone(),
            log: state.log.clone(),
        }
    }
}

/// A run summary stamped for storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedRun {
    /// Unique run identifier.
    pub id: Uuid,
    /// When the run finished.
    pub created_at: DateTime<Utc>,
    /// Seed the run was started with.
    pub seed: u64,
    /// Name of the markup source used for hints.
    pub source: String,
    pub summary: RunSummary,
}

impl SavedRun {
    pub fn new(summary: RunSummary, seed: u64, source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            seed,
            source: source.into(),
            summary,
        }
    }

    /// File name used when saving into an output directory.
    pub fn file_name(&self) -> String {
        format!("run-{}.json", self.created_at.format("%Y%m%d-%H%M%S"))
    }

    /// Save the run as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize run")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write run to {}", path.display()))?;
        Ok(())
    }

    /// Save into `dir` under [`SavedRun::file_name`], returning the path.
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        self.save_json(&path)?;
        Ok(path)
    }

    /// Load a run from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read run from {}", path.display()))?;
        let run: SavedRun = serde_json::from_str(&content).context("failed to parse run JSON")?;
        Ok(run)
    }
}

/// Load every `*.json` run in a directory, oldest first. Files that fail to
/// parse are skipped with a warning.
pub fn load_runs_in(dir: &Path) -> Result<Vec<SavedRun>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut runs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match SavedRun::load_json(&path) {
            Ok(run) => runs.push(run),
            Err(e) => tracing::warn!("skipping {}: {e:#}", path.display()),
        }
    }
    runs.sort_by_key(|r| r.created_at);
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::compute_history_stats;

    fn finished_state() -> RunState {
        RunState {
            level: 3,
            lives: 0,
            correct_count: 2,
            best_streak: 2,
            score: 210,
            current_target: Some("Emmy Noether".into()),
            log: vec![
                QuestionLogEntry {
                    target: "Marie Curie".into(),
                    guess: "marie curie".into(),
                    correct: true,
                    score_delta: 100,
                    hints_used: 0,
                    time_taken_ms: 4000,
                },
                QuestionLogEntry {
                    target: "Ada Lovelace".into(),
                    guess: "ada lovelace".into(),
                    correct: true,
                    score_delta: 110,
                    hints_used: 1,
                    time_taken_ms: 2000,
                },
                QuestionLogEntry {
                    target: "Emmy Noether".into(),
                    guess: "no idea".into(),
                    correct: false,
                    score_delta: 0,
                    hints_used: 2,
                    time_taken_ms: 6000,
                },
            ],
            ..RunState::default()
        }
    }

    #[test]
    fn summary_from_state() {
        let summary = RunSummary::from_state(&finished_state());
        assert_eq!(summary.final_level, 3);
        assert_eq!(summary.questions, 3);
        assert_eq!(summary.total_hints, 3);
        assert_eq!(summary.average_time_ms, 4000);
        assert_eq!(summary.last_target.as_deref(), Some("Emmy Noether"));
        assert!((summary.accuracy - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let run = SavedRun::new(RunSummary::from_state(&finished_state()), 42, "mock");
        let path = run.save_in(&dir.path().join("runs")).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("run-"));

        let loaded = SavedRun::load_json(&path).unwrap();
        assert_eq!(loaded.id, run.id);
        assert_eq!(loaded.summary, run.summary);
    }

    #[test]
    fn load_runs_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let run = SavedRun::new(RunSummary::from_state(&finished_state()), 1, "mock");
        run.save_json(&dir.path().join("a.json")).unwrap();
        std::fs::write(dir.path().join("b.json"), "{not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let runs = load_runs_in(dir.path()).unwrap();
        assert_eq!(runs.len(), 1);

        let stats = compute_history_stats(&runs);
        assert_eq!(stats.runs, 1);
        assert_eq!(stats.best_score, 210);
        assert_eq!(stats.highest_level, 3);
        assert_eq!(stats.questions_answered, 3);
    }
}
