//! Aggregate statistics over question logs and saved runs.

use serde::{Deserialize, Serialize};

use crate::model::QuestionLogEntry;
use crate::report::SavedRun;

/// Fraction of graded guesses that were correct, 0.0 for an empty log.
pub fn accuracy(log: &[QuestionLogEntry]) -> f64 {
    if log.is_empty() {
        return 0.0;
    }
    let correct = log.iter().filter(|e| e.correct).count();
    correct as f64 / log.len() as f64
}

/// Mean answer time in milliseconds, 0 for an empty log.
pub fn average_time_ms(log: &[QuestionLogEntry]) -> u64 {
    if log.is_empty() {
        return 0;
    }
    log.iter().map(|e| e.time_taken_ms).sum::<u64>() / log.len() as u64
}

/// Hints revealed across all graded guesses.
pub fn total_hints(log: &[QuestionLogEntry]) -> u32 {
    log.iter().map(|e| e.hints_used).sum()
}

/// Statistics across many saved runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub runs: usize,
    pub best_score: u32,
    pub average_score: f64,
    pub highest_level: u32,
    pub overall_accuracy: f64,
    pub questions_answered: usize,
}

/// Aggregate saved runs. Accuracy is weighted by questions, not by run.
pub fn compute_history_stats(runs: &[SavedRun]) -> HistoryStats {
    if runs.is_empty() {
        return HistoryStats::default();
    }

    let all_entries: Vec<&QuestionLogEntry> =
        runs.iter().flat_map(|r| r.summary.log.iter()).collect();
    let correct = all_entries.iter().filter(|e| e.correct).count();
    let total_score: u64 = runs.iter().map(|r| r.summary.score as u64).sum();

    HistoryStats {
        runs: runs.len(),
        best_score: runs.iter().map(|r| r.summary.score).max().unwrap_or(0),
        average_score: total_score as f64 / runs.len() as f64,
        highest_level: runs.iter().map(|r| r.summary.final_level).max().unwrap_or(0),
        overall_accuracy: if all_entries.is_empty() {
            0.0
        } else {
            correct as f64 / all_entries.len() as f64
        },
        questions_answered: all_entries.len(),
    }
}
