//! Core data model types for biotrivia.
//!
//! These are the fundamental types shared by the hint pipeline and the run
//! state machine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::report::RunSummary;

/// Raw markup fetched for a target, tagged by dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "dialect", content = "markup", rename_all = "lowercase")]
pub enum RawMarkup {
    /// A rendered HTML fragment of the article.
    Structural(String),
    /// Template-laden wikitext of the lead section.
    Legacy(String),
}

impl RawMarkup {
    /// The unprocessed markup string.
    pub fn as_str(&self) -> &str {
        match self {
            RawMarkup::Structural(s) | RawMarkup::Legacy(s) => s,
        }
    }
}

/// A titled block of article text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

impl Section {
    pub fn new(heading: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            body: body.into(),
        }
    }
}

/// One of the three levels of hint disclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintTier {
    Minimal,
    Medium,
    Full,
}

impl HintTier {
    /// Number of extracted sentences appended to the summary at this tier.
    pub fn sentence_count(self) -> usize {
        match self {
            HintTier::Minimal => 0,
            HintTier::Medium => 1,
            HintTier::Full => 2,
        }
    }

    /// Tier shown after `reveal_count` hints have been requested.
    pub fn for_reveal_count(reveal_count: u32) -> Self {
        match reveal_count {
            0 => HintTier::Minimal,
            1 => HintTier::Medium,
            _ => HintTier::Full,
        }
    }
}

impl fmt::Display for HintTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HintTier::Minimal => write!(f, "minimal"),
            HintTier::Medium => write!(f, "medium"),
            HintTier::Full => write!(f, "full"),
        }
    }
}

impl FromStr for HintTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minimal" | "min" => Ok(HintTier::Minimal),
            "medium" | "med" => Ok(HintTier::Medium),
            "full" => Ok(HintTier::Full),
            other => Err(format!("unknown hint tier: {other}")),
        }
    }
}

/// All three hint strata for one target. Empty strings mean "no hint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintTiers {
    pub minimal: String,
    pub medium: String,
    pub full: String,
}

impl HintTiers {
    pub fn get(&self, tier: HintTier) -> &str {
        match tier {
            HintTier::Minimal => &self.minimal,
            HintTier::Medium => &self.medium,
            HintTier::Full => &self.full,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.minimal.is_empty() && self.medium.is_empty() && self.full.is_empty()
    }
}

/// Difficulty tier of a target pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Level 11 and up draws from the hard pool, 6 through 10 from the
    /// medium pool, everything else from the easy pool.
    pub fn for_level(level: u32) -> Self {
        match level {
            11.. => Difficulty::Hard,
            6..=10 => Difficulty::Medium,
            _ => Difficulty::Easy,
        }
    }

    /// Score multiplier for a correct answer at this difficulty.
    pub fn multiplier(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// Lifecycle status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Idle,
    Active,
    GameOver,
}

/// One graded guess. Appended to the run log and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionLogEntry {
    pub target: String,
    pub guess: String,
    pub correct: bool,
    pub score_delta: u32,
    pub hints_used: u32,
    pub time_taken_ms: u64,
}

/// Maximum number of lives a run can hold.
pub const MAX_LIVES: u32 = 3;

/// Maximum number of hint reveals per question (MEDIUM, then FULL).
pub const MAX_HINTS: u32 = 2;

/// State of one quiz run. Owned by whoever drives the reducer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub level: u32,
    pub lives: u32,
    pub correct_count: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub score: u32,
    pub current_target: Option<String>,
    pub status: RunStatus,
    /// Hints revealed for the current target.
    pub hints_used: u32,
    /// Normalized base-name keys of every target drawn this run.
    #[serde(default)]
    pub asked: Vec<String>,
    /// Seed for deterministic target draws.
    pub seed: u64,
    /// Number of draws made so far; mixed into the seed per draw.
    pub draws: u64,
    #[serde(default)]
    pub log: Vec<QuestionLogEntry>,
    /// Set once on the transition into [`RunStatus::GameOver`].
    #[serde(default)]
    pub summary: Option<RunSummary>,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            level: 1,
            lives: MAX_LIVES,
            correct_count: 0,
            streak: 0,
            best_streak: 0,
            score: 0,
            current_target: None,
            status: RunStatus::Idle,
            hints_used: 0,
            asked: Vec::new(),
            seed: 0,
            draws: 0,
            log: Vec::new(),
            summary: None,
        }
    }
}

impl RunState {
    /// Tier of hint currently unlocked for the held target.
    pub fn hint_tier(&self) -> HintTier {
        HintTier::for_reveal_count(self.hints_used)
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::for_level(self.level)
    }
}

/// Discrete, serialized inputs to the run reducer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// Begin a fresh run.
    Start { seed: u64 },
    /// Re-enter play without resetting progress.
    Continue,
    /// Submit a guess for the current target.
    Guess { text: String, elapsed_ms: u64 },
    /// Reveal the next hint tier for the current target.
    RevealHint,
    /// Abandon the run and return to idle.
    Reset,
}
