//! Run state machine.
//!
//! [`apply_event`] is a pure reducer: the same pools, state and event always
//! produce the same next state. Randomness comes from a [`StdRng`] seeded
//! with the run seed and the draw counter held in the state.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::matcher::{evaluate_guess, target_key};
use crate::model::{GameEvent, QuestionLogEntry, RunState, RunStatus, MAX_HINTS, MAX_LIVES};
use crate::pools::select_target;
use crate::report::RunSummary;
use crate::scoring::score_for_correct;
use crate::traits::PoolSource;

/// Golden-ratio increment for mixing the draw counter into the seed.
const DRAW_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Compute the state that follows `event`.
///
/// Events that do not apply to the current status return an unchanged
/// copy of `state`.
pub fn apply_event<P: PoolSource + ?Sized>(
    pools: &P,
    state: &RunState,
    event: &GameEvent,
) -> RunState {
    let mut next = state.clone();

    match event {
        GameEvent::Start { seed } => {
            next = RunState {
                seed: *seed,
                status: RunStatus::Active,
                ..RunState::default()
            };
            draw_target(pools, &mut next);
        }
        GameEvent::Continue => {
            if state.status == RunStatus::GameOver {
                return next;
            }
            next.status = RunStatus::Active;
            if next.current_target.is_none() {
                draw_target(pools, &mut next);
            }
        }
        GameEvent::Guess { text, elapsed_ms } => {
            if state.status != RunStatus::Active {
                return next;
            }
            let Some(target) = state.current_target.clone() else {
                return next;
            };
            grade_guess(pools, &mut next, target, text, *elapsed_ms);
        }
        GameEvent::RevealHint => {
            if state.status == RunStatus::Active && state.current_target.is_some() {
                next.hints_used = (state.hints_used + 1).min(MAX_HINTS);
            }
        }
        GameEvent::Reset => {
            next = RunState {
                seed: state.seed,
                ..RunState::default()
            };
        }
    }

    next
}

fn grade_guess<P: PoolSource + ?Sized>(
    pools: &P,
    state: &mut RunState,
    target: String,
    guess: &str,
    elapsed_ms: u64,
) {
    let correct = evaluate_guess(guess, &target);
    let difficulty = state.difficulty();

    let score_delta = if correct {
        state.streak += 1;
        state.best_streak = state.best_streak.max(state.streak);
        state.correct_count += 1;
        state.lives = (state.lives + 1).min(MAX_LIVES);
        score_for_correct(difficulty, state.hints_used, state.streak)
    } else {
        state.streak = 0;
        state.lives = state.lives.saturating_sub(1);
        0
    };
    state.score += score_delta;

    tracing::debug!(
        target_name = %target,
        correct,
        score_delta,
        lives = state.lives,
        "graded guess"
    );

    state.log.push(QuestionLogEntry {
        target,
        guess: guess.to_string(),
        correct,
        score_delta,
        hints_used: state.hints_used,
        time_taken_ms: elapsed_ms,
    });

    if correct {
        state.level += 1;
        state.hints_used = 0;
        draw_target(pools, state);
    } else if state.lives == 0 {
        state.status = RunStatus::GameOver;
        state.summary = Some(RunSummary::from_state(state));
    }
}

/// Draw the next target for the state's level. An empty pool leaves the
/// run without a target.
fn draw_target<P: PoolSource + ?Sized>(pools: &P, state: &mut RunState) {
    let pool = pools.pool_for_level(state.level);
    let mut rng = StdRng::seed_from_u64(state.seed ^ state.draws.wrapping_mul(DRAW_MIX));
    state.draws += 1;

    match select_target(pool, &state.asked, &mut rng) {
        Some(name) => {
            let key = target_key(&name);
            if !state.asked.contains(&key) {
                state.asked.push(key);
            }
            state.current_target = Some(name);
        }
        None => {
            tracing::warn!(level = state.level, "no candidates for level");
            state.current_target = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pools::TieredPools;

    fn guess(text: &str) -> GameEvent {
        GameEvent::Guess {
            text: text.into(),
            elapsed_ms: 1500,
        }
    }

    fn active(pools: &TieredPools) -> RunState {
        apply_event(pools, &RunState::default(), &GameEvent::Start { seed: 9 })
    }

    #[test]
    fn start_draws_a_target() {
        let pools = TieredPools::uniform(&["Marie Curie"]);
        let state = active(&pools);
        assert_eq!(state.status, RunStatus::Active);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.current_target.as_deref(), Some("Marie Curie"));
        assert_eq!(state.asked, vec!["mariecurie".to_string()]);
    }

    #[test]
    fn near_miss_guess_advances_and_clamps_lives() {
        let pools = TieredPools::uniform(&["Marie Curie"]);
        let state = active(&pools);
        let next = apply_event(&pools, &state, &guess("Mari Curie"));

        assert_eq!(next.level, 2);
        assert_eq!(next.lives, 3);
        assert_eq!(next.correct_count, 1);
        assert_eq!(next.streak, 1);
        assert_eq!(next.score, 100);
        assert_eq!(next.log.len(), 1);
        assert!(next.log[0].correct);
        // exhausted pool repeats
        assert_eq!(next.current_target.as_deref(), Some("Marie Curie"));
    }

    #[test]
    fn two_letter_miss_costs_a_life() {
        let pools = TieredPools::uniform(&["Marie Curie"]);
        let state = active(&pools);
        let next = apply_event(&pools, &state, &guess("Mary Curie"));
        assert_eq!(next.level, 1);
        assert_eq!(next.lives, 2);
        assert_eq!(next.current_target.as_deref(), Some("Marie Curie"));
    }

    #[test]
    fn last_life_lost_ends_run_and_keeps_target() {
        let pools = TieredPools::uniform(&["Marie Curie"]);
        let state = RunState {
            lives: 1,
            ..active(&pools)
        };
        let next = apply_event(&pools, &state, &guess("Isaac Newton"));

        assert_eq!(next.lives, 0);
        assert_eq!(next.status, RunStatus::GameOver);
        assert_eq!(next.current_target.as_deref(), Some("Marie Curie"));
        let summary = next.summary.as_ref().unwrap();
        assert_eq!(summary.questions, 1);
        assert_eq!(summary.last_target.as_deref(), Some("Marie Curie"));

        // no further grading once over
        let after = apply_event(&pools, &next, &guess("Marie Curie"));
        assert_eq!(after, next);
        assert_eq!(apply_event(&pools, &next, &GameEvent::Continue), next);
    }

    #[test]
    fn hints_cap_and_reset_on_new_target() {
        let pools = TieredPools::uniform(&["Ada Lovelace", "Alan Turing"]);
        let mut state = active(&pools);
        for _ in 0..5 {
            state = apply_event(&pools, &state, &GameEvent::RevealHint);
        }
        assert_eq!(state.hints_used, 2);

        let target = state.current_target.clone().unwrap();
        let next = apply_event(&pools, &state, &guess(&target));
        assert_eq!(next.score, 50);
        assert_eq!(next.log[0].hints_used, 2);
        assert_eq!(next.hints_used, 0);
    }

    #[test]
    fn draws_avoid_repeats_until_exhausted() {
        let pools = TieredPools::uniform(&["Ada Lovelace", "Alan Turing", "Grace Hopper"]);
        let mut state = active(&pools);
        let mut seen = Vec::new();
        for _ in 0..3 {
            let target = state.current_target.clone().unwrap();
            seen.push(target.clone());
            state = apply_event(&pools, &state, &guess(&target));
        }
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 3);
        assert!(state.current_target.is_some());
        assert_eq!(state.streak, 3);
        // 100 + 110 + 120
        assert_eq!(state.score, 330);
    }

    #[test]
    fn same_seed_same_targets() {
        let pools = TieredPools::default();
        let a = apply_event(&pools, &RunState::default(), &GameEvent::Start { seed: 77 });
        let b = apply_event(&pools, &RunState::default(), &GameEvent::Start { seed: 77 });
        assert_eq!(a, b);
    }

    #[test]
    fn level_selects_pool_tier() {
        let pools = TieredPools {
            easy: vec!["Cleopatra".into()],
            medium: vec!["Ada Lovelace".into()],
            hard: vec!["Emmy Noether".into()],
        };
        let mut state = active(&pools);
        for _ in 0..10 {
            let target = state.current_target.clone().unwrap();
            state = apply_event(&pools, &state, &guess(&target));
        }
        assert_eq!(state.level, 11);
        assert_eq!(state.current_target.as_deref(), Some("Emmy Noether"));
    }

    #[test]
    fn reset_returns_to_idle() {
        let pools = TieredPools::uniform(&["Marie Curie"]);
        let state = apply_event(&pools, &active(&pools), &guess("Marie Curie"));
        let reset = apply_event(&pools, &state, &GameEvent::Reset);
        assert_eq!(reset.status, RunStatus::Idle);
        assert_eq!(reset.level, 1);
        assert_eq!(reset.lives, 3);
        assert!(reset.current_target.is_none());
        assert!(reset.log.is_empty());
    }

    #[test]
    fn continue_draws_when_no_target_held() {
        let pools = TieredPools::uniform(&["Marie Curie"]);
        let idle = RunState::default();
        let next = apply_event(&pools, &idle, &GameEvent::Continue);
        assert_eq!(next.status, RunStatus::Active);
        assert_eq!(next.current_target.as_deref(), Some("Marie Curie"));

        let again = apply_event(&pools, &next, &GameEvent::Continue);
        assert_eq!(again, next);
    }

    #[test]
    fn idle_ignores_guesses_and_hints() {
        let pools = TieredPools::uniform(&["Marie Curie"]);
        let idle = RunState::default();
        assert_eq!(apply_event(&pools, &idle, &guess("Marie Curie")), idle);
        assert_eq!(apply_event(&pools, &idle, &GameEvent::RevealHint), idle);
    }

    #[test]
    fn empty_pool_leaves_no_target() {
        let pools = TieredPools {
            easy: vec![],
            medium: vec![],
            hard: vec![],
        };
        let state = active(&pools);
        assert_eq!(state.status, RunStatus::Active);
        assert!(state.current_target.is_none());
        assert_eq!(apply_event(&pools, &state, &guess("anyone")), state);
    }
}
