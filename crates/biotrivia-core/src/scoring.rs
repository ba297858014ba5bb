//! Points awarded for a correct answer.

use crate::model::{Difficulty, MAX_HINTS};

/// Points for a correct answer at the easiest tier with no hints.
pub const BASE_POINTS: u32 = 100;

/// Percentage of the tier points lost per hint revealed.
pub const HINT_PENALTY_PERCENT: u32 = 25;

/// Bonus per consecutive correct answer beyond the first.
pub const STREAK_BONUS: u32 = 10;

/// Score for a correct answer.
///
/// `streak` is the streak *including* this answer, so a first correct
/// answer earns no bonus.
pub fn score_for_correct(difficulty: Difficulty, hints_used: u32, streak: u32) -> u32 {
    let tier_points = BASE_POINTS * difficulty.multiplier();
    let penalty = HINT_PENALTY_PERCENT * hints_used.min(MAX_HINTS);
    let after_hints = tier_points * (100 - penalty) / 100;
    after_hints + STREAK_BONUS * streak.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_points_scale_with_difficulty() {
        assert_eq!(score_for_correct(Difficulty::Easy, 0, 1), 100);
        assert_eq!(score_for_correct(Difficulty::Medium, 0, 1), 200);
        assert_eq!(score_for_correct(Difficulty::Hard, 0, 1), 300);
    }

    #[test]
    fn hints_reduce_points_and_cap() {
        assert_eq!(score_for_correct(Difficulty::Easy, 1, 1), 75);
        assert_eq!(score_for_correct(Difficulty::Easy, 2, 1), 50);
        assert_eq!(score_for_correct(Difficulty::Easy, 9, 1), 50);
    }

    #[test]
    fn streak_bonus_after_first() {
        assert_eq!(score_for_correct(Difficulty::Easy, 0, 0), 100);
        assert_eq!(score_for_correct(Difficulty::Easy, 0, 4), 130);
        assert_eq!(score_for_correct(Difficulty::Hard, 2, 3), 170);
    }
}
