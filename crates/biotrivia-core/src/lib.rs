//! Hint pipeline, guess matching, and the run state machine for biotrivia.
//!
//! Turns encyclopedia markup into progressively revealed hints, decides
//! whether a free-text guess names the target, and drives the level/lives
//! state machine of a quiz run. Everything except [`engine`] is pure and
//! synchronous.

pub mod dom;
pub mod engine;
pub mod error;
pub mod game;
pub mod hints;
pub mod legacy;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod pools;
pub mod report;
pub mod scoring;
pub mod sections;
pub mod statistics;
pub mod traits;

pub use game::apply_event;
pub use hints::tier_hints;
pub use matcher::evaluate_guess;
pub use normalize::normalize_markup;
pub use sections::to_sections;
