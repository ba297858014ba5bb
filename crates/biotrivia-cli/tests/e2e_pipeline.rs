//! End-to-end tests driving a run with the mock source.
//!
//! These tests verify that the hint pipeline (fetch → normalize → sections →
//! tiers → redaction) and the run reducer work together the way `play` uses
//! them.

use std::sync::Arc;
use std::time::Duration;

use biotrivia_core::apply_event;
use biotrivia_core::engine::{HintLoader, HintLoaderConfig};
use biotrivia_core::model::{GameEvent, HintTier, RawMarkup, RunState, RunStatus};
use biotrivia_core::pools::TieredPools;
use biotrivia_sources::MockSource;

fn loader(source: Arc<MockSource>) -> HintLoader {
    HintLoader::new(
        source,
        HintLoaderConfig {
            max_retries: 1,
            retry_delay: Duration::from_millis(1),
        },
    )
}

fn guess(text: &str) -> GameEvent {
    GameEvent::Guess {
        text: text.into(),
        elapsed_ms: 2500,
    }
}

#[tokio::test]
async fn e2e_structural_article_hints() {
    let source = Arc::new(MockSource::sample());
    let mut loader = loader(source.clone());

    loader.request("Marie Curie");
    let (target, tiers) = loader.wait().await.unwrap();
    assert_eq!(target, "Marie Curie");

    assert!(tiers.minimal.starts_with("_____ _____ was a Polish"));
    assert!(!tiers.minimal.contains("[1]"));
    assert!(!tiers.minimal.contains("1867"), "infobox leaked: {}", tiers.minimal);
    assert_eq!(
        tiers.medium,
        format!("{}\n\nShe was born in Warsaw.", tiers.minimal)
    );
    assert!(tiers
        .full
        .ends_with("She was born in Warsaw. She moved to Paris in 1891 to continue her studies."));
    assert!(!tiers.full.contains("Biography source"));
    assert_eq!(source.call_count(), 1);
}

#[tokio::test]
async fn e2e_legacy_article_hints() {
    let source = Arc::new(MockSource::sample());
    let mut loader = loader(source);

    loader.request("Ada Lovelace");
    let (_, tiers) = loader.wait().await.unwrap();

    // Wikitext has no sections, so every tier is the summary
    assert_eq!(tiers.minimal, tiers.full);
    assert!(tiers.minimal.contains("1815/12/10"));
    assert!(tiers.minimal.contains("English mathematician and writer."));
    assert!(tiers.minimal.contains("mechanical general-purpose computer"));
    assert!(!tiers.minimal.contains("{{"));
    assert!(!tiers.minimal.contains("Toole"));
    assert!(!tiers.minimal.contains("Lovelace"));
}

#[tokio::test]
async fn e2e_custom_article_with_back_matter() {
    let html = r#"<main>
<p>Grace Hopper was a computer scientist. She led the team behind COBOL.</p>
<p>She retired as a rear admiral.</p>
<h2>See also</h2>
<ul><li>Grace Hopper Celebration</li></ul>
</main>"#;
    let source = Arc::new(MockSource::new([(
        "Grace Hopper".to_string(),
        RawMarkup::Structural(html.to_string()),
    )]));
    let mut loader = loader(source);

    loader.request("Grace Hopper");
    let (_, tiers) = loader.wait().await.unwrap();

    assert_eq!(
        tiers.minimal,
        "_____ _____ was a computer scientist. She led the team behind COBOL."
    );
    assert_eq!(
        tiers.get(HintTier::Medium),
        format!("{}\n\nShe retired as a rear admiral.", tiers.minimal)
    );
    assert!(!tiers.full.contains("Celebration"));
}

#[tokio::test]
async fn e2e_full_run_with_hints() {
    let pools = TieredPools::uniform(&["Marie Curie", "Ada Lovelace", "Albert Einstein"]);
    let source = Arc::new(MockSource::sample());
    let mut loader = loader(source.clone());

    let mut state = apply_event(&pools, &RunState::default(), &GameEvent::Start { seed: 11 });

    // Answer three questions correctly, revealing one hint on the second
    for round in 0..3 {
        let target = state.current_target.clone().unwrap();
        loader.request(&target);
        let (fetched, tiers) = loader.wait().await.unwrap();
        assert_eq!(fetched, target);
        assert!(!tiers.is_empty(), "no hints for {target}");

        if round == 1 {
            state = apply_event(&pools, &state, &GameEvent::RevealHint);
            assert_eq!(state.hint_tier(), HintTier::Medium);
        }
        state = apply_event(&pools, &state, &guess(&target.to_lowercase()));
    }

    assert_eq!(state.level, 4);
    assert_eq!(state.correct_count, 3);
    assert_eq!(state.best_streak, 3);
    // 100, 75 + 10, 100 + 20
    assert_eq!(state.score, 305);

    // All three names were asked once before any repeat
    let mut asked: Vec<_> = state.log.iter().map(|e| e.target.clone()).collect();
    asked.sort();
    asked.dedup();
    assert_eq!(asked.len(), 3);

    // Lose the run
    for _ in 0..3 {
        state = apply_event(&pools, &state, &guess("Someone Else"));
    }
    assert_eq!(state.status, RunStatus::GameOver);
    let summary = state.summary.as_ref().unwrap();
    assert_eq!(summary.questions, 6);
    assert_eq!(summary.total_hints, 1);
    assert_eq!(summary.average_time_ms, 2500);
    assert_eq!(summary.last_target, state.current_target);
    assert_eq!(source.call_count(), 3);
}

#[tokio::test]
async fn e2e_missing_article_degrades() {
    let pools = TieredPools::uniform(&["Hypatia"]);
    let mut loader = loader(Arc::new(MockSource::sample()));

    let state = apply_event(&pools, &RunState::default(), &GameEvent::Start { seed: 1 });
    let target = state.current_target.clone().unwrap();
    loader.request(&target);
    let (_, tiers) = loader.wait().await.unwrap();
    assert!(tiers.is_empty());

    // The run is still playable without hints
    let next = apply_event(&pools, &state, &guess("hypatia"));
    assert_eq!(next.level, 2);
}
