//! Property tests for debounce and bounded history over arbitrary sign streams

use gestura_core::{GestureLabel, Handedness};
use gestura_runtime::TranslatorConfig;
use gestura_test::Harness;
use proptest::prelude::*;

fn step() -> impl Strategy<Value = Option<GestureLabel>> {
    proptest::option::of(proptest::sample::select(GestureLabel::all().to_vec()))
}

/// Signs in script order with repeats collapsed; gaps keep the last sign
fn transitions(script: &[Option<GestureLabel>]) -> Vec<GestureLabel> {
    let mut out: Vec<GestureLabel> = Vec::new();
    for label in script.iter().flatten() {
        if out.last() != Some(label) {
            out.push(*label);
        }
    }
    out
}

proptest! {
    #[test]
    fn spoken_once_per_transition(script in proptest::collection::vec(step(), 0..64)) {
        let mut harness = Harness::right_handed();
        harness.play(&script);

        let expected: Vec<String> = transitions(&script).iter().map(|l| l.to_string()).collect();
        prop_assert_eq!(harness.spoken(), expected);
        prop_assert_eq!(harness.current(), transitions(&script).last().copied());
    }

    #[test]
    fn history_is_the_latest_transitions(
        script in proptest::collection::vec(step(), 0..64),
        capacity in 1usize..8,
    ) {
        let mut config = TranslatorConfig::new(Handedness::Right);
        config.history_capacity = capacity;
        let mut harness = Harness::new(&config);
        harness.play(&script);

        let all = transitions(&script);
        let tail = all[all.len().saturating_sub(capacity)..].to_vec();
        let history = harness.history();
        prop_assert!(history.len() <= capacity);
        prop_assert_eq!(&history, &tail);
        for pair in history.windows(2) {
            prop_assert_ne!(pair[0], pair[1]);
        }
    }
}
