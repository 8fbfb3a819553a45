//! Generative strategies against a scripted service.

mod test_utils;

use test_utils::{Fixture, MockResponse, MockService, dialogue, is_subsequence, target, without_indices};
use troupe_core::{RoleName, count_by_role, parse_script};
use troupe_interface::StrategyKind;
use troupe_rebalance::{Additive, FullRewrite, RebalanceConfig, RebalanceStrategy, Subtractive};

const BASKET: &str = "A: The basket is so heavy today.\nB: Let me see it.\nA: Thank you so much.";

#[tokio::test]
async fn test_additive_result_is_superset() {
    let response = "\
Here you go:
INSERT AFTER 1: B: I can help you carry the basket.
INSERT AFTER END: B: We made it home before dark.
INSERT AFTER 9: B: This anchor does not exist.
INSERT AFTER 2: Z: I am not in this play.
DELETE 1
INSERT AFTER 0: A: One more line for A.";
    let fixture = Fixture::new(MockService::new_success(response), BASKET);
    let input = parse_script(BASKET);

    let outcome = Additive
        .run(&fixture.ctx(), &input, &target(&[("A", 2), ("B", 3)]))
        .await;

    assert!(outcome.satisfied);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(fixture.service.call_count(), 1);
    assert!(is_subsequence(
        &without_indices(input.lines()),
        &without_indices(outcome.script.lines())
    ));
    assert_eq!(
        outcome.script.lines()[1].render(),
        "B: I can help you carry the basket."
    );
    assert_eq!(
        outcome.script.lines()[4].render(),
        "B: We made it home before dark."
    );
    assert!(outcome.warnings.iter().any(|w| w.contains("discarded 4")));
}

#[tokio::test]
async fn test_additive_clamps_surpluses_with_warning() {
    let fixture = Fixture::new(
        MockService::new_success("INSERT AFTER 2: B: I can carry it for you."),
        BASKET,
    );
    let input = parse_script(BASKET);

    let outcome = Additive
        .run(&fixture.ctx(), &input, &target(&[("A", 1), ("B", 2)]))
        .await;

    assert!(!outcome.satisfied);
    let counts = count_by_role(&outcome.script.render());
    assert_eq!(counts[&RoleName::new("A")], 2);
    assert_eq!(counts[&RoleName::new("B")], 2);
    assert!(outcome.warnings.iter().any(|w| w.contains("ignored surpluses")));
}

#[tokio::test]
async fn test_additive_rejects_filler_lines() {
    let fixture = Fixture::new(
        MockService::new_success("INSERT AFTER 2: B: Hmm..."),
        BASKET,
    );
    let input = parse_script(BASKET);

    let outcome = Additive
        .run(&fixture.ctx(), &input, &target(&[("B", 2)]))
        .await;

    assert!(!outcome.satisfied);
    assert_eq!(outcome.attempts, 3);
    assert_eq!(outcome.script, input);
}

const KEY: &str = "\
A: We need to find the key.
B: Maybe it is under the mat.
A: Let me check there.
A: Found it!";

#[tokio::test]
async fn test_subtractive_keeps_dialogue_subsequence() {
    let response = "\
DELETE 1
DELETE 4
DELETE 2
INSERT AFTER 1: (They look around.)
INSERT AFTER 2: This is dialogue, not a direction.";
    let fixture = Fixture::new(MockService::new_success(response), KEY);
    let input = parse_script(KEY);

    let outcome = Subtractive
        .run(&fixture.ctx(), &input, &target(&[("A", 1), ("B", 1)]))
        .await;

    assert!(outcome.satisfied);
    assert_eq!(outcome.attempts, 1);
    assert!(is_subsequence(
        &dialogue(outcome.script.lines()),
        &dialogue(input.lines())
    ));
    let rendered: Vec<String> = outcome.script.lines().iter().map(|l| l.render()).collect();
    assert_eq!(
        rendered,
        vec![
            "(They look around.)",
            "B: Maybe it is under the mat.",
            "A: Let me check there.",
        ]
    );
    assert!(outcome.warnings.iter().any(|w| w.contains("discarded 2")));
}

#[tokio::test]
async fn test_subtractive_rejects_long_connective() {
    let mut config = RebalanceConfig::default();
    config.max_connective_chars = 10;
    let response = "DELETE 4\nINSERT AFTER 3: (Everyone slowly turns toward the glittering door.)";
    let fixture = Fixture::with_config(MockService::new_success(response), KEY, config);

    let outcome = Subtractive
        .run(&fixture.ctx(), &parse_script(KEY), &target(&[("A", 2)]))
        .await;

    assert!(outcome.satisfied);
    assert_eq!(outcome.script.len(), 3);
}

#[tokio::test]
async fn test_subtractive_ignores_deficits() {
    let fixture = Fixture::new(MockService::new_success("DELETE 3"), KEY);

    let outcome = Subtractive
        .run(&fixture.ctx(), &parse_script(KEY), &target(&[("A", 2), ("B", 3)]))
        .await;

    let counts = count_by_role(&outcome.script.render());
    assert_eq!(counts[&RoleName::new("A")], 2);
    assert_eq!(counts[&RoleName::new("B")], 1);
    assert!(!outcome.satisfied);
    assert!(outcome.warnings.iter().any(|w| w.contains("ignored deficits")));
    assert_eq!(Subtractive.kind(), StrategyKind::Subtractive);
}

#[tokio::test]
async fn test_full_rewrite_keeps_earliest_best_draft() {
    let first = "A: We need to find the key.\nB: Maybe it is under the mat.\nA: Found it!";
    let second = "A: Where could the key be?\nB: Check under the mat.\nA: Got it!";
    let service = MockService::new_sequence(vec![
        MockResponse::Error,
        MockResponse::Text("(Only a stage direction.)".to_string()),
        MockResponse::Text(first.to_string()),
        MockResponse::Text(second.to_string()),
    ]);
    let fixture = Fixture::new(service, KEY);

    let outcome = FullRewrite
        .run(&fixture.ctx(), &parse_script(KEY), &target(&[("A", 1), ("B", 1)]))
        .await;

    assert!(!outcome.satisfied);
    assert_eq!(outcome.attempts, 4);
    assert_eq!(fixture.service.call_count(), 4);
    assert_eq!(outcome.script.render(), first);
    let prompt = fixture.service.last_prompt().expect("prompt sent");
    assert!(prompt.contains("Only fix the discrepancies"));
    assert!(prompt.contains("- A: now 2 lines, target 1 lines"));
}

#[tokio::test]
async fn test_full_rewrite_demotes_invented_speakers() {
    let draft = "A: We need to find the key.\nC: I am a brand new character.\nB: Maybe it is under the mat.";
    let fixture = Fixture::new(MockService::new_success(draft), KEY);

    let outcome = FullRewrite
        .run(&fixture.ctx(), &parse_script(KEY), &target(&[("A", 1), ("B", 1)]))
        .await;

    assert!(outcome.satisfied);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(
        outcome.script.lines()[1].render(),
        "(C: I am a brand new character.)"
    );
    assert!(outcome.warnings.iter().any(|w| w.contains("unknown speakers")));
}

#[tokio::test]
async fn test_full_rewrite_does_not_count_filler() {
    let fixture = Fixture::new(MockService::new_success("A: ...\nB: Um."), KEY);

    let outcome = FullRewrite
        .run(&fixture.ctx(), &parse_script(KEY), &target(&[("A", 1), ("B", 1)]))
        .await;

    assert!(!outcome.satisfied);
    assert_eq!(outcome.attempts, 4);
    assert_eq!(outcome.script.render(), KEY);
    assert!(outcome.warnings.iter().any(|w| w.contains("filler")));
}

#[tokio::test]
async fn test_full_rewrite_demotes_filler_lines() {
    let service = MockService::new_sequence(vec![MockResponse::Text(
        "A: We need to find the key.\nB: Um.".to_string(),
    )]);
    let fixture = Fixture::new(service, KEY);

    let outcome = FullRewrite
        .run(&fixture.ctx(), &parse_script(KEY), &target(&[("A", 1), ("B", 1)]))
        .await;

    assert!(!outcome.satisfied);
    assert_eq!(outcome.script.render(), "A: We need to find the key.\n(Um.)");
    assert_eq!(
        count_by_role(&outcome.script.render()).get(&RoleName::new("B")),
        None
    );
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_calls_cost_attempts() {
    let mut config = RebalanceConfig::default();
    config.call_timeout_secs = 1;
    let fixture = Fixture::with_config(MockService::new_hang(), BASKET, config);

    let outcome = Additive
        .run(&fixture.ctx(), &parse_script(BASKET), &target(&[("B", 2)]))
        .await;

    assert_eq!(outcome.attempts, 3);
    assert_eq!(outcome.warnings.len(), 3);
    assert!(!outcome.satisfied);
}
