//! Script workshop requests.

mod test_utils;

use test_utils::{MockResponse, MockService};
use troupe_core::{PracticeTurn, RoleName, extract_roles};
use troupe_error::{GenerationErrorKind, RebalanceErrorKind, TroupeError, TroupeErrorKind};
use troupe_rebalance::{TaskLimits, Workshop, WorkshopConfig};

const LANTERN: &str = "\
(A dark forest.)
Mina: I can't see the path anymore.
Joon: Hold my hand, I brought a lantern.
Mina: You always think of everything.";

fn rebalance_kind(err: &TroupeError) -> Option<&RebalanceErrorKind> {
    match err.kind() {
        TroupeErrorKind::Rebalance(e) => Some(&e.kind),
        _ => None,
    }
}

#[tokio::test]
async fn test_feedback_sends_criteria_and_limits() {
    let workshop = Workshop::new(MockService::new_success("1) Theme: clear and kind."));

    let review = workshop.feedback(LANTERN).await.expect("feedback");

    assert_eq!(review, "1) Theme: clear and kind.");
    let request = workshop.service().last_request().expect("request sent");
    assert_eq!(*request.temperature(), Some(0.4));
    assert_eq!(*request.max_tokens(), Some(1400));
    let prompt = workshop.service().last_prompt().expect("prompt");
    assert!(prompt.contains("7) Spelling and spacing"));
    assert!(prompt.contains("Joon: Hold my hand, I brought a lantern."));
}

#[tokio::test]
async fn test_final_draft_is_held_to_the_original_cast() {
    let answer = "\
```
Scene 1
Mina: I can't see the path anymore.
Owl: Hoo! Follow the river, children.
Joon: Look, the lantern still works!
```";
    let workshop = Workshop::new(MockService::new_success(answer));

    let draft = workshop.final_draft(LANTERN).await.expect("final draft");

    assert_eq!(draft.demoted, 1);
    assert!(draft.script.contains("(Owl: Hoo! Follow the river, children.)"));
    assert!(!draft.script.contains("```"));
    let cast = extract_roles(&draft.script);
    assert!(cast.contains(&RoleName::new("Mina")));
    assert!(!cast.contains(&RoleName::new("Owl")));

    let prompt = workshop.service().last_prompt().expect("prompt");
    assert!(prompt.contains("Use only these characters: Mina, Joon."));
    let request = workshop.service().last_request().expect("request");
    assert_eq!(*request.max_tokens(), Some(2600));
}

#[tokio::test]
async fn test_stage_kit_uses_configured_limits() {
    let config = WorkshopConfig {
        stage_kit: TaskLimits {
            temperature: 0.1,
            max_tokens: 300,
        },
        ..WorkshopConfig::default()
    };
    let workshop = Workshop::with_config(MockService::new_success("| Lantern | Required |"), config);

    let kit = workshop.stage_kit(LANTERN).await.expect("stage kit");

    assert_eq!(kit, "| Lantern | Required |");
    let request = workshop.service().last_request().expect("request");
    assert_eq!(*request.temperature(), Some(0.1));
    assert_eq!(*request.max_tokens(), Some(300));
    assert!(workshop.service().last_prompt().expect("prompt").contains("Safety Notes"));
}

#[tokio::test]
async fn test_session_feedback_lists_each_turn() {
    let workshop = Workshop::new(MockService::new_success("Great pace today!"));
    let turns = vec![
        PracticeTurn::new(RoleName::new("Mina"), "I can't see the path anymore.", "I can't see the path"),
        PracticeTurn::new(RoleName::new("Joon"), "Hold my hand.", "hold my hand"),
    ];

    let notes = workshop.session_feedback(&turns).await.expect("session feedback");

    assert_eq!(notes, "Great pace today!");
    let prompt = workshop.service().last_prompt().expect("prompt");
    assert!(prompt.contains("1. Mina"));
    assert!(prompt.contains("heard: hold my hand"));
    assert!(prompt.contains("match: 1.00"));
}

#[tokio::test]
async fn test_workshop_rejects_empty_input_before_calling() {
    let workshop = Workshop::new(MockService::new_success("unused"));

    let err = workshop.feedback("(An empty stage.)").await.expect_err("no dialogue");
    assert_eq!(rebalance_kind(&err), Some(&RebalanceErrorKind::EmptyRoleSet));

    let err = workshop.session_feedback(&[]).await.expect_err("no turns");
    assert_eq!(rebalance_kind(&err), Some(&RebalanceErrorKind::NoPracticeTurns));

    assert_eq!(workshop.service().call_count(), 0);
}

#[tokio::test]
async fn test_workshop_returns_service_failures() {
    let workshop = Workshop::new(MockService::new_sequence(vec![
        MockResponse::Error,
        MockResponse::Text("   ".to_string()),
    ]));

    let err = workshop.stage_kit(LANTERN).await.expect_err("transport failure");
    assert!(matches!(
        err.kind(),
        TroupeErrorKind::Generation(e) if matches!(e.kind, GenerationErrorKind::Transport(_))
    ));

    let err = workshop.stage_kit(LANTERN).await.expect_err("blank answer");
    assert!(matches!(
        err.kind(),
        TroupeErrorKind::Generation(e) if e.kind == GenerationErrorKind::EmptyResponse
    ));
}

#[tokio::test(start_paused = true)]
async fn test_workshop_call_times_out() {
    let config = WorkshopConfig {
        call_timeout_secs: 2,
        ..WorkshopConfig::default()
    };
    let workshop = Workshop::with_config(MockService::new_hang(), config);

    let err = workshop.feedback(LANTERN).await.expect_err("timeout");

    assert!(matches!(
        err.kind(),
        TroupeErrorKind::Generation(e) if e.kind == GenerationErrorKind::Timeout(2000)
    ));
}
