//! End-to-end rebalancing.

mod test_utils;

use test_utils::{MockResponse, MockService, target};
use troupe_core::{RoleName, TargetSpec, count_by_role, extract_roles, parse_script};
use troupe_error::{RebalanceErrorKind, TroupeErrorKind};
use troupe_interface::{EditSource, StrategyKind, StrategyPreference};
use troupe_models::OfflineService;
use troupe_rebalance::{RebalanceConfig, Rebalancer};

const PICNIC: &str = "\
(A sunny park. A picnic blanket is spread out.)
Mina: Where did I put the sandwiches?
Joon: I think they are in the blue basket.
Mina: Oh no, the basket is empty!
Sora: Don't worry, I brought extra food.
Joon: You always think ahead, Sora.
Mina: Thanks
(They sit down together.)
Sora: Let's eat before the ants find us.";

fn rebalance_error(err: &troupe_error::TroupeError) -> Option<&RebalanceErrorKind> {
    match err.kind() {
        TroupeErrorKind::Rebalance(e) => Some(&e.kind),
        _ => None,
    }
}

fn assert_exact(script: &str, target: &TargetSpec) {
    let counts = count_by_role(script);
    for (role, want) in target.iter() {
        assert_eq!(
            counts.get(role).copied().unwrap_or(0),
            want,
            "role {} in:\n{}",
            role,
            script
        );
    }
}

#[tokio::test]
async fn test_scenario_demote_and_follow_up() {
    let script = "A: Good morning, everyone. I brought the map.\nB: Where are we going today?\nA: Okay";
    let rebalancer = Rebalancer::new(MockService::new_error());
    let target = target(&[("A", 1), ("B", 2)]);

    let outcome = rebalancer.rebalance(script, &target).await.expect("rebalance");

    assert_exact(&outcome.script, &target);
    let parsed = parse_script(&outcome.script);
    assert_eq!(parsed.lines()[0].render(), "A: Good morning, everyone. I brought the map.");
    assert_eq!(parsed.lines()[1].render(), "B: Where are we going today?");
    assert_eq!(parsed.lines()[2].speaker(), Some(&RoleName::new("B")));
    assert_eq!(parsed.lines()[3].render(), "(Okay)");

    let report = &outcome.report;
    assert!(report.exact());
    assert_eq!(report.strategies(), &vec![StrategyKind::Subtractive, StrategyKind::Additive]);
    assert_eq!(*report.service_attempts(), 6);
    assert_eq!(*report.fallback_steps(), 2);
    assert_eq!(rebalancer.service().call_count(), 6);
    let b = report.role(&RoleName::new("B")).expect("B reported");
    assert_eq!(*b.original(), 1);
    assert_eq!(*b.final_count(), 2);
    assert_eq!(*b.source(), EditSource::Fallback);
}

#[tokio::test]
async fn test_scenario_invented_role_is_demoted() {
    let script = "A: Hello there, friend.\nA: How are you today?\nB: Nice to meet you.";
    let draft = "A: Hello there, friend.\nC: I am new here.\nB: Nice to meet you.\nB: Let's go to the park.";
    let config = RebalanceConfig {
        preference: StrategyPreference::FullRewrite,
        ..RebalanceConfig::default()
    };
    let rebalancer =
        Rebalancer::with_config(MockService::new_success(draft), config).expect("valid config");
    let target = target(&[("A", 1), ("B", 2)]);

    let outcome = rebalancer.rebalance(script, &target).await.expect("rebalance");

    assert_exact(&outcome.script, &target);
    assert!(outcome.script.contains("(C: I am new here.)"));
    assert!(!extract_roles(&outcome.script).contains(&RoleName::new("C")));
    assert_eq!(outcome.report.strategies(), &vec![StrategyKind::FullRewrite]);
    assert_eq!(*outcome.report.service_attempts(), 1);
    assert_eq!(*outcome.report.fallback_steps(), 0);
    assert_eq!(
        *outcome.report.role(&RoleName::new("B")).expect("B").source(),
        EditSource::Generative(StrategyKind::FullRewrite)
    );
}

#[tokio::test]
async fn test_satisfied_script_is_returned_verbatim() {
    let script = "  Mina: Hi!\r\n(She waves.)\r\nJoon:   Hello there.  \r\n";
    let rebalancer = Rebalancer::new(MockService::new_error());
    let target = target(&[("Mina", 1), ("Joon", 1)]);

    let outcome = rebalancer.rebalance(script, &target).await.expect("rebalance");

    assert_eq!(outcome.script, script);
    assert!(outcome.report.exact());
    assert!(outcome.report.strategies().is_empty());
    assert_eq!(rebalancer.service().call_count(), 0);
    assert!(
        outcome
            .report
            .roles()
            .iter()
            .all(|r| *r.source() == EditSource::Unchanged)
    );
}

#[tokio::test]
async fn test_rebalancing_the_output_again_changes_nothing() {
    let script = "A: Let me open the door.\nB: Where are we going now?\nB: I will follow you.";
    let rebalancer = Rebalancer::new(MockService::new_error());
    let goal = target(&[("A", 0), ("B", 2)]);

    let first = rebalancer.rebalance(script, &goal).await.expect("first pass");
    assert_exact(&first.script, &goal);
    assert!(!extract_roles(&first.script).contains(&RoleName::new("A")));
    let calls = rebalancer.service().call_count();

    let second = rebalancer.rebalance(&first.script, &goal).await.expect("second pass");
    assert_eq!(second.script, first.script);
    assert!(second.report.exact());
    assert!(second.report.strategies().is_empty());
    assert_eq!(rebalancer.service().call_count(), calls);

    let err = rebalancer
        .rebalance(&first.script, &target(&[("A", 1), ("B", 2)]))
        .await
        .expect_err("A has no lines left");
    assert_eq!(
        rebalance_error(&err),
        Some(&RebalanceErrorKind::UnknownRole("A".to_string()))
    );
}

#[tokio::test]
async fn test_unknown_target_role_is_rejected_before_any_call() {
    let rebalancer = Rebalancer::new(MockService::new_error());
    let err = rebalancer
        .rebalance(PICNIC, &target(&[("Mina", 2), ("Ghost", 1)]))
        .await
        .expect_err("unknown role");

    assert_eq!(
        rebalance_error(&err),
        Some(&RebalanceErrorKind::UnknownRole("Ghost".to_string()))
    );
    assert_eq!(rebalancer.service().call_count(), 0);
}

#[tokio::test]
async fn test_script_without_dialogue_is_rejected() {
    let rebalancer = Rebalancer::new(MockService::new_error());
    let err = rebalancer
        .rebalance("(An empty stage.)\nScene 2: Night", &TargetSpec::new())
        .await
        .expect_err("no roles");

    assert_eq!(rebalance_error(&err), Some(&RebalanceErrorKind::EmptyRoleSet));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_rebalance_is_busy() {
    let rebalancer = Rebalancer::new(MockService::new_hang());
    let target = target(&[("Mina", 2)]);

    let (first, second) = tokio::join!(
        rebalancer.rebalance(PICNIC, &target),
        rebalancer.rebalance(PICNIC, &target)
    );

    assert!(first.is_ok());
    let err = second.expect_err("second call while first in flight");
    assert_eq!(rebalance_error(&err), Some(&RebalanceErrorKind::Busy));

    let again = rebalancer.rebalance(PICNIC, &target).await;
    assert!(again.is_ok());
}

#[tokio::test]
async fn test_offline_rebalance_is_exact_for_many_targets() {
    let rebalancer = Rebalancer::new(OfflineService::new());
    let original_roles = extract_roles(PICNIC);
    let targets = [
        target(&[("Mina", 1), ("Joon", 1), ("Sora", 1)]),
        target(&[("Mina", 5), ("Joon", 0), ("Sora", 2)]),
        target(&[("Mina", 0), ("Joon", 4), ("Sora", 0)]),
        target(&[("Sora", 6)]),
        target(&[("Mina", 3), ("Joon", 2), ("Sora", 2)]),
    ];

    for target in &targets {
        let outcome = rebalancer.rebalance(PICNIC, target).await.expect("rebalance");
        assert_exact(&outcome.script, target);
        assert!(outcome.report.exact());
        for role in extract_roles(&outcome.script).iter() {
            assert!(original_roles.contains(role), "new role {} appeared", role);
        }
    }
}

#[tokio::test]
async fn test_adversarial_responses_still_converge_within_bound() {
    let script = "A: I will read the first part.\nA: And the second part too.\nA: And the third.\nB: Then I will listen.";
    let target = target(&[("A", 1), ("B", 3)]);
    let bound = 2 + 2;

    for preference in [StrategyPreference::Targeted, StrategyPreference::FullRewrite] {
        let service = MockService::new_sequence(vec![
            MockResponse::Text(String::new()),
            MockResponse::Text("Z: I take over every line now.\nZ: Me again.".to_string()),
            MockResponse::Text("INSERT AFTER 1: Z: Hello from nowhere.\nDELETE 4".to_string()),
        ]);
        let config = RebalanceConfig {
            preference,
            ..RebalanceConfig::default()
        };
        let rebalancer = Rebalancer::with_config(service, config).expect("valid config");

        let outcome = rebalancer.rebalance(script, &target).await.expect("rebalance");

        assert_exact(&outcome.script, &target);
        assert!(*outcome.report.fallback_steps() <= bound);
        assert!(!extract_roles(&outcome.script).contains(&RoleName::new("Z")));
    }
}

#[tokio::test]
async fn test_report_serializes_to_json() {
    let rebalancer = Rebalancer::new(OfflineService::new());
    let target = target(&[("Mina", 2), ("Joon", 3)]);

    let outcome = rebalancer.rebalance(PICNIC, &target).await.expect("rebalance");
    let json = serde_json::to_value(&outcome.report).expect("serialize");

    assert_eq!(json["exact"], true);
    assert_eq!(json["roles"][0]["role"], "Mina");
    assert_eq!(json["roles"][0]["original"], 3);
    assert_eq!(json["roles"][0]["final"], 2);
    assert_eq!(json["roles"][0]["source"]["mechanism"], "fallback");
    assert!(outcome.report.to_string().contains("exact: yes"));
}
