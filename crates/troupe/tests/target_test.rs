//! Tests for ROLE=N target parsing.

use troupe::{RebalanceErrorKind, RoleName, TroupeErrorKind, parse_target_arg, parse_targets};

#[test]
fn test_parse_targets() {
    let target = parse_targets(["Mina=3", "Old Kim = 0", "**Joon**=12"]).unwrap();
    assert_eq!(target.len(), 3);
    assert_eq!(target.get(&RoleName::new("Mina")), Some(3));
    assert_eq!(target.get(&RoleName::new("Old Kim")), Some(0));
    assert_eq!(target.get(&RoleName::new("Joon")), Some(12));
}

#[test]
fn test_split_at_last_equals() {
    let (role, n) = parse_target_arg("A=B=2").unwrap();
    assert_eq!(role.as_str(), "A=B");
    assert_eq!(n, 2);
}

#[test]
fn test_invalid_targets() {
    for arg in ["Mina", "=2", "Mina=", "Mina=-1", "Mina=two"] {
        let err = parse_target_arg(arg).unwrap_err();
        assert!(
            matches!(err.kind, RebalanceErrorKind::InvalidTarget(_)),
            "{} should be invalid",
            arg
        );
    }
}

#[test]
fn test_duplicate_role_is_rejected() {
    let err = parse_targets(["Mina=1", "Mina=2"]).unwrap_err();
    match err.kind() {
        TroupeErrorKind::Rebalance(e) => {
            assert!(matches!(e.kind, RebalanceErrorKind::InvalidTarget(_)))
        }
        other => panic!("unexpected error: {}", other),
    }
}
