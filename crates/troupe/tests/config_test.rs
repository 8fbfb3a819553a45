//! Tests for configuration loading.

use troupe::{StrategyPreference, TroupeConfig};

#[test]
fn test_bundled_defaults_match_code_defaults() {
    let bundled = TroupeConfig::from_toml_str(TroupeConfig::bundled_defaults()).unwrap();
    assert_eq!(bundled, TroupeConfig::default());
}

#[test]
fn test_load_succeeds() {
    let config = TroupeConfig::load().unwrap();
    assert!(!config.service.provider.is_empty());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("troupe.toml");
    std::fs::write(
        &path,
        r#"
[service]
provider = "offline"
requests_per_minute = 12

[rebalance]
preference = "full_rewrite"

[rebalance.attempts]
rewrite = 2
"#,
    )
    .unwrap();

    let config = TroupeConfig::from_file(&path).unwrap();

    assert_eq!(config.service.provider, "offline");
    assert_eq!(config.service.requests_per_minute, Some(12));
    assert_eq!(config.service.model, "gpt-4o-mini");
    assert_eq!(config.rebalance.preference, StrategyPreference::FullRewrite);
    assert_eq!(config.rebalance.attempts.rewrite, 2);
    assert_eq!(config.rebalance.attempts.additive, 3);
    assert_eq!(config.rebalance.call_timeout_secs, 60);
}

#[test]
fn test_custom_templates_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("troupe.toml");
    std::fs::write(
        &path,
        r#"
[rebalance.fallback.latin_templates]
opener = "Ahoy, I am {role}!"
safe_line = "Onward."
connective = "(waves crash)"
default = ["Aye, {addressee}."]

[[rebalance.fallback.latin_templates.rules]]
when = "question"
templates = ["Who can say?"]
"#,
    )
    .unwrap();

    let config = TroupeConfig::from_file(&path).unwrap();
    let book = config.rebalance.fallback.latin_templates.unwrap();

    assert_eq!(book.opener, "Ahoy, I am {role}!");
    assert_eq!(book.rules.len(), 1);
    assert_eq!(book.rules[0].templates, vec!["Who can say?".to_string()]);
}

#[test]
fn test_missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = TroupeConfig::from_file(dir.path().join("absent.toml"));
    assert!(matches!(
        result.unwrap_err().kind(),
        troupe::TroupeErrorKind::Config(_)
    ));
}

#[test]
fn test_malformed_value_is_a_config_error() {
    let result = TroupeConfig::from_toml_str("[rebalance]\npreference = \"sideways\"\n");
    assert!(result.is_err());
}

#[test]
fn test_workshop_table_overrides_one_task() {
    let config = TroupeConfig::from_toml_str(
        r#"
[workshop.stage_kit]
temperature = 0.2
max_tokens = 500
"#,
    )
    .unwrap();
    assert_eq!(config.workshop.stage_kit.max_tokens, 500);
    assert_eq!(config.workshop.feedback, troupe::WorkshopConfig::default().feedback);
    assert_eq!(config.workshop.call_timeout_secs, 120);
}
