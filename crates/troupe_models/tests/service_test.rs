//! Offline, throttled and configured services.

use std::num::NonZeroU32;
use troupe_core::{GenerateRequest, Message};
use troupe_error::{ConfigErrorKind, GenerationErrorKind, TroupeErrorKind};
use troupe_interface::GenerationService;
use troupe_models::{OfflineService, ServiceConfig, ThrottledService, service_from_config};

fn request() -> GenerateRequest {
    GenerateRequest::builder()
        .messages(vec![Message::user("Hello")])
        .build()
        .expect("valid request")
}

fn is_unavailable(err: &troupe_error::TroupeError) -> bool {
    matches!(
        err.kind(),
        TroupeErrorKind::Generation(e) if matches!(e.kind, GenerationErrorKind::Unavailable(_))
    )
}

#[tokio::test]
async fn test_offline_service_always_fails() {
    let service = OfflineService::new();
    let err = service.generate(&request()).await.expect_err("offline");
    assert!(is_unavailable(&err));
}

#[tokio::test]
async fn test_throttle_passes_calls_through() {
    let service = ThrottledService::new(OfflineService::new(), NonZeroU32::new(600).unwrap());

    for _ in 0..3 {
        let err = service.generate(&request()).await.expect_err("offline");
        assert!(is_unavailable(&err));
    }
    assert_eq!(service.model_name(), "none");
}

#[tokio::test]
async fn test_offline_config_builds_offline_service() {
    let mut config = ServiceConfig::offline();
    config.requests_per_minute = Some(120);

    let service = service_from_config(&config).expect("offline service");
    assert_eq!(service.provider_name(), "offline");
    let err = service.generate(&request()).await.expect_err("offline");
    assert!(is_unavailable(&err));
}

#[test]
fn test_unknown_provider_is_config_error() {
    let config = ServiceConfig {
        provider: "carrier-pigeon".to_string(),
        ..ServiceConfig::default()
    };
    let err = service_from_config(&config).err().expect("unknown provider");
    match err.kind() {
        TroupeErrorKind::Config(e) => assert_eq!(
            e.kind,
            ConfigErrorKind::UnknownProvider("carrier-pigeon".to_string())
        ),
        other => panic!("expected config error, got {}", other),
    }
}

#[test]
fn test_missing_api_key_is_reported() {
    let config = ServiceConfig {
        api_key_env: "TROUPE_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
        ..ServiceConfig::default()
    };
    let err = service_from_config(&config).err().expect("missing key");
    assert!(matches!(
        err.kind(),
        TroupeErrorKind::Generation(e)
            if matches!(&e.kind, GenerationErrorKind::MissingApiKey(var) if var == "TROUPE_TEST_KEY_THAT_IS_NEVER_SET")
    ));
}

#[test]
fn test_service_config_defaults_from_partial_table() {
    let config: ServiceConfig =
        serde_json::from_str(r#"{"model": "gpt-4o", "requests_per_minute": 10}"#).expect("parse");

    assert_eq!(config.provider, "openai");
    assert_eq!(config.model, "gpt-4o");
    assert_eq!(config.max_tokens, 2000);
    assert!((config.temperature - 0.6).abs() < f32::EPSILON);
    assert_eq!(config.requests_per_minute, Some(10));
    assert_eq!(config.timeout().as_secs(), 60);
}
