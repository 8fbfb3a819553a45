//! Live calls against a real endpoint.
//!
//! Run with `cargo test -p troupe_models --features api` and `OPENAI_API_KEY`
//! set (a `.env` file works).

use troupe_core::{GenerateRequest, Message};
use troupe_interface::GenerationService;
use troupe_models::{OpenAiCompatibleClient, ServiceConfig};

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_openai_generates_dialogue() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServiceConfig {
        max_tokens: 60,
        ..ServiceConfig::default()
    };
    let client = OpenAiCompatibleClient::from_config(&config)?;

    let request = GenerateRequest::builder()
        .messages(vec![
            Message::system("Reply with exactly one line of the form 'Mina: <words>'."),
            Message::user("Say hello."),
        ])
        .build()?;

    let response = client.generate(&request).await?;
    assert!(response.text().contains(':'));
    Ok(())
}
