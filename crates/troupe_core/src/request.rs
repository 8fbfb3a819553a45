//! Request and response types for the generation service.

use crate::Message;
use serde::{Deserialize, Serialize};

/// Generation request.
///
/// # Examples
///
/// ```
/// use troupe_core::{GenerateRequest, Message};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message::system("You edit plays."), Message::user("Hello!")])
///     .max_tokens(Some(100))
///     .temperature(Some(0.6))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages().len(), 2);
/// assert_eq!(*request.max_tokens(), Some(100));
/// assert_eq!(*request.model(), None);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    derive_builder::Builder,
    derive_getters::Getters,
)]
#[builder(setter(into))]
pub struct GenerateRequest {
    /// The conversation messages to send
    messages: Vec<Message>,
    /// Maximum number of tokens to generate
    #[builder(default)]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(default)]
    temperature: Option<f32>,
    /// Model identifier override
    #[builder(default)]
    model: Option<String>,
}

impl GenerateRequest {
    /// Creates a new request builder.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }

    /// Concatenated text of every message, for services without chat roles.
    pub fn combined_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// One output of a generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Generated text
    Text(String),
    /// The model declined to answer
    Refusal(String),
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use troupe_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse::new(vec![
///     Output::Text("Mina: Hi.".to_string()),
///     Output::Refusal("no".to_string()),
/// ]);
/// assert_eq!(response.text(), "Mina: Hi.");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    outputs: Vec<Output>,
}

impl GenerateResponse {
    /// Create a response.
    pub fn new(outputs: Vec<Output>) -> Self {
        Self { outputs }
    }

    /// All text outputs joined by newlines; refusals are dropped.
    pub fn text(&self) -> String {
        self.outputs
            .iter()
            .filter_map(|o| match o {
                Output::Text(text) => Some(text.as_str()),
                Output::Refusal(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
