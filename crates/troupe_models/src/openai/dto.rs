//! Wire types for OpenAI-compatible chat completions.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use troupe_core::{GenerateRequest, GenerateResponse, MessageRole, Output};
use troupe_error::{GenerationError, GenerationErrorKind};

/// One message in a chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct ChatMessage {
    /// `system`, `user` or `assistant`
    role: String,
    /// Message text
    content: String,
}

impl ChatMessage {
    /// Create a builder.
    pub fn builder() -> ChatMessageBuilder {
        ChatMessageBuilder::default()
    }
}

/// Chat completion request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct ChatRequest {
    /// Model identifier
    model: String,

    /// Conversation
    messages: Vec<ChatMessage>,

    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum tokens to generate
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a builder.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

/// Message half of a completion choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ChoiceMessage {
    /// Generated text, absent on refusals
    #[serde(default)]
    content: Option<String>,
    /// Refusal explanation, if the model declined
    #[serde(default)]
    refusal: Option<String>,
}

/// One completion choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ChatChoice {
    /// The message
    message: ChoiceMessage,
    /// Why generation stopped
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Chat completion response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ChatResponse {
    /// Completion choices
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

fn wire_role(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
    }
}

/// Convert a [`GenerateRequest`] into a chat completion body.
///
/// `default_model`, `default_temperature` and `default_max_tokens` fill in
/// whatever the request leaves unset.
pub fn to_chat_request(
    req: &GenerateRequest,
    default_model: &str,
    default_temperature: f32,
    default_max_tokens: u32,
) -> Result<ChatRequest, GenerationError> {
    let messages = req
        .messages()
        .iter()
        .map(|m| {
            ChatMessage::builder()
                .role(wire_role(m.role))
                .content(m.content.clone())
                .build()
                .map_err(|e| {
                    GenerationError::new(GenerationErrorKind::MalformedResponse(format!(
                        "Failed to build chat message: {}",
                        e
                    )))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    ChatRequest::builder()
        .model(req.model().clone().unwrap_or_else(|| default_model.to_string()))
        .messages(messages)
        .temperature(Some(req.temperature().unwrap_or(default_temperature)))
        .max_tokens(Some(req.max_tokens().unwrap_or(default_max_tokens)))
        .build()
        .map_err(|e| {
            GenerationError::new(GenerationErrorKind::MalformedResponse(format!(
                "Failed to build chat request: {}",
                e
            )))
        })
}

/// Convert a chat completion body into a [`GenerateResponse`].
///
/// A body with no choices is malformed. A choice with neither content nor
/// refusal contributes nothing; if nothing is contributed at all the response
/// is empty.
pub fn from_chat_response(resp: ChatResponse) -> Result<GenerateResponse, GenerationError> {
    if resp.choices.is_empty() {
        return Err(GenerationError::new(
            GenerationErrorKind::MalformedResponse("response has no choices".to_string()),
        ));
    }

    let outputs: Vec<Output> = resp
        .choices
        .into_iter()
        .filter_map(|choice| match (choice.message.content, choice.message.refusal) {
            (_, Some(refusal)) => Some(Output::Refusal(refusal)),
            (Some(content), None) if !content.trim().is_empty() => Some(Output::Text(content)),
            _ => None,
        })
        .collect();

    if outputs.is_empty() {
        return Err(GenerationError::new(GenerationErrorKind::EmptyResponse));
    }

    Ok(GenerateResponse::new(outputs))
}
