//! OpenAI-compatible chat completions client.

mod client;
mod dto;

pub use client::OpenAiCompatibleClient;
pub use dto::{
    ChatChoice, ChatMessage, ChatRequest, ChatResponse, ChoiceMessage, from_chat_response,
    to_chat_request,
};
