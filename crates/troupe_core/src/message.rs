//! Message types for generation requests.

use serde::{Deserialize, Serialize};

/// Who a message to the generation service is from.
///
/// # Examples
///
/// ```
/// use troupe_core::MessageRole;
///
/// assert_ne!(MessageRole::System, MessageRole::User);
/// assert_eq!(format!("{}", MessageRole::Assistant), "Assistant");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum MessageRole {
    /// Standing instructions
    System,
    /// The request itself
    User,
    /// A previous model reply
    Assistant,
}

/// A text message in a generation request.
///
/// # Examples
///
/// ```
/// use troupe_core::{Message, MessageRole};
///
/// let message = Message::user("Rewrite the script.");
/// assert_eq!(message.role, MessageRole::User);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Message {
    /// The role of the message sender
    pub role: MessageRole,
    /// The message text
    pub content: String,
}

impl Message {
    /// Create a message.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// A system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}
