//! Script lines.

use crate::RoleName;
use serde::{Deserialize, Serialize};

/// One physical line of a script.
///
/// `raw_index` is the zero-based line number in the parsed input. Lines that
/// were synthesized or rewritten later have no raw index.
///
/// # Examples
///
/// ```
/// use troupe_core::{Line, RoleName};
///
/// let line = Line::dialogue(RoleName::new("Mina"), "Where were you?");
/// assert_eq!(line.render(), "Mina: Where were you?");
/// assert!(line.is_dialogue());
///
/// let demoted = line.demote();
/// assert_eq!(demoted.render(), "(Where were you?)");
/// assert!(!demoted.is_dialogue());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Line {
    /// A line attributed to a speaker.
    Dialogue {
        /// Normalized speaker name
        speaker: RoleName,
        /// Spoken content
        utterance: String,
        /// Position in the parsed input, if the line came from it
        raw_index: Option<usize>,
    },
    /// A scene heading, stage direction, blank line or anything else.
    Other {
        /// Verbatim text
        text: String,
        /// Position in the parsed input, if the line came from it
        raw_index: Option<usize>,
    },
}

impl Line {
    /// A synthesized dialogue line.
    pub fn dialogue(speaker: RoleName, utterance: impl Into<String>) -> Self {
        Line::Dialogue {
            speaker,
            utterance: utterance.into(),
            raw_index: None,
        }
    }

    /// A synthesized non-dialogue line, kept verbatim.
    pub fn other(text: impl Into<String>) -> Self {
        Line::Other {
            text: text.into(),
            raw_index: None,
        }
    }

    /// A stage direction; the text is wrapped in parentheses unless it already is.
    pub fn stage_direction(text: &str) -> Self {
        let trimmed = text.trim();
        if crate::is_wrapped_direction(trimmed) {
            Line::other(trimmed)
        } else {
            Line::other(format!("({})", trimmed))
        }
    }

    /// Speaker of a dialogue line.
    pub fn speaker(&self) -> Option<&RoleName> {
        match self {
            Line::Dialogue { speaker, .. } => Some(speaker),
            Line::Other { .. } => None,
        }
    }

    /// Spoken content of a dialogue line.
    pub fn utterance(&self) -> Option<&str> {
        match self {
            Line::Dialogue { utterance, .. } => Some(utterance),
            Line::Other { .. } => None,
        }
    }

    /// True for dialogue lines.
    pub fn is_dialogue(&self) -> bool {
        matches!(self, Line::Dialogue { .. })
    }

    /// True if this line is spoken by `role`.
    pub fn is_spoken_by(&self, role: &RoleName) -> bool {
        self.speaker() == Some(role)
    }

    /// Position in the parsed input.
    pub fn raw_index(&self) -> Option<usize> {
        match self {
            Line::Dialogue { raw_index, .. } | Line::Other { raw_index, .. } => *raw_index,
        }
    }

    /// Text form of the line.
    pub fn render(&self) -> String {
        match self {
            Line::Dialogue {
                speaker, utterance, ..
            } => format!("{}: {}", speaker, utterance),
            Line::Other { text, .. } => text.clone(),
        }
    }

    /// Turn a surplus dialogue line into a stage direction wrapping its utterance.
    ///
    /// Non-dialogue lines are returned unchanged.
    pub fn demote(&self) -> Line {
        match self {
            Line::Dialogue {
                utterance,
                raw_index,
                ..
            } => Line::Other {
                text: wrap(utterance),
                raw_index: *raw_index,
            },
            Line::Other { .. } => self.clone(),
        }
    }

    /// Turn an off-roster dialogue line into a stage direction that keeps the
    /// speaker label, so the content survives but is no longer counted.
    pub fn demote_with_label(&self) -> Line {
        match self {
            Line::Dialogue {
                speaker,
                utterance,
                raw_index,
            } => Line::Other {
                text: wrap(&format!("{}: {}", speaker, utterance)),
                raw_index: *raw_index,
            },
            Line::Other { .. } => self.clone(),
        }
    }
}

fn wrap(text: &str) -> String {
    let trimmed = text.trim();
    if crate::is_wrapped_direction(trimmed) {
        trimmed.to_string()
    } else {
        format!("({})", trimmed)
    }
}
