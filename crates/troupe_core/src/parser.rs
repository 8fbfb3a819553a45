//! Script parsing.
//!
//! Turns raw text into an ordered [`Script`], classifying each physical line as
//! dialogue (`speaker: utterance`, ASCII or full-width colon) or other text.
//! Parsing never fails: anything that does not look like attributed dialogue
//! is kept verbatim as an [`Line::Other`].

use crate::{Line, LineCounts, RoleName, RoleSet, Script};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, instrument};

static DIALOGUE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^:：]+?)\s*[:：]\s*(.*)$").expect("Valid dialogue regex")
});

/// Parser policy.
///
/// # Examples
///
/// ```
/// use troupe_core::ParserConfig;
///
/// let config = ParserConfig::default();
/// assert!(config.banned_labels.iter().any(|l| l == "scene"));
/// assert_eq!(config.max_speaker_words, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Case-insensitive prefixes that mark a label as a header, not a speaker
    #[serde(default = "default_banned_labels")]
    pub banned_labels: Vec<String>,

    /// Labels with more words than this are prose, not speakers
    #[serde(default = "default_max_speaker_words")]
    pub max_speaker_words: usize,
}

fn default_banned_labels() -> Vec<String> {
    [
        "scene",
        "stage",
        "setting",
        "background",
        "music",
        "bgm",
        "song",
        "lyrics",
        "sound",
        "sfx",
        "caption",
        "direction",
        "장면",
        "씬",
        "무대",
        "배경",
        "노래",
        "노랫말",
        "설명",
        "지문",
        "장내",
        "효과음",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_max_speaker_words() -> usize {
    4
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            banned_labels: default_banned_labels(),
            max_speaker_words: default_max_speaker_words(),
        }
    }
}

/// Parses scripts under a [`ParserConfig`].
#[derive(Debug, Clone)]
pub struct ScriptParser {
    config: ParserConfig,
    banned: Vec<String>,
}

impl Default for ScriptParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl ScriptParser {
    /// Create a parser from configuration.
    pub fn new(config: ParserConfig) -> Self {
        let banned = config
            .banned_labels
            .iter()
            .map(|label| label.trim().to_lowercase())
            .filter(|label| !label.is_empty())
            .collect();
        Self { config, banned }
    }

    /// The parser's configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// True if a normalized label is a header rather than a speaker.
    pub fn is_banned_label(&self, name: &RoleName) -> bool {
        let lowered = name.as_str().to_lowercase();
        self.banned.iter().any(|label| lowered.starts_with(label.as_str()))
    }

    /// Classify one physical line.
    pub fn parse_line(&self, raw: &str, raw_index: Option<usize>) -> Line {
        let other = || Line::Other {
            text: raw.to_string(),
            raw_index,
        };

        if crate::is_wrapped_direction(raw) {
            return other();
        }

        let Some(captures) = DIALOGUE_PATTERN.captures(raw) else {
            return other();
        };

        let speaker = RoleName::new(&captures[1]);
        let utterance = captures[2].trim();

        if speaker.is_empty()
            || utterance.is_empty()
            || speaker.as_str().split_whitespace().count() > self.config.max_speaker_words
            || self.is_banned_label(&speaker)
        {
            return other();
        }

        Line::Dialogue {
            speaker,
            utterance: utterance.to_string(),
            raw_index,
        }
    }

    /// Parse a whole script.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn parse(&self, text: &str) -> Script {
        let cleaned = crate::clean_script_text(text);
        if cleaned.is_empty() {
            return Script::default();
        }
        let script: Script = cleaned
            .split('\n')
            .enumerate()
            .map(|(i, raw)| self.parse_line(raw, Some(i)))
            .collect();
        debug!(
            lines = script.len(),
            dialogue = script.dialogue_len(),
            "Parsed script"
        );
        script
    }

    /// Parse text produced by the generation service.
    ///
    /// Markdown code fences and a leading/trailing chatter line are common in
    /// model output; fences are dropped before parsing.
    pub fn parse_generated(&self, text: &str) -> Script {
        let without_fences: Vec<&str> = text
            .lines()
            .filter(|line| !line.trim_start().starts_with("```"))
            .collect();
        self.parse(&without_fences.join("\n"))
    }
}

/// Collect the role set of a parsed script.
pub fn roles_of(script: &Script) -> RoleSet {
    script.lines().iter().filter_map(Line::speaker).cloned().collect()
}

/// Parse text with the default parser.
pub fn parse_script(text: &str) -> Script {
    ScriptParser::default_parser().parse(text)
}

/// Distinct speakers of a script, in order of first appearance, minus header labels.
///
/// # Examples
///
/// ```
/// use troupe_core::extract_roles;
///
/// let roles = extract_roles("Scene 1: The park\nMina: Hi!\nJoon: Hello.\nMina: Bye.");
/// let names: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
/// assert_eq!(names, vec!["Mina", "Joon"]);
/// ```
pub fn extract_roles(text: &str) -> RoleSet {
    roles_of(&parse_script(text))
}

/// Dialogue line counts per role of the script's own role set.
///
/// # Examples
///
/// ```
/// use troupe_core::{count_by_role, RoleName};
///
/// let counts = count_by_role("Mina: Hi!\nJoon: Hello.\nMina: Bye.");
/// assert_eq!(counts[&RoleName::new("Mina")], 2);
/// assert_eq!(counts[&RoleName::new("Joon")], 1);
/// ```
pub fn count_by_role(text: &str) -> LineCounts {
    let script = parse_script(text);
    let roles = roles_of(&script);
    crate::count(&script, &roles)
}

/// Ordered `(speaker, utterance)` pairs of all dialogue lines.
pub fn dialogue_sequence(text: &str) -> Vec<(RoleName, String)> {
    parse_script(text)
        .into_lines()
        .into_iter()
        .filter_map(|line| match line {
            Line::Dialogue {
                speaker, utterance, ..
            } => Some((speaker, utterance)),
            Line::Other { .. } => None,
        })
        .collect()
}

impl ScriptParser {
    fn default_parser() -> &'static ScriptParser {
        static DEFAULT: LazyLock<ScriptParser> =
            LazyLock::new(|| ScriptParser::new(ParserConfig::default()));
        &DEFAULT
    }
}
