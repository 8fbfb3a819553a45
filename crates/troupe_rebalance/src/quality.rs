//! Heuristic acceptance test for synthesized dialogue.

use regex::Regex;
use serde::{Deserialize, Serialize};
use troupe_core::{
    Orthography, RoleName, RoleSet, Script, collapse_whitespace, strip_parentheticals,
};
use troupe_error::{ConfigError, ConfigErrorKind, TroupeResult};
use tracing::{debug, instrument};

/// Quality gate policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Minimum non-whitespace characters once parenthetical asides are removed
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// Regexes matching utterances that are nothing but filler
    #[serde(default = "default_filler_patterns")]
    pub filler_patterns: Vec<String>,

    /// Case-insensitive meta or expository phrases that disqualify a line
    #[serde(default = "default_forbidden_phrases")]
    pub forbidden_phrases: Vec<String>,

    /// Similarity at or above which a synthesized line is a near duplicate
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

fn default_min_chars() -> usize {
    4
}

fn default_filler_patterns() -> Vec<String> {
    vec![
        r"^[\s.…·,!?~\-]*$".to_string(),
        r"(?i)^(?:(?:u+m+|u+h+|h+m+|a+h+|o+h+|e+r+|음+|어+|아+|흠+|으+)[\s.,!?…~\-]*)+$"
            .to_string(),
    ]
}

fn default_forbidden_phrases() -> Vec<String> {
    [
        "in other words",
        "to summarize",
        "in summary",
        "as mentioned",
        "as i said before",
        "the narrator",
        "다시 말해",
        "요약하자면",
        "정리하자면",
        "앞서 말했듯이",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_similarity_threshold() -> f64 {
    0.82
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_chars: default_min_chars(),
            filler_patterns: default_filler_patterns(),
            forbidden_phrases: default_forbidden_phrases(),
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

impl QualityConfig {
    /// Check the policy for values that cannot work.
    pub fn validate(&self) -> TroupeResult<()> {
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(ConfigError::new(ConfigErrorKind::OutOfRange {
                field: "similarity_threshold",
                reason: format!("must be in (0, 1], got {}", self.similarity_threshold),
            })
            .into());
        }
        for pattern in &self.filler_patterns {
            Regex::new(pattern).map_err(|e| {
                ConfigError::new(ConfigErrorKind::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })?;
        }
        Ok(())
    }
}

/// Decides whether an utterance is substantive dialogue.
///
/// The gate is built per script, since "a content token" depends on the
/// script's writing system.
///
/// # Examples
///
/// ```
/// use troupe_core::Orthography;
/// use troupe_rebalance::{QualityConfig, QualityGate};
///
/// let gate = QualityGate::new(&QualityConfig::default(), Orthography::Latin).unwrap();
/// assert!(gate.is_meaningful("Let's find the lost puppy."));
/// assert!(!gate.is_meaningful("Um..."));
/// assert!(!gate.is_meaningful("In other words, yes."));
/// ```
#[derive(Debug, Clone)]
pub struct QualityGate {
    min_chars: usize,
    fillers: Vec<Regex>,
    forbidden: Vec<String>,
    similarity_threshold: f64,
    orthography: Orthography,
}

impl QualityGate {
    /// Compile a gate for scripts written in `orthography`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a filler pattern is not a valid regex
    /// or the similarity threshold is out of range.
    pub fn new(config: &QualityConfig, orthography: Orthography) -> TroupeResult<Self> {
        config.validate()?;
        let mut fillers = Vec::with_capacity(config.filler_patterns.len());
        for pattern in &config.filler_patterns {
            let regex = Regex::new(pattern).map_err(|e| {
                ConfigError::new(ConfigErrorKind::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })?;
            fillers.push(regex);
        }

        Ok(Self {
            min_chars: config.min_chars,
            fillers,
            forbidden: config
                .forbidden_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .filter(|p| !p.trim().is_empty())
                .collect(),
            similarity_threshold: config.similarity_threshold,
            orthography,
        })
    }

    /// Writing system the gate judges content tokens in.
    pub fn orthography(&self) -> Orthography {
        self.orthography
    }

    /// Near-duplicate threshold.
    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }

    /// True if `utterance` is long enough, not filler, free of forbidden
    /// phrases and carries at least one content token.
    pub fn is_meaningful(&self, utterance: &str) -> bool {
        let spoken = collapse_whitespace(&strip_parentheticals(utterance));

        let visible = spoken.chars().filter(|c| !c.is_whitespace()).count();
        if visible < self.min_chars {
            debug!(utterance, visible, "Rejected: too short");
            return false;
        }

        if self.fillers.iter().any(|re| re.is_match(&spoken)) {
            debug!(utterance, "Rejected: filler");
            return false;
        }

        let lowered = spoken.to_lowercase();
        if let Some(phrase) = self.forbidden.iter().find(|p| lowered.contains(p.as_str())) {
            debug!(utterance, phrase = %phrase, "Rejected: forbidden phrase");
            return false;
        }

        let has_content = spoken
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .any(|token| self.orthography.is_content_token(token));
        if !has_content {
            debug!(utterance, orthography = %self.orthography, "Rejected: no content token");
        }
        has_content
    }

    /// [`is_meaningful`](Self::is_meaningful) plus Role Set membership.
    #[instrument(level = "debug", skip_all, fields(speaker = %speaker))]
    pub fn accepts(&self, speaker: &RoleName, utterance: &str, roles: &RoleSet) -> bool {
        if !roles.contains(speaker) {
            debug!("Rejected: speaker outside role set");
            return false;
        }
        self.is_meaningful(utterance)
    }

    /// Demote every dialogue line whose utterance is not meaningful.
    ///
    /// Returns the filtered script and the number of lines demoted.
    pub fn demote_filler(&self, script: &Script) -> (Script, usize) {
        let mut demoted = 0usize;
        let lines = script
            .lines()
            .iter()
            .map(|line| match line.utterance() {
                Some(utterance) if !self.is_meaningful(utterance) => {
                    demoted += 1;
                    line.demote()
                }
                _ => line.clone(),
            })
            .collect();
        (Script::new(lines), demoted)
    }

    /// True if `candidate` is too close to `reference` to count as a new line.
    pub fn is_near_duplicate(&self, candidate: &str, reference: &str) -> bool {
        text_similarity(candidate, reference) >= self.similarity_threshold
    }
}

/// Character-level similarity of two utterances in `[0, 1]`.
///
/// Whitespace is normalized first; the score is `2 * matches / total length`.
///
/// # Examples
///
/// ```
/// use troupe_rebalance::text_similarity;
///
/// assert_eq!(text_similarity("Hello  there", "Hello there"), 1.0);
/// assert!(text_similarity("Where is the dog?", "I like pancakes.") < 0.5);
/// ```
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let a = collapse_whitespace(a);
    let b = collapse_whitespace(b);
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    f64::from(similar::TextDiff::from_chars(a.as_str(), b.as_str()).ratio())
}
