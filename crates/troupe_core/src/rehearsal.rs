//! Rehearsal line matching.
//!
//! Compares the line an actor was expected to say with what they actually said
//! (for example a speech-to-text transcript). Both sides are reduced to content
//! characters first, so punctuation, spacing and parenthetical stage business
//! do not count against the actor.

use crate::{RoleName, strip_parentheticals};
use serde::{Deserialize, Serialize};
use similar::{Algorithm, DiffOp, TextDiff, capture_diff_slices};
use std::collections::BTreeSet;

/// One token of the expected line and whether it was heard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMatch {
    /// Token as written in the script
    pub token: String,
    /// True if the token's content appears in the spoken text
    pub matched: bool,
}

fn content_chars(text: &str) -> String {
    strip_parentheticals(text)
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

fn words(text: &str) -> BTreeSet<String> {
    strip_parentheticals(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    capture_diff_slices(Algorithm::Lcs, a, b)
        .iter()
        .map(|op| match op {
            DiffOp::Equal { len, .. } => *len,
            _ => 0,
        })
        .sum()
}

/// How well `spoken` reproduces `expected`, in `[0, 1]`.
///
/// The best of three views: character sequence ratio, word Jaccard overlap and
/// longest-common-subsequence F1. Empty speech scores zero.
///
/// # Examples
///
/// ```
/// use troupe_core::line_match_score;
///
/// assert!(line_match_score("Where were you? (angrily)", "where were you") > 0.99);
/// assert!(line_match_score("Where were you?", "pass the salt") < 0.5);
/// assert_eq!(line_match_score("Where were you?", ""), 0.0);
/// ```
pub fn line_match_score(expected: &str, spoken: &str) -> f64 {
    let e = content_chars(expected).to_lowercase();
    let s = content_chars(spoken).to_lowercase();
    if s.is_empty() {
        return 0.0;
    }

    let ratio = f64::from(TextDiff::from_chars(e.as_str(), s.as_str()).ratio());

    let ew = words(expected);
    let sw = words(spoken);
    let union = ew.union(&sw).count();
    let jaccard = if union == 0 {
        0.0
    } else {
        ew.intersection(&sw).count() as f64 / union as f64
    };

    let ec: Vec<char> = e.chars().collect();
    let sc: Vec<char> = s.chars().collect();
    let lcs = lcs_len(&ec, &sc) as f64;
    let precision = lcs / sc.len().max(1) as f64;
    let recall = lcs / ec.len().max(1) as f64;
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    ratio.max(jaccard).max(f1)
}

/// Mark each whitespace-separated token of `expected` as heard or missed.
///
/// # Examples
///
/// ```
/// use troupe_core::highlight_tokens;
///
/// let marks = highlight_tokens("Open the door, please!", "open the door");
/// let missed: Vec<&str> = marks.iter().filter(|m| !m.matched).map(|m| m.token.as_str()).collect();
/// assert_eq!(missed, vec!["please!"]);
/// ```
pub fn highlight_tokens(expected: &str, spoken: &str) -> Vec<TokenMatch> {
    let heard = content_chars(spoken).to_lowercase();
    expected
        .split_whitespace()
        .map(|token| {
            let needle = content_chars(token).to_lowercase();
            TokenMatch {
                token: token.to_string(),
                matched: !needle.is_empty() && heard.contains(&needle),
            }
        })
        .collect()
}

/// One attempt at a scripted line during a practice session.
///
/// # Examples
///
/// ```
/// use troupe_core::{PracticeTurn, RoleName};
///
/// let turn = PracticeTurn::new(RoleName::new("Mina"), "Where is the puppy?", "where is the puppy");
/// assert_eq!(turn.score, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeTurn {
    /// Who was practicing
    pub role: RoleName,
    /// The line as written
    pub expected: String,
    /// What was heard
    pub spoken: String,
    /// [`line_match_score`] of the two
    pub score: f64,
}

impl PracticeTurn {
    /// Record a turn, scoring it on the way in.
    pub fn new(role: RoleName, expected: impl Into<String>, spoken: impl Into<String>) -> Self {
        let expected = expected.into();
        let spoken = spoken.into();
        let score = line_match_score(&expected, &spoken);
        Self {
            role,
            expected,
            spoken,
            score,
        }
    }
}
