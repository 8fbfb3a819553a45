//! Edit directives returned by the additive and subtractive strategies.
//!
//! The service is shown a script numbered from 1 and may answer with lines of
//! the form
//!
//! ```text
//! INSERT AFTER 3: Mina: Wait for me!
//! INSERT AFTER END: (They leave together.)
//! DELETE 5
//! ```
//!
//! `INSERT AFTER 0` places a line before the first one. Anything else in the
//! response is ignored.

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use troupe_core::{Line, Script};
use tracing::debug;

static INSERT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:[-*•]\s*)?INSERT\s+AFTER\s+(?:LINE\s+)?(\d+|END)\s*[:：]\s*(.+?)\s*$")
        .expect("Valid insert directive regex")
});

static DELETE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:[-*•]\s*)?DELETE\s+(?:LINE\s+)?(\d+)\s*\.?\s*$")
        .expect("Valid delete directive regex")
});

/// Where an insertion goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// After the numbered line; `0` means before the first line
    Line(usize),
    /// After the last line
    End,
}

impl Anchor {
    /// Insertion slot in a script of `len` lines: `0..=len`, or `None` if out of range.
    pub fn slot(&self, len: usize) -> Option<usize> {
        match self {
            Anchor::Line(k) if *k <= len => Some(*k),
            Anchor::Line(_) => None,
            Anchor::End => Some(len),
        }
    }
}

/// One parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Insert `payload` (raw text, not yet classified) after `anchor`
    Insert {
        /// Where
        anchor: Anchor,
        /// What, as written by the service
        payload: String,
    },
    /// Delete the numbered line (1-based)
    Delete(usize),
}

/// Extract every well-formed directive from a response, in order.
///
/// # Examples
///
/// ```
/// use troupe_rebalance::{parse_directives, Anchor, Directive};
///
/// let directives = parse_directives("Sure!\nINSERT AFTER 2: Mina: Wait!\ndelete 4\nDELETE four");
/// assert_eq!(directives.len(), 2);
/// assert_eq!(
///     directives[0],
///     Directive::Insert { anchor: Anchor::Line(2), payload: "Mina: Wait!".to_string() }
/// );
/// assert_eq!(directives[1], Directive::Delete(4));
/// ```
pub fn parse_directives(response: &str) -> Vec<Directive> {
    response
        .lines()
        .filter_map(|line| {
            if let Some(captures) = INSERT_PATTERN.captures(line) {
                let anchor = if captures[1].eq_ignore_ascii_case("end") {
                    Anchor::End
                } else {
                    Anchor::Line(captures[1].parse().ok()?)
                };
                return Some(Directive::Insert {
                    anchor,
                    payload: captures[2].to_string(),
                });
            }
            if let Some(captures) = DELETE_PATTERN.captures(line) {
                return Some(Directive::Delete(captures[1].parse().ok()?));
            }
            if !line.trim().is_empty() {
                debug!(line, "Ignoring non-directive response line");
            }
            None
        })
        .collect()
}

/// Accepted edits against one numbered script.
#[derive(Debug, Clone, Default)]
pub struct EditPlan {
    inserts: BTreeMap<usize, Vec<Line>>,
    deletes: BTreeSet<usize>,
}

impl EditPlan {
    /// Empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `line` for insertion at `slot`; several lines at one slot keep their order.
    pub fn insert(&mut self, slot: usize, line: Line) {
        self.inserts.entry(slot).or_default().push(line);
    }

    /// Queue the zero-based line `index` for deletion. Returns false if already queued.
    pub fn delete(&mut self, index: usize) -> bool {
        self.deletes.insert(index)
    }

    /// True if `index` is already queued for deletion.
    pub fn is_deleted(&self, index: usize) -> bool {
        self.deletes.contains(&index)
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.deletes.is_empty()
    }

    /// Apply to `script`. Lines that are kept stay in their relative order.
    pub fn apply(&self, script: &Script) -> Script {
        let mut lines = Vec::with_capacity(script.len() + self.inserts.len());
        if let Some(before) = self.inserts.get(&0) {
            lines.extend(before.iter().cloned());
        }
        for (index, line) in script.lines().iter().enumerate() {
            if !self.deletes.contains(&index) {
                lines.push(line.clone());
            }
            if let Some(after) = self.inserts.get(&(index + 1)) {
                lines.extend(after.iter().cloned());
            }
        }
        Script::new(lines)
    }
}
