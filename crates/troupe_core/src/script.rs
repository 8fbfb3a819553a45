//! Ordered script values.

use crate::{Line, RoleName, RoleSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An ordered sequence of lines.
///
/// Scripts are treated as immutable values: every transformation returns a
/// new script.
///
/// # Examples
///
/// ```
/// use troupe_core::parse_script;
///
/// let script = parse_script("Mina: Hello there.\n(She waves.)\nJoon: Hi!");
/// assert_eq!(script.len(), 3);
/// assert_eq!(script.dialogue_len(), 2);
/// assert_eq!(script.render(), "Mina: Hello there.\n(She waves.)\nJoon: Hi!");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    lines: Vec<Line>,
}

impl Script {
    /// Create a script from lines.
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// All lines in order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Consume the script, returning its lines.
    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }

    /// Line at a zero-based index.
    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if there are no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of dialogue lines, any speaker.
    pub fn dialogue_len(&self) -> usize {
        self.lines.iter().filter(|l| l.is_dialogue()).count()
    }

    /// Indices of `role`'s dialogue lines, in order.
    pub fn indices_of(&self, role: &RoleName) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.is_spoken_by(role))
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of the last dialogue line of any speaker.
    pub fn last_dialogue_index(&self) -> Option<usize> {
        self.lines.iter().rposition(Line::is_dialogue)
    }

    /// Render one line per physical line.
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(Line::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render with one-based line numbers, as shown to the generation service.
    ///
    /// # Examples
    ///
    /// ```
    /// use troupe_core::parse_script;
    ///
    /// let script = parse_script("Mina: Hello.\nJoon: Hi.");
    /// assert_eq!(script.numbered(), "1| Mina: Hello.\n2| Joon: Hi.");
    /// ```
    pub fn numbered(&self) -> String {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| format!("{}| {}", i + 1, line.render()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Demote every dialogue line whose speaker is outside `roles`.
    ///
    /// Returns the new script and how many lines were demoted.
    pub fn demote_off_roster(&self, roles: &RoleSet) -> (Script, usize) {
        let mut demoted = 0usize;
        let lines = self
            .lines
            .iter()
            .map(|line| match line.speaker() {
                Some(speaker) if !roles.contains(speaker) => {
                    debug!(speaker = %speaker, "Demoting off-roster speaker");
                    demoted += 1;
                    line.demote_with_label()
                }
                _ => line.clone(),
            })
            .collect();
        (Script::new(lines), demoted)
    }

    /// A copy with `line` inserted at `index` (clamped to the end).
    pub fn with_inserted(&self, index: usize, line: Line) -> Script {
        let mut lines = self.lines.clone();
        let at = index.min(lines.len());
        lines.insert(at, line);
        Script::new(lines)
    }

    /// A copy with the line at `index` replaced.
    pub fn with_replaced(&self, index: usize, line: Line) -> Script {
        let mut lines = self.lines.clone();
        if let Some(slot) = lines.get_mut(index) {
            *slot = line;
        }
        Script::new(lines)
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl FromIterator<Line> for Script {
    fn from_iter<I: IntoIterator<Item = Line>>(iter: I) -> Self {
        Script::new(iter.into_iter().collect())
    }
}
