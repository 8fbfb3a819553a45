//! Cue lines for one role.

use crate::{Line, RoleName, Script, collapse_whitespace, strip_parentheticals};
use serde::{Deserialize, Serialize};

/// One of a role's lines together with the line that cues it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueLine {
    /// The closest preceding dialogue line by another speaker, rendered
    pub cue: Option<String>,
    /// The role's own utterance, with `(...)` asides removed
    pub utterance: String,
}

/// Every line `role` speaks, each with its cue.
///
/// # Examples
///
/// ```
/// use troupe_core::{cue_lines, parse_script, RoleName};
///
/// let script = parse_script("Mina: Knock knock.\nJoon: Who's there?\nMina: Lettuce.");
/// let cues = cue_lines(&script, &RoleName::new("Mina"));
/// assert_eq!(cues.len(), 2);
/// assert_eq!(cues[0].cue, None);
/// assert_eq!(cues[1].cue.as_deref(), Some("Joon: Who's there?"));
/// ```
pub fn cue_lines(script: &Script, role: &RoleName) -> Vec<CueLine> {
    let mut cues = Vec::new();
    let mut last_cue: Option<&Line> = None;
    for line in script.lines() {
        match line {
            Line::Dialogue {
                speaker, utterance, ..
            } if speaker == role => {
                cues.push(CueLine {
                    cue: last_cue.map(Line::render),
                    utterance: collapse_whitespace(&strip_parentheticals(utterance)),
                });
                last_cue = None;
            }
            Line::Dialogue { .. } => last_cue = Some(line),
            Line::Other { .. } => {}
        }
    }
    cues
}
