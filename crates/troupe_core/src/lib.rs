//! Core data types for the Troupe dialogue rebalancer.
//!
//! This crate provides the script model shared by every other crate: lines,
//! speakers and the frozen role set, the parser that builds them from raw
//! text, the counters that compare a script against a target, and the plain
//! request/response types exchanged with a generation service.
//!
//! # Example
//!
//! ```
//! use troupe_core::{count, delta, parse_script, roles_of, RoleName, TargetSpec};
//!
//! let script = parse_script("Scene 1: Kitchen\nA: Morning.\nA: Coffee?\nB: Please.");
//! let roles = roles_of(&script);
//! let counts = count(&script, &roles);
//!
//! let target: TargetSpec = [(RoleName::new("A"), 1), (RoleName::new("B"), 2)]
//!     .into_iter()
//!     .collect();
//! let deltas = delta(&counts, &target);
//! assert_eq!(deltas[&RoleName::new("A")], -1);
//! assert_eq!(deltas[&RoleName::new("B")], 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod counter;
mod cues;
mod line;
mod message;
mod orthography;
mod parser;
mod rehearsal;
mod request;
mod role;
mod script;
mod text;

pub use counter::{
    DeltaShape, Deltas, LineCounts, TargetSpec, count, deficits, delta, is_satisfied, surpluses,
    total_deviation,
};
pub use cues::{CueLine, cue_lines};
pub use line::Line;
pub use message::{Message, MessageRole};
pub use orthography::{Orthography, is_hangul};
pub use parser::{
    ParserConfig, ScriptParser, count_by_role, dialogue_sequence, extract_roles, parse_script,
    roles_of,
};
pub use rehearsal::{PracticeTurn, TokenMatch, highlight_tokens, line_match_score};
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse, Output};
pub use role::{RoleName, RoleSet};
pub use script::Script;
pub use text::{
    clean_script_text, collapse_whitespace, has_terminal_punctuation, is_wrapped_direction,
    strip_parentheticals,
};
