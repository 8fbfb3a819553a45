//! Rebalance error types.
//!
//! Only caller errors surface here. Service failures, malformed directives and
//! non-convergence are recovered inside the engine and reported, not raised.

/// Specific error conditions for a rebalance request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RebalanceErrorKind {
    /// Target references a role that is not in the script's role set
    #[display("Role '{}' is not a speaker in this script", _0)]
    UnknownRole(String),
    /// The script has no dialogue lines at all
    #[display("Script contains no attributed dialogue lines")]
    EmptyRoleSet,
    /// Another rebalance is already running on this rebalancer
    #[display("A rebalance is already in progress")]
    Busy,
    /// A rehearsal review was asked for without any practice turns
    #[display("No practice turns to review")]
    NoPracticeTurns,
    /// Target could not be understood
    #[display("Invalid target: {}", _0)]
    InvalidTarget(String),
}

/// Error type for rebalance requests.
///
/// # Examples
///
/// ```
/// use troupe_error::{RebalanceError, RebalanceErrorKind};
///
/// let err = RebalanceError::new(RebalanceErrorKind::UnknownRole("Ghost".into()));
/// assert!(format!("{}", err).contains("Ghost"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Rebalance Error: {} at line {} in {}", kind, line, file)]
pub struct RebalanceError {
    /// The specific error condition
    pub kind: RebalanceErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl RebalanceError {
    /// Create a new RebalanceError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RebalanceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
