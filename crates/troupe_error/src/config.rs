//! Configuration error types.

/// What was wrong with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A configuration source could not be read or merged
    #[display("Failed to load configuration: {}", _0)]
    Load(String),
    /// The merged configuration does not fit the expected shape
    #[display("Failed to parse configuration: {}", _0)]
    Parse(String),
    /// No generation service is known by this name
    #[display("Unknown provider '{}'", _0)]
    UnknownProvider(String),
    /// A quality filler pattern is not a valid regex
    #[display("Invalid filler pattern '{}': {}", pattern, reason)]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Regex compiler message
        reason: String,
    },
    /// A numeric setting is outside its allowed range
    #[display("{} {}", field, reason)]
    OutOfRange {
        /// Setting name
        field: &'static str,
        /// What the value should have been
        reason: String,
    },
}

/// Configuration error with source location.
///
/// # Examples
///
/// ```
/// use troupe_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::UnknownProvider("parrot".into()));
/// assert!(err.to_string().contains("parrot"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The specific problem
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError at the current location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
