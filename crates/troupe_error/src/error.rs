//! Top-level error wrapper types.

use crate::{ConfigError, GenerationError, RebalanceError};

/// Every error a Troupe crate can return.
///
/// # Examples
///
/// ```
/// use troupe_error::{RebalanceError, RebalanceErrorKind, TroupeError, TroupeErrorKind};
///
/// let err: TroupeError = RebalanceError::new(RebalanceErrorKind::Busy).into();
/// assert!(matches!(err.kind(), TroupeErrorKind::Rebalance(_)));
/// assert!(format!("{}", err).contains("already in progress"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum TroupeErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Generation service error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Rebalance request error
    #[from(RebalanceError)]
    Rebalance(RebalanceError),
}

/// Troupe error with kind discrimination.
///
/// # Examples
///
/// ```
/// use troupe_error::{ConfigError, ConfigErrorKind, TroupeResult};
///
/// fn might_fail() -> TroupeResult<()> {
///     Err(ConfigError::new(ConfigErrorKind::UnknownProvider("parrot".into())))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Troupe Error: {}", _0)]
pub struct TroupeError(Box<TroupeErrorKind>);

impl TroupeError {
    /// Create a new error from a kind.
    pub fn new(kind: TroupeErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TroupeErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to TroupeErrorKind
impl<T> From<T> for TroupeError
where
    T: Into<TroupeErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Troupe operations.
pub type TroupeResult<T> = std::result::Result<T, TroupeError>;
