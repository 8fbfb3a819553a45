//! Error types for the Troupe library.
//!
//! This crate provides the foundation error types used throughout the Troupe workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use troupe_error::{TroupeResult, RebalanceError, RebalanceErrorKind};
//!
//! fn check_role(name: &str) -> TroupeResult<()> {
//!     Err(RebalanceError::new(RebalanceErrorKind::UnknownRole(name.to_string())))?
//! }
//!
//! match check_role("Ghost") {
//!     Ok(()) => println!("ok"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod rebalance;

pub use config::{ConfigError, ConfigErrorKind};
pub use error::{TroupeError, TroupeErrorKind, TroupeResult};
pub use generation::{GenerationError, GenerationErrorKind, RetryableError};
pub use rebalance::{RebalanceError, RebalanceErrorKind};
