//! errors.rs - Custom error types for the bcrelease-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific error types that callers can match on.
//!
//! License: 0BSD

use thiserror::Error;

/// All error types raised by `bcrelease-core`.
///
/// Marked `#[non_exhaustive]` so new variants can be added without breaking
/// downstream matches.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReleaseError {
    #[error("Failed to compile rewrite rule '{0}': {1}")]
    RuleCompilationError(String, regex::Error),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Invalid release configuration: {0}")]
    InvalidConfig(String),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
