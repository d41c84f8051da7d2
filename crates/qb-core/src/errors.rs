//! Cross-cutting error types for qbank.
//!
//! Domain-specific errors (`BackendError`, `AuthError`, `PageError`) live in
//! their respective crates. A unified error is deferred to `qb-cli` where all
//! crate errors converge through `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any qbank crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
