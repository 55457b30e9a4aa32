//! Error types for the RealTutor backend.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TutorError>;

/// Errors surfaced by the tutoring core.
///
/// Upstream failures are terminal per request: the dispatcher converts
/// them into an error-shaped response instead of propagating, so nothing
/// here ever crosses a protocol boundary raw.
#[derive(Debug, Error)]
pub enum TutorError {
    /// Completion API failure (network, auth, rate limit, bad body).
    #[error("{0}")]
    Provider(String),
}
