//! Structured error types for the bidi engine.

use thiserror::Error;

/// The unified error type returned by all public bidi API functions.
#[derive(Debug, Error)]
pub enum BidiError {
    /// Input length exceeded the configured safety cap (spec §7, item 1).
    #[error("input too large: {len} code points exceeds the maximum of {max}")]
    InputTooLarge { len: usize, max: usize },
}
