//! Error types for linewire.

use thiserror::Error;

/// Error produced when constructing an outbound frame.
///
/// Only the outbound path is fallible: inbound decoding is best-effort by
/// contract and always returns a value (incomplete input surfaces as a
/// carried-over partial buffer, malformed header lines degrade to empty
/// values).
#[derive(Debug, Error)]
pub enum WireError {
    /// A frame was constructed with an empty command token.
    #[error("frame command must be a non-empty token")]
    EmptyCommand,

    /// A frame command contains a line terminator, which would corrupt the
    /// frame structure on the wire.
    #[error("frame command contains a line terminator")]
    CommandLineBreak,
}

/// Result type alias using [`WireError`].
pub type Result<T> = std::result::Result<T, WireError>;
