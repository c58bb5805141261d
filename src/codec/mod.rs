//! Codec module - unmarshalling pipelines and the dispatcher.
//!
//! Two independent pipelines parse inbound payloads into frames:
//!
//! - [`TextCodec`] - character-oriented, for payloads that arrive as text
//! - [`BinaryCodec`] - byte-oriented, for payloads whose bodies may not be
//!   valid as decoded text
//!
//! # Design
//!
//! Codecs are implemented as marker structs with static methods rather
//! than trait objects; the [`unmarshall`] dispatcher selects a pipeline
//! per call from the payload kind. The codec holds no state of its own:
//! the returned [`Unmarshalled::partial`] is owned by the caller and fed
//! back into the next call for the same logical stream, so independent
//! streams decode concurrently without shared state.
//!
//! # Example
//!
//! ```
//! use linewire::codec::{unmarshall, Chunk};
//!
//! let first = unmarshall(Chunk::default(), Chunk::text("CONNECTED\nversion:1.2"), false);
//! assert!(first.frames.is_empty());
//!
//! let second = unmarshall(first.partial, Chunk::text("\n\n\0"), false);
//! assert_eq!(second.frames.len(), 1);
//! ```

mod binary;
mod text;

pub use binary::BinaryCodec;
pub use text::TextCodec;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::protocol::WireEvent;

/// A caller-owned buffer of inbound payload data, in its native
/// representation: decoded text or raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chunk {
    /// Character data.
    Text(String),
    /// Raw bytes.
    Binary(Bytes),
}

impl Chunk {
    /// Create a text chunk.
    pub fn text(data: impl Into<String>) -> Self {
        Self::Text(data.into())
    }

    /// Create a binary chunk.
    pub fn binary(data: impl Into<Bytes>) -> Self {
        Self::Binary(data.into())
    }

    /// View the chunk as raw bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    /// Consume the chunk as text (lossy for non-UTF-8 binary data).
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Binary(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// Check whether the native representation is raw bytes.
    #[inline]
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }

    /// Get the chunk length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Check if the chunk is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// Result of one unmarshalling call: the decoded events plus any
/// unconsumed trailing input.
///
/// `partial` is non-empty only when the trailing bytes of the input do not
/// yet contain a complete frame; the caller must supply it to the next
/// call for the same logical stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unmarshalled {
    /// Complete frames and heartbeats, in wire order.
    pub frames: Vec<WireEvent>,
    /// Leftover buffer to prepend to the next inbound chunk.
    pub partial: Chunk,
}

/// Parse an inbound chunk, resuming from carried-over partial data.
///
/// Dispatches to [`BinaryCodec`] when `binary` is set or when `data`'s
/// native representation is raw bytes, and to [`TextCodec`] otherwise.
/// Holds no state: store the returned [`Unmarshalled::partial`] and pass
/// it back on the next call for the same logical stream, with at most one
/// in-flight call per stream.
pub fn unmarshall(partial: Chunk, data: Chunk, binary: bool) -> Unmarshalled {
    let result = if binary || data.is_binary() {
        BinaryCodec::unmarshall(partial.as_bytes(), data.as_bytes())
    } else {
        let mut buffer = partial.into_text();
        buffer.push_str(&data.into_text());
        TextCodec::unmarshall(&buffer)
    };

    tracing::trace!(
        frames = result.frames.len(),
        partial_len = result.partial.len(),
        "unmarshalled inbound chunk"
    );

    result
}
