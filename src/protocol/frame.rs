//! Frame entity with typed accessors.
//!
//! Represents one logical protocol message: a command, an ordered header
//! set, and an opaque body. Uses `bytes::Bytes` for zero-copy body sharing.
//!
//! # Example
//!
//! ```
//! use linewire::protocol::{Frame, Headers};
//! use bytes::Bytes;
//!
//! let headers: Headers = [("destination", "/queue/a")].into_iter().collect();
//! let frame = Frame::new("SEND", headers, Bytes::from_static(b"hello")).unwrap();
//!
//! assert_eq!(frame.command, "SEND");
//! assert_eq!(frame.headers.get("destination"), Some("/queue/a"));
//! assert_eq!(&frame.body[..], b"hello");
//! ```

use std::borrow::Cow;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::wire_format::{CONTENT_LENGTH, LINE_FEED};
use crate::error::{Result, WireError};

/// Insertion-ordered header map.
///
/// Serialization emits entries in insertion order; [`Headers::set`] keeps
/// the position of the first write for a given name and only replaces the
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    /// Create an empty header map.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Set a header value, replacing an existing entry in place or
    /// appending a new one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.0.push((name, value)),
        }
    }

    /// Look up a header value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether a header name is present.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    /// Remove a header entry, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(idx).1)
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Get the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.set(name, value);
        }
        headers
    }
}

/// A complete protocol frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Protocol verb, e.g. `SEND`, `CONNECTED`, `ERROR`.
    pub command: String,
    /// Ordered header set (never null; defaults to empty).
    pub headers: Headers,
    /// Body bytes (text or arbitrary binary; defaults to empty).
    pub body: Bytes,
}

impl Frame {
    /// Create a new outbound frame.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::EmptyCommand`] for an empty command and
    /// [`WireError::CommandLineBreak`] for a command containing a line
    /// terminator. Inbound parsers bypass this constructor; a parsed frame
    /// may carry an empty command when the wire text was degenerate.
    pub fn new(command: impl Into<String>, headers: Headers, body: Bytes) -> Result<Self> {
        let command = command.into();
        if command.is_empty() {
            return Err(WireError::EmptyCommand);
        }
        if command.as_bytes().contains(&LINE_FEED) {
            return Err(WireError::CommandLineBreak);
        }
        Ok(Self {
            command,
            headers,
            body,
        })
    }

    /// Get the parsed `content-length` header, if present and numeric.
    pub fn content_length(&self) -> Option<usize> {
        self.headers.get(CONTENT_LENGTH)?.trim().parse().ok()
    }

    /// View the body as text (lossy for non-UTF-8 bytes).
    #[inline]
    pub fn body_as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// One element of an unmarshalled input: a full frame or a liveness ping.
///
/// A heartbeat carries no command, headers, or body; it is signaled on the
/// wire by a lone line terminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireEvent {
    /// A complete protocol frame.
    Frame(Frame),
    /// A liveness ping.
    Heartbeat,
}

impl WireEvent {
    /// Check if this event is a heartbeat.
    #[inline]
    pub fn is_heartbeat(&self) -> bool {
        matches!(self, Self::Heartbeat)
    }

    /// Get the contained frame, if any.
    #[inline]
    pub fn as_frame(&self) -> Option<&Frame> {
        match self {
            Self::Frame(frame) => Some(frame),
            Self::Heartbeat => None,
        }
    }

    /// Consume the event, returning the contained frame, if any.
    pub fn into_frame(self) -> Option<Frame> {
        match self {
            Self::Frame(frame) => Some(frame),
            Self::Heartbeat => None,
        }
    }
}
