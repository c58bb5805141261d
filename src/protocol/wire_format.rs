//! Wire format constants and frame serialization.
//!
//! Implements the canonical text layout shared by both transport modes:
//!
//! ```text
//! COMMAND<LF>
//! header1:value1<LF>
//! header2:value2<LF>
//! <LF>
//! body<NUL>
//! ```
//!
//! A lone `<LF>` on the wire is a heartbeat, not a frame.

use bytes::{BufMut, Bytes, BytesMut};

use super::frame::{Frame, Headers};
use crate::error::Result;

/// Line terminator byte separating the command and header lines.
pub const LINE_FEED: u8 = b'\n';

/// Frame terminator byte appended after the body.
pub const NULL: u8 = 0;

/// Header carrying the exact byte length of the body, enabling bodies that
/// contain embedded terminator bytes.
pub const CONTENT_LENGTH: &str = "content-length";

/// Sentinel `content-length` value instructing the serializer to omit the
/// auto-computed length header. The sentinel entry itself never appears on
/// the wire.
pub const OMIT_CONTENT_LENGTH: &str = "false";

/// Serialize an outbound frame to wire bytes.
///
/// Convenience wrapper building a [`Frame`] and serializing it via
/// [`serialize`].
///
/// # Errors
///
/// Returns an error if the command is empty or contains a line terminator.
///
/// # Example
///
/// ```
/// use linewire::protocol::{marshall, Headers};
///
/// let headers: Headers = [("destination", "/queue/a")].into_iter().collect();
/// let wire = marshall("SEND", headers, b"hello").unwrap();
/// assert_eq!(&wire[..], b"SEND\ndestination:/queue/a\ncontent-length:5\n\nhello\x00");
/// ```
pub fn marshall(command: &str, headers: Headers, body: &[u8]) -> Result<Bytes> {
    let frame = Frame::new(command, headers, Bytes::copy_from_slice(body))?;
    Ok(serialize(&frame))
}

/// Serialize a frame into its canonical wire representation, including the
/// trailing frame terminator.
///
/// Headers are emitted in insertion order. When the body is non-empty and
/// the caller has not suppressed it with [`OMIT_CONTENT_LENGTH`], a
/// `content-length` header measuring the body in bytes is appended after
/// the caller's headers. The sentinel entry, when present, is stripped from
/// the emitted set entirely.
pub fn serialize(frame: &Frame) -> Bytes {
    let mut headers = frame.headers.clone();
    let omit_length = headers.get(CONTENT_LENGTH) == Some(OMIT_CONTENT_LENGTH);
    if omit_length {
        headers.remove(CONTENT_LENGTH);
    }

    let mut buf = BytesMut::with_capacity(estimated_len(frame));
    buf.put_slice(frame.command.as_bytes());
    buf.put_u8(LINE_FEED);

    for (name, value) in headers.iter() {
        buf.put_slice(name.as_bytes());
        buf.put_u8(b':');
        buf.put_slice(value.as_bytes());
        buf.put_u8(LINE_FEED);
    }

    if !frame.body.is_empty() && !omit_length {
        // Body length in encoded bytes, not characters.
        buf.put_slice(CONTENT_LENGTH.as_bytes());
        buf.put_u8(b':');
        buf.put_slice(frame.body.len().to_string().as_bytes());
        buf.put_u8(LINE_FEED);
    }

    buf.put_u8(LINE_FEED);
    buf.put_slice(&frame.body);
    buf.put_u8(NULL);

    buf.freeze()
}

fn estimated_len(frame: &Frame) -> usize {
    let headers_len: usize = frame
        .headers
        .iter()
        .map(|(n, v)| n.len() + v.len() + 2)
        .sum();
    frame.command.len() + headers_len + frame.body.len() + 32
}
