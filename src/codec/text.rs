//! Text codec - character-oriented unmarshalling pipeline.
//!
//! Parses frames out of a decoded character buffer. Used for transport
//! payloads that arrive as text; payloads with bytes that are not valid as
//! decoded text go through [`BinaryCodec`](super::BinaryCodec) instead.

use bytes::Bytes;

use super::{Chunk, Unmarshalled};
use crate::protocol::{Frame, Headers, WireEvent, CONTENT_LENGTH, LINE_FEED, NULL};

/// Character-oriented unmarshaller.
///
/// Stateless; all continuation state lives in the caller-owned partial
/// buffer threaded through [`unmarshall`](crate::codec::unmarshall).
pub struct TextCodec;

impl TextCodec {
    /// Parse a single complete frame out of a character buffer.
    ///
    /// Best-effort and infallible: a buffer with no header/body divider is
    /// treated as a header-only frame, and a header line with no colon is
    /// recorded with an empty value. When a header name repeats, the first
    /// wire occurrence wins.
    pub fn unmarshall_single(data: &str) -> Frame {
        let (header_block, body_region) = match data.find("\n\n") {
            Some(divider) => (&data[..divider], &data[divider + 2..]),
            None => (data, ""),
        };

        let mut lines = header_block.split('\n');
        let command = lines.next().unwrap_or("").to_string();

        let mut headers = Headers::new();
        for line in lines {
            let (name, value) = match line.split_once(':') {
                Some((name, value)) => (name.trim(), value.trim()),
                None => (line.trim(), ""),
            };
            if !headers.contains(name) {
                headers.set(name, value);
            }
        }

        // A declared content-length bounds the body exactly, so embedded
        // terminator characters survive; otherwise the body runs up to the
        // first NUL.
        let length = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.trim().parse::<usize>().ok());
        let body: String = match length {
            Some(len) => body_region.chars().take(len).collect(),
            None => body_region.chars().take_while(|&c| c != '\0').collect(),
        };

        Frame {
            command,
            headers,
            body: Bytes::from(body),
        }
    }

    /// Parse zero or more frames out of a character buffer, returning any
    /// incomplete trailing frame as `partial`.
    ///
    /// An input of exactly one line terminator is a heartbeat.
    pub fn unmarshall(data: &str) -> Unmarshalled {
        if data == "\n" {
            return Unmarshalled {
                frames: vec![WireEvent::Heartbeat],
                partial: Chunk::text(""),
            };
        }

        let (complete, trailing) = split_frames(data);
        let mut frames: Vec<WireEvent> = complete
            .into_iter()
            .map(|segment| WireEvent::Frame(Self::unmarshall_single(segment)))
            .collect();

        if trailing == "\n" {
            frames.push(WireEvent::Frame(Self::unmarshall_single(trailing)));
            return Unmarshalled {
                frames,
                partial: Chunk::text(""),
            };
        }

        Unmarshalled {
            frames,
            partial: Chunk::text(trailing),
        }
    }
}

/// Split a buffer on the frame terminator, consuming any line feeds that
/// trail it. Returns the complete frame texts and the unterminated tail
/// (empty when the buffer ended exactly on a frame boundary).
fn split_frames(data: &str) -> (Vec<&str>, &str) {
    let bytes = data.as_bytes();
    let mut complete = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == NULL {
            complete.push(&data[start..i]);
            i += 1;
            while i < bytes.len() && bytes[i] == LINE_FEED {
                i += 1;
            }
            start = i;
        } else {
            i += 1;
        }
    }
    (complete, &data[start..])
}
