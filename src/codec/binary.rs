//! Binary codec - byte-oriented unmarshalling pipeline.
//!
//! Parses frames directly out of raw bytes. Binary bodies may contain
//! bytes that are not valid as decoded text and must not be corrupted by
//! text decoding, so only the command and header lines are decoded; the
//! body passes through untouched.
//!
//! The boundary scanner is a two-state machine over the accumulated
//! buffer:
//! - `IN_HEADER`: looking for the double line-feed divider;
//! - `IN_BODY`: the body either spans exactly `content-length` bytes
//!   followed by the frame terminator (embedded NULs survive), or runs to
//!   the next NUL when no length was declared.
//!
//! Input that ends mid-frame is returned as `partial` for the caller to
//! prepend to the next chunk.

use bytes::{BufMut, Bytes, BytesMut};

use super::{Chunk, Unmarshalled};
use crate::protocol::{Frame, Headers, WireEvent, CONTENT_LENGTH, LINE_FEED, NULL};

/// Byte-oriented unmarshaller.
///
/// Stateless; all continuation state lives in the caller-owned partial
/// buffer threaded through [`unmarshall`](crate::codec::unmarshall).
pub struct BinaryCodec;

impl BinaryCodec {
    /// Parse a single complete frame out of a byte buffer.
    ///
    /// Command and header lines are decoded as text (lossy for non-UTF-8
    /// bytes); header lines are split on the first colon with no trimming
    /// and no duplicate resolution, so a repeated name keeps its last
    /// value. A trailing frame terminator, if present, is excluded from
    /// the body.
    pub fn unmarshall_single(data: &[u8]) -> Frame {
        let (header_block, body) = match find_divider(data) {
            Some(divider) => {
                let body_start = divider + 2;
                let mut body_end = data.len();
                if body_end > body_start && data[body_end - 1] == NULL {
                    body_end -= 1;
                }
                (&data[..divider], &data[body_start..body_end])
            }
            None => (data, &[][..]),
        };

        let mut lines = header_block.split(|&b| b == LINE_FEED);
        let command = String::from_utf8_lossy(lines.next().unwrap_or(&[])).into_owned();

        let mut headers = Headers::new();
        for line in lines {
            let line = String::from_utf8_lossy(line);
            match line.split_once(':') {
                Some((name, value)) => headers.set(name, value),
                None => headers.set(line.as_ref(), ""),
            }
        }

        Frame {
            command,
            headers,
            body: Bytes::copy_from_slice(body),
        }
    }

    /// Parse zero or more frames out of carried-over partial bytes plus a
    /// new chunk, returning any incomplete trailing frame as `partial`.
    ///
    /// An input of exactly one line-feed byte is a heartbeat. Line feeds
    /// between frames are consumed without producing events, mirroring the
    /// text pipeline's terminator-plus-line-feeds split.
    pub fn unmarshall(partial: &[u8], data: &[u8]) -> Unmarshalled {
        let mut buf = BytesMut::with_capacity(partial.len() + data.len());
        buf.put_slice(partial);
        buf.put_slice(data);
        let buf = buf.freeze();

        if buf.len() == 1 && buf[0] == LINE_FEED {
            return Unmarshalled {
                frames: vec![WireEvent::Heartbeat],
                partial: Chunk::binary(Bytes::new()),
            };
        }

        let mut frames = Vec::new();
        let mut pos = 0;
        let leftover = loop {
            while pos < buf.len() && buf[pos] == LINE_FEED {
                pos += 1;
            }
            if pos >= buf.len() {
                break Bytes::new();
            }

            let start = pos;
            let Some(divider) = find_divider(&buf[start..]) else {
                break buf.slice(start..);
            };
            let body_start = start + divider + 2;

            let end = match content_length_of(&buf[start..start + divider]) {
                Some(length) => {
                    // The frame is complete once the declared body and its
                    // terminator byte are both buffered.
                    let Some(body_end) = body_start.checked_add(length) else {
                        break buf.slice(start..);
                    };
                    if body_end >= buf.len() {
                        break buf.slice(start..);
                    }
                    body_end
                }
                None => match buf[body_start..].iter().position(|&b| b == NULL) {
                    Some(offset) => body_start + offset,
                    None => break buf.slice(start..),
                },
            };

            frames.push(WireEvent::Frame(Self::unmarshall_single(&buf[start..=end])));
            pos = end + 1;
        };

        Unmarshalled {
            frames,
            partial: Chunk::binary(leftover),
        }
    }
}

/// Find the offset of the first double line-feed divider.
fn find_divider(data: &[u8]) -> Option<usize> {
    data.windows(2)
        .position(|pair| pair == [LINE_FEED, LINE_FEED])
}

/// Extract a parseable `content-length` value from a raw header block.
fn content_length_of(header_block: &[u8]) -> Option<usize> {
    for line in header_block.split(|&b| b == LINE_FEED).skip(1) {
        let Some(idx) = line.iter().position(|&b| b == b':') else {
            continue;
        };
        if &line[..idx] == CONTENT_LENGTH.as_bytes() {
            return std::str::from_utf8(&line[idx + 1..])
                .ok()?
                .trim()
                .parse()
                .ok();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(frame_text: &[u8]) -> Vec<u8> {
        let mut bytes = frame_text.to_vec();
        bytes.push(NULL);
        bytes
    }

    #[test]
    fn test_single_parses_command_headers_body() {
        let frame =
            BinaryCodec::unmarshall_single(b"SEND\ndestination:/queue/a\n\nhello\x00");

        assert_eq!(frame.command, "SEND");
        assert_eq!(frame.headers.get("destination"), Some("/queue/a"));
        assert_eq!(&frame.body[..], b"hello");
    }

    #[test]
    fn test_single_does_not_trim_header_whitespace() {
        let frame = BinaryCodec::unmarshall_single(b"MESSAGE\nfoo: padded \n\n\x00");
        assert_eq!(frame.headers.get("foo"), Some(" padded "));
    }

    #[test]
    fn test_single_last_duplicate_wins() {
        let frame = BinaryCodec::unmarshall_single(b"MESSAGE\nfoo:first\nfoo:second\n\n\x00");
        assert_eq!(frame.headers.get("foo"), Some("second"));
    }

    #[test]
    fn test_single_missing_colon_records_empty_value() {
        let frame = BinaryCodec::unmarshall_single(b"MESSAGE\nbroken-line\n\n\x00");
        assert_eq!(frame.headers.get("broken-line"), Some(""));
    }

    #[test]
    fn test_single_preserves_arbitrary_body_bytes() {
        let mut data = b"MESSAGE\ncontent-length:4\n\n".to_vec();
        data.extend_from_slice(&[0x00, 0xFF, 0x0A, 0x7F]);
        data.push(NULL);

        let frame = BinaryCodec::unmarshall_single(&data);
        assert_eq!(&frame.body[..], &[0x00, 0xFF, 0x0A, 0x7F]);
    }

    #[test]
    fn test_single_without_trailing_terminator_keeps_last_byte() {
        let frame = BinaryCodec::unmarshall_single(b"MESSAGE\n\nabc");
        assert_eq!(&frame.body[..], b"abc");
    }

    #[test]
    fn test_unmarshall_lone_line_feed_is_heartbeat() {
        let result = BinaryCodec::unmarshall(b"", b"\n");

        assert_eq!(result.frames, vec![WireEvent::Heartbeat]);
        assert!(result.partial.is_empty());
    }

    #[test]
    fn test_unmarshall_empty_input() {
        let result = BinaryCodec::unmarshall(b"", b"");

        assert!(result.frames.is_empty());
        assert!(result.partial.is_empty());
    }

    #[test]
    fn test_unmarshall_multiple_frames_in_one_chunk() {
        let mut data = wire(b"MESSAGE\na:1\n\none");
        data.extend(wire(b"MESSAGE\na:2\n\ntwo"));

        let result = BinaryCodec::unmarshall(b"", &data);

        assert_eq!(result.frames.len(), 2);
        assert_eq!(result.frames[0].as_frame().unwrap().body_as_str(), "one");
        assert_eq!(result.frames[1].as_frame().unwrap().body_as_str(), "two");
        assert!(result.partial.is_empty());
    }

    #[test]
    fn test_unmarshall_incomplete_trailing_frame_is_partial() {
        let mut data = wire(b"MESSAGE\na:1\n\none");
        data.extend_from_slice(b"MESSAGE\na:2\n\ntw");

        let result = BinaryCodec::unmarshall(b"", &data);

        assert_eq!(result.frames.len(), 1);
        assert_eq!(
            result.partial,
            Chunk::binary(Bytes::from_static(b"MESSAGE\na:2\n\ntw"))
        );
    }

    #[test]
    fn test_unmarshall_prepends_partial_bytes() {
        let result = BinaryCodec::unmarshall(b"MESSAGE\na:2\n\ntw", b"o\x00");

        assert_eq!(result.frames.len(), 1);
        assert_eq!(result.frames[0].as_frame().unwrap().body_as_str(), "two");
        assert!(result.partial.is_empty());
    }

    #[test]
    fn test_unmarshall_content_length_bounds_nul_bearing_body() {
        let mut data = b"MESSAGE\ncontent-length:5\n\n".to_vec();
        data.extend_from_slice(b"he\x00lo");
        data.push(NULL);
        data.extend(wire(b"RECEIPT\n\ndone"));

        let result = BinaryCodec::unmarshall(b"", &data);

        assert_eq!(result.frames.len(), 2);
        assert_eq!(&result.frames[0].as_frame().unwrap().body[..], b"he\x00lo");
        assert_eq!(result.frames[1].as_frame().unwrap().command, "RECEIPT");
        assert!(result.partial.is_empty());
    }

    #[test]
    fn test_unmarshall_declared_body_missing_terminator_is_partial() {
        // Body bytes are all present but the terminator has not arrived.
        let data = b"MESSAGE\ncontent-length:3\n\nabc";
        let result = BinaryCodec::unmarshall(b"", data);

        assert!(result.frames.is_empty());
        assert_eq!(result.partial, Chunk::binary(Bytes::from_static(data)));
    }

    #[test]
    fn test_unmarshall_skips_line_feeds_between_frames() {
        let mut data = wire(b"MESSAGE\n\nx");
        data.extend_from_slice(b"\n\n");
        data.extend(wire(b"MESSAGE\n\ny"));

        let result = BinaryCodec::unmarshall(b"", &data);

        assert_eq!(result.frames.len(), 2);
        assert!(result.partial.is_empty());
    }

    #[test]
    fn test_unmarshall_header_block_split_across_calls() {
        let first = BinaryCodec::unmarshall(b"", b"CONNECTED\nversi");
        assert!(first.frames.is_empty());

        let second = BinaryCodec::unmarshall(first.partial.as_bytes(), b"on:1.2\n\n\x00");
        assert_eq!(second.frames.len(), 1);
        let frame = second.frames[0].as_frame().unwrap();
        assert_eq!(frame.command, "CONNECTED");
        assert_eq!(frame.headers.get("version"), Some("1.2"));
        assert!(second.partial.is_empty());
    }

    #[test]
    fn test_unmarshall_byte_at_a_time() {
        let data = wire(b"MESSAGE\ncontent-length:2\n\nhi");

        let mut partial = Chunk::binary(Bytes::new());
        let mut events = Vec::new();
        for byte in &data {
            let result = BinaryCodec::unmarshall(partial.as_bytes(), &[*byte]);
            events.extend(result.frames);
            partial = result.partial;
        }

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_frame().unwrap().body_as_str(), "hi");
        assert!(partial.is_empty());
    }

    #[test]
    fn test_content_length_of_ignores_command_line() {
        // Only header lines are inspected, not the command line.
        assert_eq!(content_length_of(b"content-length:9"), None);
        assert_eq!(content_length_of(b"SEND\ncontent-length:9"), Some(9));
        assert_eq!(content_length_of(b"SEND\ncontent-length:bogus"), None);
    }
}
