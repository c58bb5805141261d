//! # linewire
//!
//! Framing codec for a line-oriented text/binary messaging protocol
//! carried over byte-oriented transports whose delivery boundaries do not
//! align with frame boundaries: a single transport message may contain
//! multiple frames, and a single frame may be split across multiple
//! transport messages.
//!
//! ## Wire format
//!
//! ```text
//! COMMAND<LF>
//! header1:value1<LF>
//! header2:value2<LF>
//! <LF>
//! body<NUL>
//! ```
//!
//! A lone `<LF>` is a heartbeat. A `content-length` header gives the exact
//! byte length of the body, enabling bodies that contain embedded
//! terminator bytes.
//!
//! ## Example
//!
//! ```
//! use linewire::{marshall, unmarshall, Chunk, Headers, WireEvent};
//!
//! // Outbound: logical frame -> wire bytes.
//! let headers: Headers = [("destination", "/queue/a")].into_iter().collect();
//! let wire = marshall("SEND", headers, b"hello").unwrap();
//!
//! // Inbound: raw chunks -> frames, threading the partial buffer between
//! // calls. The codec is stateless; the caller owns all continuation state.
//! let result = unmarshall(Chunk::default(), Chunk::binary(wire), false);
//! match &result.frames[0] {
//!     WireEvent::Frame(frame) => assert_eq!(frame.command, "SEND"),
//!     WireEvent::Heartbeat => unreachable!(),
//! }
//! assert!(result.partial.is_empty());
//! ```

pub mod codec;
pub mod error;
pub mod protocol;

pub use codec::{unmarshall, BinaryCodec, Chunk, TextCodec, Unmarshalled};
pub use error::{Result, WireError};
pub use protocol::{marshall, Frame, Headers, WireEvent};
