//! Incremental delimiter tokenizer for byte streams that arrive in
//! arbitrarily fragmented chunks.
//!
//! A reader owns a growable buffer. The caller appends bytes as they come off
//! the wire, says "read until this byte" or "read until this byte string",
//! and gets back zero-copy records. Only the not-yet-searched suffix of the
//! buffer is scanned on each call, and a delimiter split across two appends
//! is still found.
//!
//! Two retention policies share the same search state machine:
//! - [`StreamReader`] discards records once handed out and compacts its
//!   buffer automatically, so memory follows record size, not stream length.
//! - [`PersistentStreamReader`] keeps all input until the caller drops a
//!   prefix explicitly, and reports records as absolute [`Span`]s.
//!
//! ```rust
//! use delimstream::{ReaderOptions, StreamReader};
//!
//! let mut reader = StreamReader::new(ReaderOptions {
//!     emit_partial: false,
//!     ..Default::default()
//! });
//! reader.read_until_char(b'\n', true);
//!
//! let mut lines = Vec::new();
//! let chunks: [&[u8]; 3] = [b"first li", b"ne\nsecond", b" line\n"];
//! for chunk in chunks {
//!     for record in reader.feed(chunk).unwrap() {
//!         lines.push(String::from_utf8_lossy(record.bytes).into_owned());
//!     }
//! }
//! assert_eq!(lines, ["first line", "second line"]);
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod chunk_utils;
mod delimiter;
mod error;
mod machine;
mod options;
mod persistent;
mod span;
mod stream_reader;

#[cfg(test)]
mod tests;

pub use buffer::ByteBuffer;
pub use chunk_utils::{produce_chunks, split_at_points};
pub use delimiter::{Delimiter, find};
pub use error::{Error, InvalidArgument, Result};
pub use machine::ReadState;
pub use options::{DEFAULT_CAPACITY, ReaderOptions};
pub use persistent::PersistentStreamReader;
pub use span::{Record, RecordKind, Span};
pub use stream_reader::{Records, StreamReader};
