//! Retain-history reader.
//!
//! [`PersistentStreamReader`] keeps every byte it was given until the caller
//! drops a prefix explicitly, which suits servers that parse a request piece
//! by piece and then forward the whole of it. Records are reported as
//! [`Span`]s in absolute stream offsets, so a span stays meaningful across
//! later appends and compactions, and [`resolve`] can tell when its bytes
//! are gone.
//!
//! [`resolve`]: PersistentStreamReader::resolve

use alloc::vec::Vec;

use tracing::debug;

use crate::{
    buffer::ByteBuffer,
    delimiter::Delimiter,
    error::{InvalidArgument, Result},
    machine::{Machine, ReadState},
    options::ReaderOptions,
    span::{Record, Span},
};

/// Pull-based tokenizer that remembers all input until told to forget it.
///
/// # Examples
///
/// ```rust
/// use delimstream::{PersistentStreamReader, ReaderOptions};
///
/// let mut reader = PersistentStreamReader::new(ReaderOptions::default());
/// reader.append(b"GET / HTTP/1.1\r\nHost: a\r\n\r\nbody").unwrap();
///
/// reader.read_until_string(b"\r\n", false).unwrap();
/// let request_line = reader.poll().unwrap();
/// reader.read_until_string(b"\r\n\r\n", false).unwrap();
/// let headers = reader.poll().unwrap();
///
/// assert_eq!(reader.resolve(request_line).unwrap(), b"GET / HTTP/1.1");
/// assert_eq!(reader.resolve(headers).unwrap(), b"Host: a");
/// assert_eq!(reader.history(false), b"GET / HTTP/1.1\r\nHost: a\r\n\r\n");
///
/// reader.clear_history().unwrap();
/// assert_eq!(reader.history(true), b"body");
/// assert!(reader.resolve(headers).is_err());
/// ```
#[derive(Debug)]
pub struct PersistentStreamReader {
    buffer: ByteBuffer,
    machine: Machine,
    /// Absolute stream offset of the first buffered byte.
    base: usize,
}

impl Default for PersistentStreamReader {
    fn default() -> Self {
        Self::new(ReaderOptions::default())
    }
}

impl PersistentStreamReader {
    #[must_use]
    pub fn new(options: ReaderOptions) -> Self {
        Self {
            buffer: ByteBuffer::with_capacity(options.initial_capacity, options.max_capacity),
            machine: Machine::default(),
            base: 0,
        }
    }

    /// Builds a reader on top of caller-provided storage, reusing its
    /// allocation as the initial capacity.
    #[must_use]
    pub fn with_buffer(storage: Vec<u8>, options: ReaderOptions) -> Self {
        Self {
            buffer: ByteBuffer::from_vec(storage, options.max_capacity),
            machine: Machine::default(),
            base: 0,
        }
    }

    /// Reads until the byte string `delimiter`; see
    /// [`StreamReader::read_until_string`](crate::StreamReader::read_until_string).
    ///
    /// # Errors
    ///
    /// [`InvalidArgument::EmptyDelimiter`] if `delimiter` is empty.
    pub fn read_until_string(&mut self, delimiter: &[u8], repeat: bool) -> Result<()> {
        self.machine.arm(Delimiter::bytes(delimiter)?, repeat);
        Ok(())
    }

    pub fn read_until_char(&mut self, delimiter: u8, repeat: bool) {
        self.machine.arm(Delimiter::byte(delimiter), repeat);
    }

    pub fn arm(&mut self, delimiter: Delimiter, repeat: bool) {
        self.machine.arm(delimiter, repeat);
    }

    /// Appends `bytes` to the history. Does not search; call
    /// [`poll`](Self::poll).
    ///
    /// # Errors
    ///
    /// Propagates buffer growth failures.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(bytes)
    }

    /// Returns a writable region of at least `additional` bytes. Follow with
    /// [`end_put`](Self::end_put).
    ///
    /// # Errors
    ///
    /// Propagates buffer growth failures.
    pub fn begin_put(&mut self, additional: usize) -> Result<&mut [u8]> {
        self.buffer.reserve_for(additional)?;
        Ok(self.buffer.write_cursor())
    }

    /// Declares that `n` bytes of the region from
    /// [`begin_put`](Self::begin_put) were filled.
    ///
    /// # Errors
    ///
    /// [`InvalidArgument::CommitOverflow`] if `n` exceeds that region.
    pub fn end_put(&mut self, n: usize) -> Result<()> {
        self.buffer.commit(n)
    }

    /// Push form of [`append`](Self::append) followed by [`poll_record`]:
    /// invokes `on_record` for each complete record the new bytes finish and
    /// returns how many there were.
    ///
    /// # Errors
    ///
    /// Same as [`append`](Self::append); no record is extracted in that case.
    ///
    /// [`poll_record`]: Self::poll_record
    pub fn append_with<F>(&mut self, bytes: &[u8], mut on_record: F) -> Result<usize>
    where
        F: FnMut(Record<'_>),
    {
        self.append(bytes)?;
        let mut count = 0;
        while let Some(record) = self.poll_record() {
            on_record(record);
            count += 1;
        }
        Ok(count)
    }

    /// Extracts the next complete record, if one is buffered.
    ///
    /// Never reports partial records. The returned span is in absolute stream
    /// offsets.
    pub fn poll(&mut self) -> Option<Span> {
        let span = self.machine.step(self.buffer.as_slice(), false)?;
        Some(Span {
            offset: span.offset + self.base,
            ..span
        })
    }

    /// Like [`poll`](Self::poll), but borrows the record's bytes as well.
    pub fn poll_record(&mut self) -> Option<Record<'_>> {
        let span = self.poll()?;
        let start = span.offset - self.base;
        Some(Record {
            span,
            bytes: &self.buffer.as_slice()[start..start + span.len],
        })
    }

    /// The bytes of a span returned by [`poll`](Self::poll).
    ///
    /// # Errors
    ///
    /// [`InvalidArgument::SpanCompacted`] if part of the span was dropped by
    /// compaction, [`InvalidArgument::SpanOutOfRange`] if it reaches past the
    /// data appended so far.
    pub fn resolve(&self, span: Span) -> Result<&[u8]> {
        if span.offset < self.base {
            return Err(InvalidArgument::SpanCompacted {
                offset: span.offset,
                base: self.base,
            }
            .into());
        }
        let end = span.end();
        if end > self.stream_len() {
            return Err(InvalidArgument::SpanOutOfRange {
                end,
                len: self.stream_len(),
            }
            .into());
        }
        Ok(&self.buffer.as_slice()[span.offset - self.base..end - self.base])
    }

    /// Everything still retained, optionally without the bytes not yet
    /// consumed by a record.
    #[must_use]
    pub fn history(&self, include_unprocessed: bool) -> &[u8] {
        let data = self.buffer.as_slice();
        if include_unprocessed {
            data
        } else {
            &data[..self.machine.read()]
        }
    }

    /// Bytes not yet consumed by a record.
    #[must_use]
    pub fn buffer_data(&self) -> &[u8] {
        &self.buffer.as_slice()[self.machine.read()..]
    }

    /// Marks every buffered byte as consumed without producing a record.
    pub fn clear_buffer(&mut self) {
        self.machine.consume_all(self.buffer.len());
    }

    /// Consumes `n` unread bytes without producing a record.
    ///
    /// # Errors
    ///
    /// [`InvalidArgument::SkipBeyondEnd`] if fewer than `n` bytes are unread.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.machine.skip(n, self.buffer.len())
    }

    /// Forgets the stream before absolute offset `offset`.
    ///
    /// Spans that start before `offset` no longer resolve. Dropping unread
    /// bytes is allowed; they are then considered consumed. Offsets that
    /// were already dropped are a no-op.
    ///
    /// # Errors
    ///
    /// [`InvalidArgument::DropBeyondEnd`] if `offset` is past the end of the
    /// stream.
    pub fn drop_before(&mut self, offset: usize) -> Result<()> {
        if offset > self.stream_len() {
            return Err(InvalidArgument::DropBeyondEnd {
                offset,
                len: self.stream_len(),
            }
            .into());
        }
        let Some(relative) = offset.checked_sub(self.base) else {
            return Ok(());
        };
        self.buffer.drop_before(relative)?;
        self.machine.shift_down(relative);
        self.base = offset;
        debug!(base = self.base, "dropped history");
        Ok(())
    }

    /// Drops every byte already consumed by a record.
    ///
    /// # Errors
    ///
    /// Never fails in practice; see [`drop_before`](Self::drop_before).
    pub fn clear_history(&mut self) -> Result<()> {
        self.drop_before(self.base + self.machine.read())
    }

    /// Absolute offset of the oldest retained byte.
    #[must_use]
    pub fn base_offset(&self) -> usize {
        self.base
    }

    /// Total number of bytes ever appended.
    #[must_use]
    pub fn stream_len(&self) -> usize {
        self.base + self.buffer.len()
    }

    /// Forgets everything, including the stream position. The allocation is
    /// kept.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.machine.reset();
        self.base = 0;
    }

    #[must_use]
    pub fn state(&self) -> ReadState {
        self.machine.state()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state() == ReadState::Idle
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
}
