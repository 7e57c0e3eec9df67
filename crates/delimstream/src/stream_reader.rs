//! Discard-on-consume reader.
//!
//! [`StreamReader`] keeps only the bytes it has not handed out yet. Records
//! borrow the reader's buffer, so the borrow checker guarantees they are gone
//! before the next write can compact or reallocate it.
//!
//! Compaction policy
//! - Before new bytes are accepted, a fully consumed buffer rewinds to offset
//!   zero without copying.
//! - Otherwise, when the incoming write does not fit in the spare capacity and
//!   some prefix has been consumed, the unread tail is moved to the front.
//! - Only if the write still does not fit does the buffer grow.

use alloc::vec::Vec;
use core::iter::FusedIterator;

use crate::{
    buffer::ByteBuffer,
    delimiter::Delimiter,
    error::Result,
    machine::{Machine, ReadState},
    options::ReaderOptions,
    span::Record,
};

/// Incremental tokenizer that forgets records once they are handed out.
///
/// # Examples
///
/// ```rust
/// use delimstream::{ReaderOptions, RecordKind, StreamReader};
///
/// let mut reader = StreamReader::new(ReaderOptions::default());
/// reader.read_until_string(b"\r\n", true).unwrap();
///
/// let lines: Vec<Vec<u8>> = reader
///     .feed(b"HELO example.org\r\nMAIL FROM:<a@b>\r")
///     .unwrap()
///     .filter(|r| r.kind() == RecordKind::Complete)
///     .map(|r| r.bytes.to_vec())
///     .collect();
/// assert_eq!(lines, [b"HELO example.org".to_vec()]);
///
/// // The "\r" left at the end of the first chunk is still matched.
/// let mut records = reader.feed(b"\n").unwrap();
/// let record = records.next().unwrap();
/// assert!(record.is_complete());
/// assert_eq!(record.bytes, b"");
/// ```
///
/// With the default options the first feed above also yields the partial
/// record `"MAIL FROM:<a@b>"`; the final record is whatever remained of that
/// line, here nothing.
#[derive(Debug)]
pub struct StreamReader {
    buffer: ByteBuffer,
    machine: Machine,
    emit_partial: bool,
}

impl Default for StreamReader {
    fn default() -> Self {
        Self::new(ReaderOptions::default())
    }
}

impl StreamReader {
    #[must_use]
    pub fn new(options: ReaderOptions) -> Self {
        Self {
            buffer: ByteBuffer::with_capacity(options.initial_capacity, options.max_capacity),
            machine: Machine::default(),
            emit_partial: options.emit_partial,
        }
    }

    /// Builds a reader on top of caller-provided storage. The vector's
    /// allocation is reused as the initial capacity and
    /// `options.initial_capacity` is ignored.
    #[must_use]
    pub fn with_buffer(storage: Vec<u8>, options: ReaderOptions) -> Self {
        Self {
            buffer: ByteBuffer::from_vec(storage, options.max_capacity),
            machine: Machine::default(),
            emit_partial: options.emit_partial,
        }
    }

    /// Reads until the byte string `delimiter`.
    ///
    /// With `repeat` the reader stays armed after each match; otherwise it
    /// returns to [`ReadState::Idle`] after the first record.
    ///
    /// # Errors
    ///
    /// [`InvalidArgument::EmptyDelimiter`](crate::InvalidArgument::EmptyDelimiter)
    /// if `delimiter` is empty. The previous delimiter stays armed.
    pub fn read_until_string(&mut self, delimiter: &[u8], repeat: bool) -> Result<()> {
        self.machine.arm(Delimiter::bytes(delimiter)?, repeat);
        Ok(())
    }

    /// Reads until the byte `delimiter`.
    pub fn read_until_char(&mut self, delimiter: u8, repeat: bool) {
        self.machine.arm(Delimiter::byte(delimiter), repeat);
    }

    /// Arms an already validated delimiter.
    pub fn arm(&mut self, delimiter: Delimiter, repeat: bool) {
        self.machine.arm(delimiter, repeat);
    }

    /// Returns a writable region of at least `additional` bytes for the caller
    /// to fill directly, e.g. from a socket read. Follow with
    /// [`end_put`](Self::end_put).
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`](crate::Error::OutOfMemory) or
    /// [`Error::CapacityExceeded`](crate::Error::CapacityExceeded) if the
    /// buffer cannot grow.
    pub fn begin_put(&mut self, additional: usize) -> Result<&mut [u8]> {
        self.make_room(additional)?;
        Ok(self.buffer.write_cursor())
    }

    /// Declares that `n` bytes of the region from
    /// [`begin_put`](Self::begin_put) were filled. Does not search; call
    /// [`records`](Self::records) to extract.
    ///
    /// # Errors
    ///
    /// [`InvalidArgument::CommitOverflow`](crate::InvalidArgument::CommitOverflow)
    /// if `n` exceeds the writable region.
    pub fn end_put(&mut self, n: usize) -> Result<()> {
        self.buffer.commit(n)
    }

    /// Appends `bytes` and returns the records that can now be extracted.
    ///
    /// Feeding an empty slice changes nothing and yields no records.
    ///
    /// # Errors
    ///
    /// Propagates buffer growth failures; no bytes are appended in that case.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Records<'_>> {
        if bytes.is_empty() {
            let mut records = self.records();
            records.exhausted = true;
            return Ok(records);
        }
        self.make_room(bytes.len())?;
        self.buffer.extend_from_slice(bytes)?;
        Ok(self.records())
    }

    /// Callback form of [`feed`](Self::feed): invokes `on_record` for each
    /// extracted record and returns how many there were.
    ///
    /// # Errors
    ///
    /// Same as [`feed`](Self::feed).
    pub fn feed_with<F>(&mut self, bytes: &[u8], mut on_record: F) -> Result<usize>
    where
        F: FnMut(Record<'_>),
    {
        let mut count = 0;
        for record in self.feed(bytes)? {
            on_record(record);
            count += 1;
        }
        Ok(count)
    }

    /// Extracts records from already buffered bytes, e.g. after
    /// [`end_put`](Self::end_put) or after arming a new delimiter.
    pub fn records(&mut self) -> Records<'_> {
        Records {
            data: self.buffer.as_slice(),
            machine: &mut self.machine,
            emit_partial: self.emit_partial,
            exhausted: false,
        }
    }

    /// Bytes that have been appended but not handed out.
    #[must_use]
    pub fn buffer_data(&self) -> &[u8] {
        &self.buffer.as_slice()[self.machine.read()..]
    }

    /// Consumes `n` unread bytes without producing a record, for data the
    /// caller read out-of-band through [`buffer_data`](Self::buffer_data).
    ///
    /// # Errors
    ///
    /// [`InvalidArgument::SkipBeyondEnd`](crate::InvalidArgument::SkipBeyondEnd)
    /// if fewer than `n` bytes are unread.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.machine.skip(n, self.buffer.len())
    }

    /// Forgets all buffered bytes and the armed delimiter. The allocation is
    /// kept for the next stream.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.machine.reset();
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

    fn make_room(&mut self, additional: usize) -> Result<()> {
        let read = self.machine.read();
        if read > 0 && (read == self.buffer.len() || self.buffer.spare_capacity() < additional) {
            self.buffer.drop_before(read)?;
            self.machine.shift_down(read);
        }
        self.buffer.reserve_for(additional)
    }

    #[cfg(any(test, feature = "fuzzing"))]
    #[doc(hidden)]
    #[must_use]
    pub fn debug_cursors(&self) -> (usize, usize, usize) {
        (self.machine.read(), self.machine.search(), self.buffer.len())
    }
}

/// Records extracted by one [`StreamReader::feed`] or
/// [`StreamReader::records`] call.
///
/// Extraction is lazy: each `next` advances the reader by one record.
/// Dropping the iterator early loses nothing; the remaining records are
/// produced by the next call.
#[derive(Debug)]
pub struct Records<'a> {
    data: &'a [u8],
    machine: &'a mut Machine,
    emit_partial: bool,
    exhausted: bool,
}

impl<'a> Iterator for Records<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let Some(span) = self.machine.step(self.data, self.emit_partial) else {
            self.exhausted = true;
            return None;
        };
        Some(Record {
            span,
            bytes: &self.data[span.offset..span.end()],
        })
    }
}

impl FusedIterator for Records<'_> {}
