//! The delimiter search state machine shared by both stream readers.
//!
//! The machine owns no bytes. It holds the read and search cursors and the
//! armed delimiter, and each [`Machine::step`] inspects the reader's buffered
//! bytes to produce at most one record span.
//!
//! Invariants
//! - `read <= search <= data.len()` for the `data` passed to `step`.
//! - Bytes in `[search, len)` have not been ruled out as the start of a
//!   delimiter. After a failed search `search` stops at
//!   `len - delimiter_len + 1`, so a delimiter that straddles the end of the
//!   buffer and the next append is still found.
//! - Each `step` call either returns a span or leaves nothing further to do
//!   until more bytes arrive or the delimiter changes.

use tracing::trace;

use crate::{
    delimiter::Delimiter,
    error::{InvalidArgument, Result},
    span::{RecordKind, Span},
};

/// What a reader is currently waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ReadState {
    /// No delimiter is armed; appended bytes accumulate unread.
    #[default]
    Idle,
    /// Waiting for a multi-byte delimiter.
    AwaitingString,
    /// Waiting for a single-byte delimiter.
    AwaitingChar,
}

#[derive(Debug, Clone)]
struct Armed {
    delimiter: Delimiter,
    repeat: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Machine {
    armed: Option<Armed>,
    read: usize,
    search: usize,
}

impl Machine {
    pub(crate) fn state(&self) -> ReadState {
        match &self.armed {
            None => ReadState::Idle,
            Some(Armed {
                delimiter: Delimiter::Byte(_),
                ..
            }) => ReadState::AwaitingChar,
            Some(Armed {
                delimiter: Delimiter::Bytes(_),
                ..
            }) => ReadState::AwaitingString,
        }
    }

    #[inline]
    pub(crate) fn read(&self) -> usize {
        self.read
    }

    #[cfg(any(test, feature = "fuzzing"))]
    #[inline]
    pub(crate) fn search(&self) -> usize {
        self.search
    }

    /// Arms `delimiter`, replacing whatever was armed before. Unread bytes are
    /// searched again from the read cursor.
    pub(crate) fn arm(&mut self, delimiter: Delimiter, repeat: bool) {
        trace!(?delimiter, repeat, "arming delimiter");
        self.armed = Some(Armed { delimiter, repeat });
        self.search = self.read;
    }

    /// Runs one round of extraction over `data`, the reader's buffered bytes.
    pub(crate) fn step(&mut self, data: &[u8], emit_partial: bool) -> Option<Span> {
        debug_assert!(self.read <= self.search && self.search <= data.len());
        let len = data.len();
        if self.search >= len {
            return None;
        }

        let Some(armed) = &self.armed else {
            return None;
        };
        let delimiter_len = armed.delimiter.len();
        let repeat = armed.repeat;

        if let Some(found) = armed.delimiter.find(&data[self.search..]) {
            let at = self.search + found;
            let span = Span {
                offset: self.read,
                len: at - self.read,
                kind: RecordKind::Complete,
            };
            self.read = at + delimiter_len;
            self.search = self.read;
            if !repeat {
                self.armed = None;
            }
            trace!(offset = span.offset, len = span.len, "delimiter matched");
            return Some(span);
        }

        // Positions from here on could still begin a delimiter that the next
        // append completes.
        let resume = (len + 1).saturating_sub(delimiter_len).max(self.search);
        self.search = resume;
        if emit_partial && resume > self.read {
            let span = Span {
                offset: self.read,
                len: resume - self.read,
                kind: RecordKind::Partial,
            };
            self.read = resume;
            trace!(offset = span.offset, len = span.len, "partial record");
            return Some(span);
        }
        None
    }

    /// Consumes `n` unread bytes without producing a record.
    pub(crate) fn skip(&mut self, n: usize, len: usize) -> Result<()> {
        let available = len - self.read;
        if n > available {
            return Err(InvalidArgument::SkipBeyondEnd {
                requested: n,
                available,
            }
            .into());
        }
        self.read += n;
        self.search = self.search.max(self.read);
        Ok(())
    }

    /// Marks everything up to `len` as consumed.
    pub(crate) fn consume_all(&mut self, len: usize) {
        self.read = len;
        self.search = len;
    }

    /// Shifts both cursors down after the buffer dropped `offset` leading
    /// bytes. Cursors that pointed into the dropped region land on zero.
    pub(crate) fn shift_down(&mut self, offset: usize) {
        self.read = self.read.saturating_sub(offset);
        self.search = self.search.saturating_sub(offset);
    }

    pub(crate) fn reset(&mut self) {
        self.armed = None;
        self.read = 0;
        self.search = 0;
    }
}
