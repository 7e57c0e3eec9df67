/// Whether a record ended at its delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RecordKind {
    /// The delimiter was found. It is not part of the record.
    Complete,
    /// The buffered input ran out first. The record continues in later
    /// records; every byte reported here is known not to begin a delimiter.
    Partial,
}

/// A record located by offset, detached from the buffer that holds it.
///
/// [`StreamReader`](crate::StreamReader) offsets are relative to its buffer
/// at the time the span was produced. [`PersistentStreamReader`] offsets are
/// absolute positions in the stream and are resolved with
/// [`PersistentStreamReader::resolve`].
///
/// [`PersistentStreamReader`]: crate::PersistentStreamReader
/// [`PersistentStreamReader::resolve`]: crate::PersistentStreamReader::resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    pub offset: usize,
    pub len: usize,
    pub kind: RecordKind,
}

impl Span {
    #[inline]
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.kind == RecordKind::Complete
    }
}

/// A zero-copy record borrowed from a reader's buffer.
///
/// The borrow ends before the reader can be written to again, so a record
/// can never observe compaction or reallocation. Copy the bytes out to keep
/// them longer.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub span: Span,
    pub bytes: &'a [u8],
}

impl Record<'_> {
    #[inline]
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.span.kind
    }

    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.span.is_complete()
    }
}

impl core::fmt::Debug for Record<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Record")
            .field("kind", &self.span.kind)
            .field("offset", &self.span.offset)
            .field("bytes", &bstr::BStr::new(self.bytes))
            .finish()
    }
}
