/// Default size of a freshly allocated reader buffer, in bytes.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Configuration options for [`StreamReader`](crate::StreamReader) and
/// [`PersistentStreamReader`](crate::PersistentStreamReader).
///
/// # Examples
///
/// ```rust
/// use delimstream::{ReaderOptions, StreamReader};
///
/// let reader = StreamReader::new(ReaderOptions {
///     initial_capacity: 512,
///     max_capacity: Some(64 * 1024),
///     ..Default::default()
/// });
/// assert!(reader.capacity() >= 512);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Number of bytes allocated up front.
    ///
    /// The buffer doubles from here whenever a write does not fit. A value of
    /// zero is bumped to one so that doubling always makes progress.
    ///
    /// # Default
    ///
    /// `4096`
    pub initial_capacity: usize,

    /// Upper bound on the buffer capacity.
    ///
    /// When set, a reservation that would need more than this many bytes
    /// fails with [`Error::CapacityExceeded`](crate::Error::CapacityExceeded)
    /// instead of growing. Use it to bound memory for records that never
    /// terminate.
    ///
    /// # Default
    ///
    /// `None` (unbounded)
    pub max_capacity: Option<usize>,

    /// Whether a [`StreamReader`](crate::StreamReader) hands out partial
    /// records.
    ///
    /// When `true`, bytes that are known not to start a delimiter are
    /// released as [`RecordKind::Partial`](crate::RecordKind::Partial)
    /// records as soon as they arrive, so large payloads can be forwarded
    /// progressively. When `false`, bytes stay buffered until the delimiter
    /// is found.
    ///
    /// [`PersistentStreamReader`](crate::PersistentStreamReader) never emits
    /// partial records and ignores this option.
    ///
    /// # Default
    ///
    /// `true`
    pub emit_partial: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            max_capacity: None,
            emit_partial: true,
        }
    }
}
