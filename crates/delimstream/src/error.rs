use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors reported by the buffer and the stream readers.
///
/// Every error is reported synchronously to the call that caused it. Network
/// data can never produce one: a delimiter that does not show up is not an
/// error, it simply yields no record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The allocator refused to grow the buffer.
    ///
    /// The reader that reported this should be discarded.
    #[error("out of memory: cannot grow buffer to {requested} bytes")]
    OutOfMemory { requested: usize },
    /// Growing the buffer would exceed the configured `max_capacity`.
    #[error("buffer limit exceeded: {requested} bytes requested, limit is {limit}")]
    CapacityExceeded { requested: usize, limit: usize },
    /// The caller violated the contract of an operation. State is unchanged.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
}

/// Contract violations detected before any state is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidArgument {
    #[error("delimiter must not be empty")]
    EmptyDelimiter,
    #[error("cannot commit {requested} bytes, only {available} are available")]
    CommitOverflow { requested: usize, available: usize },
    #[error("cannot drop before offset {offset}, buffer ends at {len}")]
    DropBeyondEnd { offset: usize, len: usize },
    #[error("cannot skip {requested} bytes, only {available} are unread")]
    SkipBeyondEnd { requested: usize, available: usize },
    #[error("span at offset {offset} was compacted away (history starts at {base})")]
    SpanCompacted { offset: usize, base: usize },
    #[error("span ends at {end}, past the end of the stream at {len}")]
    SpanOutOfRange { end: usize, len: usize },
}
