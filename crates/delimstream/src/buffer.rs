//! Growable byte buffer owned by a stream reader.
//!
//! The buffer is a zero-initialized `Vec<u8>` whose length is the buffer
//! capacity; a separate `len` marks how many leading bytes hold data. Keeping
//! the spare region initialized lets [`ByteBuffer::write_cursor`] hand out a
//! plain `&mut [u8]` that a socket read can fill directly.
//!
//! Invariants
//! - `len <= capacity`, and `capacity <= max_capacity` when a limit is set.
//! - Growth doubles the capacity until the request fits; it never grows by
//!   exactly the requested amount, and it never shrinks on its own.
//! - A failed reservation leaves the buffer exactly as it was.

use alloc::vec::Vec;

use tracing::debug;

use crate::error::{Error, InvalidArgument, Result};

#[derive(Clone, Default)]
pub struct ByteBuffer {
    storage: Vec<u8>,
    len: usize,
    max_capacity: Option<usize>,
}

impl core::fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("data", &bstr::BStr::new(self.as_slice()))
            .field("capacity", &self.capacity())
            .field("max_capacity", &self.max_capacity)
            .finish()
    }
}

impl ByteBuffer {
    /// Allocates a buffer of `initial` bytes, at least one and at most
    /// `max_capacity`.
    #[must_use]
    pub fn with_capacity(initial: usize, max_capacity: Option<usize>) -> Self {
        let max_capacity = max_capacity.map(|limit| limit.max(1));
        let mut initial = initial.max(1);
        if let Some(limit) = max_capacity {
            initial = initial.min(limit);
        }
        Self {
            storage: alloc::vec![0; initial],
            len: 0,
            max_capacity,
        }
    }

    /// Takes over caller-provided storage. Its allocation becomes the initial
    /// capacity; any contents are discarded.
    #[must_use]
    pub fn from_vec(mut storage: Vec<u8>, max_capacity: Option<usize>) -> Self {
        let max_capacity = max_capacity.map(|limit| limit.max(1));
        let mut capacity = storage.capacity().max(1);
        if let Some(limit) = max_capacity {
            capacity = capacity.min(limit);
        }
        storage.clear();
        storage.resize(capacity, 0);
        Self {
            storage,
            len: 0,
            max_capacity,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    #[must_use]
    pub fn spare_capacity(&self) -> usize {
        self.capacity() - self.len
    }

    /// The bytes written so far.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// Ensures there is room for `additional` more bytes past `len`.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExceeded`] when the configured limit cannot hold the
    /// request, [`Error::OutOfMemory`] when the allocator fails. In both cases
    /// the buffer is unchanged.
    pub fn reserve_for(&mut self, additional: usize) -> Result<()> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(Error::OutOfMemory {
                requested: usize::MAX,
            })?;
        if required <= self.capacity() {
            return Ok(());
        }
        if let Some(limit) = self.max_capacity {
            if required > limit {
                return Err(Error::CapacityExceeded {
                    requested: required,
                    limit,
                });
            }
        }

        let mut new_capacity = self.capacity().max(1);
        while new_capacity < required {
            new_capacity = new_capacity.saturating_mul(2);
        }
        if let Some(limit) = self.max_capacity {
            new_capacity = new_capacity.min(limit);
        }

        self.storage
            .try_reserve_exact(new_capacity - self.storage.len())
            .map_err(|_| Error::OutOfMemory {
                requested: new_capacity,
            })?;
        debug!(from = self.capacity(), to = new_capacity, "growing buffer");
        self.storage.resize(new_capacity, 0);
        Ok(())
    }

    /// The writable region `[len, capacity)`. Declare what was filled with
    /// [`commit`](Self::commit).
    #[inline]
    pub fn write_cursor(&mut self) -> &mut [u8] {
        &mut self.storage[self.len..]
    }

    /// Marks `n` bytes of the write cursor as data. Does not search.
    ///
    /// # Errors
    ///
    /// [`InvalidArgument::CommitOverflow`] if `n` exceeds the spare capacity.
    pub fn commit(&mut self, n: usize) -> Result<()> {
        let available = self.spare_capacity();
        if n > available {
            return Err(InvalidArgument::CommitOverflow {
                requested: n,
                available,
            }
            .into());
        }
        self.len += n;
        Ok(())
    }

    /// Appends `bytes`, growing as needed.
    ///
    /// # Errors
    ///
    /// Propagates reservation failures from [`reserve_for`](Self::reserve_for).
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.reserve_for(bytes.len())?;
        self.storage[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }

    /// Moves `[offset, len)` to the front of the buffer. Cursors kept by the
    /// owner must be shifted down by `offset`.
    ///
    /// # Errors
    ///
    /// [`InvalidArgument::DropBeyondEnd`] if `offset > len`.
    pub fn drop_before(&mut self, offset: usize) -> Result<()> {
        if offset > self.len {
            return Err(InvalidArgument::DropBeyondEnd {
                offset,
                len: self.len,
            }
            .into());
        }
        if offset == 0 {
            return Ok(());
        }
        self.storage.copy_within(offset..self.len, 0);
        self.len -= offset;
        debug!(offset, moved = self.len, "compacted buffer");
        Ok(())
    }

    /// Forgets all data but keeps the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }
}
