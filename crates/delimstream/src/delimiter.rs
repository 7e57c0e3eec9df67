use alloc::boxed::Box;

use bstr::ByteSlice;

use crate::error::{InvalidArgument, Result};

/// The byte or byte string that terminates a record.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Byte(u8),
    Bytes(Box<[u8]>),
}

impl core::fmt::Debug for Delimiter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Delimiter::Byte(b) => f.debug_tuple("Byte").field(&bstr::BStr::new(&[*b])).finish(),
            Delimiter::Bytes(b) => f.debug_tuple("Bytes").field(&bstr::BStr::new(b)).finish(),
        }
    }
}

impl Delimiter {
    /// A byte-string delimiter.
    ///
    /// # Errors
    ///
    /// [`InvalidArgument::EmptyDelimiter`] if `bytes` is empty, since an empty
    /// delimiter would match everywhere and never advance.
    pub fn bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(InvalidArgument::EmptyDelimiter.into());
        }
        Ok(Delimiter::Bytes(bytes.into()))
    }

    #[must_use]
    pub fn byte(byte: u8) -> Self {
        Delimiter::Byte(byte)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Delimiter::Byte(_) => 1,
            Delimiter::Bytes(b) => b.len(),
        }
    }

    /// Always `false`; delimiters are validated non-empty on construction.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Delimiter::Byte(b) => core::slice::from_ref(b),
            Delimiter::Bytes(b) => b,
        }
    }

    /// Offset of the leftmost occurrence of this delimiter in `haystack`.
    #[inline]
    #[must_use]
    pub fn find(&self, haystack: &[u8]) -> Option<usize> {
        find(haystack, self.as_bytes())
    }
}

impl From<u8> for Delimiter {
    fn from(byte: u8) -> Self {
        Delimiter::Byte(byte)
    }
}

/// Offset of the leftmost occurrence of `needle` in `haystack`.
///
/// Single bytes use a `memchr` scan, longer needles a substring search. A
/// haystack shorter than the needle is rejected without scanning. An empty
/// needle never matches.
#[must_use]
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    match needle {
        [] => None,
        _ if haystack.len() < needle.len() => None,
        [b] => haystack.find_byte(*b),
        _ => haystack.find(needle),
    }
}
