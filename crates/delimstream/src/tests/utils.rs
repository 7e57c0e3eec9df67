use alloc::vec::Vec;

use crate::{Record, RecordKind, Span};

/// Delimiters exercised by the property tests, including self-overlapping
/// ones where a naive resume point would skip a match.
pub(crate) const DELIMITERS: &[&[u8]] = &[b"\n", b"\r\n", b"aa", b"aba", b"\r\n\r\n"];

/// Map arbitrary bytes onto a tiny alphabet so delimiters show up often.
pub(crate) fn small_alphabet(input: &[u8]) -> Vec<u8> {
    const ALPHABET: [u8; 4] = [b'a', b'b', b'\r', b'\n'];
    input.iter().map(|b| ALPHABET[usize::from(*b) % ALPHABET.len()]).collect()
}

/// Straightforward split of a whole input at successive leftmost delimiter
/// occurrences. Returns the complete records and the unterminated tail.
pub(crate) fn reference_split(input: &[u8], delimiter: &[u8]) -> (Vec<Vec<u8>>, Vec<u8>) {
    let mut records = Vec::new();
    let mut start = 0;
    let mut at = 0;
    while at + delimiter.len() <= input.len() {
        if &input[at..at + delimiter.len()] == delimiter {
            records.push(input[start..at].to_vec());
            at += delimiter.len();
            start = at;
        } else {
            at += 1;
        }
    }
    (records, input[start..].to_vec())
}

/// Accumulates records, gluing partial records onto the record they belong
/// to.
#[derive(Debug, Default)]
pub(crate) struct Collector {
    pub(crate) complete: Vec<Vec<u8>>,
    pub(crate) pending: Vec<u8>,
    pub(crate) partials: usize,
}

impl Collector {
    pub(crate) fn push(&mut self, record: Record<'_>) {
        self.push_bytes(record.span, record.bytes);
    }

    pub(crate) fn push_bytes(&mut self, span: Span, bytes: &[u8]) {
        assert_eq!(span.len, bytes.len());
        self.pending.extend_from_slice(bytes);
        match span.kind {
            RecordKind::Complete => self.complete.push(core::mem::take(&mut self.pending)),
            RecordKind::Partial => {
                assert!(!bytes.is_empty(), "partial records are never empty");
                self.partials += 1;
            }
        }
    }
}
