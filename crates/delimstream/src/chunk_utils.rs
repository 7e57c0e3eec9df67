use alloc::vec::Vec;

/// Split `payload` into approximately equal-sized chunks.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    assert!(parts > 0);
    if payload.is_empty() {
        return Vec::new();
    }
    payload.chunks(payload.len().div_ceil(parts)).collect()
}

/// Split `payload` at arbitrary points, e.g. ones produced by a property
/// test. Each point is reduced modulo the remaining length, so any sequence
/// of numbers yields a valid non-empty partition; whatever the points do not
/// cover becomes the final chunk.
#[must_use]
pub fn split_at_points<'a>(payload: &'a [u8], points: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::with_capacity(points.len() + 1);
    let mut rest = payload;
    for &point in points {
        if rest.is_empty() {
            break;
        }
        let (chunk, tail) = rest.split_at(1 + point % rest.len());
        chunks.push(chunk);
        rest = tail;
    }
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}
