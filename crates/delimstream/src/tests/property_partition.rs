use alloc::vec::Vec;

use quickcheck::QuickCheck;

use super::utils::{Collector, DELIMITERS, reference_split, small_alphabet};
use crate::{PersistentStreamReader, ReaderOptions, StreamReader, split_at_points};

fn test_count() -> u64 {
    #[cfg(not(miri))]
    let tests = if cfg!(feature = "test-fast") {
        100
    } else if is_ci::cached() {
        10_000
    } else {
        1_000
    };
    #[cfg(miri)]
    let tests = 10;
    tests
}

/// Property: however the input is chunked, a repeating `StreamReader` yields
/// the same complete records as splitting the whole input at once, and the
/// bytes it has not yet handed out are exactly the unterminated tail.
#[test]
fn stream_reader_chunk_boundary_independence() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(raw: Vec<u8>, splits: Vec<usize>, delimiter: usize, emit_partial: bool, capacity: u8) -> bool {
        let input = small_alphabet(&raw);
        let delimiter = DELIMITERS[delimiter % DELIMITERS.len()];

        let mut reader = StreamReader::new(ReaderOptions {
            initial_capacity: 1 + usize::from(capacity % 16),
            emit_partial,
            ..ReaderOptions::default()
        });
        reader.read_until_string(delimiter, true).unwrap();

        let mut collector = Collector::default();
        for chunk in split_at_points(&input, &splits) {
            for record in reader.feed(chunk).unwrap() {
                collector.push(record);
            }
        }

        let (expected, rest) = reference_split(&input, delimiter);
        let mut unread = collector.pending.clone();
        unread.extend_from_slice(reader.buffer_data());

        collector.complete == expected
            && unread == rest
            && (emit_partial || collector.partials == 0)
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Vec<u8>, Vec<usize>, usize, bool, u8) -> bool);
}

/// Property: re-arming a non-repeating delimiter after every record is
/// equivalent to repeat mode.
#[test]
fn rearming_matches_repeat_mode() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(raw: Vec<u8>, splits: Vec<usize>, delimiter: usize) -> bool {
        let input = small_alphabet(&raw);
        let delimiter = DELIMITERS[delimiter % DELIMITERS.len()];

        let mut reader = StreamReader::new(ReaderOptions {
            initial_capacity: 4,
            emit_partial: false,
            ..ReaderOptions::default()
        });
        reader.read_until_string(delimiter, false).unwrap();

        let mut records = Vec::new();
        for chunk in split_at_points(&input, &splits) {
            let mut batch: Vec<Vec<u8>> = reader.feed(chunk).unwrap().map(|r| r.bytes.to_vec()).collect();
            while !batch.is_empty() {
                assert!(batch.len() == 1 && reader.is_idle());
                records.append(&mut batch);
                reader.read_until_string(delimiter, false).unwrap();
                batch = reader.records().map(|r| r.bytes.to_vec()).collect();
            }
        }

        let (expected, rest) = reference_split(&input, delimiter);
        records == expected && reader.buffer_data() == rest.as_slice()
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Vec<u8>, Vec<usize>, usize) -> bool);
}

/// Property: the persistent reader finds the same records regardless of
/// chunking, of whether the delimiter was armed before or after the bytes
/// arrived, and of intermediate history compaction; retained history is
/// always an exact suffix of the input.
#[test]
fn persistent_reader_chunk_boundary_independence() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(raw: Vec<u8>, splits: Vec<usize>, delimiter: usize, arm_late: bool, compact: bool) -> bool {
        let input = small_alphabet(&raw);
        let delimiter = DELIMITERS[delimiter % DELIMITERS.len()];

        let mut reader = PersistentStreamReader::new(ReaderOptions {
            initial_capacity: 2,
            ..ReaderOptions::default()
        });
        if !arm_late {
            reader.read_until_string(delimiter, true).unwrap();
        }

        let mut collector = Collector::default();
        for chunk in split_at_points(&input, &splits) {
            reader.append(chunk).unwrap();
            while let Some(span) = reader.poll() {
                collector.push_bytes(span, reader.resolve(span).unwrap());
            }
            if compact {
                reader.clear_history().unwrap();
            }
            if reader.history(true) != &input[reader.base_offset()..reader.stream_len()] {
                return false;
            }
        }
        if arm_late {
            reader.read_until_string(delimiter, true).unwrap();
            while let Some(record) = reader.poll_record() {
                collector.push(record);
            }
        }

        let (expected, rest) = reference_split(&input, delimiter);
        collector.partials == 0
            && collector.complete == expected
            && reader.buffer_data() == rest.as_slice()
            && reader.stream_len() == input.len()
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Vec<u8>, Vec<usize>, usize, bool, bool) -> bool);
}
