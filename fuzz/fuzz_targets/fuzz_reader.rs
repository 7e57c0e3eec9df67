#![no_main]

use arbitrary::Arbitrary;
use delimstream::{PersistentStreamReader, ReaderOptions, RecordKind, StreamReader, split_at_points};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    delimiter: Vec<u8>,
    payload: Vec<u8>,
    splits: Vec<usize>,
    initial_capacity: u8,
    emit_partial: bool,
    compact_history: bool,
}

/// Records found when the whole payload is available at once.
fn one_shot(delimiter: &[u8], payload: &[u8]) -> (Vec<Vec<u8>>, Vec<u8>) {
    let mut reader = StreamReader::new(ReaderOptions {
        emit_partial: false,
        ..Default::default()
    });
    reader.read_until_string(delimiter, true).unwrap();
    let records = reader.feed(payload).unwrap().map(|r| r.bytes.to_vec()).collect();
    (records, reader.buffer_data().to_vec())
}

fn chunked(input: &Input, chunks: &[&[u8]]) -> (Vec<Vec<u8>>, Vec<u8>) {
    let mut reader = StreamReader::new(ReaderOptions {
        initial_capacity: usize::from(input.initial_capacity),
        emit_partial: input.emit_partial,
        ..Default::default()
    });
    reader.read_until_string(&input.delimiter, true).unwrap();
    let mut records = Vec::new();
    let mut pending = Vec::new();
    for chunk in chunks {
        for record in reader.feed(chunk).unwrap() {
            pending.extend_from_slice(record.bytes);
            if record.kind() == RecordKind::Complete {
                records.push(std::mem::take(&mut pending));
            }
        }
        let (read, search, len) = reader.debug_cursors();
        assert!(read <= search && search <= len);
        assert!(len - search < input.delimiter.len().max(1));
    }
    pending.extend_from_slice(reader.buffer_data());
    (records, pending)
}

fn persistent(input: &Input, chunks: &[&[u8]]) -> Vec<Vec<u8>> {
    let mut reader = PersistentStreamReader::new(ReaderOptions {
        initial_capacity: usize::from(input.initial_capacity),
        ..Default::default()
    });
    reader.read_until_string(&input.delimiter, true).unwrap();
    let mut records = Vec::new();
    for chunk in chunks {
        reader.append(chunk).unwrap();
        while let Some(span) = reader.poll() {
            assert_eq!(span.kind, RecordKind::Complete);
            records.push(reader.resolve(span).unwrap().to_vec());
        }
        if input.compact_history {
            reader.clear_history().unwrap();
            assert!(reader.history(false).is_empty());
        }
    }
    records
}

fuzz_target!(|input: Input| {
    if input.delimiter.is_empty() {
        return;
    }
    let chunks = split_at_points(&input.payload, &input.splits);
    let expected = one_shot(&input.delimiter, &input.payload);
    assert_eq!(chunked(&input, &chunks), expected);
    assert_eq!(persistent(&input, &chunks), expected.0);
});
