#![allow(dead_code)]

use delimstream::{ReaderOptions, RecordKind, StreamReader, produce_chunks};

pub const REQUEST: &[u8] = b"POST /submit HTTP/1.1\r\n\
Host: example.org\r\n\
Content-Length: 11\r\n\
\r\n\
hello worldGET /next HTTP/1.1\r\n\r\n";

/// A decoded request: request line, header lines, body.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Request {
    pub line: Vec<u8>,
    pub headers: Vec<Vec<u8>>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Line,
    Headers,
    Body(usize),
}

/// Minimal HTTP/1.1 request framer driven by a `StreamReader`: one delimiter
/// per request line, a repeating one for headers, and `skip` for the body.
pub struct RequestFramer {
    reader: StreamReader,
    phase: Phase,
    current: Request,
    pending: Vec<u8>,
    pub done: Vec<Request>,
}

impl RequestFramer {
    pub fn new(options: ReaderOptions) -> Self {
        let mut reader = StreamReader::new(options);
        reader.read_until_string(b"\r\n", false).unwrap();
        Self {
            reader,
            phase: Phase::Line,
            current: Request::default(),
            pending: Vec::new(),
            done: Vec::new(),
        }
    }

    pub fn push(&mut self, chunk: &[u8]) {
        // Append only. Records are pulled one at a time below, since each one
        // can change how the rest of the stream is read.
        let _ = self.reader.feed(chunk).unwrap();
        loop {
            if let Phase::Body(remaining) = self.phase {
                let available = self.reader.buffer_data().len().min(remaining);
                self.current
                    .body
                    .extend_from_slice(&self.reader.buffer_data()[..available]);
                self.reader.skip(available).unwrap();
                if available < remaining {
                    self.phase = Phase::Body(remaining - available);
                    return;
                }
                self.finish_request();
                continue;
            }
            let Some((kind, bytes)) = self
                .reader
                .records()
                .next()
                .map(|r| (r.kind(), r.bytes.to_vec()))
            else {
                return;
            };
            self.pending.extend_from_slice(&bytes);
            if kind == RecordKind::Complete {
                let record = std::mem::take(&mut self.pending);
                self.on_record(record);
            }
        }
    }

    fn on_record(&mut self, record: Vec<u8>) {
        match self.phase {
            Phase::Line => {
                self.current.line = record;
                self.phase = Phase::Headers;
                self.reader.read_until_string(b"\r\n", true).unwrap();
            }
            Phase::Headers if record.is_empty() => {
                let length = self
                    .current
                    .headers
                    .iter()
                    .find_map(|h| h.strip_prefix(b"Content-Length: "))
                    .map_or(0, |v| std::str::from_utf8(v).unwrap().parse().unwrap());
                self.phase = Phase::Body(length);
            }
            Phase::Headers => self.current.headers.push(record),
            Phase::Body(_) => unreachable!("records are not read during the body"),
        }
    }

    fn finish_request(&mut self) {
        self.done.push(std::mem::take(&mut self.current));
        self.phase = Phase::Line;
        self.reader.read_until_string(b"\r\n", false).unwrap();
    }
}

pub fn frame(payload: &[u8], parts: usize, options: ReaderOptions) -> Vec<Request> {
    let mut framer = RequestFramer::new(options);
    for chunk in produce_chunks(payload, parts) {
        framer.push(chunk);
    }
    framer.done
}
