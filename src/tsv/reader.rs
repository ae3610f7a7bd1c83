use std::collections::VecDeque;
use std::io;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::error::{OfferError, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// One non-empty line of a TSV stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsvLine {
    Header(String),
    Row(String),
}

impl TsvLine {
    pub fn as_str(&self) -> &str {
        match self {
            TsvLine::Header(line) | TsvLine::Row(line) => line,
        }
    }
}

/// Reassembles lines from arbitrarily split chunks.
///
/// Bytes after the last `\n` of a chunk stay buffered until a later chunk
/// completes them or [`LineAccumulator::finish`] is called. Line content is
/// kept as-is apart from the `\n` itself; invalid UTF-8 is decoded lossily.
#[derive(Debug, Default)]
pub struct LineAccumulator {
    pending: Vec<u8>,
}

impl LineAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and collect every line it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            self.pending.extend_from_slice(&rest[..pos]);
            lines.push(decode_line(&self.pending));
            self.pending.clear();
            rest = &rest[pos + 1..];
        }
        self.pending.extend_from_slice(rest);

        lines
    }

    /// Flush the trailing fragment of a stream that does not end with `\n`.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = decode_line(&self.pending);
        self.pending.clear();
        Some(line)
    }
}

fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Lazily yields the header and rows of a TSV stream, skipping empty lines.
pub struct TsvReader<R> {
    reader: R,
    chunk: Vec<u8>,
    accumulator: LineAccumulator,
    ready: VecDeque<String>,
    header_seen: bool,
    eof: bool,
}

impl TsvReader<File> {
    /// Open a TSV file for streaming.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).await.map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => OfferError::FileNotFound(path.to_path_buf()),
            _ => OfferError::Stream(err),
        })?;
        debug!("Opened {} for import", path.display());
        Ok(Self::new(file))
    }
}

impl<R: AsyncRead + Unpin> TsvReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    /// A chunk size of zero is treated as one byte.
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk: vec![0; chunk_size.max(1)],
            accumulator: LineAccumulator::new(),
            ready: VecDeque::new(),
            header_seen: false,
            eof: false,
        }
    }

    /// Next non-empty line, or `None` at end of stream.
    pub async fn next_line(&mut self) -> Result<Option<TsvLine>> {
        loop {
            while let Some(line) = self.ready.pop_front() {
                if line.is_empty() {
                    continue;
                }
                if self.header_seen {
                    return Ok(Some(TsvLine::Row(line)));
                }
                self.header_seen = true;
                return Ok(Some(TsvLine::Header(line)));
            }

            if self.eof {
                return Ok(None);
            }

            let read = self.reader.read(&mut self.chunk).await?;
            if read == 0 {
                self.eof = true;
                self.ready.extend(self.accumulator.finish());
            } else {
                self.ready.extend(self.accumulator.push(&self.chunk[..read]));
            }
        }
    }
}
