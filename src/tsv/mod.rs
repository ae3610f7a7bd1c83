//! Line-oriented TSV streaming: chunked reader and buffered offer writer.

pub mod reader;
pub mod writer;

pub use reader::{LineAccumulator, TsvLine, TsvReader, DEFAULT_CHUNK_SIZE};
pub use writer::TsvWriter;
