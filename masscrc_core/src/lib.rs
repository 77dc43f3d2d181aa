//! masscrc core library
//!
//! Streaming CRC32C checksum pipeline for very large file populations: a
//! bounded path queue fed by directory walks or path lists, drained by a
//! fixed pool of workers that stream each file through pooled read buffers,
//! with lock-free run statistics and cooperative cancellation.

pub mod buffer;
pub mod cancel;
pub mod checksum;
pub mod error;
pub mod pipeline;
pub mod producer;
pub mod sink;
pub mod stats;
pub mod worker;

// Re-export main types
pub use buffer::{BufferPool, PooledBuffer};
pub use cancel::CancelToken;
pub use checksum::{ChecksumEngine, ChecksumResult, encode_checksum};
pub use error::{Error, IoError, IoErrorKind, Result};
pub use pipeline::{Pipeline, PipelineConfig};
pub use producer::{read_path_list, walk_directories};
pub use sink::{CaptureBuffer, LineSink};
pub use stats::{Stats, StatsSnapshot};
pub use worker::{FileChecksumHandler, PathHandler, WorkerPool};
