//! Streaming CRC32C (Castagnoli) checksum engine.
//!
//! Folds a byte source into a running CRC32C digest chunk by chunk using a
//! buffer checked out of the shared pool, then encodes the final 32-bit value
//! as 4 big-endian bytes in standard base64. The engine reads through the
//! generic `AsyncRead` seam so real files and in-test sources go through the
//! same code path.

use crate::buffer::BufferPool;
use crate::error::Result;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use crc::{CRC_32_ISCSI, Crc};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};

/// CRC32C, the Castagnoli polynomial (iSCSI variant of CRC-32).
pub const CASTAGNOLI: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

/// Final checksum of one byte source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumResult {
    /// 4-byte big-endian CRC32C value, base64-encoded
    pub encoded: String,
    /// Total bytes folded into the checksum
    pub byte_count: u64,
}

/// Encode a raw CRC32C value the way result lines carry it.
pub fn encode_checksum(value: u32) -> String {
    BASE64.encode(value.to_be_bytes())
}

/// Streaming checksum reducer bound to a buffer pool.
#[derive(Debug, Clone)]
pub struct ChecksumEngine {
    pool: Arc<BufferPool>,
}

impl ChecksumEngine {
    pub fn new(pool: Arc<BufferPool>) -> Self {
        Self { pool }
    }

    /// Fold the whole of `reader` into a CRC32C value.
    ///
    /// A zero-length source yields the CRC32C of the empty string with byte
    /// count 0. Any read error aborts immediately; partial totals are
    /// discarded and the pooled buffer is returned regardless.
    pub async fn checksum<R>(&self, reader: &mut R) -> Result<ChecksumResult>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = self.pool.acquire();
        let mut digest = CASTAGNOLI.digest();
        let mut byte_count = 0u64;

        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            digest.update(&buf[..n]);
            byte_count += n as u64;
        }

        Ok(ChecksumResult {
            encoded: encode_checksum(digest.finalize()),
            byte_count,
        })
    }
}
