//! Reusable read-buffer pool.
//!
//! Workers check a buffer out for one file's read loop and return it on every
//! exit path, bounding peak read memory to roughly buffer size x worker count
//! no matter how many files the run visits.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};

/// Pool of fungible fixed-size byte buffers.
///
/// `acquire` never blocks: a pool miss allocates a fresh buffer lazily, a hit
/// reuses a previously returned one.
#[derive(Debug)]
pub struct BufferPool {
    buffer_size: usize,
    free: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool {
    /// Create a pool handing out buffers of `buffer_size` bytes.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size,
            free: Mutex::new(Vec::new()),
        }
    }

    /// Buffer size this pool was configured with.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Check a buffer out of the pool. Returned to the pool when the guard
    /// drops, including on error paths.
    pub fn acquire(self: &Arc<Self>) -> PooledBuffer {
        let buf = self
            .free
            .lock()
            .expect("buffer pool mutex poisoned")
            .pop()
            .unwrap_or_else(|| vec![0u8; self.buffer_size]);
        PooledBuffer {
            buf: Some(buf),
            pool: Arc::clone(self),
        }
    }

    /// Number of idle buffers currently held by the pool.
    pub fn idle_count(&self) -> usize {
        self.free.lock().expect("buffer pool mutex poisoned").len()
    }

    fn release(&self, buf: Vec<u8>) {
        self.free
            .lock()
            .expect("buffer pool mutex poisoned")
            .push(buf);
    }
}

/// Exclusive checkout of one pool buffer.
#[derive(Debug)]
pub struct PooledBuffer {
    buf: Option<Vec<u8>>,
    pool: Arc<BufferPool>,
}

impl Deref for PooledBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.buf.as_deref().expect("buffer already released")
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.buf.as_deref_mut().expect("buffer already released")
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(buf);
        }
    }
}
