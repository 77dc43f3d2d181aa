//! Fixed-size worker pool draining the bounded path queue.
//!
//! Workers share one `mpsc` receiver behind an async mutex, so each queued
//! path is consumed by exactly one worker. A worker exits only when the queue
//! is closed and drained (`recv` returns `None`), or when the injected
//! handler returns an error to request an early stop of that worker's
//! consumption loop. Per-file failures are handled inside the production
//! handler and never stop a worker.

use crate::buffer::BufferPool;
use crate::checksum::{ChecksumEngine, ChecksumResult};
use crate::error::{IoError, Result};
use crate::sink::LineSink;
use crate::stats::Stats;
use async_trait::async_trait;
use futures::future::join_all;
use log::debug;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::sync::Mutex;
use tokio::sync::mpsc::Receiver;
use tokio::task::JoinHandle;

/// Per-path work strategy injected into the pool.
///
/// Returning `Err` stops the receiving worker's consumption loop; it is a
/// control-flow sentinel, not a user-visible failure.
#[async_trait]
pub trait PathHandler: Send + Sync {
    async fn handle(&self, path: &str) -> Result<()>;
}

/// Pool of concurrent queue consumers.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `worker_count` consumers of `receiver`, each invoking `handler`
    /// per dequeued path.
    pub fn start(
        worker_count: usize,
        receiver: Receiver<String>,
        handler: Arc<dyn PathHandler>,
    ) -> Self {
        let receiver = Arc::new(Mutex::new(receiver));
        let handles = (0..worker_count)
            .map(|id| {
                let receiver = Arc::clone(&receiver);
                let handler = Arc::clone(&handler);
                tokio::spawn(worker_loop(id, receiver, handler))
            })
            .collect();

        Self { handles }
    }

    /// Block until every worker has observed queue closure and exited.
    pub async fn drain_and_wait(self) {
        for result in join_all(self.handles).await {
            if let Err(err) = result {
                debug!("worker task join failed: {err}");
            }
        }
    }
}

async fn worker_loop(id: usize, receiver: SharedReceiver, handler: Arc<dyn PathHandler>) {
    loop {
        // Lock held across recv so exactly one worker takes each path
        let path = receiver.lock().await.recv().await;
        let Some(path) = path else {
            debug!("worker {id}: queue closed, exiting");
            break;
        };
        if let Err(err) = handler.handle(&path).await {
            debug!("worker {id}: stopping consumption: {err}");
            break;
        }
    }
}

type SharedReceiver = Arc<Mutex<Receiver<String>>>;

/// Production handler: open the path, stream it through the checksum engine
/// with a pooled buffer, and emit either a result line or an error line.
pub struct FileChecksumHandler {
    engine: ChecksumEngine,
    stats: Arc<Stats>,
    out: LineSink,
    err: LineSink,
}

impl FileChecksumHandler {
    pub fn new(pool: Arc<BufferPool>, stats: Arc<Stats>, out: LineSink, err: LineSink) -> Self {
        Self {
            engine: ChecksumEngine::new(pool),
            stats,
            out,
            err,
        }
    }

    async fn path_to_checksum(&self, path: &str) -> Result<ChecksumResult> {
        let mut file = File::open(path)
            .await
            .map_err(|err| IoError::from_std(err).with_path(Path::new(path)))?;
        self.engine.checksum(&mut file).await
    }
}

#[async_trait]
impl PathHandler for FileChecksumHandler {
    async fn handle(&self, path: &str) -> Result<()> {
        match self.path_to_checksum(path).await {
            Ok(result) => {
                self.out
                    .write_line(&format!("{} {} {}", result.encoded, result.byte_count, path));
                self.stats.record_file(result.byte_count);
            }
            Err(err) => {
                self.err.write_line(&format!("error: '{path}': {err}"));
                self.stats.record_file_error();
            }
        }
        // A single file failure never stops the worker
        Ok(())
    }
}
