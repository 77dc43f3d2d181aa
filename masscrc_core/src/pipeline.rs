//! Pipeline lifecycle controller.
//!
//! Owns the bounded path queue, the buffer pool, and the worker pool, and
//! enforces the shutdown ordering the statistics depend on: the queue is
//! closed only after the producer has finished, and the final snapshot is
//! read only after every worker has exited.
//!
//! States: Created -> Running (queue + workers up) -> Draining (last sender
//! dropped) -> Stopped (workers joined, summary readable).

use crate::buffer::BufferPool;
use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::sink::LineSink;
use crate::stats::{Stats, StatsSnapshot};
use crate::worker::{FileChecksumHandler, PathHandler, WorkerPool};
use std::sync::Arc;
use tokio::sync::mpsc::{self, Sender};

/// Tunables for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Number of parallel checksum workers
    pub workers: usize,
    /// Capacity of the list-ahead path queue
    pub list_ahead: usize,
    /// Read size per I/O call, in KiB
    pub read_size_kb: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            list_ahead: 100,
            read_size_kb: 1,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidConfiguration(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.list_ahead == 0 {
            return Err(Error::InvalidConfiguration(
                "list-ahead queue length must be at least 1".to_string(),
            ));
        }
        if self.read_size_kb == 0 {
            return Err(Error::InvalidConfiguration(
                "read size must be at least 1 KiB".to_string(),
            ));
        }
        Ok(())
    }
}

/// A running checksum pipeline.
///
/// Producers borrow `Sender` clones via [`Pipeline::sender`]; the pipeline
/// keeps the last sender alive, so the queue cannot close while a producer
/// may still send. Dropping it inside [`Pipeline::shutdown`] is the sole
/// close of the queue, and the only way workers observe end-of-stream.
pub struct Pipeline {
    stats: Arc<Stats>,
    cancel: CancelToken,
    sender: Option<Sender<String>>,
    workers: WorkerPool,
}

impl Pipeline {
    /// Start the pipeline with the production file-checksum handler wired to
    /// the given sinks.
    ///
    /// Setup failures here are fatal by design: they happen before any work
    /// is queued.
    pub fn start(config: &PipelineConfig, out: LineSink, err: LineSink) -> Result<Self> {
        config.validate()?;
        let stats = Arc::new(Stats::new());
        let pool = Arc::new(BufferPool::new(config.read_size_kb * 1024));
        let handler = Arc::new(FileChecksumHandler::new(
            pool,
            Arc::clone(&stats),
            out,
            err,
        ));
        Ok(Self::start_inner(config, stats, handler))
    }

    /// Start the pipeline with an injected handler (test doubles, custom
    /// per-path processing).
    pub fn start_with_handler(
        config: &PipelineConfig,
        handler: Arc<dyn PathHandler>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::start_inner(config, Arc::new(Stats::new()), handler))
    }

    fn start_inner(
        config: &PipelineConfig,
        stats: Arc<Stats>,
        handler: Arc<dyn PathHandler>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(config.list_ahead);
        let workers = WorkerPool::start(config.workers, receiver, handler);
        Self {
            stats,
            cancel: CancelToken::new(),
            sender: Some(sender),
            workers,
        }
    }

    /// Queue handle for a producer. Producers must drop their clone when they
    /// finish so shutdown can close the queue.
    pub fn sender(&self) -> Sender<String> {
        self.sender
            .as_ref()
            .expect("pipeline already shut down")
            .clone()
    }

    /// Cancellation handle for producers and signal wiring.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Shared statistics, usable for on-demand summaries while running.
    pub fn stats(&self) -> Arc<Stats> {
        Arc::clone(&self.stats)
    }

    /// Close the queue, wait for every worker to drain and exit, then read
    /// the final statistics. Call only after the producer has returned.
    pub async fn shutdown(mut self) -> StatsSnapshot {
        // Dropping the last sender closes the queue for sending
        self.sender.take();
        self.workers.drain_and_wait().await;
        self.stats.snapshot()
    }
}
