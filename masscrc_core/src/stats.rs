//! Process-wide run statistics.
//!
//! Counters are monotonic and updated with atomic increments only, so every
//! worker and producer can share one `Stats` without a lock. The summary can
//! be rendered at any point in the run; reading a snapshot mid-run observes a
//! consistent-enough view for reporting, and the final snapshot is taken only
//! after all workers have exited.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Shared counters for one checksum run.
#[derive(Debug)]
pub struct Stats {
    start_time: Instant,
    file_count: AtomicU64,
    file_error_count: AtomicU64,
    directory_error_count: AtomicU64,
    ignored_files_count: AtomicU64,
    total_data_computed: AtomicU64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            file_count: AtomicU64::new(0),
            file_error_count: AtomicU64::new(0),
            directory_error_count: AtomicU64::new(0),
            ignored_files_count: AtomicU64::new(0),
            total_data_computed: AtomicU64::new(0),
        }
    }

    /// Record one successfully checksummed file of `bytes` bytes.
    pub fn record_file(&self, bytes: u64) {
        self.file_count.fetch_add(1, Ordering::Relaxed);
        self.total_data_computed.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record one file that could not be opened or read.
    pub fn record_file_error(&self) {
        self.file_error_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one directory entry that could not be enumerated.
    pub fn record_directory_error(&self) {
        self.directory_error_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one non-regular file skipped without queueing.
    pub fn record_ignored(&self) {
        self.ignored_files_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Read-only view of the counters plus elapsed time.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            file_count: self.file_count.load(Ordering::Relaxed),
            file_error_count: self.file_error_count.load(Ordering::Relaxed),
            directory_error_count: self.directory_error_count.load(Ordering::Relaxed),
            ignored_files_count: self.ignored_files_count.load(Ordering::Relaxed),
            total_data_computed: self.total_data_computed.load(Ordering::Relaxed),
            elapsed: self.start_time.elapsed(),
        }
    }

    /// Render the multi-line summary report from the current counters.
    pub fn render_summary(&self) -> String {
        self.snapshot().render()
    }
}

/// Point-in-time view of the run counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub file_count: u64,
    pub file_error_count: u64,
    pub directory_error_count: u64,
    pub ignored_files_count: u64,
    pub total_data_computed: u64,
    pub elapsed: Duration,
}

impl StatsSnapshot {
    /// Format the summary block: counts, total data, duration, and average
    /// file and data throughput.
    pub fn render(&self) -> String {
        let seconds = self.elapsed.as_secs_f64();
        let (files_per_sec, mb_per_sec) = if seconds > 0.0 {
            (
                (self.file_count as f64 / seconds) as u64,
                (self.total_data_computed as f64 / seconds / 1024.0 / 1024.0) as u64,
            )
        } else {
            (0, 0)
        };

        format!(
            "Summary:\n\
             Files computed: {}\n\
             File errors: {}\n\
             Folder errors: {}\n\
             Ignored files: {}\n\
             Computed data: {}B\n\
             Duration: {:?}\n\
             Avg file speed: {}/s\n\
             Avg data speed: {}MB/s\n",
            self.file_count,
            self.file_error_count,
            self.directory_error_count,
            self.ignored_files_count,
            self.total_data_computed,
            self.elapsed,
            files_per_sec,
            mb_per_sec,
        )
    }
}
