//! Path producers feeding the bounded queue.
//!
//! Two interchangeable strategies: walk directory trees rooted at the CLI
//! arguments, or read one path per line from an input stream. Both block on
//! queue insertion when the queue is full (backpressure), poll the
//! cancellation token between steps, and report enumeration-level errors
//! without aborting the run.

use crate::cancel::CancelToken;
use crate::sink::LineSink;
use crate::stats::Stats;
use log::info;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::Sender;
use walkdir::WalkDir;

/// Enumerate every regular file under `roots` into the queue.
///
/// Traversal errors are classified by the kind of the failed entry:
/// directories bump the folder-error counter, everything else the file-error
/// counter, and the walk continues either way. Non-regular files (symlinks,
/// sockets, devices) are skipped and counted as ignored.
pub async fn walk_directories(
    roots: &[PathBuf],
    queue: &Sender<String>,
    cancel: &CancelToken,
    stats: &Stats,
    err: &LineSink,
) {
    'roots: for root in roots {
        for entry in WalkDir::new(root) {
            if cancel.is_cancelled() {
                err.write_line("directory walk interrupted");
                break 'roots;
            }
            match entry {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        info!("entering dir: {}", entry.path().display());
                        continue;
                    }
                    if !file_type.is_file() {
                        info!("ignoring: {}", entry.path().display());
                        stats.record_ignored();
                        continue;
                    }
                    let path = entry.path().to_string_lossy().into_owned();
                    if queue.send(path).await.is_err() {
                        // Queue closed under us; nothing left to feed
                        break 'roots;
                    }
                }
                Err(walk_err) => {
                    report_walk_error(&walk_err, stats, err);
                }
            }
        }
    }
}

fn report_walk_error(walk_err: &walkdir::Error, stats: &Stats, err: &LineSink) {
    // walkdir does not carry the failed entry's type, so stat the path itself
    let path = walk_err.path();
    let display = path
        .map(Path::display)
        .map(|d| d.to_string())
        .unwrap_or_else(|| "<unknown>".to_string());
    if path.is_some_and(Path::is_dir) {
        err.write_line(&format!("dir error: '{display}': {walk_err}"));
        stats.record_directory_error();
    } else {
        err.write_line(&format!("file error: '{display}': {walk_err}"));
        stats.record_file_error();
    }
}

/// Enqueue one path per newline-delimited input line.
///
/// Stops at end-of-input or cancellation. A read error is reported once and
/// ends the loop: once the byte stream fails there is no way to resynchronize
/// to line boundaries.
pub async fn read_path_list<R>(
    reader: R,
    queue: &Sender<String>,
    cancel: &CancelToken,
    err: &LineSink,
) where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        if cancel.is_cancelled() {
            err.write_line("file list read interrupted");
            break;
        }
        match lines.next_line().await {
            Ok(Some(line)) => {
                if queue.send(line).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(read_err) => {
                err.write_line(&format!("error while reading stdin: {read_err}"));
                break;
            }
        }
    }
}
