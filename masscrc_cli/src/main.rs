use anyhow::{Context, Result};
use clap::Parser;
use masscrc_core::{CancelToken, LineSink, Pipeline, Stats, read_path_list, walk_directories};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

mod config;

use crate::config::ConfigManager;

#[derive(Parser, Debug)]
#[command(name = "masscrc")]
#[command(version, about = "Mass CRC32C checksummer", long_about = None)]
#[command(
    after_help = "Recurses over paths provided as arguments, or reads the file list from stdin otherwise.\n\
                  One result line per file: <base64-crc32c> <byte-count> <path>.\n\
                  SIGINT stops enumeration gracefully; SIGUSR1 prints the current summary."
)]
struct Cli {
    /// Paths to recurse over; reads a file list from stdin when empty
    paths: Vec<PathBuf>,

    /// Number of parallel reads
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Size of the list-ahead queue
    #[arg(short, long)]
    list_ahead: Option<usize>,

    /// Size of reads in KiB
    #[arg(short = 's', long)]
    read_size: Option<usize>,

    /// Number of runtime worker threads
    #[arg(short = 'p', long)]
    cpus: Option<usize>,

    /// Write checksum lines to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Write error lines to a file instead of stderr
    #[arg(long, value_name = "FILE")]
    errout: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        // Walk notices ("entering dir", "ignoring") are info-level and must
        // stay visible on a default run
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let mut runtime = tokio::runtime::Builder::new_multi_thread();
    if let Some(cpus) = cli.cpus {
        runtime.worker_threads(cpus.max(1));
    }
    let runtime = runtime
        .enable_all()
        .build()
        .context("failed to build async runtime")?;

    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    let mut app_config = ConfigManager::new().load()?;
    app_config.apply_cli_overrides(cli.jobs, cli.list_ahead, cli.read_size);
    let pipeline_config = app_config.pipeline_config();
    log::debug!(
        "pipeline config: {} workers, list-ahead {}, {} KiB reads",
        pipeline_config.workers,
        pipeline_config.list_ahead,
        pipeline_config.read_size_kb
    );

    let out = open_sink(cli.out.as_ref(), LineSink::stdout);
    let err = open_sink(cli.errout.as_ref(), LineSink::stderr);

    let pipeline = Pipeline::start(&pipeline_config, out, err.clone())?;
    register_cancellation(pipeline.cancel_token());
    register_summary_signal(pipeline.stats());

    let sender = pipeline.sender();
    let cancel = pipeline.cancel_token();
    if cli.paths.is_empty() {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        read_path_list(stdin, &sender, &cancel, &err).await;
    } else {
        let stats = pipeline.stats();
        walk_directories(&cli.paths, &sender, &cancel, &stats, &err).await;
    }
    drop(sender);

    let snapshot = pipeline.shutdown().await;
    eprint!("{}", snapshot.render());
    Ok(())
}

/// Open an output file sink, or fall back to the given standard stream.
///
/// An unopenable output file is a fatal setup error: exit 2 before any work
/// is queued.
fn open_sink(path: Option<&PathBuf>, fallback: fn() -> LineSink) -> LineSink {
    match path {
        Some(path) => match File::create(path) {
            Ok(file) => LineSink::from_writer(file),
            Err(err) => {
                eprintln!("error: cannot open '{}': {err}", path.display());
                std::process::exit(2);
            }
        },
        None => fallback(),
    }
}

/// SIGINT asserts the cancellation flag once; enumeration stops at the next
/// step and in-flight checksums run to completion.
fn register_cancellation(cancel: CancelToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("interrupt received, stopping enumeration");
            cancel.cancel();
        }
    });
}

/// SIGUSR1 renders the current summary on demand without touching the run.
#[cfg(unix)]
fn register_summary_signal(stats: Arc<Stats>) {
    use tokio::signal::unix::{SignalKind, signal};

    tokio::spawn(async move {
        let Ok(mut usr1) = signal(SignalKind::user_defined1()) else {
            log::warn!("failed to register SIGUSR1 handler");
            return;
        };
        while usr1.recv().await.is_some() {
            eprint!("{}", stats.render_summary());
        }
    });
}

#[cfg(not(unix))]
fn register_summary_signal(_stats: Arc<Stats>) {}
