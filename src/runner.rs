//! # Correction Run Entry Point
//!
//! Wires an already-constructed stream client and blob store to the fan-out
//! coordinator, installs interrupt handling, and runs every partition's
//! corrector to a terminal state. This is the crate's single run surface;
//! constructing the vendor transport clients is the caller's bootstrap glue.

use std::sync::Arc;

use tracing::{info, warn};

use crate::checkpoint::{BlobStore, CheckpointStoreAccessor};
use crate::config::CorrectorConfig;
use crate::corrector::{CancellationFlag, CorrectionCoordinator, RunReport};
use crate::error::Result;
use crate::stream::StreamClient;

/// Run a full correction with interrupt handling installed.
///
/// Blocks until every partition corrector reaches a terminal state. The
/// first Ctrl-C or SIGTERM requests cancellation exactly once instead of
/// terminating the process; in-flight correctors wind down cooperatively
/// (listening partitions cancel at their next check point, a partition
/// already correcting completes its write). Per-partition failures are
/// carried in the returned report, they do not fail the run.
pub async fn run_until_complete(
    client: Arc<dyn StreamClient>,
    store: Arc<dyn BlobStore>,
    config: &CorrectorConfig,
) -> Result<RunReport> {
    let cancellation = CancellationFlag::new();
    let signal_watcher = tokio::spawn(watch_for_interrupt(cancellation.clone()));

    let report = run_with_cancellation(client, store, config, &cancellation).await;

    signal_watcher.abort();
    report
}

/// Run a full correction against a caller-owned cancellation flag.
///
/// No signal handling is installed; the caller owns triggering. Used by
/// embedders and tests that drive cancellation themselves.
pub async fn run_with_cancellation(
    client: Arc<dyn StreamClient>,
    store: Arc<dyn BlobStore>,
    config: &CorrectorConfig,
    cancellation: &CancellationFlag,
) -> Result<RunReport> {
    config.validate()?;

    let accessor = CheckpointStoreAccessor::for_stream(
        store,
        &config.store.container_prefix,
        &config.stream.hostname,
        &config.stream.path,
        &config.stream.consumer_group,
    );
    let coordinator = CorrectionCoordinator::new(
        client,
        accessor,
        config.stream.consumer_group.clone(),
        config.receive.batch_size,
    );

    let report = coordinator.run(cancellation).await?;

    if report.has_failures() {
        warn!(
            failed = report.failed.len(),
            "Correction run completed with partition failures"
        );
    } else {
        info!("Correction run completed");
    }
    Ok(report)
}

/// Wait for the first interrupt request and flip the cancellation flag.
///
/// Handling the signal suppresses its default terminating behavior; already
/// issued receive calls return normally so correctors observe the flag at
/// their next check point.
async fn watch_for_interrupt(cancellation: CancellationFlag) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Received Ctrl+C, requesting cancellation"),
                Err(e) => {
                    warn!(error = %e, "Failed to listen for Ctrl+C");
                    return;
                }
            }
        }
        result = wait_for_sigterm() => {
            match result {
                Ok(()) => info!("Received SIGTERM, requesting cancellation"),
                Err(e) => {
                    warn!(error = %e, "Failed to listen for SIGTERM");
                    return;
                }
            }
        }
    }

    if cancellation.request() {
        info!("Cancellation requested, waiting for in-flight correctors to wind down");
    }
}

#[cfg(unix)]
async fn wait_for_sigterm() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigterm = signal(SignalKind::terminate())?;
    sigterm.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_sigterm() -> std::io::Result<()> {
    std::future::pending::<()>().await;
    Ok(())
}
