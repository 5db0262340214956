//! GivTCP Flow Engine
//!
//! This application polls one or more GivTCP instances, normalises their
//! inverter telemetry into a single sensor model and derives the power flows
//! between solar, battery, grid and house.
//!
//! # Architecture
//!
//! A fixed-interval scheduler drives poll cycles. Each cycle fetches every
//! configured source concurrently, runs the processing engine and publishes
//! the resulting snapshot to the configured sinks.
//!
//! # Features
//!
//! - Automatic restart of the polling task on failure
//! - Graceful shutdown on SIGTERM/SIGINT
//! - Pause on SIGUSR1, resume on SIGUSR2
//! - Sample-data mode and raw-document export for debugging
//! - Timeout protection for hung cycles

mod config;
mod engine;
mod error;
mod givtcp;
mod model;
mod poller;
mod scheduler;
mod sink;

#[cfg(test)]
mod test_utils;

use anyhow::Context;
use std::sync::Arc;
use tokio::signal::ctrl_c;
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinError;
use tokio::time::Duration;

use crate::engine::Engine;
use crate::model::SourceFetcher;
use crate::poller::Poller;
use crate::scheduler::Scheduler;
use crate::sink::{FileSink, LogSink, RawExporter};

/// Application entry point.
///
/// Initializes configuration, builds the poller, and manages the main event
/// loop with signal handling for shutdown and pause/resume.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config = config::load_app_config()?;
    tracing_subscriber::fmt()
        .with_max_level(app_config.log_level())
        .init();

    let givtcp_config = config::load_givtcp_config()?;
    let hosts = givtcp_config.hosts().context("Failed to read GivTCP hosts")?;
    let tariff_config = config::load_tariff_config()?;
    let poller_config = config::load_poller_config()?;

    let fetcher: Arc<dyn SourceFetcher> = match &poller_config.sample_data {
        Some(sample_name) => {
            tracing::info!(sample = %sample_name, "Reading sample data instead of GivTCP");
            Arc::new(givtcp::SampleFetcher::new(&poller_config.sample_dir, sample_name))
        }
        None => Arc::new(givtcp::Client::new(&givtcp_config)),
    };

    let engine = Engine::new(tariff_config, app_config.debug_mode);
    let mut poller = Poller::new(fetcher, hosts, engine).with_sink(Arc::new(LogSink));
    if let Some(path) = &poller_config.snapshot_path {
        poller = poller.with_sink(Arc::new(FileSink::new(path)));
    }
    if app_config.debug_mode {
        if let Some(directory) = &poller_config.export_dir {
            poller = poller.with_exporter(RawExporter::new(directory));
        }
    }
    let poller = Arc::new(poller);

    let scheduler = Scheduler::new(
        Duration::from_secs(poller_config.interval_sec),
        Duration::from_secs(poller_config.fetch_timeout_sec),
    );

    // Factory function for creating the polling task
    // This allows easy task recreation after failures
    let create_poll_task = || -> tokio::task::JoinHandle<()> {
        let scheduler = scheduler.clone();
        let poller = Arc::clone(&poller);
        tokio::spawn(async move {
            scheduler
                .run(move || {
                    let poller = Arc::clone(&poller);
                    async move { poller.poll_once().await.map(|_| ()) }
                })
                .await
        })
    };
    let mut poll_task = create_poll_task();

    let mut sig_term =
        signal(SignalKind::terminate()).context("Failed to register SIGTERM handler")?;
    let mut sig_pause =
        signal(SignalKind::user_defined1()).context("Failed to register SIGUSR1 handler")?;
    let mut sig_resume =
        signal(SignalKind::user_defined2()).context("Failed to register SIGUSR2 handler")?;
    tracing::info!("Running... Press Ctrl-C or send SIGTERM to terminate.");
    // Main event loop with signal handling and task supervision
    loop {
        tokio::select! {
            // Handle SIGTERM for graceful shutdown in containers
            _ = sig_term.recv() => {
                tracing::info!("Received SIGTERM. Exiting...");
                break;
            }
            // Handle Ctrl-C for manual termination
            _ = ctrl_c() => {
                tracing::info!("Received SIGINT. Exiting...");
                break;
            }
            _ = sig_pause.recv() => {
                scheduler.pause();
            }
            _ = sig_resume.recv() => {
                scheduler.resume();
            }
            // Monitor the polling task and restart on failure
            result = &mut poll_task => {
                handle_task_result("poller", result);
                poll_task = create_poll_task();
            }
        }
    }

    poll_task.abort();
    Ok(())
}

/// Handles the result of a tokio task, logging success or failure.
///
/// # Behavior
///
/// - Success is logged at debug level
/// - Failures (panics, cancellation) are logged at error level
/// - Used in the main loop to detect and log task crashes before restarting
fn handle_task_result(task_name: &str, result: Result<(), JoinError>) {
    match result {
        Ok(_) => {
            tracing::debug!("Task {} completed.", task_name);
        }
        Err(e) => {
            tracing::error!("Task {} failed: {:?}", task_name, e);
        }
    }
}
