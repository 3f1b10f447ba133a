use std::time::Duration;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::ServiceConfig;

/// Time given to in-flight saves after SIGTERM before the listener closes
const SAVE_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Spawns a task that waits for SIGINT or SIGTERM and then flips the shutdown watch.
///
/// Returns the join handle, the sender (for programmatic shutdown), and the receiver.
pub fn shutdown_on_signal(
) -> std::io::Result<(JoinHandle<()>, watch::Sender<()>, watch::Receiver<()>)> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    let (tx, rx) = watch::channel(());
    let signal_tx = tx.clone();

    let handle = tokio::spawn(async move {
        tokio::select! {
            _ = sigint.recv() => {
                tracing::info!("SIGINT received, closing codebook pages now");
            }
            _ = sigterm.recv() => {
                tracing::info!(
                    grace_secs = SAVE_GRACE_PERIOD.as_secs(),
                    "SIGTERM received, closing codebook pages after grace period"
                );
                tokio::time::sleep(SAVE_GRACE_PERIOD).await;
            }
        }

        let _ = signal_tx.send(());
    });

    Ok((handle, tx, rx))
}

/// Registers a panic hook that logs panics using the `tracing` crate
pub fn register_panic_logger() {
    std::panic::set_hook(Box::new(|panic| match panic.location() {
        Some(loc) => {
            tracing::error!(
                message = %panic,
                panic.file = loc.file(),
                panic.line = loc.line(),
                "ecc panicked"
            );
        }
        None => tracing::error!(message = %panic, "ecc panicked"),
    }));
}

/// Where codebooks are kept, as shown in the startup log
pub fn storage_label(config: &ServiceConfig) -> String {
    match &config.sqlite_path {
        Some(path) => format!("sqlite:{}", path.display()),
        None => "in-memory (codebooks are lost on exit)".to_string(),
    }
}

/// Log the build and the settings the service is about to run with
pub fn report_startup(config: &ServiceConfig) {
    let build = common::prelude::build_info!();

    tracing::info!(
        version = build.version,
        build_profile = build.build_profile,
        features = build.build_features,
        listen_addr = %config.listen_addr,
        storage = %storage_label(config),
        log_dir = ?config.log_dir,
        "ecc starting up"
    );
}
