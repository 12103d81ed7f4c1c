//! Shutdown signal handling for the web server

use colored::Colorize;

/// Resolves on the first SIGINT (Ctrl+C) or SIGTERM.
///
/// Passed to `axum::serve(..).with_graceful_shutdown` so in-flight check-ins
/// finish before the process exits.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => eprintln!("{} Received SIGINT (shutdown)", "↓".cyan()),
        _ = terminate => eprintln!("{} Received SIGTERM (shutdown)", "↓".cyan()),
    }
}
