use tracing::{error, info};

/// Resolves once the process receives ctrl-c (or SIGTERM on unix).
pub async fn signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("error listening for ctrl+c: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        let mut term_signal =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");

        term_signal.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Drive `future` to completion unless a shutdown signal arrives first, in which
/// case `None` is returned and the future is dropped.
pub async fn run_until_shutdown<F, T>(future: F) -> Option<T>
where
    F: std::future::Future<Output = T>,
{
    tokio::select! {
        _ = signal() => {
            info!("shutdown signal received");
            None
        }
        result = future => {
            Some(result)
        }
    }
}
