use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Detects signals sent to the process. Ctrl-C everywhere, SIGTERM on unix so that `stop` and
/// session logout end the daemon gracefully.
///
/// On Windows detached processes can't detect signals sent to them, there `stop` terminates the
/// process forcefully.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for ctrl-c {e:?}");
                // Without a signal handler the daemon can only be killed, keep running until then.
                cancelation.cancelled().await;
                return;
            }
            info!("Received ctrl-c");
            cancelation.cancel();
        },
        _ = terminate() => {
            info!("Received terminate signal");
            cancelation.cancel();
        },
        // Something else requested shutdown, e.g. the daemon failed to start.
        _ = cancelation.cancelled() => {},
    };
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            error!("Failed to listen for SIGTERM {e:?}");
            std::future::pending::<()>().await
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await
}
