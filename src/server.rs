//! HTTP server lifecycle: bind, serve, shut down on signal

use tokio::net::{TcpListener, TcpSocket};

use crate::api::{self, AppState};
use crate::config::Config;
use crate::error::Result;

/// Bind the configured address with `SO_REUSEADDR` set
pub fn bind(config: &Config) -> Result<TcpListener> {
    let addr = config.bind_addr();
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    Ok(socket.listen(1024)?)
}

/// Run the server until Ctrl+C or SIGTERM
pub async fn run(config: Config) -> Result<()> {
    config.ensure_dirs()?;

    let listener = bind(&config)?;
    let router = api::create_router(AppState::new(&config));

    tracing::info!(addr = %config.bind_addr(), "Starting sketchsave server");
    println!("Serving at http://localhost:{}", config.port);
    println!("Files will be saved to {}", config.data_path().display());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
