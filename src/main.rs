use std::path::PathBuf;

use bookshelf::config::Configuration;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    bookshelf::telemetry::setup_logging();

    // read configuration file. let it in memory.
    let config = Configuration::default()
        .path(std::env::var("CONFIG_PATH").map(PathBuf::from).unwrap_or_default())
        .read();

    let state = match bookshelf::initialize_state(config.clone()).await {
        Ok(state) => state,
        Err(err) => {
            // Nothing can be served without the document store.
            tracing::error!(error = %err, "cannot initialize application state");
            std::process::exit(1);
        },
    };

    let address = format!("{}:{}", config.address, config.port);
    let listener = TcpListener::bind(&address).await?;
    tracing::info!(%address, version = config.version(), "server is running");

    axum::serve(listener, bookshelf::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(err) => {
                tracing::error!(error = %err, "failed to install signal handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
