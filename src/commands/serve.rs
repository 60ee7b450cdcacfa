use anyhow::Result;
use eln2smw::{config::Config, http::HttpServer};
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Run the HTTP endpoint until Ctrl-C
pub async fn serve(mut config: Config, listen: Option<String>) -> Result<()> {
    if let Some(listen) = listen {
        config.http.listen_addr = listen;
        config.validate()?;
    }

    info!(
        "Starting adapter {} for wiki {}",
        config.main.version, config.wiki.api_url
    );

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl-C"),
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
        let _ = shutdown_tx.send(());
    });

    HttpServer::new(config).run(shutdown_rx).await
}
