mod config;
mod domain;
mod inbound;
mod outbound;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::from_env()?;

    // A minimal tracing middleware for request logging.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let metrics = outbound::metrics::NullMetrics;
    let poster_service = domain::service::Service::new(metrics);

    let server_config = inbound::HttpServerConfig {
        port: &config.server_port,
    };
    let http_server = inbound::HttpServer::new(poster_service, server_config).await?;

    http_server.run().await
}
