pub mod carousel;
pub mod catalog;
pub mod config;
pub mod middleware;
pub mod server;
pub mod tmdb;
pub mod viewer;
pub mod web;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Catalog client error: {0}")]
    Tmdb(#[from] tmdb::TmdbError),
    #[error("Server error: {0}")]
    Server(String),
}

pub async fn run(config_path: &str, debug_logs: bool) -> Result<(), ServerError> {
    let config = config::Config::from_file(config_path)?;

    info!("Using config file: {}", config_path);
    info!("Catalog service: {}", config.tmdb.base_url);
    if debug_logs {
        info!("Debug logging enabled");
    }

    let client = tmdb::TmdbClient::new(&config.tmdb)?;
    let ttl = Duration::from_secs(config.cache.ttl_secs);
    info!("Query cache ttl: {}s", config.cache.ttl_secs);
    let catalog = Arc::new(catalog::Catalog::new(Arc::new(client), ttl));
    catalog.clone().start_background_prune(config.cache.ttl_secs.max(60));

    let idle_timeout = config.viewers.idle_timeout_secs;
    let viewers = Arc::new(viewer::ViewerRegistry::new(Duration::from_secs(idle_timeout)));
    viewers.clone().start_background_expiry((idle_timeout / 4).max(30));

    let address = config.listen.address.as_deref().unwrap_or("[::]");
    let port = &config.listen.port;
    let addr: SocketAddr = format!("{}:{}", address, port)
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let tls = match (&config.listen.tlscert, &config.listen.tlskey) {
        (Some(cert), Some(key)) => Some((cert.clone(), key.clone())),
        _ => None,
    };

    let state = server::AppState::new(config, catalog, viewers);
    let app = server::build_router(state);

    if let Some((cert_path, key_path)) = tls {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("Serving HTTPS on {}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("Serving HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    Ok(())
}
