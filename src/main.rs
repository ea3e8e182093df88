use std::sync::Arc;

use academy_admin::backend::http::HttpBackend;
use academy_admin::config::config;
use academy_admin::state::AppState;
use academy_admin::{is_production, routes};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up BACKEND_URL, BASE_PATH, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config().clone();
    tracing::info!("Starting academy admin in {:?} mode", config.environment);

    if is_production!() && !config.session.cookie_secure {
        tracing::warn!("Session cookies are not marked Secure in production");
    }

    let backend = HttpBackend::new(&config.backend)?;
    tracing::info!("Delegating to backend at {}", config.backend.url);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let base_path = config.server.base_path.clone();
    let app = routes::app(AppState::new(config, Arc::new(backend)));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    println!("🚀 Academy admin listening on http://{}{}", bind_addr, base_path);

    axum::serve(listener, app).await?;
    Ok(())
}
