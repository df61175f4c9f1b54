use post_portal::{
    AppState,
    backend::{BackendState, HttpBackend},
    config::{AppConfig, Env},
    create_router,
};
use std::{error::Error, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, installs logging, builds the backend client and serves
/// the router until the process is stopped.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // 1. Configuration (fail-fast on missing production settings)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise verbose for this crate.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "post_portal=debug,tower_http=info,axum=trace".into());

    // 3. Pretty output locally, JSON lines for log aggregation in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Backend client
    let backend = HttpBackend::new(&config.backend_url, config.backend_timeout)?;
    tracing::info!(backend = backend.base_url(), "backend client ready");
    let backend = Arc::new(backend) as BackendState;

    tracing::info!(
        protected = ?config.gate.protected_prefixes,
        public = ?config.gate.public_exact_routes,
        "request gate configured"
    );

    // 5. Router and server
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(config, backend));

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
