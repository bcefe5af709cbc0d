use klife_runtime_config::AppConfig;
use klife_server::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "klife_server=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::load()?;
    if config.session.secret.is_none() {
        tracing::warn!("KLIFE_SESSION_SECRET not set; session cookies are unsigned");
    }
    tracing::info!("auth service: {}", config.upstream.auth_url);
    tracing::info!("events endpoint: {}", config.upstream.events_url);
    tracing::info!("static files: {}", config.server.static_dir.display());

    let state = AppState::from_config(&config)?;
    let app = app(state);

    let addr = config.listen_addr();
    tracing::info!("starting server at {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
