use std::{net::SocketAddr, sync::Arc};

use bet_api::{build_router, config::Config, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    dotenvy::dotenv().ok();

    info!("🚀 Starting Bet API...");

    let config = Config::from_env();
    info!(
        max_bets = config.max_bets,
        max_legs_per_parlay = config.max_legs_per_parlay,
        admins = config.admin_user_ids.len(),
        "📋 Configuration loaded"
    );

    let port = config.server_port;
    let state = Arc::new(AppState::new(config));
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("🌐 HTTP server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
