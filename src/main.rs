use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;

use support_agent::config::Config;
use support_agent::routes;
use support_agent::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let state = Arc::new(AppState::new(&config));

    let cors = CorsLayer::very_permissive();

    let app = routes::create_router().with_state(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %config.bind_addr,
        flow = %config.flow_id,
        "customer support agent listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
