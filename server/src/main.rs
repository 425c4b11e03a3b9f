mod config;
mod routes;
mod state;
mod store;

use std::error::Error;

use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let config = config::Config::from_env()?;
    let store = config.load_store()?;
    info!(
        users = store.users().len(),
        seed = ?config.seed_path,
        "store seeded"
    );

    let state = state::AppState::new(store);

    // SSR needs the Leptos site config; the API stands alone without it.
    let app = match routes::leptos_app(state.clone()) {
        Ok(app) => app,
        Err(e) => {
            warn!(error = %e, "leptos unavailable; serving API only");
            routes::api_routes(state)
        }
    };

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!(port = config.port, "chat server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
