mod audit;
mod error;
mod notifications;
mod roster;
mod routes;
mod storage;
#[cfg(test)]
mod testing;

use axum::{
    Router,
    extract::FromRef,
    routing::{delete, get},
};
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use storage::Db;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
}

impl FromRef<AppState> for Db {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    pub base_url: String,
}

impl AppConfig {
    fn from_env() -> anyhow::Result<Self> {
        let data_dir = std::env::var("ONCALL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let port = match std::env::var("PORT").ok().filter(|s| !s.is_empty()) {
            Some(port) => port
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid PORT {port:?}: {e}"))?,
            None => 8080,
        };

        let base_url = std::env::var("BASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{port}"));

        Ok(Self {
            data_dir,
            port,
            base_url,
        })
    }
}

/// Build the HTTP router.
pub fn build_app(state: AppState) -> Router {
    let api = Router::new()
        // Health
        .route("/health", get(routes::health::health))
        // Roster members
        .route(
            "/teams/{team}/rosters/{roster}/users",
            get(routes::roster_users::list_roster_users),
        )
        .route(
            "/teams/{team}/rosters/{roster}/users/{user}",
            delete(routes::roster_users::remove_roster_user)
                .put(routes::roster_users::edit_roster_user),
        );

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oncall_server=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!("data directory: {}", config.data_dir.display());

    // Initialize database
    let db = storage::init_db(&config.data_dir)?;
    tracing::info!("database initialized");

    let app = build_app(AppState { db });

    tracing::info!("starting server at {}", config.base_url);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
