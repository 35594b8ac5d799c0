use std::{env, net::SocketAddr};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, auth};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

// The browser client runs on a different origin during development.
fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(3001);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// The signing secret has no default; startup fails when `JWT_SECRET`
/// is absent or blank.
fn load_jwt_secret() -> anyhow::Result<String> {
    match env::var("JWT_SECRET") {
        Ok(s) if !s.trim().is_empty() => Ok(s),
        _ => anyhow::bail!("JWT_SECRET is not set; refusing to start without a signing secret"),
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let db = models::db::connect().await?;
    let jwt_secret = load_jwt_secret()?;
    let state = auth::ServerState { db, auth: auth::ServerAuthConfig { jwt_secret } };

    let cors = build_cors();
    let app: Router = routes::build_router(cors, state);

    let addr = load_bind_addr()?;
    info!(%addr, "starting inventory api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
