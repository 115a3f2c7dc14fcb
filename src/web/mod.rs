//! JSON HTTP API.

pub mod admin;
pub mod auth;
pub mod checkin;
pub mod error;
pub mod session;

use crate::config::Config;
use crate::core::Core;
use crate::errors::{AppError, AppResult};
use axum::{
    Router,
    routing::{get, post},
};
use log::info;
use session::SessionRegistry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub core: Arc<Core>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(core: Core) -> Self {
        let sessions = SessionRegistry::new(core.session_ttl());
        Self {
            core: Arc::new(core),
            sessions: Arc::new(sessions),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(auth::index))
        .route("/labels/:lang", get(auth::labels))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session))
        .route("/session/language", post(auth::set_language))
        .route("/session/menu", post(auth::set_menu))
        .route("/checkin", post(checkin::check_in))
        .route("/months", get(checkin::months))
        .route("/history", get(checkin::history))
        .route("/history/export", get(checkin::export))
        .route("/admin/users", get(admin::list_users).post(admin::add_user))
        .route("/admin/users/:account", axum::routing::delete(admin::delete_user))
        .route("/admin/users/:account/enable", post(admin::enable_user))
        .route("/admin/users/:account/disable", post(admin::disable_user))
        .layer(cors)
        .with_state(state)
}

/// Run `f` on the blocking pool; store calls are synchronous.
pub(crate) async fn blocking<F, T>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Other(format!("worker task failed: {e}")))?
}

/// Bind to the configured address and serve until the process stops.
pub async fn serve(cfg: &Config) -> AppResult<()> {
    let core = {
        let cfg = cfg.clone();
        blocking(move || Core::open(&cfg)).await?
    };

    let addr = format!("{}:{}", cfg.bind_address, cfg.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(AppState::new(core))).await?;
    Ok(())
}
