use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::{Datelike, Utc};
use folio_core::{ArticleStore, MarkdownProcessor, SiteConfig, StoreResult};
use folio_render::SiteMeta;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{auth::Credentials, config::AppConfig, error::AppError, handlers};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ArticleStore>,
    pub renderer: MarkdownProcessor,
    pub site: Arc<SiteConfig>,
    pub credentials: Arc<Credentials>,
}

impl AppState {
    pub fn new(store: ArticleStore, site: SiteConfig, credentials: Credentials) -> Self {
        Self {
            store: Arc::new(store),
            renderer: MarkdownProcessor::new(),
            site: Arc::new(site),
            credentials: Arc::new(credentials),
        }
    }

    /// Layout values for the current request.
    pub fn site_meta(&self) -> SiteMeta {
        SiteMeta::new(&self.site, Utc::now().year())
    }

    /// Run a store call on the blocking pool.
    ///
    /// The outer error only reports a failed task; the store's own result is
    /// handed back so callers can recover from validation failures.
    pub async fn with_store<T, F>(&self, f: F) -> Result<StoreResult<T>, AppError>
    where
        F: FnOnce(&ArticleStore) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        let result = tokio::task::spawn_blocking(move || f(&store))
            .await
            .context("store task failed")?;
        Ok(result)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::search))
        .route("/healthz", get(healthz))
        .route("/feed.xml", get(handlers::feed))
        .route("/portfolio", get(handlers::portfolio))
        .route("/about", get(handlers::about))
        .route("/contact", get(handlers::contact))
        .route(
            "/create",
            get(handlers::create_form).post(handlers::create_submit),
        )
        .route("/preview", post(handlers::preview))
        .route(
            "/edit/{slug}",
            get(handlers::edit_form).post(handlers::edit_submit),
        )
        .route("/{slug}", get(handlers::article))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: AppConfig) -> Result<()> {
    let credentials = config.credentials()?;

    let path = config.database_path.clone();
    let store = tokio::task::spawn_blocking(move || ArticleStore::open(&path))
        .await?
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    info!(articles = store.count()?, "article store ready");

    let app = router(AppState::new(store, config.site.clone(), credentials));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "folio listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
