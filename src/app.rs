use crate::config::Config;
use crate::navigator::Navigator;
use crate::state::{Action, Mode, ViewState};
use crate::tmdb::{TmdbApi, TmdbClient};
use crate::view::render_page;
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="500" height="750" viewBox="0 0 500 750"><rect width="500" height="750" fill="#1f2937"/><text x="250" y="375" fill="#9ca3af" font-family="sans-serif" font-size="36" text-anchor="middle">Nessuna immagine</text></svg>"##;

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn TmdbApi>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    query: Option<String>,
    page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct DetailQuery {
    back: Option<String>,
    trailer: Option<u8>,
}

pub async fn run_server(config: Config) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::from_config(&config)?);
    info!("Using TMDB API at {}", config.api_base);

    let app = build_router(AppState { tmdb });

    info!("Listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/trending", get(trending))
        .route("/popular", get(popular))
        .route("/top_rated", get(top_rated))
        .route("/search", get(search))
        .route("/movie/:id", get(movie_detail))
        .route("/static/placeholder.svg", get(placeholder))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn placeholder() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/svg+xml")], PLACEHOLDER_SVG)
}

async fn home(State(state): State<AppState>) -> Response {
    render_action(&state, Action::Navigate(Mode::Home)).await
}

async fn trending(State(state): State<AppState>) -> Response {
    render_action(&state, Action::Navigate(Mode::Trending)).await
}

async fn popular(State(state): State<AppState>, Query(q): Query<PageQuery>) -> Response {
    let page = q.page.unwrap_or(1);
    render_action(&state, Action::Navigate(Mode::Popular { page })).await
}

async fn top_rated(State(state): State<AppState>, Query(q): Query<PageQuery>) -> Response {
    let page = q.page.unwrap_or(1);
    render_action(&state, Action::Navigate(Mode::TopRated { page })).await
}

async fn search(State(state): State<AppState>, Query(q): Query<SearchQuery>) -> Response {
    let raw_query = q.query.unwrap_or_default();
    if raw_query.trim().is_empty() {
        debug!("Blank search, redirecting home");
        return Redirect::to("/").into_response();
    }
    let action = Action::Search {
        raw_query,
        page: q.page.unwrap_or(1),
    };
    render_action(&state, action).await
}

async fn movie_detail(
    State(state): State<AppState>,
    Path(movie_id): Path<u64>,
    Query(q): Query<DetailQuery>,
) -> Response {
    if movie_id == 0 {
        return StatusCode::BAD_REQUEST.into_response();
    }
    let back = Mode::from_path(q.back.as_deref().unwrap_or("/"));
    let navigator = Navigator::new(state.tmdb.clone(), ViewState::default());
    navigator
        .dispatch_both(Action::Navigate(back), Action::OpenDetail { movie_id })
        .await;
    if q.trailer == Some(1) {
        navigator.dispatch(Action::ToggleTrailer).await;
    }

    let view = navigator.snapshot().await;
    if view.detail.is_none() {
        info!("No details for movie {}, modal not opened", movie_id);
        return StatusCode::NO_CONTENT.into_response();
    }
    page_response(&view)
}

async fn render_action(state: &AppState, action: Action) -> Response {
    let navigator = Navigator::new(state.tmdb.clone(), ViewState::default());
    if !navigator.dispatch(action).await {
        return Redirect::to("/").into_response();
    }
    let view = navigator.snapshot().await;
    debug!(mode = ?view.mode, status = %view.status, "Rendering page");
    page_response(&view)
}

fn page_response(view: &ViewState) -> Response {
    match render_page(view) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("{:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
