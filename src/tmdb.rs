use crate::config::Config;
use crate::models::{MovieDetail, MovieList};
use crate::params::QueryParams;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const LANGUAGE: &str = "it-IT";
/// Highest page the list endpoints will serve.
pub const MAX_PAGE: u32 = 500;
const ERROR_BODY_LIMIT: usize = 200;

/// The movie metadata service. Every operation is a single best-effort attempt;
/// `None` is the only failure signal callers see.
#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn fetch_trending(&self) -> Option<MovieList>;
    async fn fetch_popular(&self, page: u32) -> Option<MovieList>;
    async fn fetch_top_rated(&self, page: u32) -> Option<MovieList>;
    /// `query` must already be trimmed and non-empty.
    async fn search_movies(&self, query: &str, page: u32) -> Option<MovieList>;
    async fn get_movie_details(&self, movie_id: u64) -> Option<MovieDetail>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl TmdbClient {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let user_agent = format!("cinescope/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_base, &config.access_token)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: QueryParams,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let params = params.with("language", LANGUAGE);
        debug!(path = %path, params = ?params.pairs(), "TMDB request");

        let res = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(params.pairs())
            .send()
            .await
            .context("request failed")?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("TMDB error {} on {}: {}", status, path, error_detail(&text)));
        }
        serde_json::from_str(&text).context("JSON parse failed")
    }

    /// Runs a request and absorbs any failure after logging it.
    async fn best_effort<T: for<'de> Deserialize<'de>>(
        &self,
        op: &str,
        path: &str,
        params: QueryParams,
    ) -> Option<T> {
        match self.get_json(path, params).await {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(op = %op, "TMDB call failed: {:#}", e);
                None
            }
        }
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn fetch_trending(&self) -> Option<MovieList> {
        self.best_effort("fetch_trending", "/trending/movie/week", QueryParams::new())
            .await
    }

    async fn fetch_popular(&self, page: u32) -> Option<MovieList> {
        let params = QueryParams::new().with("page", normalize_page(page));
        self.best_effort("fetch_popular", "/movie/popular", params)
            .await
    }

    async fn fetch_top_rated(&self, page: u32) -> Option<MovieList> {
        let params = QueryParams::new().with("page", normalize_page(page));
        self.best_effort("fetch_top_rated", "/movie/top_rated", params)
            .await
    }

    async fn search_movies(&self, query: &str, page: u32) -> Option<MovieList> {
        let params = QueryParams::new()
            .with("query", query)
            .with("include_adult", false)
            .with("page", normalize_page(page));
        self.best_effort("search_movies", "/search/movie", params)
            .await
    }

    async fn get_movie_details(&self, movie_id: u64) -> Option<MovieDetail> {
        let params = QueryParams::new().with("append_to_response", "videos");
        self.best_effort("get_movie_details", &format!("/movie/{movie_id}"), params)
            .await
    }
}

/// Pages are 1-based.
pub fn normalize_page(page: u32) -> u32 {
    page.max(1)
}

/// TMDB usually answers errors with `{"status_code": .., "status_message": ..}`.
fn error_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        status_code: Option<i64>,
        status_message: Option<String>,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            status_code,
            status_message: Some(message),
        }) => match status_code {
            Some(code) => format!("{message} (code {code})"),
            None => message,
        },
        _ if body.trim().is_empty() => "<empty body>".to_string(),
        _ => {
            let body = body.trim();
            match body.char_indices().nth(ERROR_BODY_LIMIT) {
                Some((cut, _)) => format!("{}...", &body[..cut]),
                None => body.to_string(),
            }
        }
    }
}
