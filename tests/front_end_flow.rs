use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use cinescope::app::{build_router, AppState};
use cinescope::models::{
    ExternalIds, Genre, MovieDetail, MovieList, MovieSummary, VideoRef, Videos,
};
use cinescope::tmdb::TmdbApi;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

#[derive(Default)]
struct FakeTmdb {
    trending: Option<MovieList>,
    popular: Option<MovieList>,
    top_rated: Option<MovieList>,
    search: Option<MovieList>,
    detail: Option<MovieDetail>,
    calls: Mutex<Vec<String>>,
}

impl FakeTmdb {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl TmdbApi for FakeTmdb {
    async fn fetch_trending(&self) -> Option<MovieList> {
        self.record("trending".to_string());
        self.trending.clone()
    }
    async fn fetch_popular(&self, page: u32) -> Option<MovieList> {
        self.record(format!("popular:{page}"));
        self.popular.clone()
    }
    async fn fetch_top_rated(&self, page: u32) -> Option<MovieList> {
        self.record(format!("top_rated:{page}"));
        self.top_rated.clone()
    }
    async fn search_movies(&self, query: &str, page: u32) -> Option<MovieList> {
        self.record(format!("search:{query}:{page}"));
        self.search.clone()
    }
    async fn get_movie_details(&self, movie_id: u64) -> Option<MovieDetail> {
        self.record(format!("detail:{movie_id}"));
        self.detail.clone()
    }
}

fn summary(id: u64, title: &str, poster: Option<&str>) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        original_title: title.to_string(),
        poster_path: poster.map(str::to_string),
        release_date: Some("2024-05-01".to_string()),
        vote_average: Some(7.25),
    }
}

fn list(movies: Vec<MovieSummary>) -> MovieList {
    MovieList {
        page: 1,
        total_pages: 1,
        total_results: movies.len() as u32,
        results: movies,
    }
}

fn fight_club() -> MovieDetail {
    MovieDetail {
        summary: summary(550, "Fight Club", Some("/fc.jpg")),
        runtime: Some(139),
        overview: Some("Un impiegato insonne incontra Tyler Durden.".to_string()),
        genres: vec![Genre {
            id: 18,
            name: "Dramma".to_string(),
        }],
        videos: Videos {
            results: vec![
                VideoRef {
                    key: "teaser-key".to_string(),
                    site: "YouTube".to_string(),
                    video_type: "Teaser".to_string(),
                },
                VideoRef {
                    key: "trailer-key".to_string(),
                    site: "YouTube".to_string(),
                    video_type: "Trailer".to_string(),
                },
            ],
        },
        external_ids: ExternalIds {
            imdb_id: Some("tt0137523".to_string()),
        },
        imdb_id: None,
    }
}

fn app_with(tmdb: FakeTmdb) -> (Router, Arc<FakeTmdb>) {
    let tmdb = Arc::new(tmdb);
    (build_router(AppState { tmdb: tmdb.clone() }), tmdb)
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let res = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn health_is_ok() {
    let (app, _) = app_with(FakeTmdb::default());
    let (status, _, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn home_keeps_popular_row_when_top_rated_fails() {
    let (app, tmdb) = app_with(FakeTmdb {
        trending: Some(list(vec![summary(1, "Trend Uno", Some("/t1.jpg"))])),
        popular: Some(list(vec![
            summary(2, "Popolare Due", Some("/p2.jpg")),
            summary(3, "Popolare Tre", Some("/p3.jpg")),
        ])),
        top_rated: None,
        ..FakeTmdb::default()
    });

    let (status, _, body) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Popolare Due"));
    assert!(body.contains("Popolare Tre"));
    assert!(body.contains("Trend Uno"));
    assert!(body.contains("Nessun film trovato."));
    assert!(body.contains("Errore nel caricamento di alcune sezioni."));

    let mut calls = tmdb.calls.lock().unwrap().clone();
    calls.sort();
    assert_eq!(calls, vec!["popular:1", "top_rated:1", "trending"]);
}

#[tokio::test]
async fn list_renders_only_cards_with_posters() {
    let results = vec![
        summary(1, "Con poster", Some("/a.jpg")),
        summary(2, "Senza poster", None),
        summary(3, "Altro poster", Some("/c.jpg")),
    ];
    let expected = results.iter().filter(|m| m.poster_path.is_some()).count();
    let (app, _) = app_with(FakeTmdb {
        trending: Some(list(results)),
        ..FakeTmdb::default()
    });

    let (status, _, body) = get(app, "/trending").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("class=\"movie-card\"").count(), expected);
    assert!(!body.contains("Senza poster"));
    assert!(body.contains("<p class=\"movie-year\">2024</p>"));
    assert!(body.contains("Trending aggiornati."));
}

#[tokio::test]
async fn failed_list_shows_placeholder_and_error_status() {
    let (app, _) = app_with(FakeTmdb::default());
    let (status, _, body) = get(app, "/popular?page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Nessun film trovato."));
    assert!(body.contains("Errore nel caricamento dei popolari."));
}

#[tokio::test]
async fn search_sends_trimmed_query_and_page() {
    let (app, tmdb) = app_with(FakeTmdb {
        search: Some(list(vec![summary(603, "Matrix", Some("/m.jpg"))])),
        ..FakeTmdb::default()
    });

    let (status, _, body) = get(app, "/search?query=%20%20matrix%20&page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Risultati per: &#34;matrix&#34;."));
    assert!(body.contains("value=\"matrix\""));
    assert_eq!(*tmdb.calls.lock().unwrap(), vec!["search:matrix:2"]);
}

#[tokio::test]
async fn blank_search_redirects_without_calling_service() {
    let (app, tmdb) = app_with(FakeTmdb::default());
    let (status, headers, _) = get(app, "/search?query=%20%20").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/");
    assert!(tmdb.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn detail_failure_opens_no_modal() {
    let (app, tmdb) = app_with(FakeTmdb::default());
    let (status, _, body) = get(app, "/movie/404?back=%2Ftrending").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
    let mut calls = tmdb.calls.lock().unwrap().clone();
    calls.sort();
    assert_eq!(calls, vec!["detail:404", "trending"]);
}

#[tokio::test]
async fn detail_renders_links_and_closed_trailer() {
    let (app, _) = app_with(FakeTmdb {
        detail: Some(fight_club()),
        ..FakeTmdb::default()
    });

    let (status, _, body) = get(app, "/movie/550?back=%2Fpopular%3Fpage%3D3").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("id=\"movieModal\""));
    assert!(body.contains("href=\"https://vixsrc.to/movie/550\""));
    assert!(body.contains("href=\"https://www.themoviedb.org/movie/550\""));
    assert!(body.contains("href=\"https://www.imdb.com/title/tt0137523/\""));
    assert!(body.contains("139 minuti"));
    assert!(body.contains("7.2/10") || body.contains("7.3/10"));
    // close link returns to the list the modal was opened from
    assert!(body.contains("class=\"close\" href=\"/popular?page=3\""));
    // trailer preferred over teaser, player starts empty
    assert!(body.contains("data-youtube=\"trailer-key\""));
    assert!(body.contains("src=\"\""));
    assert!(!body.contains("youtube.com/embed"));
}

#[tokio::test]
async fn detail_modal_overlays_the_list_it_came_from() {
    let (app, tmdb) = app_with(FakeTmdb {
        popular: Some(list(vec![summary(603, "Matrix", Some("/m.jpg"))])),
        detail: Some(fight_club()),
        ..FakeTmdb::default()
    });

    let (status, _, body) = get(app, "/movie/550?back=%2Fpopular%3Fpage%3D3").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("id=\"movieModal\""));
    assert_eq!(body.matches("class=\"movie-card\"").count(), 1);
    assert!(body.contains("Matrix"));
    assert!(body.contains("Popolari aggiornati."));
    assert!(body.contains("class=\"nav-btn active\" href=\"/popular?page=1\""));

    let mut calls = tmdb.calls.lock().unwrap().clone();
    calls.sort();
    assert_eq!(calls, vec!["detail:550", "popular:3"]);
}

#[tokio::test]
async fn trailer_toggle_opens_embed() {
    let (app, _) = app_with(FakeTmdb {
        detail: Some(fight_club()),
        ..FakeTmdb::default()
    });

    let (status, _, body) = get(app, "/movie/550?back=%2F&trailer=1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("src=\"https://www.youtube.com/embed/trailer-key\""));
    // the button now closes the player again
    assert!(body.contains("href=\"/movie/550?back=%2F\" data-youtube"));
}

#[tokio::test]
async fn detail_ignores_foreign_back_links() {
    let (app, _) = app_with(FakeTmdb {
        detail: Some(fight_club()),
        ..FakeTmdb::default()
    });

    let (_, _, body) = get(app, "/movie/550?back=https%3A%2F%2Fevil.example%2F").await;
    assert!(body.contains("class=\"close\" href=\"/\""));
    assert!(!body.contains("evil.example"));
}

#[tokio::test]
async fn zero_movie_id_is_rejected() {
    let (app, tmdb) = app_with(FakeTmdb::default());
    let (status, _, _) = get(app, "/movie/0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(tmdb.calls.lock().unwrap().is_empty());
}
