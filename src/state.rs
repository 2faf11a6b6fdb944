//! Immutable view state and the pure transitions between states.
//!
//! Every load issues a [`RequestToken`]. A response is only committed when its
//! token is still the latest one issued for its lane, so a slow answer to a
//! superseded action can never overwrite a newer one.
use crate::models::{MovieDetail, MovieList};
use crate::tmdb::{normalize_page, MAX_PAGE};
use crate::view::{cards_from, CardView, DetailView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Home,
    Trending,
    Popular { page: u32 },
    TopRated { page: u32 },
    Search { query: String, page: u32 },
}

impl Mode {
    pub fn nav_key(&self) -> &'static str {
        match self {
            Mode::Home => "home",
            Mode::Trending => "trending",
            Mode::Popular { .. } => "popular",
            Mode::TopRated { .. } => "top_rated",
            Mode::Search { .. } => "search",
        }
    }

    pub fn page(&self) -> Option<u32> {
        match self {
            Mode::Popular { page } | Mode::TopRated { page } | Mode::Search { page, .. } => {
                Some(*page)
            }
            Mode::Home | Mode::Trending => None,
        }
    }

    /// Same mode on another page; modes without paging are returned as-is.
    pub fn with_page(&self, page: u32) -> Mode {
        let page = normalize_page(page);
        match self {
            Mode::Popular { .. } => Mode::Popular { page },
            Mode::TopRated { .. } => Mode::TopRated { page },
            Mode::Search { query, .. } => Mode::Search {
                query: query.clone(),
                page,
            },
            other => other.clone(),
        }
    }

    /// Relative URL that renders this mode.
    pub fn path(&self) -> String {
        match self {
            Mode::Home => "/".to_string(),
            Mode::Trending => "/trending".to_string(),
            Mode::Popular { page } => format!("/popular?page={page}"),
            Mode::TopRated { page } => format!("/top_rated?page={page}"),
            Mode::Search { query, page } => format!(
                "/search?query={}&page={page}",
                urlencoding::encode(query)
            ),
        }
    }

    /// Inverse of [`Mode::path`]. Anything unrecognised maps to `Home`, which also
    /// keeps user-supplied return links on this site.
    pub fn from_path(raw: &str) -> Mode {
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let param = |name: &str| {
            query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(k, _)| *k == name)
                .and_then(|(_, v)| {
                    urlencoding::decode(&v.replace('+', " "))
                        .ok()
                        .map(|decoded| decoded.into_owned())
                })
        };
        let page = param("page")
            .and_then(|p| p.parse().ok())
            .map(normalize_page)
            .unwrap_or(1);
        match path {
            "/trending" => Mode::Trending,
            "/popular" => Mode::Popular { page },
            "/top_rated" => Mode::TopRated { page },
            "/search" => match param("query").map(|q| q.trim().to_string()) {
                Some(query) if !query.is_empty() => Mode::Search { query, page },
                _ => Mode::Home,
            },
            _ => Mode::Home,
        }
    }

    fn loading_status(&self) -> String {
        match self {
            Mode::Home => "Caricamento...".to_string(),
            Mode::Trending => "Caricamento trending...".to_string(),
            Mode::Popular { .. } => "Caricamento popolari...".to_string(),
            Mode::TopRated { .. } => "Caricamento top rated...".to_string(),
            Mode::Search { query, .. } => format!("Ricerca: \"{query}\"..."),
        }
    }

    fn success_status(&self) -> String {
        match self {
            Mode::Home => String::new(),
            Mode::Trending => "Trending aggiornati.".to_string(),
            Mode::Popular { .. } => "Popolari aggiornati.".to_string(),
            Mode::TopRated { .. } => "Top rated aggiornati.".to_string(),
            Mode::Search { query, .. } => format!("Risultati per: \"{query}\"."),
        }
    }

    fn failure_status(&self) -> String {
        match self {
            Mode::Home => "Errore nel caricamento di alcune sezioni.".to_string(),
            Mode::Trending => "Errore nel caricamento dei trending.".to_string(),
            Mode::Popular { .. } => "Errore nel caricamento dei popolari.".to_string(),
            Mode::TopRated { .. } => "Errore nel caricamento dei top rated.".to_string(),
            Mode::Search { .. } => "Errore durante la ricerca.".to_string(),
        }
    }
}

const DETAIL_LOADING: &str = "Caricamento dettagli...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    List,
    Detail,
}

/// What a user can ask the front end to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(Mode),
    Search { raw_query: String, page: u32 },
    OpenDetail { movie_id: u64 },
    ToggleTrailer,
}

/// Network work a transition asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    Home,
    Trending,
    Popular(u32),
    TopRated(u32),
    Search { query: String, page: u32 },
    Detail { movie_id: u64 },
}

impl Fetch {
    pub fn lane(&self) -> Lane {
        match self {
            Fetch::Detail { .. } => Lane::Detail,
            _ => Lane::List,
        }
    }
}

/// Settled result of a [`Fetch`]. `None` stands for any failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    List(Option<MovieList>),
    Home {
        trending: Option<MovieList>,
        popular: Option<MovieList>,
        top_rated: Option<MovieList>,
    },
    Detail {
        movie_id: u64,
        detail: Option<MovieDetail>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridView {
    pub cards: Vec<CardView>,
    pub page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub title: &'static str,
    pub more: Mode,
    pub cards: Vec<CardView>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Content {
    #[default]
    Idle,
    Grid(GridView),
    Rows(Vec<RowView>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub mode: Mode,
    pub last_query: String,
    pub status: String,
    pub content: Content,
    pub detail: Option<DetailView>,
    issued: RequestToken,
    latest_list: RequestToken,
    latest_detail: RequestToken,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::for_mode(Mode::Home)
    }
}

impl ViewState {
    /// A state sitting on `mode` with nothing loaded yet.
    pub fn for_mode(mode: Mode) -> Self {
        let last_query = match &mode {
            Mode::Search { query, .. } => query.clone(),
            _ => String::new(),
        };
        Self {
            mode,
            last_query,
            status: String::new(),
            content: Content::Idle,
            detail: None,
            issued: RequestToken::default(),
            latest_list: RequestToken::default(),
            latest_detail: RequestToken::default(),
        }
    }

    /// Applies an action. Returns the next state and, when the action needs the
    /// network, the fetch to run together with its token. `None` means the action
    /// was rejected (e.g. a blank search) and nothing changes.
    pub fn start(&self, action: Action) -> Option<(ViewState, Option<(RequestToken, Fetch)>)> {
        match action {
            Action::Navigate(mode) => {
                let fetch = match &mode {
                    Mode::Home => Fetch::Home,
                    Mode::Trending => Fetch::Trending,
                    Mode::Popular { page } => Fetch::Popular(normalize_page(*page)),
                    Mode::TopRated { page } => Fetch::TopRated(normalize_page(*page)),
                    Mode::Search { query, page } => {
                        return self.start(Action::Search {
                            raw_query: query.clone(),
                            page: *page,
                        });
                    }
                };
                let next = ViewState {
                    status: mode.loading_status(),
                    mode: mode.with_page(mode.page().unwrap_or(1)),
                    last_query: String::new(),
                    content: Content::Idle,
                    ..self.close_detail()
                };
                Some(next.issue(fetch))
            }
            Action::Search { raw_query, page } => {
                let query = raw_query.trim().to_string();
                if query.is_empty() {
                    return None;
                }
                let page = normalize_page(page);
                let mode = Mode::Search {
                    query: query.clone(),
                    page,
                };
                let next = ViewState {
                    status: mode.loading_status(),
                    mode,
                    last_query: query.clone(),
                    content: Content::Idle,
                    ..self.close_detail()
                };
                Some(next.issue(Fetch::Search { query, page }))
            }
            Action::OpenDetail { movie_id } => {
                let next = ViewState {
                    status: DETAIL_LOADING.to_string(),
                    ..self.clone()
                };
                Some(next.issue(Fetch::Detail { movie_id }))
            }
            Action::ToggleTrailer => Some((self.toggle_trailer(), None)),
        }
    }

    fn issue(mut self, fetch: Fetch) -> (ViewState, Option<(RequestToken, Fetch)>) {
        let token = RequestToken(self.issued.0 + 1);
        self.issued = token;
        match fetch.lane() {
            Lane::List => self.latest_list = token,
            Lane::Detail => self.latest_detail = token,
        }
        (self, Some((token, fetch)))
    }

    pub fn is_current(&self, token: RequestToken, lane: Lane) -> bool {
        let latest = match lane {
            Lane::List => self.latest_list,
            Lane::Detail => self.latest_detail,
        };
        token == latest
    }

    /// Commits a settled fetch. Stale outcomes leave the state untouched.
    pub fn accept(&self, token: RequestToken, outcome: Outcome) -> ViewState {
        let lane = match outcome {
            Outcome::Detail { .. } => Lane::Detail,
            _ => Lane::List,
        };
        if !self.is_current(token, lane) {
            return self.clone();
        }

        match outcome {
            Outcome::List(list) => {
                let failed = list.is_none();
                let list = list.unwrap_or_default();
                let page = self.mode.page().unwrap_or(1);
                ViewState {
                    status: if failed {
                        self.mode.failure_status()
                    } else {
                        self.mode.success_status()
                    },
                    content: Content::Grid(GridView {
                        cards: cards_from(&list.results),
                        page,
                        total_pages: list.total_pages.min(MAX_PAGE).max(page),
                    }),
                    ..self.clone()
                }
            }
            Outcome::Home {
                trending,
                popular,
                top_rated,
            } => {
                let failed = trending.is_none() || popular.is_none() || top_rated.is_none();
                let row = |title, more, list: Option<MovieList>| RowView {
                    title,
                    more,
                    cards: list.map(|l| cards_from(&l.results)).unwrap_or_default(),
                };
                ViewState {
                    status: if failed {
                        self.mode.failure_status()
                    } else {
                        self.mode.success_status()
                    },
                    content: Content::Rows(vec![
                        row("Trending della settimana", Mode::Trending, trending),
                        row("Popolari", Mode::Popular { page: 1 }, popular),
                        row("Top rated", Mode::TopRated { page: 1 }, top_rated),
                    ]),
                    ..self.clone()
                }
            }
            Outcome::Detail { movie_id, detail } => match detail {
                // Only the detail's own loading message is cleared; a list that
                // settled meanwhile keeps its status.
                Some(detail) => ViewState {
                    status: if self.status == DETAIL_LOADING {
                        String::new()
                    } else {
                        self.status.clone()
                    },
                    detail: Some(DetailView::from_detail(&detail, movie_id)),
                    ..self.clone()
                },
                None => ViewState {
                    status: "Errore nel caricamento dei dettagli.".to_string(),
                    detail: None,
                    ..self.clone()
                },
            },
        }
    }

    pub fn toggle_trailer(&self) -> ViewState {
        let mut next = self.clone();
        if let Some(trailer) = next.detail.as_mut().and_then(|d| d.trailer.as_mut()) {
            *trailer = trailer.toggled();
        }
        next
    }

    /// Drops the modal together with its player. Navigating anywhere closes it.
    pub fn close_detail(&self) -> ViewState {
        let mut next = self.clone();
        next.detail = None;
        // Invalidate a detail fetch still in flight so it cannot reopen the modal.
        next.latest_detail = RequestToken::default();
        next
    }
}
