use crate::state::{Action, Fetch, Outcome, RequestToken, ViewState};
use crate::tmdb::TmdbApi;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Runs actions against the metadata service and folds their results into the
/// current [`ViewState`]. The lock is never held while a request is in flight.
pub struct Navigator {
    api: Arc<dyn TmdbApi>,
    state: Mutex<ViewState>,
}

type Pending = Option<(RequestToken, Fetch)>;

impl Navigator {
    pub fn new(api: Arc<dyn TmdbApi>, initial: ViewState) -> Self {
        Self {
            api,
            state: Mutex::new(initial),
        }
    }

    pub async fn snapshot(&self) -> ViewState {
        self.state.lock().await.clone()
    }

    /// Returns `false` when the action was rejected without touching the state.
    pub async fn dispatch(&self, action: Action) -> bool {
        match self.begin(action).await {
            Some(pending) => {
                self.settle(pending).await;
                true
            }
            None => false,
        }
    }

    /// Starts `first` then `second`, then lets both fetches run at once. Used to
    /// load a list and the modal shown over it.
    pub async fn dispatch_both(&self, first: Action, second: Action) -> (bool, bool) {
        let first = self.begin(first).await;
        let second = self.begin(second).await;
        let accepted = (first.is_some(), second.is_some());
        tokio::join!(
            self.settle(first.flatten()),
            self.settle(second.flatten())
        );
        accepted
    }

    async fn begin(&self, action: Action) -> Option<Pending> {
        let mut guard = self.state.lock().await;
        let Some((next, pending)) = guard.start(action.clone()) else {
            debug!(action = ?action, "Action rejected");
            return None;
        };
        *guard = next;
        Some(pending)
    }

    async fn settle(&self, pending: Pending) {
        let Some((token, fetch)) = pending else {
            return;
        };
        let lane = fetch.lane();
        let outcome = perform(self.api.as_ref(), fetch).await;

        let mut guard = self.state.lock().await;
        if !guard.is_current(token, lane) {
            debug!(token = token.value(), "Discarding stale response");
            return;
        }
        *guard = guard.accept(token, outcome);
    }
}

/// Executes a fetch. The home view waits for all three rows before returning.
pub async fn perform(api: &dyn TmdbApi, fetch: Fetch) -> Outcome {
    match fetch {
        Fetch::Home => {
            let (trending, popular, top_rated) = tokio::join!(
                api.fetch_trending(),
                api.fetch_popular(1),
                api.fetch_top_rated(1),
            );
            Outcome::Home {
                trending,
                popular,
                top_rated,
            }
        }
        Fetch::Trending => Outcome::List(api.fetch_trending().await),
        Fetch::Popular(page) => Outcome::List(api.fetch_popular(page).await),
        Fetch::TopRated(page) => Outcome::List(api.fetch_top_rated(page).await),
        Fetch::Search { query, page } => Outcome::List(api.search_movies(&query, page).await),
        Fetch::Detail { movie_id } => Outcome::Detail {
            movie_id,
            detail: api.get_movie_details(movie_id).await,
        },
    }
}
