use super::{poster_url, PLACEHOLDER_POSTER};
use crate::models::{MovieDetail, VideoRef};

const TMDB_PAGE_BASE: &str = "https://www.themoviedb.org/movie/";
const PLAY_BASE: &str = "https://vixsrc.to/movie/";
const IMDB_BASE: &str = "https://www.imdb.com/title/";
const EMBED_BASE: &str = "https://www.youtube.com/embed/";

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub id: u64,
    pub title: String,
    pub original_title: String,
    pub release_date: String,
    pub runtime: String,
    pub vote: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub poster_url: String,
    pub fallback_poster_url: &'static str,
    pub tmdb_link: String,
    pub play_link: String,
    pub imdb_link: Option<String>,
    pub trailer: Option<TrailerView>,
}

/// Inline player state. The iframe source is empty unless the player is open,
/// and a freshly opened modal always starts with the player closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailerView {
    pub key: String,
    pub open: bool,
}

impl TrailerView {
    pub fn embed_url(&self) -> String {
        format!("{EMBED_BASE}{}", self.key)
    }

    pub fn embed_src(&self) -> String {
        if self.open {
            self.embed_url()
        } else {
            String::new()
        }
    }

    pub fn toggled(&self) -> Self {
        Self {
            key: self.key.clone(),
            open: !self.open,
        }
    }
}

impl DetailView {
    pub fn from_detail(detail: &MovieDetail, requested_id: u64) -> Self {
        let summary = &detail.summary;
        let tmdb_link = tmdb_page_link(summary.id);
        let play_link = play_link(&tmdb_link, summary.id, requested_id);

        let runtime = match detail.runtime {
            Some(minutes) if minutes > 0 => format!("{minutes} minuti"),
            _ => "N/A".to_string(),
        };
        let vote = match summary.vote_average {
            Some(v) if v > 0.0 => format!("{v:.1}/10"),
            _ => "N/A".to_string(),
        };
        let overview = detail
            .overview
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .unwrap_or("Nessuna descrizione disponibile.")
            .to_string();
        let release_date = summary
            .release_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("N/A")
            .to_string();

        Self {
            id: summary.id,
            title: summary.title.clone(),
            original_title: summary.original_title.clone(),
            release_date,
            runtime,
            vote,
            overview,
            genres: detail.genres.iter().map(|g| g.name.clone()).collect(),
            poster_url: summary
                .poster_path
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(poster_url)
                .unwrap_or_else(|| PLACEHOLDER_POSTER.to_string()),
            fallback_poster_url: PLACEHOLDER_POSTER,
            tmdb_link,
            play_link,
            imdb_link: detail.imdb_id().map(|id| format!("{IMDB_BASE}{id}/")),
            trailer: select_trailer(&detail.videos.results).map(|v| TrailerView {
                key: v.key.clone(),
                open: false,
            }),
        }
    }
}

/// YouTube trailer, then YouTube teaser, then any YouTube video.
pub fn select_trailer(videos: &[VideoRef]) -> Option<&VideoRef> {
    let youtube = |v: &&VideoRef| v.site == "YouTube";
    videos
        .iter()
        .filter(youtube)
        .find(|v| v.video_type == "Trailer")
        .or_else(|| {
            videos
                .iter()
                .filter(youtube)
                .find(|v| v.video_type == "Teaser")
        })
        .or_else(|| videos.iter().find(youtube))
}

pub fn tmdb_page_link(movie_id: u64) -> String {
    format!("{TMDB_PAGE_BASE}{movie_id}")
}

/// Numeric id following `/movie/` in a canonical page URL.
pub fn extract_movie_id(url: &str) -> Option<u64> {
    let (_, rest) = url.split_once("/movie/")?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// The id embedded in the page URL wins over both the record id and the
/// id the caller asked for.
pub fn play_link(page_url: &str, detail_id: u64, requested_id: u64) -> String {
    let id = extract_movie_id(page_url)
        .or(Some(detail_id).filter(|id| *id > 0))
        .unwrap_or(requested_id);
    format!("{PLAY_BASE}{id}")
}
