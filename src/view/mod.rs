//! Turns service records into display descriptors and HTML.
mod card;
mod detail;
mod html;

pub use card::{cards_from, derive_year, CardView};
pub use detail::{
    extract_movie_id, play_link, select_trailer, tmdb_page_link, DetailView, TrailerView,
};
pub use html::render_page;

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
pub const PLACEHOLDER_POSTER: &str = "/static/placeholder.svg";
pub const EMPTY_LIST_MESSAGE: &str = "Nessun film trovato.";

pub fn poster_url(path: &str) -> String {
    format!("{IMAGE_BASE}{path}")
}
