use super::{poster_url, PLACEHOLDER_POSTER};
use crate::models::MovieSummary;

#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: u64,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub fallback_poster_url: &'static str,
}

/// Cards for every record that has a poster; the rest are dropped on purpose.
pub fn cards_from(movies: &[MovieSummary]) -> Vec<CardView> {
    movies
        .iter()
        .filter_map(|m| {
            let path = m.poster_path.as_deref().filter(|p| !p.is_empty())?;
            Some(CardView {
                id: m.id,
                title: display_title(&m.title),
                year: derive_year(m.release_date.as_deref()),
                poster_url: poster_url(path),
                fallback_poster_url: PLACEHOLDER_POSTER,
            })
        })
        .collect()
}

pub fn derive_year(release_date: Option<&str>) -> String {
    release_date
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| d.chars().take(4).collect())
        .unwrap_or_else(|| "N/A".to_string())
}

fn display_title(title: &str) -> String {
    if title.trim().is_empty() {
        "Titolo N/A".to_string()
    } else {
        title.to_string()
    }
}
