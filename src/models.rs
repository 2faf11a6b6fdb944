use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
}

/// Envelope returned by the list and search endpoints.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct MovieList {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VideoRef {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Videos {
    #[serde(default)]
    pub results: Vec<VideoRef>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ExternalIds {
    pub imdb_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    pub runtime: Option<u32>,
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub videos: Videos,
    #[serde(default)]
    pub external_ids: ExternalIds,
    /// The detail object carries the IMDb id at top level too.
    #[serde(default)]
    pub imdb_id: Option<String>,
}

impl MovieDetail {
    pub fn imdb_id(&self) -> Option<&str> {
        self.external_ids
            .imdb_id
            .as_deref()
            .or(self.imdb_id.as_deref())
            .filter(|id| !id.trim().is_empty())
    }
}
