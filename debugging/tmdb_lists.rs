//! Query the movie metadata service and print what the front end would render.
//! Usage:
//!   cargo run --bin tmdb_lists -- trending
//!   cargo run --bin tmdb_lists -- popular [page]
//!   cargo run --bin tmdb_lists -- top_rated [page]
//!   cargo run --bin tmdb_lists -- search <query> [page]
//!   cargo run --bin tmdb_lists -- movie <tmdb_id>
//! Requires TMDB_ACCESS_TOKEN in the environment (.env supported).

use anyhow::{Context, Result};
use cinescope::config::Config;
use cinescope::models::MovieList;
use cinescope::tmdb::{TmdbApi, TmdbClient};
use cinescope::view::{cards_from, DetailView};
use dotenvy::dotenv;
use serde_json::{json, Value};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo run --bin tmdb_lists -- trending|popular|top_rated [page]");
        eprintln!("       cargo run --bin tmdb_lists -- search <query> [page]");
        eprintln!("       cargo run --bin tmdb_lists -- movie <tmdb_id>");
        std::process::exit(1);
    }

    let config = Config::from_env()?;
    let client = TmdbClient::from_config(&config)?;
    let page_arg = |idx: usize| -> Result<u32> {
        args.get(idx)
            .map(|p| p.parse::<u32>().context("page must be a positive integer"))
            .transpose()
            .map(|p| p.unwrap_or(1))
    };

    let output = match args[1].as_str() {
        "trending" => list_output(client.fetch_trending().await),
        "popular" => list_output(client.fetch_popular(page_arg(2)?).await),
        "top_rated" => list_output(client.fetch_top_rated(page_arg(2)?).await),
        "search" => {
            let query = args
                .get(2)
                .map(|q| q.trim())
                .filter(|q| !q.is_empty())
                .ok_or_else(|| anyhow::anyhow!("missing search query"))?;
            list_output(client.search_movies(query, page_arg(3)?).await)
        }
        "movie" => {
            let id: u64 = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("missing tmdb_id"))?
                .parse()
                .context("tmdb_id must be an integer")?;
            match client.get_movie_details(id).await {
                Some(detail) => detail_output(&DetailView::from_detail(&detail, id)),
                None => Value::Null,
            }
        }
        other => anyhow::bail!("unknown command '{}'", other),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn list_output(list: Option<MovieList>) -> Value {
    let Some(list) = list else {
        return Value::Null;
    };
    let cards: Vec<Value> = cards_from(&list.results)
        .into_iter()
        .map(|c| {
            json!({
                "id": c.id,
                "title": c.title,
                "year": c.year,
                "poster": c.poster_url,
            })
        })
        .collect();
    json!({
        "page": list.page,
        "total_pages": list.total_pages,
        "received": list.results.len(),
        "cards": cards,
    })
}

fn detail_output(view: &DetailView) -> Value {
    json!({
        "id": view.id,
        "title": view.title,
        "original_title": view.original_title,
        "release_date": view.release_date,
        "runtime": view.runtime,
        "vote": view.vote,
        "overview": view.overview,
        "genres": view.genres,
        "poster": view.poster_url,
        "tmdb": view.tmdb_link,
        "play": view.play_link,
        "imdb": view.imdb_link,
        "trailer": view.trailer.as_ref().map(|t| t.embed_url()),
    })
}
