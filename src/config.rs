use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";
const DEFAULT_ADDR: &str = "0.0.0.0:3146";

/// Runtime settings, read from the environment (a `.env` file is loaded by the binary).
#[derive(Debug, Clone)]
pub struct Config {
    pub access_token: String,
    pub api_base: String,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds the config from any variable lookup. Blank values count as unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());

        let access_token = var("TMDB_ACCESS_TOKEN").context("TMDB_ACCESS_TOKEN not set")?;
        let api_base = var("TMDB_API_BASE")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let addr_raw = var("CINESCOPE_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr_raw
            .trim()
            .parse()
            .with_context(|| format!("CINESCOPE_ADDR is not a socket address: {addr_raw}"))?;

        Ok(Self {
            access_token,
            api_base,
            addr,
        })
    }
}
