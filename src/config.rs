use std::net::SocketAddr;

use anyhow::{Context, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite:data/almanac.db";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/api";

/// Runtime settings, read from the environment after loading `.env`.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Base of the REST surface the command-line client talks to.
    pub api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse()
            .with_context(|| format!("BIND_ADDR is not a socket address: {bind_addr}"))?;

        let api_url = std::env::var("ALMANAC_API").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Ok(Self {
            database_url,
            bind_addr,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}
