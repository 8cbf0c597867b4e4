use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use blog_core::pagination::DEFAULT_PAGE_SIZE;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5150";
const DEFAULT_TOKEN_FILE: &str = ".blog_token";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub page_size: u32,
    pub token_file: PathBuf,
    pub log_level: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("BLOG_API_URL")
            .map(|value| value.trim().to_string())
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let page_size = parse_positive_u32(
            "BLOG_PAGE_SIZE",
            std::env::var("BLOG_PAGE_SIZE").ok(),
            DEFAULT_PAGE_SIZE,
        )?;
        let token_file = std::env::var("BLOG_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_FILE));
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "warn".to_string());

        Ok(Self {
            api_url,
            page_size,
            token_file,
            log_level,
        })
    }
}

fn parse_positive_u32(key: &str, raw: Option<String>, default: u32) -> Result<u32> {
    let value = raw
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse::<u32>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

pub fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}
