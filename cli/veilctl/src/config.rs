//! Configuration and session loading.
//!
//! Handles:
//! - API endpoint configuration
//! - The pre-established session cookie read at startup

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

/// Configuration file name.
const CONFIG_FILE: &str = "config.json";

/// Session cookie file name.
const COOKIE_FILE: &str = "cookie.txt";

/// Get the config directory path.
fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("com", "veilmail", "veil")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

/// CLI configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Masking service API URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    std::env::var("VEIL_API_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

impl Config {
    /// Load config from disk, or return default.
    pub fn load() -> Result<Self> {
        let path = config_dir()?.join(CONFIG_FILE);

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }
}

/// A pre-established session with the masking service.
#[derive(Debug, Clone)]
pub struct Session {
    /// Raw cookie header value.
    pub cookie: String,
}

impl Session {
    /// Default cookie file location.
    pub fn default_path() -> Result<PathBuf> {
        Ok(config_dir()?.join(COOKIE_FILE))
    }

    /// Read the session cookie from `path` if the file exists.
    ///
    /// Lines starting with `//` are comments; the first remaining
    /// non-empty line is the cookie. An absent file is not an error —
    /// the caller decides whether to warn and proceed.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session cookie from {:?}", path))?;

        let cookie = contents
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with("//"));

        Ok(cookie.map(|cookie| Self {
            cookie: cookie.to_string(),
        }))
    }
}
