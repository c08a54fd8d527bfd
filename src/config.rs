//! Application configuration: provider credentials, posting endpoints,
//! and content tunables.
//!
//! Loaded once at process start and passed by reference into the
//! components that need it — there is no global credential state.
//! Credentials are optional at load time so commands that never touch a
//! network (e.g. `compose`) work without them; the commands that do need
//! one fail fast through [`ProviderConfig::require_access_key`] /
//! [`PosterConfig::require_token`] before any file or network I/O.

use chrono::NaiveTime;
use confique::Config;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] confique::Error),
    #[error("Missing credential: {0} (set it in the config file or environment)")]
    MissingCredential(&'static str),
    #[error("Invalid post time {0:?} (expected HH:MM)")]
    InvalidTime(String),
}

#[derive(Config, Debug)]
pub struct AppConfig {
    #[config(nested)]
    pub provider: ProviderConfig,
    #[config(nested)]
    pub poster: PosterConfig,
    #[config(nested)]
    pub content: ContentConfig,
}

/// Photo-provider API access.
#[derive(Config, Debug)]
pub struct ProviderConfig {
    #[config(env = "QUOTIDIAN_PROVIDER_ACCESS_KEY")]
    pub access_key: Option<String>,
    #[config(default = "https://api.unsplash.com/photos/random")]
    pub random_photo_url: String,
}

/// Posting API access.
#[derive(Config, Debug)]
pub struct PosterConfig {
    #[config(env = "QUOTIDIAN_POSTER_TOKEN")]
    pub token: Option<String>,
    #[config(default = "https://upload.twitter.com/1.1/media/upload.json")]
    pub upload_url: String,
    #[config(default = "https://api.twitter.com/2/tweets")]
    pub post_url: String,
}

/// Content tunables: hashtag pool, fire time, composition assets.
#[derive(Config, Debug)]
pub struct ContentConfig {
    #[config(default = [
        "nft", "pixelart", "nfts", "web3", "nftcommunity", "forest", "nature", "qotd",
    ])]
    pub hashtags: Vec<String>,
    /// Daily fire time, HH:MM local.
    #[config(default = "11:30")]
    pub post_time: String,
    #[config(default = "assets/DejaVuSans.ttf")]
    pub font: PathBuf,
    #[config(default = "assets/logo.png")]
    pub watermark: PathBuf,
    /// Page the quote scraper reads.
    #[config(default = "https://www.walkmyworld.com/posts/forest-quotes")]
    pub quotes_page: String,
}

impl AppConfig {
    /// Load from the environment plus an optional TOML file. A missing
    /// file simply yields the built-in defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::builder().env().file(path).load()?)
    }
}

impl ProviderConfig {
    pub fn require_access_key(&self) -> Result<&str, ConfigError> {
        self.access_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingCredential("provider.access_key"))
    }
}

impl PosterConfig {
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingCredential("poster.token"))
    }
}

/// Parse an `HH:MM` fire time.
pub fn parse_post_time(s: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| ConfigError::InvalidTime(s.to_string()))
}
