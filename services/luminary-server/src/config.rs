//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! API keys come from the GEMINI_API_KEY env var and/or a credentials file,
//! never from the TOML itself.

use common::Secret;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Env var holding a single API key. It becomes the first key in the pool.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
}

/// HTTP listener settings
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

/// Upstream model settings
#[derive(Debug, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Per-request upstream timeout. Unset means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// One API key per line; blank lines and `#` comments are skipped.
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,
    #[serde(skip)]
    pub api_keys: Vec<Secret<String>>,
}

/// Latest-batch cache location
#[derive(Debug, Deserialize)]
pub struct GalleryConfig {
    #[serde(default = "default_gallery_path")]
    pub path: PathBuf,
}

fn default_max_connections() -> usize {
    1000
}

fn default_base_url() -> String {
    provider::gemini::DEFAULT_BASE_URL.to_string()
}

fn default_text_model() -> String {
    studio::DEFAULT_TEXT_MODEL.to_string()
}

fn default_image_model() -> String {
    studio::DEFAULT_IMAGE_MODEL.to_string()
}

fn default_gallery_path() -> PathBuf {
    PathBuf::from(format!("{}.json", studio::LATEST_BATCH_KEY))
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            timeout_secs: None,
            credentials_file: None,
            api_keys: Vec::new(),
        }
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            path: default_gallery_path(),
        }
    }
}

impl GeminiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn models(&self) -> studio::Models {
        studio::Models {
            text: self.text_model.clone(),
            image: self.image_model.clone(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// Key resolution order:
    /// 1. GEMINI_API_KEY env var (first in the pool)
    /// 2. credentials_file entries, in file order
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if !config.gemini.base_url.starts_with("http://")
            && !config.gemini.base_url.starts_with("https://")
        {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                config.gemini.base_url
            )));
        }

        if config.gemini.timeout_secs == Some(0) {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if config.server.max_connections == 0 {
            return Err(common::Error::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        let env_key = std::env::var(API_KEY_ENV).ok();
        let file_keys = match config.gemini.credentials_file {
            Some(ref file) => {
                let contents = std::fs::read_to_string(file).map_err(|e| {
                    common::Error::Config(format!(
                        "failed to read credentials_file {}: {e}",
                        file.display()
                    ))
                })?;
                parse_keys(&contents)
            }
            None => Vec::new(),
        };
        config.gemini.api_keys = merge_keys(env_key, file_keys);

        Ok(config)
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("luminary.toml")
    }
}

/// One key per line; blank lines and `#` comments skipped.
fn parse_keys(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

/// Env key first, then file keys, dropping blanks and duplicates.
fn merge_keys(env_key: Option<String>, file_keys: Vec<String>) -> Vec<Secret<String>> {
    let mut keys: Vec<String> = Vec::new();
    for key in env_key
        .map(|k| k.trim().to_owned())
        .into_iter()
        .chain(file_keys)
    {
        if !key.is_empty() && !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys.into_iter().map(Secret::new).collect()
}
