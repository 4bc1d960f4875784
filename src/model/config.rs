use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;

const ENV_CONFIG_PATH: &str = "AUDIT_AGENT_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_API_KEY: &str = "CHAINGPT_API_KEY";
const ENV_CHAINGPT_BASE_URL: &str = "CHAINGPT_BASE_URL";
const ENV_EXPLORER_BASE_URL: &str = "EXPLORER_BASE_URL";

const DEFAULT_CHAINGPT_BASE_URL: &str = "https://api.chaingpt.org";
const DEFAULT_EXPLORER_BASE_URL: &str = "https://scan.duckchain.io/api/v2";

/// Upstream endpoint configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamConfig {
    /// ChainGPT API base URL override
    #[serde(default)]
    pub chaingpt_base_url: Option<Url>,
    /// Blockscout-compatible explorer API base URL override
    #[serde(default)]
    pub explorer_base_url: Option<Url>,
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub chaingpt_api_key: Option<String>,
    pub chaingpt_base_url: Url,
    pub explorer_base_url: Url,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            chaingpt_api_key: None,
            chaingpt_base_url: Url::parse(DEFAULT_CHAINGPT_BASE_URL).unwrap(),
            explorer_base_url: Url::parse(DEFAULT_EXPLORER_BASE_URL).unwrap(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    ///
    /// Environment variables win over the config file; both fall back to
    /// defaults.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let chaingpt_api_key = std::env::var(ENV_API_KEY).ok().filter(|k| !k.is_empty());

        // Load config file
        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();

        let chaingpt_base_url = Self::url_from_env(ENV_CHAINGPT_BASE_URL)
            .or(file.upstream.chaingpt_base_url)
            .unwrap_or_else(|| Url::parse(DEFAULT_CHAINGPT_BASE_URL).unwrap());

        let explorer_base_url = Self::url_from_env(ENV_EXPLORER_BASE_URL)
            .or(file.upstream.explorer_base_url)
            .unwrap_or_else(|| Url::parse(DEFAULT_EXPLORER_BASE_URL).unwrap());

        Self {
            host,
            port,
            chaingpt_api_key,
            chaingpt_base_url,
            explorer_base_url,
        }
    }

    /// Read a URL from an environment variable, ignoring unparsable values
    fn url_from_env(var: &str) -> Option<Url> {
        let raw = std::env::var(var).ok()?;
        match Url::parse(&raw) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(var = var, value = %raw, error = %e, "Ignoring invalid URL from environment");
                None
            }
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                // Handle empty file
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
