//! Configuration loading for the `munin` CLI.
//!
//! Configuration is loaded from a TOML file with the following resolution
//! order:
//! 1. `--config <path>` (CLI flag; must exist)
//! 2. `~/.munin/config.toml` (user)
//! 3. built-in defaults
//!
//! The credential token is never read from the config file; the CLI takes
//! it from `--token` or the `MUNIN_TOKEN` environment variable.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::DEFAULT_CACHE_TTL;
use crate::gateway::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_TOKEN_HEADER, Munin, MuninBuilder};
use crate::{MuninError, Result};

/// CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Gateway settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Service address (default: the public mock API).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Transport timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Cache time-to-live in seconds (default: 300).
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Header carrying the credential token (default: `token`).
    #[serde(default = "default_token_header")]
    pub token_header: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            token_header: default_token_header(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL.as_secs()
}

fn default_token_header() -> String {
    DEFAULT_TOKEN_HEADER.to_string()
}

impl Config {
    /// Load configuration from the standard locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MuninError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MuninError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path; `None` means "use defaults".
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(MuninError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        Ok(dirs::home_dir()
            .map(|home| home.join(".munin").join("config.toml"))
            .filter(|path| path.exists()))
    }

    /// A gateway builder preloaded with these settings.
    pub fn builder(&self) -> MuninBuilder {
        Munin::builder()
            .base_url(self.gateway.base_url.clone())
            .timeout(Duration::from_secs(self.gateway.timeout_secs))
            .cache_ttl(Duration::from_secs(self.gateway.cache_ttl_secs))
            .token_header(self.gateway.token_header.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.gateway.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.gateway.timeout_secs, 10);
        assert_eq!(config.gateway.cache_ttl_secs, 300);
        assert_eq!(config.gateway.token_header, "token");
    }

    #[test]
    fn parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.gateway.timeout_secs, 10);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
            [gateway]
            base_url = "http://localhost:4010/api"
            cache_ttl_secs = 60
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.gateway.base_url, "http://localhost:4010/api");
        assert_eq!(config.gateway.cache_ttl_secs, 60);
        // Defaults preserved
        assert_eq!(config.gateway.timeout_secs, 10);
        assert_eq!(config.gateway.token_header, "token");
    }

    #[test]
    fn load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[gateway]\nbase_url = \"http://127.0.0.1:9/api\"\ntoken_header = \"X-Token\""
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.gateway.token_header, "X-Token");

        let gateway = config.builder().build().unwrap();
        assert_eq!(gateway.base_url(), "http://127.0.0.1:9/api");
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/munin.toml"))).unwrap_err();
        assert!(matches!(err, MuninError::Configuration(_)));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gateway]\ntimeout_secs = \"soon\"").unwrap();
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(MuninError::Configuration(_))
        ));
    }
}
