//! Configuration file support for star-history.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `STAR_HISTORY_`, e.g., `STAR_HISTORY_GITHUB_TOKEN`)
//! 3. Config file (./star-history.toml or ~/.config/star-history/config.toml)
//! 4. Built-in defaults
//!
//! The conventional `GITHUB_TOKEN` variable is used when no token is configured
//! anywhere else.
//!
//! Example config file:
//! ```toml
//! [github]
//! token = "ghp_..."  # or use STAR_HISTORY_GITHUB_TOKEN env var
//! url = "https://github.example.com/api/v3"  # GitHub Enterprise, optional
//!
//! [http]
//! timeout = 30  # seconds, optional
//! ```

use std::path::PathBuf;
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config as ConfigBuilder, ConfigBuilder as Builder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;
use star_history::github::GITHUB_API_URL;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub configuration.
    pub github: GitHubConfig,
    /// HTTP client configuration.
    pub http: HttpConfig,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub API token.
    /// Can also be set via STAR_HISTORY_GITHUB_TOKEN or GITHUB_TOKEN.
    pub token: Option<String>,
    /// GitHub API base URL.
    pub url: Option<String>,
}

/// HTTP client configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds. No timeout when unset.
    pub timeout: Option<u64>,
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/star-history/config.toml)
    /// 3. Local config file (./star-history.toml)
    /// 4. Environment variables with STAR_HISTORY_ prefix
    /// 5. `GITHUB_TOKEN`, only if no token was found above
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from("star-history.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./star-history.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // STAR_HISTORY_GITHUB_TOKEN -> github.token
        builder = builder.add_source(Self::environment());

        let mut config = Self::from_builder(builder);
        if config.github_token().is_none() {
            config.github.token = std::env::var("GITHUB_TOKEN").ok();
        }
        config
    }

    fn environment() -> Environment {
        Environment::with_prefix("STAR_HISTORY")
            .separator("_")
            .try_parsing(true)
    }

    fn from_builder(builder: Builder<DefaultState>) -> Self {
        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the GitHub token, ignoring blank values.
    pub fn github_token(&self) -> Option<String> {
        self.github
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }

    /// Get the GitHub API base URL.
    pub fn api_url(&self) -> String {
        self.github
            .url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| GITHUB_API_URL.to_string())
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.http.timeout.filter(|s| *s > 0).map(Duration::from_secs)
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "star-history")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml_content: &str) -> Config {
        let builder =
            ConfigBuilder::builder().add_source(File::from_str(toml_content, FileFormat::Toml));
        Config::from_builder(builder)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.github.token.is_none());
        assert!(config.github.url.is_none());
        assert!(config.http.timeout.is_none());
        assert_eq!(config.api_url(), "https://api.github.com");
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_config_builder_with_toml_string() {
        let config = from_toml(
            r#"
            [github]
            token = "ghp_test123"
            url = "https://github.example.com/api/v3"

            [http]
            timeout = 30
        "#,
        );

        assert_eq!(config.github_token().as_deref(), Some("ghp_test123"));
        assert_eq!(config.api_url(), "https://github.example.com/api/v3");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_config_builder_partial_override() {
        let config = from_toml(
            r#"
            [http]
            timeout = 5
        "#,
        );

        assert!(config.github_token().is_none());
        assert_eq!(config.api_url(), GITHUB_API_URL);
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = from_toml(
            r#"
            [github]
            token = "   "
            url = ""

            [http]
            timeout = 0
        "#,
        );

        assert!(config.github_token().is_none());
        assert_eq!(config.api_url(), GITHUB_API_URL);
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_config_merging_order() {
        let base = r#"
            [github]
            token = "base_token"

            [http]
            timeout = 10
        "#;
        let local = r#"
            [github]
            token = "local_token"
        "#;

        let builder = ConfigBuilder::builder()
            .add_source(File::from_str(base, FileFormat::Toml))
            .add_source(File::from_str(local, FileFormat::Toml));
        let config = Config::from_builder(builder);

        assert_eq!(config.github_token().as_deref(), Some("local_token"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_environment_prefix() {
        let env_source = Config::environment().source(Some(
            [
                ("STAR_HISTORY_GITHUB_TOKEN".to_string(), "ghp_env".to_string()),
                ("STAR_HISTORY_HTTP_TIMEOUT".to_string(), "12".to_string()),
                ("OTHER_GITHUB_TOKEN".to_string(), "ignored".to_string()),
            ]
            .into_iter()
            .collect(),
        ));

        let builder = ConfigBuilder::builder()
            .add_source(File::from_str(
                "[github]\ntoken = \"from_file\"",
                FileFormat::Toml,
            ))
            .add_source(env_source);
        let config = Config::from_builder(builder);

        assert_eq!(config.github_token().as_deref(), Some("ghp_env"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(12)));
    }

    #[test]
    fn test_config_invalid_toml_falls_back_to_defaults() {
        let config = from_toml("[github\ntoken = ");
        assert!(config.github.token.is_none());
        assert_eq!(config.api_url(), GITHUB_API_URL);
    }

    #[test]
    fn test_config_unknown_fields_ignored() {
        let config = from_toml(
            r#"
            [github]
            token = "ghp_x"
            unknown_field = "ignored"

            [unknown_section]
            foo = "bar"
        "#,
        );

        assert_eq!(config.github_token().as_deref(), Some("ghp_x"));
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = Config::default_config_path() {
            assert!(path.to_string_lossy().contains("star-history"));
            assert!(path.ends_with("config.toml"));
        }
    }
}
