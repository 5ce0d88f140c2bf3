//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Main configuration struct matching the folio.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub server: ServerConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    pub author: String,

    #[serde(default)]
    pub description: String,

    /// Absolute site URL, used for feed links
    pub url: String,
}

impl SiteConfig {
    /// Site URL without a trailing slash, ready for `format!("{}/{}", ..)`
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("folio.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Shared write credential. Either value may instead come from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_realm")]
    pub realm: String,
}

fn default_realm() -> String {
    String::from("folio")
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            realm: default_realm(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

fn default_listen_addr() -> String {
    String::from("127.0.0.1:8000")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Get the database file, resolved relative to the config file
    pub fn database_path(&self) -> PathBuf {
        self.resolve_path(&self.database.path)
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }

        match self.config_path.as_deref().and_then(Path::parent) {
            Some(parent) => parent.join(path),
            None => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const MINIMAL: &str = r#"
site:
  title: "ftzm"
  author: "Matthew"
  url: "https://example.com/"
"#;

    #[test]
    fn test_default_values() {
        let config: Config = serde_yaml::from_str(MINIMAL).unwrap();

        assert_eq!(config.site.description, "");
        assert_eq!(config.database.path, PathBuf::from("folio.db"));
        assert_eq!(config.auth.realm, "folio");
        assert!(config.auth.username.is_none());
        assert_eq!(config.server.listen_addr, "127.0.0.1:8000");
        assert_eq!(config.site.base_url(), "https://example.com");
    }

    #[test]
    fn test_database_path_relative_to_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("folio.yml");
        fs::write(
            &path,
            format!("{MINIMAL}database:\n  path: data/blog.db\nauth:\n  username: admin\n  password: hunter2\n"),
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.database_path(), dir.path().join("data/blog.db"));
        assert_eq!(config.auth.username.as_deref(), Some("admin"));
        assert_eq!(config.auth.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_absolute_database_path_kept() {
        let mut config: Config = serde_yaml::from_str(MINIMAL).unwrap();
        config.database.path = PathBuf::from("/var/lib/folio/folio.db");
        assert_eq!(
            config.database_path(),
            PathBuf::from("/var/lib/folio/folio.db")
        );
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/folio.yml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }
}
