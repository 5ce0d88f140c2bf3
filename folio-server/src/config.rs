use std::path::PathBuf;

use anyhow::{Context, Result};
use folio_core::{Config, ConfigError, SiteConfig};

use crate::auth::Credentials;
use crate::cli::{Cli, Command};

/// Runtime configuration: the config file with CLI/env overrides applied.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub database_path: PathBuf,
    pub listen_addr: String,
    pub auth_username: Option<String>,
    pub auth_password: Option<String>,
    pub realm: String,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let file = Config::from_file(&cli.config)
            .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
        Ok(Self::merge(file, cli))
    }

    /// Apply command line overrides on top of a loaded config file.
    pub fn merge(file: Config, cli: &Cli) -> Self {
        let listen_addr = match &cli.command {
            Command::Serve { addr: Some(addr) } => addr.clone(),
            _ => file.server.listen_addr.clone(),
        };

        Self {
            database_path: file.database_path(),
            listen_addr,
            auth_username: cli.auth_username.clone().or(file.auth.username),
            auth_password: cli.auth_password.clone().or(file.auth.password),
            realm: file.auth.realm,
            site: file.site,
        }
    }

    /// The write credential. Serving without one is refused.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let username = non_empty(&self.auth_username)
            .ok_or_else(|| ConfigError::MissingField("auth.username".into()))?;
        let password = non_empty(&self.auth_password)
            .ok_or_else(|| ConfigError::MissingField("auth.password".into()))?;

        Ok(Credentials::new(username, password, &self.realm))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn write_config(dir: &std::path::Path, auth: &str) -> PathBuf {
        let path = dir.join("folio.yml");
        fs::write(
            &path,
            format!(
                "site:\n  title: Blog\n  author: Me\n  url: https://example.com\ndatabase:\n  path: blog.db\n{auth}"
            ),
        )
        .unwrap();
        path
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), "auth:\n  username: file-user\n  password: file-pass\n");
        let cli = Cli::try_parse_from([
            "folio",
            "--config",
            path.to_str().unwrap(),
            "--auth-password",
            "cli-pass",
            "serve",
            "--addr",
            "127.0.0.1:9999",
        ])
        .unwrap();

        let config = AppConfig::from_cli(&cli).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9999");
        assert_eq!(config.database_path, dir.path().join("blog.db"));

        let credentials = config.credentials().unwrap();
        assert!(credentials.verify("file-user", "cli-pass"));
        assert_eq!(credentials.realm(), "folio");
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), "auth:\n  username: admin\n  password: \"\"\n");
        let file = Config::from_file(&path).unwrap();

        let mut config = AppConfig::merge(
            file,
            &Cli::try_parse_from(["folio", "init-db"]).unwrap(),
        );
        config.auth_password = None;

        let err = config.credentials().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "auth.password"));
    }
}
