use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line for the folio blog server.
#[derive(Debug, Clone, Parser)]
#[command(name = "folio", version, about = "A small markdown blog backed by SQLite")]
pub struct Cli {
    /// Path to folio.yml
    #[arg(long, short, env = "FOLIO_CONFIG", default_value = "folio.yml", global = true)]
    pub config: PathBuf,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Username for write-protected routes (overrides auth.username)
    #[arg(long, env = "FOLIO_AUTH_USERNAME", hide_env_values = true, global = true)]
    pub auth_username: Option<String>,

    /// Password for write-protected routes (overrides auth.password)
    #[arg(long, env = "FOLIO_AUTH_PASSWORD", hide_env_values = true, global = true)]
    pub auth_password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Open the database and serve the blog over HTTP
    Serve {
        /// Listen address (overrides server.listen_addr)
        #[arg(long, env = "FOLIO_ADDR")]
        addr: Option<String>,
    },

    /// Create or migrate the database schema, then exit
    InitDb,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from([
            "folio",
            "serve",
            "--addr",
            "0.0.0.0:9000",
            "--config",
            "site/folio.yml",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("site/folio.yml"));
        match cli.command {
            Command::Serve { addr } => assert_eq!(addr.as_deref(), Some("0.0.0.0:9000")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_init_db() {
        let cli = Cli::try_parse_from(["folio", "init-db"]).unwrap();
        assert!(matches!(cli.command, Command::InitDb));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["folio"]).is_err());
    }
}
