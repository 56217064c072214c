//! CLI argument definitions using clap
//!
//! Commands:
//! - hyperlekce serve [--port <port>] [--static-dir <dir>] [--memory]
//! - hyperlekce dump
//!
//! Every flag can also come from the environment; database flags use the
//! libpq variable names.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::http_server::HttpServerConfig;
use crate::store::DatabaseConfig;

/// hyperlekce - lesson tree service
#[derive(Parser, Debug)]
#[command(name = "hyperlekce")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Debug-level logging (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        #[command(flatten)]
        http: HttpArgs,

        #[command(flatten)]
        database: DatabaseArgs,

        /// Use the in-memory store instead of PostgreSQL
        #[arg(long)]
        memory: bool,
    },

    /// Print the full lesson tree as JSON and exit
    Dump {
        #[command(flatten)]
        database: DatabaseArgs,
    },
}

/// Listener and static file settings
#[derive(Args, Debug, Clone)]
pub struct HttpArgs {
    #[arg(long, env = "LISTEN_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 3002)]
    pub port: u16,

    /// Directory with the front-end files
    #[arg(long, env = "STATIC_DIR", default_value = ".")]
    pub static_dir: PathBuf,

    /// Allowed CORS origin (repeatable); any origin when omitted
    #[arg(long = "cors-origin", env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,
}

impl From<HttpArgs> for HttpServerConfig {
    fn from(args: HttpArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            static_dir: args.static_dir,
            cors_origins: args.cors_origins,
        }
    }
}

/// PostgreSQL connection settings
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    #[arg(long = "pg-host", env = "PGHOST", default_value = "localhost")]
    pub pg_host: String,

    #[arg(long = "pg-port", env = "PGPORT", default_value_t = 5432)]
    pub pg_port: u16,

    #[arg(long = "pg-database", env = "PGDATABASE")]
    pub database: Option<String>,

    #[arg(long = "pg-user", env = "PGUSER")]
    pub user: Option<String>,

    #[arg(long = "pg-password", env = "PGPASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Any non-empty value turns on TLS (server certificate not verified)
    #[arg(long = "pg-sslmode", env = "PGSSLMODE")]
    pub sslmode: Option<String>,

    #[arg(long = "pool-max", env = "PGPOOL_MAX", default_value_t = 5)]
    pub pool_max: u32,

    /// Seconds a request waits for a free pooled connection
    #[arg(long = "pool-acquire-timeout", env = "PGPOOL_ACQUIRE_TIMEOUT_SECS", default_value_t = 30)]
    pub pool_acquire_timeout_secs: u64,
}

impl From<DatabaseArgs> for DatabaseConfig {
    fn from(args: DatabaseArgs) -> Self {
        Self {
            host: args.pg_host,
            port: args.pg_port,
            database: args.database,
            user: args.user,
            password: args.password,
            ssl: args.sslmode.is_some_and(|mode| !mode.is_empty()),
            max_connections: args.pool_max,
            acquire_timeout: Duration::from_secs(args.pool_acquire_timeout_secs),
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_memory_flags() {
        let cli = Cli::try_parse_from([
            "hyperlekce",
            "serve",
            "--memory",
            "--port",
            "4000",
            "--static-dir",
            "public",
        ])
        .unwrap();

        match cli.command {
            Command::Serve { http, memory, .. } => {
                assert!(memory);
                let config = HttpServerConfig::from(http);
                assert_eq!(config.port, 4000);
                assert_eq!(config.static_dir, PathBuf::from("public"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_serve_listener_and_database_flags_are_distinct() {
        let cli = Cli::try_parse_from([
            "hyperlekce",
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            "4000",
            "--pg-host",
            "db",
            "--pg-port",
            "6543",
        ])
        .unwrap();

        let Command::Serve { http, database, .. } = cli.command else {
            panic!("expected serve");
        };
        let http = HttpServerConfig::from(http);
        let db = DatabaseConfig::from(database);
        assert_eq!(http.socket_addr(), "127.0.0.1:4000");
        assert_eq!((db.host.as_str(), db.port), ("db", 6543));
    }

    #[test]
    fn test_database_args_to_config() {
        let cli = Cli::try_parse_from([
            "hyperlekce",
            "dump",
            "--pg-host",
            "db",
            "--pg-database",
            "lekce",
            "--pg-sslmode",
            "require",
            "--pool-max",
            "3",
        ])
        .unwrap();

        let Command::Dump { database } = cli.command else {
            panic!("expected dump");
        };
        let config = DatabaseConfig::from(database);
        assert_eq!(config.host, "db");
        assert_eq!(config.database.as_deref(), Some("lekce"));
        assert!(config.ssl);
        assert_eq!(config.max_connections, 3);
    }
}
