//! Database connection configuration
//!
//! Mirrors the libpq environment (`PGHOST`, `PGPORT`, ...). The CLI fills
//! it from flags/env; see `cli::args::DatabaseArgs`.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};

/// PostgreSQL connection and pool settings
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// TLS required, certificate not verified
    pub ssl: bool,
    /// Upper bound on pooled connections; requests queue beyond it
    pub max_connections: u32,
    /// How long a request waits for a free connection
    pub acquire_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: None,
            user: None,
            password: None,
            ssl: false,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .ssl_mode(if self.ssl {
                PgSslMode::Require
            } else {
                PgSslMode::Disable
            });

        if let Some(database) = &self.database {
            options = options.database(database);
        }
        if let Some(user) = &self.user {
            options = options.username(user);
        }
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        options
    }

    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }

    /// `host:port/database` for log lines (never includes credentials)
    pub fn display_target(&self) -> String {
        format!(
            "{}:{}/{}",
            self.host,
            self.port,
            self.database.as_deref().unwrap_or("")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DatabaseConfig::default();
        assert_eq!(config.port, 5432);
        assert_eq!(config.max_connections, 5);
        assert!(!config.ssl);
    }

    #[test]
    fn test_connect_options_carry_settings() {
        let config = DatabaseConfig {
            host: "db.internal".to_string(),
            port: 6543,
            database: Some("lekce".to_string()),
            ssl: true,
            ..Default::default()
        };

        let options = config.connect_options();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("lekce"));
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Require));
    }

    #[test]
    fn test_display_target_hides_password() {
        let config = DatabaseConfig {
            database: Some("lekce".to_string()),
            password: Some("secret".to_string()),
            ..Default::default()
        };
        let target = config.display_target();
        assert_eq!(target, "localhost:5432/lekce");
        assert!(!target.contains("secret"));
    }
}
