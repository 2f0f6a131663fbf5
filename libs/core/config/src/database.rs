use crate::{env_or_default, env_parse, ConfigError, FromEnv};
use std::env;

/// Postgres connection and pool configuration
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Connect/acquire deadline applied by the pool to every call
    pub timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn new(url: String) -> Self {
        Self {
            url,
            max_connections: 10,
            min_connections: 5,
            timeout_secs: 60,
        }
    }

    /// Build a URL from discrete POSTGRES_* parts
    fn url_from_parts() -> Result<String, ConfigError> {
        let host = env_or_default("POSTGRES_HOST", "localhost");
        let port = env_parse("POSTGRES_PORT", 5432u16)?;
        let db = env_or_default("POSTGRES_DB", "products");
        let user = env_or_default("POSTGRES_USER", "postgres");
        let password = env_or_default("POSTGRES_PASSWORD", "password");

        Ok(format!("postgresql://{user}:{password}@{host}:{port}/{db}"))
    }
}

impl FromEnv for DatabaseConfig {
    /// DATABASE_URL wins; otherwise the URL is assembled from POSTGRES_* parts.
    fn from_env() -> Result<Self, ConfigError> {
        let url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => Self::url_from_parts()?,
        };

        let config = Self {
            url,
            max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 10u32)?,
            min_connections: env_parse("DATABASE_MIN_CONNECTIONS", 5u32)?,
            timeout_secs: env_parse("DATABASE_TIMEOUT_SECS", 60u64)?,
        };

        if config.min_connections > config.max_connections {
            return Err(ConfigError::Invalid(format!(
                "DATABASE_MIN_CONNECTIONS ({}) exceeds DATABASE_MAX_CONNECTIONS ({})",
                config.min_connections, config.max_connections
            )));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_takes_precedence() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/testdb")),
                ("POSTGRES_HOST", Some("ignored")),
            ],
            || {
                let config = DatabaseConfig::from_env().unwrap();
                assert_eq!(config.url, "postgres://localhost/testdb");
            },
        );
    }

    #[test]
    fn test_database_url_from_parts() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", None),
                ("POSTGRES_HOST", Some("db")),
                ("POSTGRES_PORT", Some("6543")),
                ("POSTGRES_DB", Some("catalog")),
                ("POSTGRES_USER", Some("svc")),
                ("POSTGRES_PASSWORD", Some("secret")),
            ],
            || {
                let config = DatabaseConfig::from_env().unwrap();
                assert_eq!(config.url, "postgresql://svc:secret@db:6543/catalog");
                assert_eq!(config.max_connections, 10);
                assert_eq!(config.min_connections, 5);
            },
        );
    }

    #[test]
    fn test_database_pool_bounds_validated() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/testdb")),
                ("DATABASE_MIN_CONNECTIONS", Some("20")),
                ("DATABASE_MAX_CONNECTIONS", Some("4")),
            ],
            || {
                let err = DatabaseConfig::from_env().unwrap_err();
                assert!(matches!(err, ConfigError::Invalid(_)));
            },
        );
    }
}
