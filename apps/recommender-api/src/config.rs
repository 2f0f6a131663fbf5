use core_config::{
    ConfigError, FromEnv, database::DatabaseConfig, env_flag, env_required, server::ServerConfig,
};
use domain_recommendations::SyncSettings;
use domain_vector::{OpenAIConfig, QdrantConfig};

pub use core_config::Environment;

/// Token accepted on admin routes when none is configured outside production
pub const DEV_ADMIN_TOKEN: &str = "dev-admin-token";

/// Application configuration composed from the shared config components
#[derive(Clone)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub qdrant: QdrantConfig,
    pub openai: OpenAIConfig,
    pub sync: SyncSettings,
    pub admin_token: String,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let admin_token = admin_token(&environment)?;

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            qdrant: QdrantConfig::from_env()?,
            openai: OpenAIConfig::from_env()?, // Required - OPENAI_API_KEY
            sync: SyncSettings::from_env()?,
            run_migrations: env_flag("RUN_MIGRATIONS"),
            admin_token,
            environment,
        })
    }

    pub fn uses_dev_admin_token(&self) -> bool {
        self.admin_token == DEV_ADMIN_TOKEN
    }
}

/// ADMIN_BEARER_TOKEN: required in production
fn admin_token(environment: &Environment) -> Result<String, ConfigError> {
    match env_required("ADMIN_BEARER_TOKEN") {
        Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ if environment.is_production() => Err(ConfigError::MissingEnvVar(
            "ADMIN_BEARER_TOKEN".to_string(),
        )),
        _ => Ok(DEV_ADMIN_TOKEN.to_string()),
    }
}
