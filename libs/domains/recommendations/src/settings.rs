use core_config::{ConfigError, FromEnv, env_parse};

/// Batch sizing and discovery limits for the sync engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    /// Used when a caller does not name a batch size
    pub default_batch_size: usize,
    /// Upper bound accepted by `run_sync`
    pub max_batch_size: usize,
    /// Stale rows picked up per non-forced run
    pub discovery_limit: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            default_batch_size: 100,
            max_batch_size: 1000,
            discovery_limit: 100,
        }
    }
}

impl SyncSettings {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.default_batch_size == 0 || self.default_batch_size > self.max_batch_size {
            return Err(ConfigError::Invalid(format!(
                "DEFAULT_BATCH_SIZE must be between 1 and MAX_BATCH_SIZE ({}), got {}",
                self.max_batch_size, self.default_batch_size
            )));
        }
        if self.discovery_limit == 0 {
            return Err(ConfigError::Invalid(
                "SYNC_DISCOVERY_LIMIT must be greater than zero".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn accepts(&self, batch_size: usize) -> bool {
        (1..=self.max_batch_size).contains(&batch_size)
    }
}

impl FromEnv for SyncSettings {
    /// - DEFAULT_BATCH_SIZE: defaults to 100
    /// - MAX_BATCH_SIZE: defaults to 1000
    /// - SYNC_DISCOVERY_LIMIT: defaults to 100
    fn from_env() -> Result<Self, ConfigError> {
        Self {
            default_batch_size: env_parse("DEFAULT_BATCH_SIZE", 100usize)?,
            max_batch_size: env_parse("MAX_BATCH_SIZE", 1000usize)?,
            discovery_limit: env_parse("SYNC_DISCOVERY_LIMIT", 100u64)?,
        }
        .validate()
    }
}
