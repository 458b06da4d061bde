use serde::Deserialize;
use service_core::config::{self as core_config, get_env, is_prod, MongoConfig, StoreBackend};
use service_core::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct CounterConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub store: StoreBackend,
}

impl CounterConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;
        let is_prod = is_prod();

        Ok(CounterConfig {
            common: common_config,
            mongodb: MongoConfig {
                // Checked when the store is built; the memory backend needs no URI.
                uri: get_env("MONGODB_URI", Some(""), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("counter_db"), is_prod)?,
            },
            store: get_env("STORE_BACKEND", Some("mongo"), is_prod)?
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
        })
    }
}
