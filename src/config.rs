use config::{ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub household: HouseholdConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

/// The acting member; authentication is handled elsewhere.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HouseholdConfig {
    pub self_id: String,
    pub self_name: String,
    pub self_email: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
    pub level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", 2)?
            .set_default("household.self_id", "me")?
            .set_default("household.self_name", "Me")?
            .set_default("household.self_email", "me@example.com")?
            .set_default("log.level", "info")?
            .add_source(File::with_name("config/default").required(false))
            // e.g. ROOMSPLIT__SERVER__PORT=9000
            .add_source(Environment::with_prefix("ROOMSPLIT").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be non-zero".to_string());
        }
        if self.server.workers == 0 {
            return Err("server.workers must be at least 1".to_string());
        }
        if self.household.self_id.trim().is_empty() {
            return Err("household.self_id must not be empty".to_string());
        }
        if self.household.self_name.trim().is_empty() {
            return Err("household.self_name must not be empty".to_string());
        }
        Ok(())
    }
}
