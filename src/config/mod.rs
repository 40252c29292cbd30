//! Configuration module for the crawler service.
//!
//! Provides YAML-based configuration loading and validation for:
//! - Server settings (port, bind address)
//! - Database settings (host, credentials, pool tuning)

mod app;
mod validation;

pub use app::{AppConfig, DatabaseSettings, ServerConfig};
pub use validation::{expand_env_vars, ConfigError};

// Re-export constants
pub use app::{DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_DB_PORT, DEFAULT_POOL_SIZE};
