//! Application configuration
//!
//! Centralized configuration management using the `config` crate.
//! Values can be loaded from config files and environment variables;
//! everything is constructed explicitly at startup and injected into
//! the services that need it.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub booking: BookingConfig,
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

/// Database configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Idle connection timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

/// Authentication configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,

    /// JWT token expiration in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration_secs: i64,
}

fn default_jwt_expiration() -> i64 {
    86400 // 24 hours
}

/// Booking-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BookingConfig {
    /// Platform service fee rate applied to the base price (0.10 = 10%)
    #[serde(default = "default_fee_rate")]
    pub fee_rate: f64,

    /// Bounded retries for transient admission contention
    #[serde(default = "default_admission_retries")]
    pub admission_max_retries: u32,

    /// Interval between completion sweeps in seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_fee_rate() -> f64 {
    0.10
}

fn default_admission_retries() -> u32 {
    2
}

fn default_sweep_interval() -> u64 {
    300
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.idle_timeout_secs", 600)?
            .set_default("auth.jwt_expiration_secs", 86400)?
            .set_default("booking.fee_rate", 0.10)?
            .set_default("booking.admission_max_retries", 2)?
            .set_default("booking.sweep_interval_secs", 300)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with NIDO_ prefix
            .add_source(
                Environment::with_prefix("NIDO")
                    .separator("__")
                    .try_parsing(true),
            )
            // Support plain environment variables (DATABASE_URL, etc.)
            .add_source(Environment::default().try_parsing(true))
            .build()?;

        config.try_deserialize()
    }

    /// Get the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            fee_rate: 0.10,
            admission_max_retries: 2,
            sweep_interval_secs: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_booking_config() {
        let config = BookingConfig::default();
        assert_eq!(config.fee_rate, 0.10);
        assert_eq!(config.admission_max_retries, 2);
        assert_eq!(config.sweep_interval_secs, 300);
    }

    #[test]
    fn test_server_addr() {
        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 9000,
                workers: 2,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/nido".to_string(),
                max_connections: 5,
                acquire_timeout_secs: 30,
                idle_timeout_secs: 600,
            },
            auth: AuthConfig {
                jwt_secret: "secret".to_string(),
                jwt_expiration_secs: 3600,
            },
            booking: BookingConfig::default(),
        };

        assert_eq!(config.server_addr(), "127.0.0.1:9000");
    }
}
