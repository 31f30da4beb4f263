//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/chargehub/config.toml`,
//! overridable via the `CHARGEHUB_CONFIG` environment variable). Every
//! section falls back to sane defaults so the service can boot without a
//! config file at all.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
    pub admin: AdminConfig,
    pub booking: BookingPolicyConfig,
}

/// REST API server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// SQLite database file path
    pub path: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: "./chargehub.db".to_string(),
        }
    }
}

impl DatabaseSection {
    /// Full SeaORM connection URL
    pub fn connection_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path)
    }
}

/// Security settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "super-secret-key-change-in-production".to_string()),
            jwt_expiration_hours: 24,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Tracing filter, e.g. "info" or "chargehub=debug,info"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Bootstrap admin account created on first start
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            name: "Administrator".to_string(),
            email: "admin@chargehub.local".to_string(),
            password: "change-me-now".to_string(),
            phone: "+0000000000".to_string(),
        }
    }
}

/// Booking policy knobs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookingPolicyConfig {
    /// Minimum minutes before slot start below which cancellation is refused
    pub cancellation_cutoff_minutes: i64,
    /// How many overlapping bookings a station accepts for the same window.
    /// The source marketplace treats a station as one bookable slot; raising
    /// this enables per-port capacity.
    pub slot_capacity: u32,
}

impl Default for BookingPolicyConfig {
    fn default() -> Self {
        Self {
            cancellation_cutoff_minutes: 60,
            slot_capacity: 1,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&raw).map_err(ConfigError::Parse)
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[source] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Default config file location (`~/.config/chargehub/config.toml`)
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chargehub")
        .join("config.toml")
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.api_port, 8080);
        assert_eq!(cfg.booking.cancellation_cutoff_minutes, 60);
        assert_eq!(cfg.booking.slot_capacity, 1);
        assert!(cfg.database.connection_url().starts_with("sqlite://"));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            api_port = 9999

            [booking]
            slot_capacity = 4
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.api_port, 9999);
        assert_eq!(cfg.server.api_host, "0.0.0.0");
        assert_eq!(cfg.booking.slot_capacity, 4);
        assert_eq!(cfg.booking.cancellation_cutoff_minutes, 60);
    }
}
