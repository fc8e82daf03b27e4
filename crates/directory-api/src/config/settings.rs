use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub database: DatabaseConfig,
    pub seed: SeedConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_seconds: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SecurityConfig {
    pub api_key: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_max_size: u32,
    pub pool_timeout_seconds: u64,
    pub statement_timeout_ms: u64,
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_timeout_seconds)
    }

    pub fn statement_timeout(&self) -> Duration {
        Duration::from_millis(self.statement_timeout_ms)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SeedConfig {
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// "pretty" or "json"
    pub format: String,
    /// Daily rolling log files are written here when set
    pub directory: Option<String>,
}

impl Settings {
    /// Loads `config/settings.toml` (optional) overridden by `APP__*`
    /// environment variables, e.g. `APP__SECURITY__API_KEY`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Self::defaults()?
            .add_source(File::with_name("config/settings").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(config)
    }

    /// Every key except `security.api_key` and `database.url`, which have
    /// no sensible default.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.request_timeout_seconds", 30)?
            .set_default("database.pool_max_size", 10)?
            .set_default("database.pool_timeout_seconds", 5)?
            .set_default("database.statement_timeout_ms", 5000)?
            .set_default("database.run_migrations", true)?
            .set_default("seed.enabled", true)?
            .set_default("logging.format", "pretty")
    }

    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;

        if settings.security.api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "security.api_key must not be empty".to_string(),
            ));
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        let config = Settings::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Settings::from_config(config)
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let settings = from_toml(
            r#"
            [security]
            api_key = "secret"

            [database]
            url = "postgres://localhost/directory"
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.database.statement_timeout(), Duration::from_secs(5));
        assert!(settings.seed.enabled);
        assert_eq!(settings.logging.format, "pretty");
        assert!(settings.logging.directory.is_none());
    }

    #[test]
    fn test_missing_api_key_rejected() {
        assert!(from_toml(
            r#"
            [database]
            url = "postgres://localhost/directory"
            "#
        )
        .is_err());
    }

    #[test]
    fn test_blank_api_key_rejected() {
        assert!(from_toml(
            r#"
            [security]
            api_key = "   "

            [database]
            url = "postgres://localhost/directory"
            "#
        )
        .is_err());
    }
}
