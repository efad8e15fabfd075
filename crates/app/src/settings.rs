//! Handles settings for the application.
//!
//! Values come from an optional TOML file (`settings.toml` by default) and
//! are overridden by `WALLETBOOK__<SECTION>__<KEY>` environment variables,
//! e.g. `WALLETBOOK__SERVER__PORT=8080`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level for the walletbook crates (`error` ... `trace`).
    pub level: String,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new(file: &str) -> Result<Self, ConfigError> {
        Self::from_config(
            Config::builder()
                .add_source(File::with_name(file).required(false))
                .add_source(
                    Environment::with_prefix("WALLETBOOK")
                        .prefix_separator("__")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn from_config(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .set_default("app.level", "info")?
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.database", "memory")?
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn defaults_apply_without_sources() {
        let settings = Settings::from_config(Config::builder()).unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.bind, "127.0.0.1");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.database, Database::Memory);
    }

    #[test]
    fn file_overrides_defaults() {
        let toml = r#"
            [app]
            level = "debug"

            [server]
            port = 8080
            database = { sqlite = "walletbook.db" }
        "#;
        let settings =
            Settings::from_config(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
                .unwrap();
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(
            settings.server.database,
            Database::Sqlite("walletbook.db".to_string())
        );
    }
}
