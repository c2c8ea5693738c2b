//! Application settings.
//!
//! Read from an optional `settings.toml` in the working directory, then
//! overridden by `TALLY__*` environment variables, where `__` also separates
//! nested keys (e.g. `TALLY__TELEGRAM__TOKEN`, `TALLY__DATABASE__SQLITE`).

use config::{Config, ConfigError, Environment, File, FileFormat, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

/// Where the ledger lives.
///
/// ```toml
/// database = "memory"
/// # or
/// database = { sqlite = "tally.db" }
/// ```
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    #[default]
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Telegram {
    pub token: String,
    /// Telegram user ids allowed to talk to the bot; empty allows everyone.
    #[serde(default)]
    pub allowed_users: Vec<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    #[serde(default)]
    pub database: Database,
    pub telegram: Option<Telegram>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(
            Config::builder()
                .add_source(
                    File::with_name("settings")
                        .format(FileFormat::Toml)
                        .required(false),
                )
                .add_source(
                    Environment::with_prefix("TALLY")
                        .prefix_separator("__")
                        .separator("__")
                        .list_separator(",")
                        .with_list_parse_key("telegram.allowed_users")
                        .try_parsing(true),
                ),
        )
    }

    fn load(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .set_default("app.level", "info")?
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        Settings::load(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn defaults_to_memory_without_telegram() {
        let settings = from_toml("").unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.database, Database::Memory);
        assert!(settings.telegram.is_none());
    }

    #[test]
    fn reads_sqlite_and_telegram() {
        let settings = from_toml(
            r#"
            database = { sqlite = "tally.db" }

            [app]
            level = "debug"

            [telegram]
            token = "123:abc"
            allowed_users = [42, 7]
            "#,
        )
        .unwrap();
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.database, Database::Sqlite("tally.db".to_string()));
        let telegram = settings.telegram.unwrap();
        assert_eq!(telegram.token, "123:abc");
        assert_eq!(telegram.allowed_users, [42, 7]);
    }

    #[test]
    fn telegram_token_is_required() {
        assert!(from_toml("[telegram]\nallowed_users = [1]").is_err());
    }
}
