//! Server configuration management.
//!
//! Table settings come from three layers: an optional JSON file, then
//! environment variables (including a `.env` file), then command-line
//! flags. Later layers win.

use blackjack::{TableConfig, entities::Chips};
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    str::FromStr,
};

pub const DEFAULT_BIND: &str = "0.0.0.0:6000";

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Rules and stakes for the table
    pub table: TableConfig,
}

/// Values given on the command line. These beat the environment.
#[derive(Debug, Default)]
pub struct Overrides {
    pub bind: Option<SocketAddr>,
    pub starting_chips: Option<Chips>,
    pub num_decks: Option<usize>,
    pub dealer_stands_on: Option<u8>,
    pub min_players: Option<usize>,
    pub reshuffle_threshold: Option<usize>,
    pub table_config: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns error if a variable doesn't parse, the table config file
    /// can't be read, or the resulting table settings are invalid
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        Self::load(overrides, |key| std::env::var(key).ok())
    }

    fn load(
        overrides: Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut table = match &overrides.table_config {
            Some(path) => read_table_config(path)?,
            None => TableConfig::default(),
        };

        table.starting_chips =
            layered(overrides.starting_chips, &env, "STARTING_CHIPS", table.starting_chips)?;
        table.num_decks = layered(overrides.num_decks, &env, "NUM_DECKS", table.num_decks)?;
        table.dealer_stands_on = layered(
            overrides.dealer_stands_on,
            &env,
            "DEALER_STANDS_ON",
            table.dealer_stands_on,
        )?;
        table.min_players = layered(overrides.min_players, &env, "MIN_PLAYERS", table.min_players)?;
        table.reshuffle_threshold = layered(
            overrides.reshuffle_threshold,
            &env,
            "RESHUFFLE_THRESHOLD",
            table.reshuffle_threshold,
        )?;

        let default_bind = SocketAddr::from_str(DEFAULT_BIND).map_err(|e| ConfigError::Invalid {
            var: "SERVER_BIND".to_string(),
            reason: e.to_string(),
        })?;
        let bind = layered(overrides.bind, &env, "SERVER_BIND", default_bind)?;

        let config = Self { bind, table };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.table.validate().map_err(ConfigError::Table)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error("Couldn't read table config {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Couldn't parse table config {path}: {reason}")]
    ParseFile { path: String, reason: String },

    #[error("Invalid table configuration: {0}")]
    Table(String),
}

fn read_table_config(path: &Path) -> Result<TableConfig, ConfigError> {
    let display = path.display().to_string();
    let json = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: display.clone(),
        source,
    })?;
    TableConfig::from_json(&json).map_err(|e| ConfigError::ParseFile {
        path: display,
        reason: e.to_string(),
    })
}

/// Flag if given, else the environment variable if set, else `current`.
fn layered<T>(
    flag: Option<T>,
    env: impl Fn(&str) -> Option<String>,
    key: &str,
    current: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(value) = flag {
        return Ok(value);
    }
    parse_env_or(env, key, current)
}

/// Helper to parse environment variable with default fallback. A set
/// but unparsable variable is an error rather than silently ignored.
fn parse_env_or<T>(env: impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("{raw:?}: {e}"),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::load(Overrides::default(), env_from(&[])).unwrap();
        assert_eq!(config.bind, DEFAULT_BIND.parse().unwrap());
        assert_eq!(config.table, TableConfig::default());
    }

    #[test]
    fn test_env_overrides_defaults() {
        let env = env_from(&[
            ("SERVER_BIND", "127.0.0.1:7000"),
            ("STARTING_CHIPS", "500"),
            ("NUM_DECKS", "2"),
            ("MIN_PLAYERS", "1"),
        ]);
        let config = ServerConfig::load(Overrides::default(), env).unwrap();
        assert_eq!(config.bind, "127.0.0.1:7000".parse().unwrap());
        assert_eq!(config.table.starting_chips, 500);
        assert_eq!(config.table.num_decks, 2);
        assert_eq!(config.table.min_players, 1);
        assert_eq!(config.table.dealer_stands_on, 17);
    }

    #[test]
    fn test_flags_override_env() {
        let env = env_from(&[("STARTING_CHIPS", "500"), ("DEALER_STANDS_ON", "16")]);
        let overrides = Overrides {
            starting_chips: Some(1000),
            ..Overrides::default()
        };
        let config = ServerConfig::load(overrides, env).unwrap();
        assert_eq!(config.table.starting_chips, 1000);
        assert_eq!(config.table.dealer_stands_on, 16);
    }

    #[test]
    fn test_unparsable_env_is_an_error() {
        let env = env_from(&[("NUM_DECKS", "lots")]);
        let err = ServerConfig::load(Overrides::default(), env).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "NUM_DECKS"));
        assert!(err.to_string().contains("NUM_DECKS"));
    }

    #[test]
    fn test_invalid_table_is_rejected() {
        let env = env_from(&[("STARTING_CHIPS", "0")]);
        let err = ServerConfig::load(Overrides::default(), env).unwrap_err();
        assert!(matches!(err, ConfigError::Table(_)));
    }

    #[test]
    fn test_table_config_file_is_layered_under_env() {
        let path = std::env::temp_dir().join(format!("bj_table_{}.json", std::process::id()));
        fs::write(&path, r#"{"starting_chips": 50, "num_decks": 4}"#).unwrap();

        let overrides = Overrides {
            table_config: Some(path.clone()),
            ..Overrides::default()
        };
        let config = ServerConfig::load(overrides, env_from(&[("NUM_DECKS", "6")])).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.table.starting_chips, 50);
        assert_eq!(config.table.num_decks, 6);
        assert_eq!(config.table.reshuffle_threshold, 52);
    }

    #[test]
    fn test_missing_table_config_file() {
        let overrides = Overrides {
            table_config: Some(PathBuf::from("/nonexistent/table.json")),
            ..Overrides::default()
        };
        let err = ServerConfig::load(overrides, env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
