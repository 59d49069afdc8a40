mod database;
mod log;

use std::{collections::BTreeMap, path::Path, str::FromStr};

pub use database::{DatabaseConfig, TableConfig};
pub use log::LogLevel;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read configuration from {path}: {message}")]
    Read { path: String, message: String },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("database {0} is configured but not connected")]
    UnknownDatabase(String),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Configuration of the generated GraphQL APIs.
pub struct Config {
    /// Maximum time one request may spend resolving, in milliseconds. Zero disables the check.
    pub time_limit_ms: u64,
    /// Maximum number of table fetches in one request. Zero disables the check.
    pub num_queries_limit: u64,
    /// Page size of collection fields without `first`
    pub default_page_size: u64,
    /// The largest accepted `first`
    pub max_page_size: u64,
    /// Accept raw SQL predicates in the `where` argument
    pub allow_raw_where: bool,
    /// Expose field and argument names in camelCase
    pub auto_camelcase: bool,
    /// Default log level, overridden by the command line
    pub log_level: Option<LogLevel>,
    /// Per-database settings, keyed by the database name
    pub databases: BTreeMap<String, DatabaseConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_limit_ms: 1000,
            num_queries_limit: 100,
            default_page_size: 10,
            max_page_size: 1000,
            allow_raw_where: true,
            auto_camelcase: false,
            log_level: None,
            databases: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.display().to_string(),
            message: error.to_string(),
        })?;

        input.parse()
    }

    /// Checks the settings against the connected databases. Run once at startup.
    pub fn validate<'a>(&self, connected: impl IntoIterator<Item = &'a str>) -> Result<(), ConfigError> {
        if self.default_page_size == 0 {
            return Err(ConfigError::Zero("default_page_size"));
        }

        if self.max_page_size == 0 {
            return Err(ConfigError::Zero("max_page_size"));
        }

        let connected = connected.into_iter().collect::<Vec<_>>();

        match self.databases.keys().find(|name| !connected.contains(&name.as_str())) {
            Some(name) => Err(ConfigError::UnknownDatabase(name.clone())),
            None => Ok(()),
        }
    }

    pub fn database(&self, name: &str) -> Option<&DatabaseConfig> {
        self.databases.get(name)
    }

    /// The settings of a table, if any.
    pub fn table(&self, database: &str, table: &str) -> Option<&TableConfig> {
        self.database(database).and_then(|database| database.table(table))
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}
