#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no database named {0}")]
    UnknownDatabase(String),
    #[error("no databases are served")]
    NoDatabases,
    #[error(transparent)]
    Config(#[from] sqlite_graphql_config::ConfigError),
    #[error(transparent)]
    Transport(#[from] sqlite_connector_types::Error),
    #[error("could not build the schema: {0}")]
    Schema(String),
}

impl From<async_graphql::dynamic::SchemaError> for Error {
    fn from(error: async_graphql::dynamic::SchemaError) -> Self {
        Self::Schema(error.to_string())
    }
}
