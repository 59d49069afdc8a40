//! Turns a SQLite database into a GraphQL type graph: the database is introspected
//! into a [`DatabaseDefinition`], which is then rendered into a [`Registry`] of
//! types, root fields and resolver descriptors.

mod introspection;
pub mod registry;

pub use registry::Registry;

use sqlite_connector_types::{database_definition::DatabaseDefinition, transport::Transport, Result};
use sqlite_graphql_config::Config;

/// Introspects the database served as `name` and generates its registry.
pub async fn introspect<T>(transport: &T, name: &str, config: &Config) -> Result<Registry>
where
    T: Transport + Sync,
{
    let database_definition = introspect_definition(transport, name, config).await?;
    let registry = registry::generate(database_definition, config);

    Ok(registry)
}

/// Only the introspection step, without generating the types.
pub async fn introspect_definition<T>(transport: &T, name: &str, config: &Config) -> Result<DatabaseDefinition>
where
    T: Transport + Sync,
{
    introspection::introspect(transport, name, config.database(name)).await
}
