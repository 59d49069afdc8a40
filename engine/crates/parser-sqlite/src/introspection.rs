mod columns;
mod foreign_keys;
mod tables;

use sqlite_connector_types::{database_definition::DatabaseDefinition, transport::Transport};
use sqlite_graphql_config::DatabaseConfig;

/// Introspects a SQLite database into a definition with the GraphQL names assigned.
///
/// Run it over a single connection: every step must see the same schema.
pub(crate) async fn introspect<T>(
    transport: &T,
    name: &str,
    config: Option<&DatabaseConfig>,
) -> sqlite_connector_types::Result<DatabaseDefinition>
where
    T: Transport + Sync,
{
    let mut database_definition = DatabaseDefinition::new(name);

    // order matters
    tables::introspect(transport, &mut database_definition, config).await?;
    columns::introspect(transport, &mut database_definition, config).await?;
    foreign_keys::introspect(transport, &mut database_definition).await?;

    database_definition.finalize();

    tracing::debug!(
        database = name,
        tables = database_definition.tables().len(),
        "introspection done"
    );

    Ok(database_definition)
}
