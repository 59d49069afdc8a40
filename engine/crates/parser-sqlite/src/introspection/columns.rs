use serde::Deserialize;
use sqlite_connector_types::{
    database_definition::{DatabaseDefinition, TableColumn},
    transport::{Transport, TransportExt},
};
use sqlite_graphql_config::DatabaseConfig;

#[derive(Debug, Deserialize)]
struct Row {
    table_name: String,
    position: i64,
    column_name: String,
    declared_type: Option<String>,
    primary_key_position: i64,
}

pub(super) async fn introspect<T>(
    transport: &T,
    database_definition: &mut DatabaseDefinition,
    config: Option<&DatabaseConfig>,
) -> sqlite_connector_types::Result<()>
where
    T: Transport + Sync,
{
    let query = include_str!("queries/columns.sql");

    let rows = match transport.collect_query::<Row>(query, Vec::new()).await {
        Ok(rows) => rows,
        Err(error) => {
            // A view over a dropped table fails the whole join.
            tracing::warn!(%error, "could not introspect all columns at once, continuing table by table");
            introspect_table_by_table(transport, database_definition).await
        }
    };

    let mut rows = rows
        .into_iter()
        .filter_map(|row| Some((database_definition.get_table_id(&row.table_name)?, row)))
        .collect::<Vec<_>>();

    rows.sort_by_key(|(table_id, row)| (*table_id, row.position));

    for (table_id, row) in rows {
        let is_json = config
            .and_then(|config| config.table(&row.table_name))
            .is_some_and(|table| table.is_json_column(&row.column_name));

        let mut column = TableColumn::new(table_id, row.column_name, row.declared_type.unwrap_or_default());

        if row.primary_key_position > 0 {
            column.set_primary_key_position(row.primary_key_position as u32);
        }

        column.set_json(is_json);

        database_definition.push_table_column(column);
    }

    Ok(())
}

async fn introspect_table_by_table<T>(transport: &T, database_definition: &DatabaseDefinition) -> Vec<Row>
where
    T: Transport + Sync,
{
    let query = include_str!("queries/table_columns.sql");

    let names = database_definition
        .tables()
        .map(|table| table.database_name().to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();

    for name in names {
        match transport.collect_query::<Row>(query, vec![name.clone().into()]).await {
            Ok(table_rows) => rows.extend(table_rows),
            Err(error) => tracing::warn!(%error, table = %name, "skipping the columns of a table"),
        }
    }

    rows
}
