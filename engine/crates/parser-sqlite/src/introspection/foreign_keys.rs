use serde::Deserialize;
use sqlite_connector_types::{
    database_definition::{DatabaseDefinition, ForeignKey, PrimaryKey, ReferencedColumn, ROWID},
    transport::{Transport, TransportExt},
};

#[derive(Debug, Deserialize)]
struct Row {
    table_name: String,
    constraint_id: i64,
    column_name: String,
    referenced_table: String,
    referenced_column: Option<String>,
}

/// Reads every foreign key of the database in one query. Only single-column keys
/// are kept; keys pointing to tables or columns we do not know are skipped.
pub(super) async fn introspect<T>(
    transport: &T,
    database_definition: &mut DatabaseDefinition,
) -> sqlite_connector_types::Result<()>
where
    T: Transport + Sync,
{
    let query = include_str!("queries/foreign_keys.sql");
    let rows = transport.collect_query::<Row>(query, Vec::new()).await?;

    let constraints = rows.chunk_by(|a, b| a.table_name == b.table_name && a.constraint_id == b.constraint_id);

    for constraint in constraints {
        let [row] = constraint else {
            tracing::debug!(table = %constraint[0].table_name, "skipping a compound foreign key");
            continue;
        };

        match resolve(database_definition, row) {
            Some(foreign_key) => {
                database_definition.push_foreign_key(foreign_key);
            }
            None => tracing::warn!(
                table = %row.table_name,
                column = %row.column_name,
                referenced_table = %row.referenced_table,
                "skipping a dangling foreign key"
            ),
        }
    }

    Ok(())
}

fn resolve(database_definition: &DatabaseDefinition, row: &Row) -> Option<ForeignKey> {
    let table_id = database_definition.get_table_id(&row.table_name)?;
    let column_id = database_definition.get_table_column_id(table_id, &row.column_name)?;
    let referenced_table_id = database_definition.get_table_id(&row.referenced_table)?;

    let referenced_column = match row.referenced_column.as_deref() {
        Some(name) => match database_definition.get_table_column_id(referenced_table_id, name) {
            Some(id) => ReferencedColumn::Column(id),
            None if name.eq_ignore_ascii_case(ROWID) => ReferencedColumn::Rowid,
            None => return None,
        },
        // No column given: the key points to the primary key of the other table.
        None => match database_definition.walk(referenced_table_id).primary_key()? {
            PrimaryKey::Rowid => ReferencedColumn::Rowid,
            PrimaryKey::Columns(columns) => match columns.as_slice() {
                [column] => ReferencedColumn::Column(column.id()),
                _ => return None,
            },
        },
    };

    Some(ForeignKey::new(table_id, column_id, referenced_table_id, referenced_column))
}
