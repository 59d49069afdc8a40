//! Resolution of the generated fields. Every field of the schema carries a
//! [`FieldResolver`]: the resolver descriptor of the registry together with the
//! database it reads from.

use std::sync::Arc;

use async_graphql::{
    dynamic::{indexmap::IndexMap, FieldValue, ResolverContext},
    Name, Value as ConstValue,
};
use futures::TryStreamExt;
use graphql_cursor::GraphqlCursor;
use parser_sqlite::registry::{
    CollectionField, EdgeField, FetchMode, KeyArgument, PageInfoField, Registry, Resolver, TableResolver,
};
use serde_json::{Map, Value};
use sqlite_connector_types::{
    database_definition::{ForeignKeyId, TableId, TableWalker, ROWID},
    filter::FilterOperator,
    transport::Transport,
};

use crate::{
    budget::ExecutionBudget,
    fetch::{
        quote, value_to_string, EqualityConstraint, FetchedRow, FilterCondition, Sort, TableFetch, TableFetchParams,
    },
};

type Result<T> = std::result::Result<T, async_graphql::Error>;

/// A row of a table as the node fields see it: keyed by the GraphQL names of the
/// columns, plus `rowid` for tables without a declared primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRow {
    pub table_id: TableId,
    pub values: Map<String, Value>,
    pub cursor: Option<GraphqlCursor>,
}

impl NodeRow {
    pub(crate) fn new(table: TableWalker<'_>, row: FetchedRow) -> Self {
        let FetchedRow { mut values, cursor } = row;
        let mut node_values = Map::new();

        if table.uses_rowid() {
            // a column named rowid shadows the implicit one and reads the same value
            let rowid = values.get(ROWID).cloned().unwrap_or_default();
            node_values.insert(ROWID.to_string(), rowid);
        }

        for column in table.columns() {
            let value = values.remove(column.database_name()).unwrap_or_default();
            node_values.insert(column.client_name().to_string(), value);
        }

        Self {
            table_id: table.id(),
            values: node_values,
            cursor,
        }
    }
}

/// The value of a collection field.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionPage {
    pub rows: Vec<NodeRow>,
    pub next_cursor: Option<GraphqlCursor>,
    pub total_count: i64,
}

/// Everything the resolvers of one schema share.
pub(crate) struct DatabaseContext {
    pub(crate) name: String,
    pub(crate) registry: Arc<Registry>,
    pub(crate) fetch: Arc<dyn TableFetch>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) default_page_size: u64,
}

#[derive(Clone)]
pub(crate) struct FieldResolver {
    context: Arc<DatabaseContext>,
    resolver: Resolver,
}

impl FieldResolver {
    pub(crate) fn new(context: Arc<DatabaseContext>, resolver: Resolver) -> Self {
        Self { context, resolver }
    }

    pub(crate) async fn resolve<'a>(&self, ctx: ResolverContext<'a>) -> Result<Option<FieldValue<'a>>> {
        let parent = ctx.parent_value;

        match &self.resolver {
            Resolver::Select { key } => {
                let row = parent.try_downcast_ref::<NodeRow>()?;

                match row.values.get(key) {
                    None | Some(Value::Null) => Ok(None),
                    Some(value) => Ok(Some(FieldValue::value(ConstValue::from_json(value.clone())?))),
                }
            }
            Resolver::Json { key } => {
                let row = parent.try_downcast_ref::<NodeRow>()?;

                let value = match row.values.get(key) {
                    None | Some(Value::Null) => return Ok(None),
                    Some(Value::String(text)) => serde_json::from_str(text)
                        .map_err(|error| format!("the {key} column does not hold valid JSON: {error}"))?,
                    Some(value) => value.clone(),
                };

                Ok(Some(FieldValue::value(ConstValue::from_json(value)?)))
            }
            Resolver::ForeignKey(foreign_key_id) => self.resolve_foreign_key(parent, *foreign_key_id).await,
            Resolver::Table(resolver) => self.resolve_table(&ctx, resolver).await,
            Resolver::Collection(field) => {
                let page = parent.try_downcast_ref::<CollectionPage>()?;

                let value = match field {
                    CollectionField::TotalCount => FieldValue::value(page.total_count),
                    CollectionField::PageInfo => FieldValue::borrowed_any(page),
                    CollectionField::Nodes | CollectionField::Edges => {
                        FieldValue::list(page.rows.iter().map(|row| FieldValue::borrowed_any(row)))
                    }
                };

                Ok(Some(value))
            }
            Resolver::Edge(field) => {
                let row = parent.try_downcast_ref::<NodeRow>()?;

                match field {
                    EdgeField::Cursor => Ok(row.cursor.as_ref().map(|cursor| FieldValue::value(cursor.to_string()))),
                    EdgeField::Node => Ok(Some(FieldValue::borrowed_any(row))),
                }
            }
            Resolver::PageInfo(field) => {
                let page = parent.try_downcast_ref::<CollectionPage>()?;

                match field {
                    PageInfoField::EndCursor => Ok(page
                        .next_cursor
                        .as_ref()
                        .map(|cursor| FieldValue::value(cursor.to_string()))),
                    PageInfoField::HasNextPage => Ok(Some(FieldValue::value(page.next_cursor.is_some()))),
                }
            }
        }
    }

    /// The row a foreign key of the parent row points to. A direct lookup outside
    /// of the budget, null when nothing matches.
    async fn resolve_foreign_key<'a>(
        &self,
        parent: &'a FieldValue<'a>,
        foreign_key_id: ForeignKeyId,
    ) -> Result<Option<FieldValue<'a>>> {
        let row = parent.try_downcast_ref::<NodeRow>()?;
        let foreign_key = self.context.registry.database_definition().walk(foreign_key_id);

        let value = match row.values.get(foreign_key.column().client_name()) {
            None | Some(Value::Null) => return Ok(None),
            Some(value) => value.clone(),
        };

        let table = foreign_key.referenced_table();
        let columns = if table.uses_rowid() { "rowid AS rowid, *" } else { "*" };

        let sql = format!(
            "SELECT {columns} FROM {} WHERE {} = ? LIMIT 1",
            quote(table.database_name()),
            quote(foreign_key.referenced_column_database_name()),
        );

        let found = self
            .context
            .transport
            .parameterized_query(&sql, vec![value])
            .try_next()
            .await?;

        let Some(Value::Object(values)) = found else {
            return Ok(None);
        };

        let row = NodeRow::new(table, FetchedRow { values, cursor: None });

        Ok(Some(FieldValue::owned_any(row)))
    }

    async fn resolve_table<'a>(
        &self,
        ctx: &ResolverContext<'a>,
        resolver: &TableResolver,
    ) -> Result<Option<FieldValue<'a>>> {
        let registry = &self.context.registry;
        let table = registry.database_definition().walk(resolver.table_id);

        let mut params = self.fetch_params(table, ctx.args.as_index_map(), &resolver.mode)?;

        if let Some(foreign_key_id) = resolver.related {
            let parent = ctx.parent_value.try_downcast_ref::<NodeRow>()?;
            let foreign_key = registry.database_definition().walk(foreign_key_id);

            let value = parent
                .values
                .get(foreign_key.referenced_column_client_name())
                .cloned()
                .unwrap_or_default();

            params.related = Some(EqualityConstraint {
                column: foreign_key.column().database_name().to_string(),
                value,
            });
        }

        let path = params.path(&self.context.name, table.database_name());

        if let Some(budget) = ctx.data_opt::<ExecutionBudget>() {
            budget.check(&path)?;
        }

        let page = self.context.fetch.fetch(table, &params).await?;

        let mut rows = page.rows.into_iter().map(|row| NodeRow::new(table, row));

        match resolver.mode {
            FetchMode::Collection => {
                let page = CollectionPage {
                    rows: rows.collect(),
                    next_cursor: page.next_cursor,
                    total_count: page.filtered_count,
                };

                Ok(Some(FieldValue::owned_any(page)))
            }
            FetchMode::Row { .. } => Ok(rows.next().map(FieldValue::owned_any)),
        }
    }

    /// Translates the collection arguments of a table field.
    fn fetch_params(
        &self,
        table: TableWalker<'_>,
        args: &IndexMap<Name, ConstValue>,
        mode: &FetchMode,
    ) -> Result<TableFetchParams> {
        let names = &self.context.registry.arguments;
        let argument = |name: &str| args.get(name).filter(|value| !matches!(value, ConstValue::Null));

        let filters = match argument(&names.filter) {
            Some(ConstValue::List(groups)) => groups
                .iter()
                .map(|group| self.filter_group(table, group))
                .collect::<Result<Vec<_>>>()?,
            Some(group) => vec![self.filter_group(table, group)?],
            None => Vec::new(),
        };

        let raw_where = match argument(&names.r#where) {
            Some(ConstValue::String(raw_where)) if !raw_where.trim().is_empty() => Some(raw_where.clone()),
            _ => None,
        };

        let sort_desc = sort_column(table, argument(&names.sort_desc))?.map(|column| Sort {
            column,
            descending: true,
        });

        let sort = sort_column(table, argument(&names.sort))?.map(|column| Sort {
            column,
            descending: false,
        });

        let search = match argument(&names.search) {
            Some(ConstValue::String(search)) if table.supports_full_text_search() && !search.trim().is_empty() => {
                Some(search.clone())
            }
            _ => None,
        };

        let after = match argument(&names.after) {
            Some(ConstValue::String(after)) if !after.is_empty() => Some(GraphqlCursor::from(after.as_str())),
            _ => None,
        };

        let mut params = TableFetchParams {
            filters,
            raw_where,
            sort: sort_desc.or(sort),
            search,
            page_size: self.context.default_page_size as i64,
            after,
            ..Default::default()
        };

        match mode {
            FetchMode::Collection => {
                if let Some(ConstValue::Number(first)) = argument(&names.first) {
                    params.page_size = first.as_i64().ok_or("first must be an integer")?;
                }
            }
            FetchMode::Row { keys } => {
                params.page_size = 1;
                params.key_constraints = self.key_constraints(keys, &argument)?;
            }
        }

        Ok(params)
    }

    fn filter_group(&self, table: TableWalker<'_>, group: &ConstValue) -> Result<Vec<FilterCondition>> {
        let ConstValue::Object(fields) = group else {
            return Ok(Vec::new());
        };

        let mut conditions = Vec::new();

        for (field, operations) in fields {
            let column = self
                .context
                .registry
                .column_for_field(table.id(), field.as_str())
                .ok_or_else(|| format!("{field} is not a column of {}", table.database_name()))?;

            let ConstValue::Object(operations) = operations else {
                continue;
            };

            for (operator, value) in operations {
                let value = match value {
                    ConstValue::Null => continue,
                    ConstValue::List(items) => {
                        let items = items
                            .iter()
                            .map(|item| -> Result<String> { Ok(value_to_string(&item.clone().into_json()?)) })
                            .collect::<Result<Vec<_>>>()?;

                        Value::String(items.join(","))
                    }
                    value => value.clone().into_json()?,
                };

                let operator = operator
                    .parse::<FilterOperator>()
                    .map_err(|_| format!("unknown filter operator {operator}"))?;

                conditions.push(FilterCondition {
                    column: column.database_name().to_string(),
                    operator,
                    value,
                });
            }
        }

        Ok(conditions)
    }

    fn key_constraints<'a>(
        &self,
        keys: &[KeyArgument],
        argument: &impl Fn(&str) -> Option<&'a ConstValue>,
    ) -> Result<Vec<EqualityConstraint>> {
        let definition = self.context.registry.database_definition();
        let mut constraints = Vec::new();

        for key in keys {
            let Some(value) = argument(&key.name) else {
                continue;
            };

            let column = key
                .column
                .map(|column_id| definition.walk(column_id).database_name())
                .unwrap_or(ROWID);

            constraints.push(EqualityConstraint {
                column: column.to_string(),
                value: value.clone().into_json()?,
            });
        }

        Ok(constraints)
    }
}

/// The database column behind a value of a sort enum.
fn sort_column(table: TableWalker<'_>, value: Option<&ConstValue>) -> Result<Option<String>> {
    let name = match value {
        Some(ConstValue::Enum(name)) => name.as_str(),
        Some(ConstValue::String(name)) => name.as_str(),
        _ => return Ok(None),
    };

    let column = table
        .find_column_for_client_name(name)
        .ok_or_else(|| format!("cannot sort {} by {name}", table.database_name()))?;

    Ok(Some(column.database_name().to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sqlite_connector_types::database_definition::{DatabaseDefinition, Table, TableColumn, TableKind};

    use super::*;

    #[test]
    fn node_rows_use_graphql_names() {
        let mut definition = DatabaseDefinition::new("test");
        let notes = definition.push_table(Table::new("notes".into(), TableKind::Table));
        definition.push_table_column(TableColumn::new(notes, "note body".into(), "TEXT".into()));
        definition.finalize();

        let table = definition.walk(notes);

        let values = json!({ "rowid": 7, "note body": "hello" });
        let Value::Object(values) = values else { unreachable!() };

        let row = NodeRow::new(
            table,
            FetchedRow {
                values,
                cursor: Some(GraphqlCursor::from_key(["7"])),
            },
        );

        assert_eq!(json!({ "rowid": 7, "note_body": "hello" }), Value::Object(row.values));
        assert_eq!(Some(GraphqlCursor::from_key(["7"])), row.cursor);
    }

    #[test]
    fn columns_named_rowid_keep_their_own_key() {
        let mut definition = DatabaseDefinition::new("test");
        let notes = definition.push_table(Table::new("notes".into(), TableKind::Table));
        definition.push_table_column(TableColumn::new(notes, "rowid".into(), "TEXT".into()));
        definition.push_table_column(TableColumn::new(notes, "body".into(), "TEXT".into()));
        definition.finalize();

        let values = json!({ "rowid": "r-1", "body": "hello" });
        let Value::Object(values) = values else { unreachable!() };

        let row = NodeRow::new(definition.walk(notes), FetchedRow { values, cursor: None });

        assert_eq!(
            json!({ "rowid": "r-1", "rowid_2": "r-1", "body": "hello" }),
            Value::Object(row.values)
        );
    }

    #[test]
    fn sorting_by_unknown_columns_fails() {
        let mut definition = DatabaseDefinition::new("test");
        let notes = definition.push_table(Table::new("notes".into(), TableKind::Table));
        definition.push_table_column(TableColumn::new(notes, "body".into(), "TEXT".into()));
        definition.finalize();

        let table = definition.walk(notes);

        let column = sort_column(table, Some(&ConstValue::Enum(Name::new("body")))).unwrap();
        assert_eq!(Some("body".to_string()), column);

        assert!(sort_column(table, Some(&ConstValue::Enum(Name::new("nope")))).is_err());
        assert_eq!(None, sort_column(table, None).unwrap());
    }
}
