//! The data-driven type graph of one database. Every table gets a node type, a
//! filter input, a pair of sort enums, an edge and a collection type, and two
//! root fields. The schema builder registers these with the GraphQL engine.

mod context;
mod example_query;
mod meta;
mod queries;
mod resolvers;
mod types;

use std::collections::HashMap;

use indexmap::IndexMap;
use sqlite_connector_types::database_definition::{
    DatabaseDefinition, TableColumnId, TableColumnWalker, TableId, TableWalker,
};
use sqlite_graphql_config::Config;

pub use self::{
    context::ArgumentNames,
    meta::{
        CustomScalar, EnumType, InputObjectType, MetaField, MetaInputValue, MetaType, ObjectType, ScalarType,
    },
    resolvers::{
        CollectionField, EdgeField, FetchMode, KeyArgument, PageInfoField, Resolver, TableResolver,
    },
};

use self::context::{InputContext, OutputContext};

/// The generated names of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableTypes {
    pub node: String,
    pub collection: String,
    pub edge: String,
    pub filter: String,
    /// Missing when no column can be an enum value.
    pub sort: Option<String>,
    pub sort_desc: Option<String>,
    /// The root collection field.
    pub collection_field: String,
    /// The root single row field.
    pub row_field: String,
    pub example_query: String,
}

#[derive(Debug, Clone)]
pub struct Registry {
    pub query_type: ObjectType,
    /// Every type but the root type, in registration order.
    pub types: IndexMap<String, MetaType>,
    pub arguments: ArgumentNames,
    database_definition: DatabaseDefinition,
    table_types: IndexMap<TableId, TableTypes>,
    field_mapping: HashMap<(TableId, String), TableColumnId>,
}

impl Registry {
    pub fn database_definition(&self) -> &DatabaseDefinition {
        &self.database_definition
    }

    /// The generated names of a table, `None` for hidden tables.
    pub fn table_types(&self, table_id: TableId) -> Option<&TableTypes> {
        self.table_types.get(&table_id)
    }

    /// Tables exposed in the schema with their generated names.
    pub fn exposed_tables(&self) -> impl Iterator<Item = (TableWalker<'_>, &TableTypes)> + '_ {
        self.table_types
            .iter()
            .map(|(table_id, types)| (self.database_definition.walk(*table_id), types))
    }

    /// The column behind a node or filter field of a table.
    pub fn column_for_field(&self, table_id: TableId, field_name: &str) -> Option<TableColumnWalker<'_>> {
        self.field_mapping
            .get(&(table_id, field_name.to_string()))
            .map(|column_id| self.database_definition.walk(*column_id))
    }

    /// The example query of a table, by its name in the database.
    pub fn example_query(&self, table_name: &str) -> Option<&str> {
        let table = self.database_definition.find_table(table_name)?;

        self.table_types(table.id())
            .map(|types| types.example_query.as_str())
    }
}

pub(crate) fn generate(database_definition: DatabaseDefinition, config: &Config) -> Registry {
    let input_ctx = InputContext::new(database_definition, config);
    let mut output_ctx = OutputContext::new(&input_ctx);

    types::scalar::register(&mut output_ctx);
    types::page_info::register(&mut output_ctx);

    // Reverse relations take the arguments of the other table, so all of them
    // must exist before the node types.
    let collection_arguments = input_ctx
        .exposed_tables()
        .map(|table| (table.id(), types::table::register_inputs(&input_ctx, table, &mut output_ctx)))
        .collect::<HashMap<_, _>>();

    for table in input_ctx.exposed_tables() {
        types::table::register_outputs(&input_ctx, table, &collection_arguments, &mut output_ctx);
    }

    for table in input_ctx.exposed_tables() {
        let Some(arguments) = collection_arguments.get(&table.id()) else {
            continue;
        };

        let collection_field = queries::collection::register(&input_ctx, table, arguments, &mut output_ctx);
        let row_field = queries::row::register(&input_ctx, table, arguments, &mut output_ctx);
        let example_query = example_query::render(&input_ctx, table, &collection_field);

        let table_types = TableTypes {
            node: input_ctx.type_name(table).to_string(),
            collection: input_ctx.collection_type_name(table),
            edge: input_ctx.edge_type_name(table),
            filter: input_ctx.filter_type_name(table),
            sort: arguments.sort.clone(),
            sort_desc: arguments.sort_desc.clone(),
            collection_field,
            row_field,
            example_query,
        };

        output_ctx.push_table_types(table.id(), table_types);
    }

    output_ctx.finalize(input_ctx)
}
