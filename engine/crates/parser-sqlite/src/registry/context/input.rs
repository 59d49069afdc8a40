use std::collections::HashMap;

use sqlite_connector_types::database_definition::{
    DatabaseDefinition, TableColumnId, TableColumnWalker, TableId, TableWalker,
};
use sqlite_graphql_config::Config;

use super::FieldNamer;

/// Names of the arguments of collection and single row fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentNames {
    pub filter: String,
    pub r#where: String,
    pub first: String,
    pub after: String,
    pub sort: String,
    pub sort_desc: String,
    pub search: String,
}

impl ArgumentNames {
    fn new(camelcase: bool) -> Self {
        let mut namer = FieldNamer::new(camelcase);

        Self {
            filter: namer.name("filter"),
            r#where: namer.name("where"),
            first: namer.name("first"),
            after: namer.name("after"),
            sort: namer.name("sort"),
            sort_desc: namer.name("sort_desc"),
            search: namer.name("search"),
        }
    }
}

/// Field names of the columns of one node type.
#[derive(Debug)]
struct TableFields {
    namer: FieldNamer,
    rowid: Option<String>,
    columns: HashMap<TableColumnId, String>,
}

pub(crate) struct InputContext<'a> {
    database_definition: DatabaseDefinition,
    config: &'a Config,
    arguments: ArgumentNames,
    table_fields: HashMap<TableId, TableFields>,
}

impl<'a> InputContext<'a> {
    pub(crate) fn new(database_definition: DatabaseDefinition, config: &'a Config) -> Self {
        let camelcase = config.auto_camelcase;

        let table_fields = database_definition
            .tables()
            .filter(|table| !table.hidden())
            .map(|table| {
                let mut namer = FieldNamer::new(camelcase);
                let rowid = table.uses_rowid().then(|| namer.name("rowid"));

                let columns = table
                    .columns()
                    .map(|column| (column.id(), namer.name(column.client_name())))
                    .collect();

                (table.id(), TableFields { namer, rowid, columns })
            })
            .collect();

        Self {
            arguments: ArgumentNames::new(camelcase),
            database_definition,
            config,
            table_fields,
        }
    }

    pub(crate) fn arguments(&self) -> &ArgumentNames {
        &self.arguments
    }

    /// Tables of the API, hidden ones left out.
    pub(crate) fn exposed_tables(&self) -> impl Iterator<Item = TableWalker<'_>> + '_ {
        self.database_definition.tables().filter(|table| !table.hidden())
    }

    /// The name of the field of a column in its node and filter types.
    pub(crate) fn column_field_name<'b>(&'b self, column: TableColumnWalker<'b>) -> &'b str {
        self.table_fields
            .get(&column.table().id())
            .and_then(|fields| fields.columns.get(&column.id()))
            .map(String::as_str)
            .unwrap_or(column.client_name())
    }

    /// The name of the rowid field, for tables without a declared primary key.
    pub(crate) fn rowid_field_name(&self, table: TableWalker<'_>) -> Option<&str> {
        self.table_fields.get(&table.id()).and_then(|fields| fields.rowid.as_deref())
    }

    /// A namer for the rest of the fields of a node type, the column names taken.
    pub(crate) fn node_field_namer(&self, table: TableWalker<'_>) -> FieldNamer {
        self.table_fields
            .get(&table.id())
            .map(|fields| fields.namer.clone())
            .unwrap_or_else(|| FieldNamer::new(self.config.auto_camelcase))
    }

    pub(crate) fn root_field_namer(&self) -> FieldNamer {
        FieldNamer::new(self.config.auto_camelcase)
    }

    pub(crate) fn type_name<'b>(&self, table: TableWalker<'b>) -> &'b str {
        table.client_name()
    }

    pub(crate) fn filter_type_name(&self, table: TableWalker<'_>) -> String {
        format!("{}Filter", table.client_name())
    }

    pub(crate) fn sort_type_name(&self, table: TableWalker<'_>) -> String {
        format!("{}Sort", table.client_name())
    }

    pub(crate) fn sort_desc_type_name(&self, table: TableWalker<'_>) -> String {
        format!("{}SortDesc", table.client_name())
    }

    pub(crate) fn collection_type_name(&self, table: TableWalker<'_>) -> String {
        format!("{}Collection", table.client_name())
    }

    pub(crate) fn edge_type_name(&self, table: TableWalker<'_>) -> String {
        format!("{}Edge", table.client_name())
    }

    pub(crate) fn finalize(self) -> (DatabaseDefinition, ArgumentNames) {
        (self.database_definition, self.arguments)
    }
}
