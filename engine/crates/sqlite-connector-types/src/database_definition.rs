mod foreign_key;
mod ids;
mod names;
mod scalar_kind;
mod table;
mod table_column;
mod walkers;

pub use foreign_key::{ForeignKey, ReferencedColumn};
pub use ids::{ForeignKeyId, TableColumnId, TableId};
use names::Names;
pub use scalar_kind::ScalarKind;
pub use table::{FullTextSearch, Table, TableKind};
pub use table_column::TableColumn;
pub use walkers::{ForeignKeyWalker, PrimaryKey, TableColumnWalker, TableWalker, Walker};

use crate::namer::Namer;

/// The implicit row identity of a table without an explicit primary key.
pub const ROWID: &str = "rowid";

/// Suffixes of the names generated from a table name. Keeping all of them free
/// when naming a table keeps the generated types and root fields collision-free.
pub const GENERATED_NAME_SUFFIXES: &[&str] = &["_row", "Filter", "Sort", "SortDesc", "Collection", "Edge"];

/// Type names the schema defines regardless of the tables.
pub const RESERVED_TYPE_NAMES: &[&str] = &[
    "Query",
    "PageInfo",
    "StringOperations",
    "IntegerOperations",
    "FloatOperations",
    "Bytes",
    "GenericScalar",
    "Number",
    "String",
    "Int",
    "Float",
    "Boolean",
    "ID",
];

/// Definition of a SQLite database: the tables and views, their columns and the
/// foreign keys between them. Everything we need to render a GraphQL schema and to
/// query the tables.
///
/// Built from scratch by every introspection and immutable after `finalize`.
#[derive(Debug, Clone)]
pub struct DatabaseDefinition {
    /// The name the database is served under.
    name: String,
    /// Tables first, then views, in introspection order.
    tables: Vec<Table>,
    /// Ordered by table id, then column position.
    table_columns: Vec<TableColumn>,
    /// Ordered by table id, then column position after finalize.
    foreign_keys: Vec<ForeignKey>,
    /// Every foreign key keyed by the table it points to, ordered by that table.
    back_relations: Vec<(TableId, ForeignKeyId)>,
    names: Names,
}

impl DatabaseDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tables: Vec::new(),
            table_columns: Vec::new(),
            foreign_keys: Vec::new(),
            back_relations: Vec::new(),
            names: Names::default(),
        }
    }

    /// The name of the database.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterates over all tables and views.
    pub fn tables(&self) -> impl ExactSizeIterator<Item = TableWalker<'_>> + '_ {
        (0..self.tables.len()).map(move |id| self.walk(TableId(id as u32)))
    }

    /// Find a table or a view with the given name.
    pub fn find_table(&self, name: &str) -> Option<TableWalker<'_>> {
        self.get_table_id(name).map(|table_id| self.walk(table_id))
    }

    /// Find the table behind the given GraphQL name.
    pub fn find_table_for_client_name(&self, client_name: &str) -> Option<TableWalker<'_>> {
        self.names
            .get_table_id_for_client_name(client_name)
            .map(|table_id| self.walk(table_id))
    }

    /// Adds a table to the definition.
    pub fn push_table(&mut self, table: Table) -> TableId {
        let id = TableId(self.tables.len() as u32);

        self.names.intern_table(table.database_name(), id);
        self.tables.push(table);

        id
    }

    /// Adds a column to the definition. Columns must be pushed table by table.
    pub fn push_table_column(&mut self, column: TableColumn) -> TableColumnId {
        let id = TableColumnId(self.table_columns.len() as u32);

        self.names.intern_table_column(&column, id);
        self.table_columns.push(column);

        id
    }

    /// Adds a foreign key to the definition.
    pub fn push_foreign_key(&mut self, foreign_key: ForeignKey) -> ForeignKeyId {
        let id = ForeignKeyId(self.foreign_keys.len() as u32);
        self.foreign_keys.push(foreign_key);

        id
    }

    pub fn set_table_hidden(&mut self, table_id: TableId, hidden: bool) {
        self.tables[table_id.0 as usize].set_hidden(hidden);
    }

    pub fn set_table_full_text_search(&mut self, table_id: TableId, full_text_search: FullTextSearch) {
        self.tables[table_id.0 as usize].set_full_text_search(full_text_search);
    }

    /// Finds the id of a table with the given name, if existing.
    pub fn get_table_id(&self, name: &str) -> Option<TableId> {
        self.names.get_table_id(name)
    }

    /// Finds the id of a column in a table with the given name, if existing.
    pub fn get_table_column_id(&self, table_id: TableId, column_name: &str) -> Option<TableColumnId> {
        self.names.get_table_column_id(table_id, column_name)
    }

    /// Finalizes the definition: assigns the GraphQL names and indexes the foreign
    /// keys by the tables they point to.
    pub fn finalize(&mut self) {
        self.foreign_keys.sort_by_key(|foreign_key| (foreign_key.table_id, foreign_key.column_id));

        self.back_relations = self
            .foreign_keys
            .iter()
            .enumerate()
            .map(|(id, foreign_key)| (foreign_key.referenced_table_id, ForeignKeyId(id as u32)))
            .collect();

        self.back_relations.sort();

        self.assign_client_names();
    }

    /// Walk an item in the definition by its ID.
    pub fn walk<Id>(&self, id: Id) -> Walker<'_, Id> {
        Walker {
            id,
            database_definition: self,
        }
    }

    fn assign_client_names(&mut self) {
        let mut table_namer = Namer::new("t");

        for name in RESERVED_TYPE_NAMES {
            table_namer.reserve(*name);
        }

        for (id, table) in self.tables.iter_mut().enumerate() {
            let mut client_name = table_namer.name(&table.database_name);

            while GENERATED_NAME_SUFFIXES
                .iter()
                .any(|suffix| table_namer.is_issued(&format!("{client_name}{suffix}")))
            {
                client_name = table_namer.name(&table.database_name);
            }

            for suffix in GENERATED_NAME_SUFFIXES {
                table_namer.reserve(format!("{client_name}{suffix}"));
            }

            self.names.intern_client_table(&client_name, TableId(id as u32));
            table.client_name = client_name;
        }

        let mut uses_rowid = self
            .tables
            .iter()
            .map(|table| table.kind == TableKind::Table)
            .collect::<Vec<_>>();

        for column in self.table_columns.iter().filter(|column| column.primary_key_position.is_some()) {
            uses_rowid[column.table_id.0 as usize] = false;
        }

        let mut current_table = None;
        let mut column_namer = Namer::new("c");

        for (id, column) in self.table_columns.iter_mut().enumerate() {
            if current_table != Some(column.table_id) {
                current_table = Some(column.table_id);
                column_namer = Namer::new("c");

                // the implicit rowid is keyed by its own name in the rows
                if uses_rowid[column.table_id.0 as usize] {
                    column_namer.reserve(ROWID);
                }
            }

            let client_name = column_namer.name(&column.database_name);

            self.names
                .intern_client_column(column.table_id, &client_name, TableColumnId(id as u32));

            column.client_name = client_name;
        }
    }
}
