//! Descriptors of how every generated field resolves. The executor turns them
//! into resolver objects when building the schema.

use sqlite_connector_types::database_definition::{ForeignKeyId, TableColumnId, TableId};

#[derive(Debug, Clone, PartialEq)]
pub enum Resolver {
    /// Reads a value of the materialized row.
    Select { key: String },
    /// Reads JSON text of the materialized row and decodes it.
    Json { key: String },
    /// Looks up the row the foreign key of the parent row points to.
    ForeignKey(ForeignKeyId),
    /// Fetches rows of a table.
    Table(TableResolver),
    Collection(CollectionField),
    Edge(EdgeField),
    PageInfo(PageInfoField),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableResolver {
    pub table_id: TableId,
    pub mode: FetchMode,
    /// Set on reverse relation fields: the foreign key of the fetched table pointing
    /// to the parent row.
    pub related: Option<ForeignKeyId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchMode {
    /// A page of rows.
    Collection,
    /// The first matching row, optionally looked up by its key.
    Row { keys: Vec<KeyArgument> },
}

/// An argument of a single row field matching one primary key column.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyArgument {
    pub name: String,
    /// `None` for the rowid.
    pub column: Option<TableColumnId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionField {
    TotalCount,
    PageInfo,
    Nodes,
    Edges,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeField {
    Cursor,
    Node,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageInfoField {
    EndCursor,
    HasNextPage,
}
