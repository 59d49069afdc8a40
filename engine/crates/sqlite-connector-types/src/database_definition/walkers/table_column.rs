use super::{ForeignKeyWalker, TableWalker, Walker};
use crate::database_definition::{ScalarKind, TableColumn, TableColumnId};

/// Definition of a column located in a table or a view.
pub type TableColumnWalker<'a> = Walker<'a, TableColumnId>;

impl<'a> TableColumnWalker<'a> {
    /// The table this column is located in.
    pub fn table(self) -> TableWalker<'a> {
        self.walk(self.get().table_id)
    }

    /// The name of the column in the database.
    pub fn database_name(self) -> &'a str {
        &self.get().database_name
    }

    /// The name of the column in the GraphQL APIs.
    pub fn client_name(self) -> &'a str {
        &self.get().client_name
    }

    /// The type as written in the table definition, empty if untyped.
    pub fn declared_type(self) -> &'a str {
        &self.get().declared_type
    }

    pub fn kind(self) -> ScalarKind {
        self.get().kind
    }

    pub fn is_json(self) -> bool {
        self.get().json
    }

    pub fn primary_key_position(self) -> Option<u32> {
        self.get().primary_key_position
    }

    /// The foreign key defined on this column, if any.
    pub fn foreign_key(self) -> Option<ForeignKeyWalker<'a>> {
        self.table().foreign_keys().find(|foreign_key| foreign_key.column().id == self.id)
    }

    fn get(self) -> &'a TableColumn {
        &self.database_definition.table_columns[self.id.0 as usize]
    }
}
