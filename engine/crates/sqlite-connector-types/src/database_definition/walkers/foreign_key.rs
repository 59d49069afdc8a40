use super::{TableColumnWalker, TableWalker, Walker};
use crate::database_definition::{ForeignKey, ForeignKeyId, ReferencedColumn, ROWID};

/// A single-column foreign key between two tables.
pub type ForeignKeyWalker<'a> = Walker<'a, ForeignKeyId>;

impl<'a> ForeignKeyWalker<'a> {
    /// The table holding the foreign key.
    pub fn table(self) -> TableWalker<'a> {
        self.walk(self.get().table_id)
    }

    /// The constrained column.
    pub fn column(self) -> TableColumnWalker<'a> {
        self.walk(self.get().column_id)
    }

    /// The table the key points to.
    pub fn referenced_table(self) -> TableWalker<'a> {
        self.walk(self.get().referenced_table_id)
    }

    /// The referenced column, `None` if the key points to the rowid.
    pub fn referenced_column(self) -> Option<TableColumnWalker<'a>> {
        match self.get().referenced_column {
            ReferencedColumn::Column(id) => Some(self.walk(id)),
            ReferencedColumn::Rowid => None,
        }
    }

    pub fn referenced_column_database_name(self) -> &'a str {
        self.referenced_column().map(|column| column.database_name()).unwrap_or(ROWID)
    }

    pub fn referenced_column_client_name(self) -> &'a str {
        self.referenced_column().map(|column| column.client_name()).unwrap_or(ROWID)
    }

    fn get(self) -> &'a ForeignKey {
        &self.database_definition.foreign_keys[self.id.0 as usize]
    }
}
