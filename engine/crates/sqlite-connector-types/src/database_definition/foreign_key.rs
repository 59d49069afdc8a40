use super::{TableColumnId, TableId};

/// A single-column foreign key, both ends resolved against introspected tables.
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub(super) table_id: TableId,
    pub(super) column_id: TableColumnId,
    pub(super) referenced_table_id: TableId,
    pub(super) referenced_column: ReferencedColumn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferencedColumn {
    Column(TableColumnId),
    Rowid,
}

impl ForeignKey {
    pub fn new(
        table_id: TableId,
        column_id: TableColumnId,
        referenced_table_id: TableId,
        referenced_column: ReferencedColumn,
    ) -> Self {
        Self {
            table_id,
            column_id,
            referenced_table_id,
            referenced_column,
        }
    }
}
