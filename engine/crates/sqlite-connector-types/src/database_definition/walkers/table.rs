use super::{ForeignKeyWalker, TableColumnWalker, Walker};
use crate::database_definition::{
    ForeignKeyId, FullTextSearch, Table, TableColumnId, TableId, TableKind,
};

/// Definition of a table or a view.
pub type TableWalker<'a> = Walker<'a, TableId>;

/// How the rows of a table are identified.
#[derive(Debug, Clone)]
pub enum PrimaryKey<'a> {
    /// No declared primary key, the implicit rowid identifies the rows.
    Rowid,
    /// The declared primary key columns, in key order.
    Columns(Vec<TableColumnWalker<'a>>),
}

impl<'a> PrimaryKey<'a> {
    /// The names of the key columns in the database.
    pub fn database_names(&self) -> Vec<&'a str> {
        match self {
            PrimaryKey::Rowid => vec![crate::database_definition::ROWID],
            PrimaryKey::Columns(columns) => columns.iter().map(|column| column.database_name()).collect(),
        }
    }
}

impl<'a> TableWalker<'a> {
    /// The name of the table in the database.
    pub fn database_name(self) -> &'a str {
        &self.get().database_name
    }

    /// The name of the table in the GraphQL APIs.
    pub fn client_name(self) -> &'a str {
        &self.get().client_name
    }

    pub fn is_view(self) -> bool {
        self.get().kind == TableKind::View
    }

    /// Hidden tables get no types or fields in the schema.
    pub fn hidden(self) -> bool {
        self.get().hidden
    }

    /// An iterator over all the columns in the table, in definition order.
    pub fn columns(self) -> impl ExactSizeIterator<Item = TableColumnWalker<'a>> + 'a {
        let range = super::range_for_key(&self.database_definition.table_columns, self.id, |column| {
            column.table_id
        });

        range.map(move |id| self.walk(TableColumnId(id as u32)))
    }

    /// Find a column by its database name.
    pub fn find_column(self, name: &str) -> Option<TableColumnWalker<'a>> {
        self.database_definition
            .get_table_column_id(self.id, name)
            .map(|id| self.walk(id))
    }

    /// Find a column by its GraphQL name.
    pub fn find_column_for_client_name(self, client_name: &str) -> Option<TableColumnWalker<'a>> {
        self.database_definition
            .names
            .get_column_id_for_client_name(self.id, client_name)
            .map(|id| self.walk(id))
    }

    /// The row identity of the table. Views have none.
    pub fn primary_key(self) -> Option<PrimaryKey<'a>> {
        if self.is_view() {
            return None;
        }

        let mut columns = self
            .columns()
            .filter(|column| column.primary_key_position().is_some())
            .collect::<Vec<_>>();

        if columns.is_empty() {
            return Some(PrimaryKey::Rowid);
        }

        columns.sort_by_key(|column| column.primary_key_position());

        Some(PrimaryKey::Columns(columns))
    }

    /// True for tables identified by their implicit rowid.
    pub fn uses_rowid(self) -> bool {
        matches!(self.primary_key(), Some(PrimaryKey::Rowid))
    }

    /// Foreign keys defined on the columns of this table, in column order.
    pub fn foreign_keys(self) -> impl Iterator<Item = ForeignKeyWalker<'a>> + 'a {
        let range = super::range_for_key(&self.database_definition.foreign_keys, self.id, |foreign_key| {
            foreign_key.table_id
        });

        range.map(move |id| self.walk(ForeignKeyId(id as u32)))
    }

    /// Foreign keys of other tables pointing to this table.
    pub fn foreign_keys_back(self) -> impl Iterator<Item = ForeignKeyWalker<'a>> + 'a {
        let back_relations = &self.database_definition.back_relations;
        let range = super::range_for_key(back_relations, self.id, |(table_id, _)| *table_id);

        back_relations[range]
            .iter()
            .map(move |(_, foreign_key_id)| self.walk(*foreign_key_id))
    }

    pub fn full_text_search(self) -> Option<&'a FullTextSearch> {
        self.get().full_text_search.as_ref()
    }

    pub fn supports_full_text_search(self) -> bool {
        self.full_text_search().is_some()
    }

    /// The column shown when this table is referenced from another row. The
    /// configured column wins, then a `name` or a `title` column, and finally the
    /// other column of a two column table keyed by `id`.
    pub fn label_column(self) -> Option<TableColumnWalker<'a>> {
        if let Some(configured) = self.get().label_column.as_deref() {
            return self.find_column(configured);
        }

        let columns = self.columns().collect::<Vec<_>>();

        for candidate in ["name", "title"] {
            let found = columns
                .iter()
                .find(|column| column.database_name().eq_ignore_ascii_case(candidate));

            if let Some(column) = found {
                return Some(*column);
            }
        }

        match columns.as_slice() {
            [first, second] if first.database_name() == "id" => Some(*second),
            [first, second] if second.database_name() == "id" => Some(*first),
            _ => None,
        }
    }

    fn get(self) -> &'a Table {
        &self.database_definition.tables[self.id.0 as usize]
    }
}
