#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Table,
    View,
}

/// The full-text-search index of a table: the FTS virtual table and the column of
/// the indexed table its rowids point to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullTextSearch {
    pub(super) table: String,
    pub(super) key_column: String,
}

impl FullTextSearch {
    pub fn new(table: impl Into<String>, key_column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            key_column: key_column.into(),
        }
    }

    /// The name of the FTS virtual table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The column matched against the rowid of the FTS table.
    pub fn key_column(&self) -> &str {
        &self.key_column
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    pub(super) database_name: String,
    pub(super) client_name: String,
    pub(super) kind: TableKind,
    pub(super) hidden: bool,
    pub(super) full_text_search: Option<FullTextSearch>,
    pub(super) label_column: Option<String>,
}

impl Table {
    pub fn new(name: String, kind: TableKind) -> Self {
        Self {
            client_name: String::new(),
            database_name: name,
            kind,
            hidden: false,
            full_text_search: None,
            label_column: None,
        }
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn set_full_text_search(&mut self, full_text_search: FullTextSearch) {
        self.full_text_search = Some(full_text_search);
    }

    pub fn set_label_column(&mut self, label_column: impl Into<String>) {
        self.label_column = Some(label_column.into());
    }

    pub(crate) fn database_name(&self) -> &str {
        &self.database_name
    }
}
