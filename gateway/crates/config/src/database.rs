use std::collections::BTreeMap;

/// Settings of one served database.
#[derive(Debug, Default, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Per-table settings, keyed by the table name in the database
    pub tables: BTreeMap<String, TableConfig>,
}

impl DatabaseConfig {
    pub fn table(&self, name: &str) -> Option<&TableConfig> {
        self.tables.get(name)
    }
}

#[derive(Debug, Default, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// Columns storing JSON text, exposed as decoded values
    pub json_columns: Vec<String>,
    /// The full-text-search table indexing this table, when not detected
    pub fts_table: Option<String>,
    /// The column of this table matching the rowid of the FTS table. Default: rowid.
    pub fts_pk: Option<String>,
    /// The column describing a row, used in example queries
    pub label_column: Option<String>,
    /// Leaves the table out of the API
    pub hidden: bool,
}

impl TableConfig {
    pub fn is_json_column(&self, column: &str) -> bool {
        self.json_columns.iter().any(|candidate| candidate == column)
    }
}
