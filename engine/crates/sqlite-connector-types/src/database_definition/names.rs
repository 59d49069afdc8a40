use std::collections::HashMap;

use super::{TableColumn, TableColumnId, TableId};

/// Lookup indices from database and client names to ids.
#[derive(Debug, Default, Clone)]
pub(super) struct Names {
    tables: HashMap<String, TableId>,
    table_columns: HashMap<(TableId, String), TableColumnId>,
    client_tables: HashMap<String, TableId>,
    client_columns: HashMap<(TableId, String), TableColumnId>,
}

impl Names {
    pub(super) fn intern_table(&mut self, name: &str, table_id: TableId) {
        self.tables.insert(name.to_string(), table_id);
    }

    pub(super) fn intern_table_column(&mut self, column: &TableColumn, column_id: TableColumnId) {
        self.table_columns
            .insert((column.table_id(), column.database_name().to_string()), column_id);
    }

    pub(super) fn intern_client_table(&mut self, client_name: &str, table_id: TableId) {
        self.client_tables.insert(client_name.to_string(), table_id);
    }

    pub(super) fn intern_client_column(&mut self, table_id: TableId, client_name: &str, column_id: TableColumnId) {
        self.client_columns
            .insert((table_id, client_name.to_string()), column_id);
    }

    /// SQLite identifiers are case-insensitive, foreign key targets are not always
    /// spelled like the table definition.
    pub(super) fn get_table_id(&self, name: &str) -> Option<TableId> {
        self.tables.get(name).copied().or_else(|| {
            self.tables
                .iter()
                .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
                .map(|(_, id)| *id)
        })
    }

    pub(super) fn get_table_column_id(&self, table_id: TableId, name: &str) -> Option<TableColumnId> {
        self.table_columns
            .get(&(table_id, name.to_string()))
            .copied()
            .or_else(|| {
                self.table_columns
                    .iter()
                    .find(|((id, candidate), _)| *id == table_id && candidate.eq_ignore_ascii_case(name))
                    .map(|(_, id)| *id)
            })
    }

    pub(super) fn get_table_id_for_client_name(&self, client_name: &str) -> Option<TableId> {
        self.client_tables.get(client_name).copied()
    }

    pub(super) fn get_column_id_for_client_name(&self, table_id: TableId, client_name: &str) -> Option<TableColumnId> {
        self.client_columns.get(&(table_id, client_name.to_string())).copied()
    }
}
