use super::{ScalarKind, TableId};

#[derive(Debug, Clone)]
pub struct TableColumn {
    pub(super) table_id: TableId,
    pub(super) database_name: String,
    pub(super) client_name: String,
    pub(super) declared_type: String,
    pub(super) kind: ScalarKind,
    pub(super) primary_key_position: Option<u32>,
    pub(super) json: bool,
}

impl TableColumn {
    pub fn new(table_id: TableId, name: String, declared_type: String) -> Self {
        Self {
            table_id,
            kind: ScalarKind::from_declared_type(&declared_type),
            database_name: name,
            client_name: String::new(),
            declared_type,
            primary_key_position: None,
            json: false,
        }
    }

    /// Position of the column in the primary key, starting from one.
    pub fn set_primary_key_position(&mut self, position: u32) {
        self.primary_key_position = Some(position);
    }

    /// The stored text is JSON and gets decoded on output.
    pub fn set_json(&mut self, json: bool) {
        self.json = json;
    }

    pub(crate) fn table_id(&self) -> TableId {
        self.table_id
    }

    pub(crate) fn database_name(&self) -> &str {
        &self.database_name
    }
}
