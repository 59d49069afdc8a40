use std::collections::HashMap;

use indexmap::IndexMap;
use sqlite_connector_types::database_definition::{TableColumnId, TableId};

use super::{FieldNamer, InputContext};
use crate::registry::{
    EnumType, InputObjectType, MetaField, MetaType, ObjectType, Registry, ScalarType, TableTypes,
};

/// Accumulates the generated types, root fields and name mappings.
#[derive(Debug)]
pub(crate) struct OutputContext {
    query_type: ObjectType,
    root_namer: FieldNamer,
    types: IndexMap<String, MetaType>,
    table_types: IndexMap<TableId, TableTypes>,
    field_mapping: HashMap<(TableId, String), TableColumnId>,
}

impl OutputContext {
    pub(crate) fn new(input_ctx: &InputContext<'_>) -> Self {
        Self {
            query_type: ObjectType::new("Query", []),
            root_namer: input_ctx.root_field_namer(),
            types: IndexMap::new(),
            table_types: IndexMap::new(),
            field_mapping: HashMap::new(),
        }
    }

    pub(crate) fn create_object_type(&mut self, object: ObjectType) {
        self.types.insert(object.name.clone(), MetaType::Object(object));
    }

    pub(crate) fn create_input_type(&mut self, input_object: InputObjectType) {
        self.types
            .insert(input_object.name.clone(), MetaType::InputObject(input_object));
    }

    pub(crate) fn create_enum_type(&mut self, r#enum: EnumType) {
        self.types.insert(r#enum.name.clone(), MetaType::Enum(r#enum));
    }

    pub(crate) fn create_scalar_type(&mut self, scalar: ScalarType) {
        self.types.insert(scalar.name.clone(), MetaType::Scalar(scalar));
    }

    /// Issues a unique root field name for the given snake case name.
    pub(crate) fn root_field_name(&mut self, snake: &str) -> String {
        self.root_namer.name(snake)
    }

    /// Adds a root field. The name must come from [`Self::root_field_name`].
    pub(crate) fn push_query(&mut self, query: MetaField) {
        self.query_type.push_field(query);
    }

    /// Remembers which column a filter or node field of a table stands for.
    pub(crate) fn push_field_mapping(&mut self, table_id: TableId, field_name: &str, column_id: TableColumnId) {
        self.field_mapping.insert((table_id, field_name.to_string()), column_id);
    }

    pub(crate) fn push_table_types(&mut self, table_id: TableId, table_types: TableTypes) {
        self.table_types.insert(table_id, table_types);
    }

    pub(crate) fn finalize(self, input_ctx: InputContext<'_>) -> Registry {
        let (database_definition, arguments) = input_ctx.finalize();

        Registry {
            query_type: self.query_type,
            types: self.types,
            arguments,
            database_definition,
            table_types: self.table_types,
            field_mapping: self.field_mapping,
        }
    }
}
