use sqlite_connector_types::{
    database_definition::ScalarKind,
    filter::{FilterOperator, Operand},
};

use crate::registry::{context::OutputContext, CustomScalar, InputObjectType, MetaInputValue, ScalarType};

pub(crate) const BYTES: &str = "Bytes";
pub(crate) const GENERIC_SCALAR: &str = "GenericScalar";
pub(crate) const NUMBER: &str = "Number";

/// The operator input types, with the scalar their operands take.
static OPERATIONS: &[(&str, ScalarKind, &str)] = &[
    ("StringOperations", ScalarKind::String, "String"),
    ("IntegerOperations", ScalarKind::Integer, "Int"),
    ("FloatOperations", ScalarKind::Float, NUMBER),
];

/// The output type of a plain column.
pub(crate) fn output_type(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::String => "String",
        ScalarKind::Integer => "Int",
        ScalarKind::Float => "Float",
        ScalarKind::Bytes => BYTES,
    }
}

/// The operator input type filtering a column.
pub(crate) fn operations_type(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::String | ScalarKind::Bytes => "StringOperations",
        ScalarKind::Integer => "IntegerOperations",
        ScalarKind::Float => "FloatOperations",
    }
}

pub(crate) fn register(output_ctx: &mut OutputContext) {
    let scalars = [
        (BYTES, CustomScalar::Bytes, "Binary data as base64 encoded text"),
        (GENERIC_SCALAR, CustomScalar::Generic, "Any JSON value"),
        (NUMBER, CustomScalar::Number, "A number, or a string holding one"),
    ];

    for (name, kind, description) in scalars {
        output_ctx.create_scalar_type(ScalarType {
            name: name.to_string(),
            description: Some(description.to_string()),
            kind,
        });
    }

    for (type_name, kind, operand_type) in OPERATIONS {
        let fields = FilterOperator::for_kind(*kind).map(|operator| {
            let ty = match operator.operand() {
                Operand::Value => operand_type.to_string(),
                Operand::List => format!("[{operand_type}]"),
                Operand::Flag => String::from("Boolean"),
            };

            MetaInputValue::new(operator.as_ref(), ty).with_description(operator.description())
        });

        output_ctx.create_input_type(InputObjectType::new(*type_name, fields));
    }
}
