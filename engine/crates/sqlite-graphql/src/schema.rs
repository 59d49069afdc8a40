use std::sync::Arc;

use async_graphql::{
    dynamic::{
        Enum, Field, FieldFuture, FieldValue, InputObject, InputValue, Object, Scalar, Schema, Type, TypeRef,
    },
    Request, Response, Value as ConstValue,
};
use parser_sqlite::registry::{
    CustomScalar, EnumType, InputObjectType, MetaInputValue, MetaType, ObjectType, Registry, ScalarType,
};

use crate::{
    resolver::{DatabaseContext, FieldResolver},
    Error,
};

/// Root fields and types an embedder adds to the schema of every database.
pub trait ExtraFields: Send + Sync {
    fn fields(&self, database: &str) -> Vec<Field>;

    fn types(&self, database: &str) -> Vec<Type> {
        let _ = database;
        Vec::new()
    }
}

/// The executable schema of one database at one schema version.
pub struct DatabaseSchema {
    schema: Schema,
    registry: Arc<Registry>,
}

impl DatabaseSchema {
    pub(crate) fn build(context: Arc<DatabaseContext>, extra_fields: Option<&dyn ExtraFields>) -> Result<Self, Error> {
        let registry = context.registry.clone();
        let mut builder = Schema::build(&registry.query_type.name, None, None);

        for meta_type in registry.types.values() {
            builder = match meta_type {
                MetaType::Object(object) => builder.register(object_type(&context, object)),
                MetaType::InputObject(input) => builder.register(input_object_type(input)),
                MetaType::Enum(r#enum) => builder.register(enum_type(r#enum)),
                MetaType::Scalar(scalar) => builder.register(scalar_type(scalar)),
            };
        }

        let mut query = object_type(&context, &registry.query_type);
        let mut has_fields = !registry.query_type.fields.is_empty();

        if let Some(extra_fields) = extra_fields {
            for field in extra_fields.fields(&context.name) {
                has_fields = true;
                query = query.field(field);
            }

            for r#type in extra_fields.types(&context.name) {
                builder = builder.register(r#type);
            }
        }

        // GraphQL does not allow a root type without fields.
        if !has_fields {
            query = query.field(Field::new("empty", TypeRef::named(TypeRef::STRING), |_| {
                FieldFuture::new(async { Ok::<_, async_graphql::Error>(Some(FieldValue::value("schema".to_string()))) })
            }));
        }

        let schema = builder.register(query).finish()?;

        Ok(Self { schema, registry })
    }

    pub async fn execute(&self, request: impl Into<Request>) -> Response {
        self.schema.execute(request).await
    }

    pub fn sdl(&self) -> String {
        self.schema.sdl()
    }

    /// The example query of a table, by its name in the database.
    pub fn example_query(&self, table: &str) -> Option<&str> {
        self.registry.example_query(table)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

fn object_type(context: &Arc<DatabaseContext>, object: &ObjectType) -> Object {
    let mut output = Object::new(&object.name);

    if let Some(description) = &object.description {
        output = output.description(description);
    }

    for meta_field in object.fields.values() {
        let resolver = FieldResolver::new(context.clone(), meta_field.resolver.clone());

        let mut field = Field::new(&meta_field.name, type_ref(&meta_field.ty), move |ctx| {
            let resolver = resolver.clone();
            FieldFuture::new(async move { resolver.resolve(ctx).await })
        });

        if let Some(description) = &meta_field.description {
            field = field.description(description);
        }

        for argument in meta_field.args.values() {
            field = field.argument(input_value(argument));
        }

        output = output.field(field);
    }

    output
}

fn input_object_type(input: &InputObjectType) -> InputObject {
    let mut output = InputObject::new(&input.name);

    if let Some(description) = &input.description {
        output = output.description(description);
    }

    input
        .fields
        .values()
        .fold(output, |output, field| output.field(input_value(field)))
}

fn input_value(input: &MetaInputValue) -> InputValue {
    let value = InputValue::new(&input.name, type_ref(&input.ty));

    match &input.description {
        Some(description) => value.description(description),
        None => value,
    }
}

fn enum_type(r#enum: &EnumType) -> Enum {
    let mut output = Enum::new(&r#enum.name);

    if let Some(description) = &r#enum.description {
        output = output.description(description);
    }

    r#enum
        .values
        .iter()
        .fold(output, |output, value| output.item(value.as_str()))
}

fn scalar_type(scalar: &ScalarType) -> Scalar {
    let mut output = Scalar::new(&scalar.name);

    if let Some(description) = &scalar.description {
        output = output.description(description);
    }

    match scalar.kind {
        CustomScalar::Bytes => output.validator(|value| matches!(value, ConstValue::String(_))),
        CustomScalar::Generic => output,
        CustomScalar::Number => output.validator(is_number),
    }
}

fn is_number(value: &ConstValue) -> bool {
    match value {
        ConstValue::Number(_) => true,
        ConstValue::String(text) => text.trim().parse::<f64>().is_ok_and(f64::is_finite),
        _ => false,
    }
}

/// Parses a type in GraphQL notation, e.g. `[repos]!`.
fn type_ref(ty: &str) -> TypeRef {
    if let Some(inner) = ty.strip_suffix('!') {
        return TypeRef::NonNull(Box::new(type_ref(inner)));
    }

    if let Some(inner) = ty.strip_prefix('[').and_then(|ty| ty.strip_suffix(']')) {
        return TypeRef::List(Box::new(type_ref(inner)));
    }

    TypeRef::named(ty)
}
