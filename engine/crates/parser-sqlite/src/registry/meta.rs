use indexmap::IndexMap;

use super::Resolver;

/// A named type of the generated schema.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaType {
    Object(ObjectType),
    InputObject(InputObjectType),
    Enum(EnumType),
    Scalar(ScalarType),
}

impl MetaType {
    pub fn name(&self) -> &str {
        match self {
            MetaType::Object(object) => &object.name,
            MetaType::InputObject(input) => &input.name,
            MetaType::Enum(r#enum) => &r#enum.name,
            MetaType::Scalar(scalar) => &scalar.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, MetaField>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>, fields: impl IntoIterator<Item = MetaField>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: fields.into_iter().map(|field| (field.name.clone(), field)).collect(),
        }
    }

    pub fn push_field(&mut self, field: MetaField) {
        self.fields.insert(field.name.clone(), field);
    }
}

/// An output field. The type is written in GraphQL notation, e.g. `[repos]` or `Int!`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaField {
    pub name: String,
    pub ty: String,
    pub description: Option<String>,
    pub args: IndexMap<String, MetaInputValue>,
    pub resolver: Resolver,
}

impl MetaField {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, resolver: Resolver) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            description: None,
            args: IndexMap::new(),
            resolver,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetaInputValue {
    pub name: String,
    pub ty: String,
    pub description: Option<String>,
}

impl MetaInputValue {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, MetaInputValue>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>, fields: impl IntoIterator<Item = MetaInputValue>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: fields.into_iter().map(|field| (field.name.clone(), field)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<String>,
}

/// The scalars we define on top of the built-in ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomScalar {
    /// Binary data as base64 text.
    Bytes,
    /// Any JSON value.
    Generic,
    /// A number, or a string holding one.
    Number,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
    pub kind: CustomScalar,
}
