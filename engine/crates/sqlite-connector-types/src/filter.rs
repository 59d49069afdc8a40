//! The per-column filter operators of the generated filter inputs.

use strum::IntoEnumIterator;

use crate::database_definition::ScalarKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::AsRefStr, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Not,
    Contains,
    EndsWith,
    StartsWith,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    NotLike,
    Glob,
    In,
    NotIn,
    ArrayContains,
    Date,
    IsNull,
    NotNull,
    IsBlank,
    NotBlank,
}

/// The shape of the value an operator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// A single value of the column type.
    Value,
    /// A list of values of the column type.
    List,
    /// A boolean switching the predicate on.
    Flag,
}

impl FilterOperator {
    /// The operators available for columns of the given kind, in declaration order.
    pub fn for_kind(kind: ScalarKind) -> impl Iterator<Item = FilterOperator> {
        Self::iter().filter(move |operator| operator.applies_to(kind))
    }

    pub fn applies_to(self, kind: ScalarKind) -> bool {
        match kind {
            ScalarKind::String | ScalarKind::Bytes => true,
            ScalarKind::Integer | ScalarKind::Float => !matches!(
                self,
                Self::Contains
                    | Self::EndsWith
                    | Self::StartsWith
                    | Self::Like
                    | Self::NotLike
                    | Self::Glob
                    | Self::Date
            ),
        }
    }

    pub fn operand(self) -> Operand {
        match self {
            Self::In | Self::NotIn => Operand::List,
            Self::IsNull | Self::NotNull | Self::IsBlank | Self::NotBlank => Operand::Flag,
            _ => Operand::Value,
        }
    }

    /// Comparisons where a numeric-looking operand is compared as a number.
    pub fn is_ordering(self) -> bool {
        matches!(self, Self::Gt | Self::Gte | Self::Lt | Self::Lte)
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Eq => "Exact match",
            Self::Not => "Not exact match",
            Self::Contains => "String contains",
            Self::EndsWith => "String ends with",
            Self::StartsWith => "String starts with",
            Self::Gt => "is greater than",
            Self::Gte => "is greater than or equal to",
            Self::Lt => "is less than",
            Self::Lte => "is less than or equal to",
            Self::Like => "is like (% for wildcards)",
            Self::NotLike => "is not like",
            Self::Glob => "glob matches (* for wildcards)",
            Self::In => "in this list",
            Self::NotIn => "not in this list",
            Self::ArrayContains => "JSON array contains this value",
            Self::Date => "Value is a datetime on this date",
            Self::IsNull => "Value is null",
            Self::NotNull => "Value is not null",
            Self::IsBlank => "Value is null or blank",
            Self::NotBlank => "Value is not null or blank",
        }
    }
}
