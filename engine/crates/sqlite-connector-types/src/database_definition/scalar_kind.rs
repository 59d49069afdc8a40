/// The GraphQL-facing kind of a column, derived from its declared SQLite type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Integer,
    Float,
    Bytes,
}

impl ScalarKind {
    /// Follows the SQLite type affinity rules. An untyped column is text, and
    /// anything unrecognized falls back to numeric, which we treat as float.
    pub fn from_declared_type(declared_type: &str) -> Self {
        let declared_type = declared_type.trim().to_ascii_uppercase();

        if declared_type.is_empty() {
            return Self::String;
        }

        if declared_type.contains("INT") {
            Self::Integer
        } else if ["CHAR", "CLOB", "TEXT"].iter().any(|t| declared_type.contains(t)) {
            Self::String
        } else if declared_type.contains("BLOB") {
            Self::Bytes
        } else {
            Self::Float
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}
