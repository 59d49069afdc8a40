mod foreign_key;
mod table;
mod table_column;

pub use foreign_key::ForeignKeyWalker;
pub use table::{PrimaryKey, TableWalker};
pub use table_column::TableColumnWalker;

use std::{fmt, ops::Range};

use super::DatabaseDefinition;

/// An abstraction to iterate over an introspected SQLite database.
///
/// The `Id` must be something that points to an object in the database.
#[derive(Clone, Copy)]
pub struct Walker<'a, Id> {
    pub(crate) id: Id,
    pub(crate) database_definition: &'a DatabaseDefinition,
}

impl<'a, Id> PartialEq for Walker<'a, Id>
where
    Id: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<'a, Id> fmt::Debug for Walker<'a, Id>
where
    Id: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Walker")
            .field("database", &self.database_definition.name())
            .field("id", &self.id)
            .finish()
    }
}

impl<'a, Id> Walker<'a, Id>
where
    Id: Copy,
{
    pub fn id(self) -> Id {
        self.id
    }

    /// The whole definition this walker points into.
    pub fn database_definition(self) -> &'a DatabaseDefinition {
        self.database_definition
    }

    fn walk<OtherId>(self, id: OtherId) -> Walker<'a, OtherId> {
        self.database_definition.walk(id)
    }
}

/// For a slice sorted by a key K, return the contiguous range of items matching the key.
fn range_for_key<I, K>(slice: &[I], key: K, extract: impl Fn(&I) -> K) -> Range<usize>
where
    K: Copy + Ord,
{
    let start = slice.partition_point(|item| extract(item) < key);
    let end = slice.partition_point(|item| extract(item) <= key);

    start..end
}
