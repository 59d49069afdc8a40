//! Serves SQLite databases over GraphQL. The schema of every database is derived
//! from its tables, cached by the schema version of the database, and resolved
//! through a [`TableFetch`] under a per-request [`ExecutionBudget`].

mod budget;
mod cache;
mod engine;
mod error;
mod fetch;
mod resolver;
mod schema;

pub use budget::{BudgetExceeded, ExecutionBudget, ExecutionLimits};
pub use cache::SchemaCache;
pub use engine::{Engine, EngineBuilder, GraphqlRequest};
pub use error::Error;
pub use fetch::{
    EqualityConstraint, FetchError, FetchedRow, FilterCondition, Sort, SqliteTableFetch, TableFetch,
    TableFetchParams, TablePage,
};
pub use resolver::{CollectionPage, NodeRow};
pub use schema::{DatabaseSchema, ExtraFields};

/// The GraphQL engine types embedders need for extra fields and responses.
pub use async_graphql;
