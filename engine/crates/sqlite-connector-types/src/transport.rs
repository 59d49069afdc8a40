use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

pub use ext::TransportExt;
pub use sqlite::{PooledSqliteConnection, PoolingConfig, SqliteTransport};

mod executor;
mod ext;
mod sqlite;

/// A connection to a SQLite database, pooled or not. Rows come back as JSON
/// objects keyed by the column names of the result set.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn parameterized_execute(&self, query: &str, params: Vec<Value>) -> crate::Result<i64>;

    fn parameterized_query<'a>(&'a self, query: &'a str, params: Vec<Value>) -> BoxStream<'a, crate::Result<Value>>;

    fn connection_string(&self) -> &str;

    fn query<'a>(&'a self, query: &'a str) -> BoxStream<'a, crate::Result<Value>> {
        self.parameterized_query(query, Vec::new())
    }

    async fn execute(&self, query: &str) -> crate::Result<i64> {
        self.parameterized_execute(query, Vec::new()).await
    }
}

#[async_trait]
impl Transport for Arc<dyn Transport> {
    async fn parameterized_execute(&self, query: &str, params: Vec<Value>) -> crate::Result<i64> {
        self.as_ref().parameterized_execute(query, params).await
    }

    fn parameterized_query<'a>(&'a self, query: &'a str, params: Vec<Value>) -> BoxStream<'a, crate::Result<Value>> {
        self.as_ref().parameterized_query(query, params)
    }

    fn connection_string(&self) -> &str {
        self.as_ref().connection_string()
    }

    fn query<'a>(&'a self, query: &'a str) -> BoxStream<'a, crate::Result<Value>> {
        self.as_ref().parameterized_query(query, Vec::new())
    }

    async fn execute(&self, query: &str) -> crate::Result<i64> {
        self.as_ref().parameterized_execute(query, Vec::new()).await
    }
}
