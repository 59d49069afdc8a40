use std::str::FromStr;

use async_trait::async_trait;
use futures::{stream::BoxStream, StreamExt};
use serde_json::Value;
use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Sqlite,
};
use tokio::sync::Mutex;

use super::{executor, Transport};

#[derive(Debug, Clone, Default)]
pub struct PoolingConfig {
    pub max_connections: Option<u32>,
    /// Open the database without write access.
    pub read_only: bool,
    /// Create the file if it does not exist.
    pub create_if_missing: bool,
}

/// A pool of connections to one SQLite file.
pub struct SqliteTransport {
    pool: SqlitePool,
    connection_string: String,
}

impl SqliteTransport {
    /// Connects to the database. The connection string is either a path or a
    /// `sqlite:` URL.
    pub async fn new(connection_string: &str, config: PoolingConfig) -> crate::Result<Self> {
        let options = if connection_string.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(connection_string)?
        } else {
            SqliteConnectOptions::new().filename(connection_string)
        };

        let options = options
            .read_only(config.read_only)
            .create_if_missing(config.create_if_missing);

        let mut pool_options = SqlitePoolOptions::new();

        if let Some(max_connections) = config.max_connections {
            pool_options = pool_options.max_connections(max_connections);
        }

        let pool = pool_options.connect_with(options).await?;

        tracing::debug!(connection_string, "connected to sqlite");

        Ok(Self {
            pool,
            connection_string: connection_string.to_string(),
        })
    }

    /// A single connection from the pool. Everything run through it sees the same
    /// snapshot of the schema.
    pub async fn connection(&self) -> crate::Result<PooledSqliteConnection> {
        let connection = self.pool.acquire().await?;

        Ok(PooledSqliteConnection {
            connection: Mutex::new(connection),
            connection_string: self.connection_string.clone(),
        })
    }
}

#[async_trait]
impl Transport for SqliteTransport {
    async fn parameterized_execute(&self, query: &str, params: Vec<Value>) -> crate::Result<i64> {
        executor::execute(&self.pool, query, params).await
    }

    fn parameterized_query<'a>(&'a self, query: &'a str, params: Vec<Value>) -> BoxStream<'a, crate::Result<Value>> {
        executor::query(&self.pool, query, params)
    }

    fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

pub struct PooledSqliteConnection {
    connection: Mutex<PoolConnection<Sqlite>>,
    connection_string: String,
}

#[async_trait]
impl Transport for PooledSqliteConnection {
    async fn parameterized_execute(&self, query: &str, params: Vec<Value>) -> crate::Result<i64> {
        let mut connection = self.connection.lock().await;
        executor::execute(&mut **connection, query, params).await
    }

    fn parameterized_query<'a>(&'a self, query: &'a str, params: Vec<Value>) -> BoxStream<'a, crate::Result<Value>> {
        Box::pin(async_stream::try_stream! {
            let mut connection = self.connection.lock().await;
            let mut rows = executor::query(&mut **connection, query, params);

            while let Some(row) = rows.next().await {
                yield row?;
            }
        })
    }

    fn connection_string(&self) -> &str {
        &self.connection_string
    }
}
