use async_trait::async_trait;
use futures::TryStreamExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::Transport;
use crate::Error;

#[async_trait]
pub trait TransportExt: Transport {
    /// Runs the query and deserializes every row.
    async fn collect_query<T>(&self, query: &str, params: Vec<Value>) -> crate::Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.parameterized_query(query, params)
            .and_then(|row| async move { serde_json::from_value(row).map_err(|error| Error::Decode(error.to_string())) })
            .try_collect()
            .await
    }

    /// The counter SQLite bumps on every schema change.
    async fn schema_version(&self) -> crate::Result<i64> {
        #[derive(serde::Deserialize)]
        struct Row {
            schema_version: i64,
        }

        let rows: Vec<Row> = self.collect_query("PRAGMA schema_version", Vec::new()).await?;

        rows.first()
            .map(|row| row.schema_version)
            .ok_or_else(|| Error::Query("PRAGMA schema_version returned no rows".to_string()))
    }
}

impl<T> TransportExt for T where T: Transport + ?Sized {}
