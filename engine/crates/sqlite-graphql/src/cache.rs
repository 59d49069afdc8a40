use std::{future::Future, sync::Arc};

use dashmap::DashMap;

use crate::DatabaseSchema;

/// The built schemas by database and schema version.
///
/// Lookups never wait on each other. Two requests missing the same key at the
/// same time may both build, the later insert wins.
#[derive(Default)]
pub struct SchemaCache {
    schemas: DashMap<(String, i64), Arc<DatabaseSchema>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, database: &str, version: i64) -> Option<Arc<DatabaseSchema>> {
        self.schemas
            .get(&(database.to_string(), version))
            .map(|schema| schema.value().clone())
    }

    /// The cached schema, or the one `build` produces, replacing the schemas of
    /// older versions of the database.
    pub async fn get_or_build<F, E>(&self, database: &str, version: i64, build: F) -> Result<Arc<DatabaseSchema>, E>
    where
        F: Future<Output = Result<DatabaseSchema, E>>,
    {
        if let Some(schema) = self.get(database, version) {
            return Ok(schema);
        }

        let schema = Arc::new(build.await?);

        tracing::info!(database, version, "built a new schema");

        self.insert(database, version, schema.clone());

        Ok(schema)
    }

    pub fn insert(&self, database: &str, version: i64, schema: Arc<DatabaseSchema>) {
        self.schemas.insert((database.to_string(), version), schema);

        self.schemas.retain(|(cached_database, cached_version), _| {
            let stale = cached_database == database && *cached_version != version;

            if stale {
                tracing::info!(database, version = cached_version, "pruned a stale schema");
            }

            !stale
        });
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
