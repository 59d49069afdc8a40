use std::{collections::HashMap, sync::Arc};

use async_graphql::{Response, Variables};
use indexmap::IndexMap;
use sqlite_connector_types::transport::{SqliteTransport, TransportExt};
use sqlite_graphql_config::Config;

use crate::{
    resolver::DatabaseContext, DatabaseSchema, Error, ExecutionBudget, ExecutionLimits, ExtraFields, SchemaCache,
    SqliteTableFetch, TableFetch,
};

/// A GraphQL request as it arrives, before it is bound to a schema. Deserializes
/// from the usual JSON body of GraphQL over HTTP.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    pub query: String,
    #[serde(default)]
    pub operation_name: Option<String>,
    #[serde(default)]
    pub variables: Option<serde_json::Value>,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }

    #[must_use]
    pub fn variables(mut self, variables: serde_json::Value) -> Self {
        self.variables = Some(variables);
        self
    }
}

struct Database {
    transport: Arc<SqliteTransport>,
    fetch: Arc<dyn TableFetch>,
}

/// Serves the registered databases. Schemas are built on first use and rebuilt
/// whenever the schema version of a database moves.
pub struct Engine {
    databases: IndexMap<String, Database>,
    config: Arc<Config>,
    cache: SchemaCache,
    extra_fields: Option<Arc<dyn ExtraFields>>,
}

impl Engine {
    pub fn builder(config: Config) -> EngineBuilder {
        EngineBuilder {
            config,
            databases: IndexMap::new(),
            table_fetches: HashMap::new(),
            extra_fields: None,
        }
    }

    /// The served databases in registration order. The first one answers requests
    /// naming no database.
    pub fn database_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.databases.keys().map(String::as_str)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Runs a request against a database under a fresh execution budget.
    pub async fn execute(&self, database: Option<&str>, request: GraphqlRequest) -> Result<Response, Error> {
        let schema = self.schema(database).await?;
        let budget = ExecutionBudget::new(ExecutionLimits::from_config(&self.config));

        let mut graphql_request = async_graphql::Request::new(request.query).data(budget);

        if let Some(operation_name) = request.operation_name {
            graphql_request = graphql_request.operation_name(operation_name);
        }

        if let Some(variables) = request.variables {
            graphql_request = graphql_request.variables(Variables::from_json(variables));
        }

        Ok(schema.execute(graphql_request).await)
    }

    pub async fn sdl(&self, database: Option<&str>) -> Result<String, Error> {
        Ok(self.schema(database).await?.sdl())
    }

    /// The example query of a table, by its name in the database.
    pub async fn example_query(&self, database: Option<&str>, table: &str) -> Result<Option<String>, Error> {
        let schema = self.schema(database).await?;
        Ok(schema.example_query(table).map(ToString::to_string))
    }

    /// The schema of the current version of a database.
    pub async fn schema(&self, database: Option<&str>) -> Result<Arc<DatabaseSchema>, Error> {
        let (name, database) = match database {
            Some(name) => self
                .databases
                .get_key_value(name)
                .ok_or_else(|| Error::UnknownDatabase(name.to_string()))?,
            None => self.databases.first().ok_or(Error::NoDatabases)?,
        };

        // The version and the introspection must see the same schema.
        let connection = database.transport.connection().await?;
        let version = connection.schema_version().await?;

        let build = async {
            tracing::debug!(database = name, version, "introspecting");

            let registry = parser_sqlite::introspect(&connection, name, &self.config).await?;

            let context = DatabaseContext {
                name: name.clone(),
                registry: Arc::new(registry),
                fetch: database.fetch.clone(),
                transport: database.transport.clone(),
                default_page_size: self.config.default_page_size,
            };

            DatabaseSchema::build(Arc::new(context), self.extra_fields.as_deref())
        };

        self.cache.get_or_build(name, version, build).await
    }
}

pub struct EngineBuilder {
    config: Config,
    databases: IndexMap<String, Arc<SqliteTransport>>,
    table_fetches: HashMap<String, Arc<dyn TableFetch>>,
    extra_fields: Option<Arc<dyn ExtraFields>>,
}

impl EngineBuilder {
    #[must_use]
    pub fn database(mut self, name: impl Into<String>, transport: Arc<SqliteTransport>) -> Self {
        self.databases.insert(name.into(), transport);
        self
    }

    /// Replaces the SQLite table fetch of a database.
    #[must_use]
    pub fn table_fetch(mut self, name: impl Into<String>, fetch: Arc<dyn TableFetch>) -> Self {
        self.table_fetches.insert(name.into(), fetch);
        self
    }

    #[must_use]
    pub fn extra_fields(mut self, extra_fields: Arc<dyn ExtraFields>) -> Self {
        self.extra_fields = Some(extra_fields);
        self
    }

    pub fn build(mut self) -> Result<Engine, Error> {
        self.config.validate(self.databases.keys().map(String::as_str))?;

        let databases = self
            .databases
            .into_iter()
            .map(|(name, transport)| {
                let fetch: Arc<dyn TableFetch> = match self.table_fetches.remove(&name) {
                    Some(fetch) => fetch,
                    None => Arc::new(SqliteTableFetch::new(transport.clone(), &self.config)),
                };

                (name, Database { transport, fetch })
            })
            .collect();

        Ok(Engine {
            databases,
            config: Arc::new(self.config),
            cache: SchemaCache::new(),
            extra_fields: self.extra_fields,
        })
    }
}
