use std::{future::Future, panic::AssertUnwindSafe, sync::Arc};

use async_graphql::Response;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use sqlite_connector_types::transport::{PoolingConfig, SqliteTransport, Transport, TransportExt};
use sqlite_graphql::{Engine, ExtraFields, GraphqlRequest};
use sqlite_graphql_config::Config;
use tempfile::TempDir;

/// The name of the database a [`TestApi`] serves by default.
pub const DATABASE: &str = "test";

/// Runs the test against a fresh database with the default configuration and
/// returns the response as pretty JSON.
#[track_caller]
pub fn query_sqlite<F, U>(test: F) -> String
where
    F: FnOnce(TestApi) -> U,
    U: Future<Output = Response>,
{
    query_sqlite_with_config(Config::default(), test)
}

#[track_caller]
pub fn query_sqlite_with_config<F, U>(config: Config, test: F) -> String
where
    F: FnOnce(TestApi) -> U,
    U: Future<Output = Response>,
{
    let response = with_sqlite(TestApi::builder().config(config), test);
    serde_json::to_string_pretty(&response).unwrap()
}

/// Runs the test against the databases of the builder.
#[track_caller]
pub fn with_sqlite<F, U, T>(builder: TestApiBuilder, test: F) -> T
where
    F: FnOnce(TestApi) -> U,
    U: Future<Output = T>,
{
    super::runtime().block_on(async {
        let api = builder.build().await;
        let result = AssertUnwindSafe(test(api)).catch_unwind().await;

        result.expect("Error in test execution.")
    })
}

pub struct TestApiBuilder {
    config: Config,
    databases: Vec<String>,
    extra_fields: Option<Arc<dyn ExtraFields>>,
}

impl TestApiBuilder {
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Serves another database. The first one answers requests naming none.
    #[must_use]
    pub fn database(mut self, name: &str) -> Self {
        self.databases.push(name.to_string());
        self
    }

    #[must_use]
    pub fn extra_fields(mut self, extra_fields: impl ExtraFields + 'static) -> Self {
        self.extra_fields = Some(Arc::new(extra_fields));
        self
    }

    pub async fn build(self) -> TestApi {
        let dir = tempfile::tempdir().unwrap();

        let names = if self.databases.is_empty() {
            vec![DATABASE.to_string()]
        } else {
            self.databases
        };

        let mut builder = Engine::builder(self.config);
        let mut transports = Vec::new();

        for name in names {
            let path = dir.path().join(format!("{name}.db"));

            let pooling = PoolingConfig {
                create_if_missing: true,
                ..Default::default()
            };

            let transport = Arc::new(SqliteTransport::new(path.to_str().unwrap(), pooling).await.unwrap());

            builder = builder.database(&name, transport.clone());
            transports.push((name, transport));
        }

        if let Some(extra_fields) = self.extra_fields {
            builder = builder.extra_fields(extra_fields);
        }

        let inner = Inner {
            engine: builder.build().unwrap(),
            transports,
            _dir: dir,
        };

        TestApi { inner: Arc::new(inner) }
    }
}

struct Inner {
    engine: Engine,
    transports: Vec<(String, Arc<SqliteTransport>)>,
    _dir: TempDir,
}

#[derive(Clone)]
pub struct TestApi {
    inner: Arc<Inner>,
}

impl TestApi {
    pub fn builder() -> TestApiBuilder {
        TestApiBuilder {
            config: Config::default(),
            databases: Vec::new(),
            extra_fields: None,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.inner.engine
    }

    fn transport(&self, database: &str) -> &SqliteTransport {
        self.inner
            .transports
            .iter()
            .find(|(name, _)| name == database)
            .map(|(_, transport)| transport.as_ref())
            .unwrap()
    }

    /// Runs the statements against the first database.
    pub async fn execute_sql(&self, sql: &str) {
        let database = self.inner.transports[0].0.clone();
        self.execute_sql_in(&database, sql).await;
    }

    /// Runs the statements on one connection, so connection pragmas such as
    /// `foreign_keys` hold for the statements after them.
    pub async fn execute_sql_in(&self, database: &str, sql: &str) {
        let connection = self.transport(database).connection().await.unwrap();

        for statement in sql.split(';').filter(|statement| !statement.trim().is_empty()) {
            connection.execute(statement).await.expect("error in query execute");
        }
    }

    pub async fn query_sql<T>(&self, query: &str) -> Vec<T>
    where
        T: DeserializeOwned + Send,
    {
        let database = &self.inner.transports[0].0;

        self.transport(database)
            .collect_query(query, Vec::new())
            .await
            .expect("error in query")
    }

    pub async fn execute(&self, query: impl Into<String>) -> Response {
        self.execute_request(None, GraphqlRequest::new(query)).await
    }

    pub async fn execute_in(&self, database: &str, query: impl Into<String>) -> Response {
        self.execute_request(Some(database), GraphqlRequest::new(query)).await
    }

    pub async fn execute_parameterized(&self, query: impl Into<String>, variables: serde_json::Value) -> Response {
        self.execute_request(None, GraphqlRequest::new(query).variables(variables))
            .await
    }

    pub async fn execute_request(&self, database: Option<&str>, request: GraphqlRequest) -> Response {
        self.inner.engine.execute(database, request).await.unwrap()
    }

    /// The response data as JSON, asserting there are no errors.
    pub async fn execute_as_json(&self, query: impl Into<String>) -> serde_json::Value {
        let response = self.execute(query).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);

        response.data.into_json().unwrap()
    }

    pub async fn sdl(&self) -> String {
        self.inner.engine.sdl(None).await.unwrap()
    }
}
