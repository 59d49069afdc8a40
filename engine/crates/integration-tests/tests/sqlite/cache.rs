use async_graphql::Response;
use integration_tests::{with_sqlite, TestApi};
use serde_json::json;
use sqlite_graphql::{Engine, Error, GraphqlRequest};
use sqlite_graphql_config::Config;

use super::with_fixture;

#[test]
fn schema_follows_ddl() {
    with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;

        api.execute_as_json("{ users { totalCount } }").await;
        assert_eq!(1, api.engine().cache().len());

        api.execute_sql("ALTER TABLE users ADD COLUMN email TEXT; UPDATE users SET email = 'a@example.com' WHERE id = 1")
            .await;

        let data = api.execute_as_json("{ users_row(id: 1) { email } }").await;

        assert_eq!(json!({"users_row": {"email": "a@example.com"}}), data);
        assert_eq!(1, api.engine().cache().len());
    });
}

#[test]
fn unchanged_schemas_are_reused() {
    with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;

        let first = api.engine().schema(None).await.unwrap();
        api.execute_sql("INSERT INTO users VALUES (4, 'dave', NULL)").await;
        let second = api.engine().schema(None).await.unwrap();

        assert!(std::sync::Arc::ptr_eq(&first, &second));
    });
}

#[test]
fn dropped_tables_leave_the_schema() {
    let response = with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;

        api.execute_as_json("{ issues { totalCount } }").await;
        api.execute_sql("DROP TABLE issues").await;

        api.execute("{ issues { totalCount } }").await
    });

    assert_eq!(1, response.errors.len());
    assert!(response.errors[0].message.contains("issues"));
}

#[test]
fn databases_are_served_side_by_side() {
    let builder = TestApi::builder().database("first").database("second");

    let (default, second): (Response, Response) = with_sqlite(builder, |api| async move {
        api.execute_sql_in("first", "CREATE TABLE a (id INTEGER PRIMARY KEY)").await;
        api.execute_sql_in("second", "CREATE TABLE b (id INTEGER PRIMARY KEY); INSERT INTO b VALUES (1)")
            .await;

        let default = api.execute("{ a { totalCount } }").await;
        let second = api.execute_in("second", "{ b { totalCount } }").await;

        assert_eq!(2, api.engine().cache().len());

        (default, second)
    });

    assert_eq!(json!({"a": {"totalCount": 0}}), default.data.into_json().unwrap());
    assert_eq!(json!({"b": {"totalCount": 1}}), second.data.into_json().unwrap());
}

#[test]
fn ddl_invalidates_only_its_database() {
    let builder = TestApi::builder().database("first").database("second");

    with_sqlite(builder, |api| async move {
        api.execute_sql_in("first", "CREATE TABLE a (id INTEGER PRIMARY KEY)").await;
        api.execute_sql_in("second", "CREATE TABLE b (id INTEGER PRIMARY KEY)").await;

        let first = api.engine().schema(Some("first")).await.unwrap();
        let second = api.engine().schema(Some("second")).await.unwrap();

        api.execute_sql_in("second", "CREATE TABLE c (id INTEGER PRIMARY KEY)").await;

        let data = api.execute_in("second", "{ c { totalCount } }").await;
        assert!(data.errors.is_empty(), "{:?}", data.errors);

        assert!(std::sync::Arc::ptr_eq(&first, &api.engine().schema(Some("first")).await.unwrap()));
        assert!(!std::sync::Arc::ptr_eq(&second, &api.engine().schema(Some("second")).await.unwrap()));
        assert_eq!(2, api.engine().cache().len());
    });
}

#[test]
fn unknown_databases() {
    with_sqlite(TestApi::builder(), |api| async move {
        let result = api.engine().execute(Some("nope"), GraphqlRequest::new("{ empty }")).await;

        assert!(matches!(result, Err(Error::UnknownDatabase(name)) if name == "nope"));
    });
}

#[test]
fn configured_databases_must_be_connected() {
    let config: Config = "[databases.missing]".parse().unwrap();

    let error = Engine::builder(config).build().err().unwrap();

    assert_eq!("database missing is configured but not connected", error.to_string());
}
