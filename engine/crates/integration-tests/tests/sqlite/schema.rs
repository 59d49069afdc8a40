use async_graphql::dynamic::{Field, FieldFuture, FieldValue, TypeRef};
use expect_test::expect;
use indoc::indoc;
use integration_tests::{query_sqlite, with_sqlite, TestApi};
use serde_json::json;
use sqlite_graphql::ExtraFields;
use sqlite_graphql_config::Config;

use super::with_fixture;

#[test]
fn sdl_describes_tables() {
    let sdl = with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;
        api.sdl().await
    });

    let fragments = [
        "type usersCollection",
        "type usersEdge",
        "input usersFilter",
        "enum usersSortDesc",
        "repos_by_owner_list(",
        "repos_by_maintainer_list(",
        "type PageInfo",
        "input FloatOperations",
        "scalar GenericScalar",
    ];

    for fragment in fragments {
        assert!(sdl.contains(fragment), "missing {fragment:?} in\n{sdl}");
    }
}

#[test]
fn empty_databases_still_have_a_schema() {
    let response = query_sqlite(|api| async move { api.execute("{ empty }").await });

    let expected = expect![[r#"
        {
          "data": {
            "empty": "schema"
          }
        }"#]];

    expected.assert_eq(&response);
}

#[test]
fn hidden_tables_are_left_out() {
    let config: Config = indoc! {r#"
        [databases.test.tables.licenses]
        hidden = true
    "#}
    .parse()
    .unwrap();

    let sdl = with_sqlite(TestApi::builder().config(config), |api| async move {
        with_fixture(&api).await;
        api.sdl().await
    });

    assert!(!sdl.contains("licenses"), "{sdl}");
    assert!(sdl.contains("license: String"), "{sdl}");
}

#[test]
fn awkward_names_are_sanitized() {
    let data = with_sqlite(TestApi::builder(), |api| async move {
        api.execute_sql(indoc! {r#"
            CREATE TABLE "1 weird table" ("the column" TEXT, "__typename" TEXT);
            INSERT INTO "1 weird table" VALUES ('a', 'b')
        "#})
        .await;

        let sdl = api.sdl().await;
        assert!(sdl.contains("_1_weird_table"), "{sdl}");

        api.execute_as_json("{ _1_weird_table { nodes { the_column } } }").await
    });

    assert_eq!(json!({"_1_weird_table": {"nodes": [{"the_column": "a"}]}}), data);
}

#[test]
fn example_queries() {
    let query = with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;
        api.engine().example_query(None, "repos").await.unwrap().unwrap()
    });

    let expected = expect![[r#"
        {
          repos {
            totalCount
            pageInfo {
              hasNextPage
              endCursor
            }
            nodes {
              id
              full_name
              stars
              owner {
                id
                name
              }
              maintainer {
                id
                name
              }
              license {
                key
                name
              }
            }
          }
        }"#]];

    expected.assert_eq(&query);
}

struct Version;

impl ExtraFields for Version {
    fn fields(&self, database: &str) -> Vec<Field> {
        let database = database.to_string();

        let field = Field::new("version", TypeRef::named_nn(TypeRef::STRING), move |_| {
            let database = database.clone();

            FieldFuture::new(async move {
                Ok::<_, async_graphql::Error>(Some(FieldValue::value(format!("{database} 1.0"))))
            })
        });

        vec![field]
    }
}

#[test]
fn extra_fields_join_the_root() {
    let data = with_sqlite(TestApi::builder().extra_fields(Version), |api| async move {
        with_fixture(&api).await;
        api.execute_as_json("{ version users { totalCount } }").await
    });

    assert_eq!(json!({"version": "test 1.0", "users": {"totalCount": 3}}), data);
}

#[test]
fn operations_are_picked_by_name() {
    let data = with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;

        let query = indoc! {r#"
            query Users { users { totalCount } }
            query Repos { repos { totalCount } }
        "#};

        let request = sqlite_graphql::GraphqlRequest::new(query).operation_name("Repos");
        let response = api.execute_request(None, request).await;

        response.data.into_json().unwrap()
    });

    assert_eq!(json!({"repos": {"totalCount": 3}}), data);
}
