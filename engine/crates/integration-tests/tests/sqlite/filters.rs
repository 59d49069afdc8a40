use expect_test::expect;
use indoc::indoc;
use integration_tests::{query_sqlite, query_sqlite_with_config, with_sqlite, TestApi};
use rstest::rstest;
use serde_json::json;
use sqlite_graphql_config::Config;

use super::with_fixture;

fn names(data: &serde_json::Value, field: &str, column: &str) -> Vec<String> {
    data[field]["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|node| node[column].as_str().unwrap().to_string())
        .collect()
}

#[rstest]
#[case::numeric_string(r#"{score: {gt: "50"}}"#, &["alice"])]
#[case::number(r#"{score: {lte: 10}}"#, &["bob"])]
#[case::is_null(r#"{score: {isnull: true}}"#, &["carol"])]
#[case::false_flags_are_ignored(r#"{score: {isnull: false}}"#, &["alice", "bob", "carol"])]
#[case::not_null(r#"{score: {notnull: true}}"#, &["alice", "bob"])]
#[case::equal(r#"{name: {eq: "bob"}}"#, &["bob"])]
#[case::not_equal(r#"{name: {not: "bob"}}"#, &["alice", "carol"])]
#[case::contains(r#"{name: {contains: "ar"}}"#, &["carol"])]
#[case::starts_with(r#"{name: {startswith: "b"}}"#, &["bob"])]
#[case::ends_with(r#"{name: {endswith: "e"}}"#, &["alice"])]
#[case::like(r#"{name: {like: "%o%"}}"#, &["bob", "carol"])]
#[case::glob(r#"{name: {glob: "?l*"}}"#, &["alice"])]
#[case::in_list(r#"{name: {in: ["carol", "alice"]}}"#, &["alice", "carol"])]
#[case::not_in_list(r#"{name: {notin: ["carol", "alice"]}}"#, &["bob"])]
#[case::conditions_in_a_group_are_anded(r#"{name: {like: "%o%"}, score: {isnull: true}}"#, &["carol"])]
#[case::groups_are_ored(r#"[{name: {eq: "alice"}}, {score: {isnull: true}}]"#, &["alice", "carol"])]
#[case::empty_groups_match_everything(r#"[{name: {eq: "alice"}}, {}]"#, &["alice", "bob", "carol"])]
fn user_filters(#[case] filter: &str, #[case] expected: &[&str]) {
    let query = format!("{{ users(filter: {filter}) {{ totalCount nodes {{ name }} }} }}");

    let data = with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;
        api.execute_as_json(query).await
    });

    assert_eq!(expected, names(&data, "users", "name"));
    assert_eq!(json!(expected.len()), data["users"]["totalCount"]);
}

#[test]
fn filters_on_foreign_key_columns() {
    let data = with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;

        api.execute_as_json(r#"{ repos(filter: [{stars: {gte: 30}}, {owner: {eq: 2}}]) { nodes { full_name } } }"#)
            .await
    });

    assert_eq!(vec!["alice/datasette", "bob/dogsheep"], names(&data, "repos", "full_name"));
}

#[test]
fn filters_with_variables() {
    let data = with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;

        let query = "query($filter: [usersFilter]) { users(filter: $filter) { nodes { name } } }";
        let response = api
            .execute_parameterized(query, json!({"filter": [{"name": {"eq": "carol"}}]}))
            .await;

        response.data.into_json().unwrap()
    });

    assert_eq!(vec!["carol"], names(&data, "users", "name"));
}

#[test]
fn raw_where_clauses() {
    let response = query_sqlite(|api| async move {
        with_fixture(&api).await;

        api.execute(r#"{ repos(where: "stars > 15", filter: {owner: {eq: 1}}) { totalCount nodes { full_name } } }"#)
            .await
    });

    let expected = expect![[r#"
        {
          "data": {
            "repos": {
              "totalCount": 2,
              "nodes": [
                {
                  "full_name": "alice/datasette"
                },
                {
                  "full_name": "alice/sqlite-utils"
                }
              ]
            }
          }
        }"#]];

    expected.assert_eq(&response);
}

#[test]
fn raw_where_can_be_disabled() {
    let config = Config {
        allow_raw_where: false,
        ..Default::default()
    };

    let response = query_sqlite_with_config(config, |api| async move {
        with_fixture(&api).await;
        api.execute(r#"{ repos(where: "stars > 15") { totalCount } }"#).await
    });

    let response: serde_json::Value = serde_json::from_str(&response).unwrap();

    assert_eq!(json!(null), response["data"]["repos"]);
    assert_eq!("where clauses are disabled", response["errors"][0]["message"]);
}

#[rstest]
#[case::ascending_puts_nulls_first("sort: score", &["carol", "bob", "alice"])]
#[case::descending_puts_nulls_last("sort_desc: score", &["alice", "bob", "carol"])]
#[case::descending_wins("sort: name, sort_desc: score", &["alice", "bob", "carol"])]
#[case::text("sort_desc: name", &["carol", "bob", "alice"])]
fn sorting(#[case] arguments: &str, #[case] expected: &[&str]) {
    let query = format!("{{ users({arguments}) {{ nodes {{ name }} }} }}");

    let data = with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;
        api.execute_as_json(query).await
    });

    assert_eq!(expected, names(&data, "users", "name"));
}

#[test]
fn full_text_search() {
    let data = with_sqlite(TestApi::builder(), |api| async move {
        api.execute_sql(
            r#"
            CREATE TABLE docs (id INTEGER PRIMARY KEY, title TEXT, body TEXT);
            INSERT INTO docs VALUES (1, 'Intro', 'sqlite is small'), (2, 'Guide', 'graphql over sqlite'), (3, 'Misc', 'other things');
            CREATE VIRTUAL TABLE docs_fts USING fts5 (title, body, content="docs", content_rowid="id");
            INSERT INTO docs_fts (docs_fts) VALUES ('rebuild')
            "#,
        )
        .await;

        api.execute_as_json(r#"{ docs(search: "sqlite") { totalCount nodes { title } } misc: docs(search: "\"other things\"") { nodes { title } } }"#)
            .await
    });

    assert_eq!(json!(2), data["docs"]["totalCount"]);
    assert_eq!(vec!["Intro", "Guide"], names(&data, "docs", "title"));
    assert_eq!(vec!["Misc"], names(&data, "misc", "title"));
}

#[test]
fn empty_where_and_search_are_ignored() {
    let data = with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;

        api.execute_sql(
            r#"
            CREATE TABLE docs (id INTEGER PRIMARY KEY, title TEXT, body TEXT);
            INSERT INTO docs VALUES (1, 'Intro', 'sqlite is small'), (2, 'Guide', 'graphql over sqlite');
            CREATE VIRTUAL TABLE docs_fts USING fts5 (title, body, content="docs", content_rowid="id");
            INSERT INTO docs_fts (docs_fts) VALUES ('rebuild')
            "#,
        )
        .await;

        api.execute_as_json(indoc! {r#"
            {
              users(where: "") { totalCount }
              docs(search: "") { totalCount }
              blank: docs(search: "   ") { totalCount }
              quotes: docs(search: "\"\"") { totalCount }
            }
        "#})
        .await
    });

    assert_eq!(json!(3), data["users"]["totalCount"]);
    assert_eq!(json!(2), data["docs"]["totalCount"]);
    assert_eq!(json!(2), data["blank"]["totalCount"]);
    assert_eq!(json!(2), data["quotes"]["totalCount"]);
}
