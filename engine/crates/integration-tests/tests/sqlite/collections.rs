use expect_test::expect;
use indoc::indoc;
use integration_tests::{query_sqlite, query_sqlite_with_config};
use sqlite_graphql_config::Config;

use super::with_fixture;

#[test]
fn collection_with_counts_and_page_info() {
    let response = query_sqlite(|api| async move {
        with_fixture(&api).await;

        let query = indoc! {r#"
            {
              users {
                totalCount
                pageInfo { hasNextPage endCursor }
                nodes { id name score }
              }
            }
        "#};

        api.execute(query).await
    });

    let expected = expect![[r#"
        {
          "data": {
            "users": {
              "totalCount": 3,
              "pageInfo": {
                "hasNextPage": false,
                "endCursor": null
              },
              "nodes": [
                {
                  "id": 1,
                  "name": "alice",
                  "score": 50.5
                },
                {
                  "id": 2,
                  "name": "bob",
                  "score": 10.0
                },
                {
                  "id": 3,
                  "name": "carol",
                  "score": null
                }
              ]
            }
          }
        }"#]];

    expected.assert_eq(&response);
}

#[test]
fn edges_carry_cursors() {
    let response = query_sqlite(|api| async move {
        with_fixture(&api).await;

        let query = indoc! {r#"
            {
              users(first: 2) {
                totalCount
                edges { cursor node { name } }
                pageInfo { hasNextPage endCursor }
              }
            }
        "#};

        api.execute(query).await
    });

    let expected = expect![[r#"
        {
          "data": {
            "users": {
              "totalCount": 3,
              "edges": [
                {
                  "cursor": "1",
                  "node": {
                    "name": "alice"
                  }
                },
                {
                  "cursor": "2",
                  "node": {
                    "name": "bob"
                  }
                }
              ],
              "pageInfo": {
                "hasNextPage": true,
                "endCursor": "2"
              }
            }
          }
        }"#]];

    expected.assert_eq(&response);
}

#[test]
fn compound_keys_join_cursor_components() {
    let response = query_sqlite(|api| async move {
        with_fixture(&api).await;

        api.execute("{ issues(first: 1) { edges { cursor node { title } } } }")
            .await
    });

    let expected = expect![[r#"
        {
          "data": {
            "issues": {
              "edges": [
                {
                  "cursor": "1,1",
                  "node": {
                    "title": "Crash"
                  }
                }
              ]
            }
          }
        }"#]];

    expected.assert_eq(&response);
}

#[test]
fn json_columns_are_decoded() {
    let config: Config = indoc! {r#"
        [databases.test.tables.events]
        json_columns = ["payload"]
    "#}
    .parse()
    .unwrap();

    let response = query_sqlite_with_config(config, |api| async move {
        api.execute_sql(indoc! {r#"
            CREATE TABLE events (id INTEGER PRIMARY KEY, payload TEXT);
            INSERT INTO events VALUES (1, '{"tags": ["a", "b"], "size": 2}'), (2, NULL)
        "#})
        .await;

        api.execute("{ events { nodes { id payload } } }").await
    });

    let expected = expect![[r#"
        {
          "data": {
            "events": {
              "nodes": [
                {
                  "id": 1,
                  "payload": {
                    "tags": [
                      "a",
                      "b"
                    ],
                    "size": 2
                  }
                },
                {
                  "id": 2,
                  "payload": null
                }
              ]
            }
          }
        }"#]];

    expected.assert_eq(&response);
}

#[test]
fn blobs_are_base64() {
    let response = query_sqlite(|api| async move {
        api.execute_sql(indoc! {r#"
            CREATE TABLE files (name TEXT PRIMARY KEY, data BLOB);
            INSERT INTO files VALUES ('hello.txt', X'68656C6C6F')
        "#})
        .await;

        api.execute("{ files { nodes { name data } } }").await
    });

    let expected = expect![[r#"
        {
          "data": {
            "files": {
              "nodes": [
                {
                  "name": "hello.txt",
                  "data": "aGVsbG8="
                }
              ]
            }
          }
        }"#]];

    expected.assert_eq(&response);
}

#[test]
fn views_page_by_offset() {
    let response = query_sqlite(|api| async move {
        with_fixture(&api).await;
        api.execute_sql("CREATE VIEW big_repos AS SELECT full_name, stars FROM repos WHERE stars >= 20 ORDER BY id")
            .await;

        let query = indoc! {r#"
            {
              first: big_repos(first: 1) {
                totalCount
                edges { cursor node { full_name } }
                pageInfo { hasNextPage endCursor }
              }
              second: big_repos(first: 1, after: "1") {
                edges { cursor node { full_name } }
                pageInfo { hasNextPage endCursor }
              }
            }
        "#};

        api.execute(query).await
    });

    let expected = expect![[r#"
        {
          "data": {
            "first": {
              "totalCount": 2,
              "edges": [
                {
                  "cursor": "1",
                  "node": {
                    "full_name": "alice/datasette"
                  }
                }
              ],
              "pageInfo": {
                "hasNextPage": true,
                "endCursor": "1"
              }
            },
            "second": {
              "edges": [
                {
                  "cursor": "2",
                  "node": {
                    "full_name": "alice/sqlite-utils"
                  }
                }
              ],
              "pageInfo": {
                "hasNextPage": false,
                "endCursor": null
              }
            }
          }
        }"#]];

    expected.assert_eq(&response);
}

#[test]
fn first_over_the_maximum_is_an_error() {
    let config = Config {
        max_page_size: 2,
        ..Default::default()
    };

    let response = query_sqlite_with_config(config, |api| async move {
        with_fixture(&api).await;
        api.execute("{ users(first: 3) { totalCount } }").await
    });

    let response: serde_json::Value = serde_json::from_str(&response).unwrap();

    assert_eq!(
        "first must be between 0 and 2, got 3",
        response["errors"][0]["message"].as_str().unwrap()
    );
}

#[test]
fn camelcase_names() {
    let config = Config {
        auto_camelcase: true,
        ..Default::default()
    };

    let response = query_sqlite_with_config(config, |api| async move {
        with_fixture(&api).await;

        let query = indoc! {r#"
            {
              usersRow(id: 1) {
                reposByOwnerList(sortDesc: full_name) {
                  nodes { fullName }
                }
              }
            }
        "#};

        api.execute(query).await
    });

    let expected = expect![[r#"
        {
          "data": {
            "usersRow": {
              "reposByOwnerList": {
                "nodes": [
                  {
                    "fullName": "alice/sqlite-utils"
                  },
                  {
                    "fullName": "alice/datasette"
                  }
                ]
              }
            }
          }
        }"#]];

    expected.assert_eq(&response);
}
