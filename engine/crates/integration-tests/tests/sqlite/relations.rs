use expect_test::expect;
use indoc::indoc;
use integration_tests::query_sqlite;

use super::with_fixture;

#[test]
fn foreign_keys_resolve_to_rows() {
    let response = query_sqlite(|api| async move {
        with_fixture(&api).await;

        let query = indoc! {r#"
            {
              repos {
                nodes {
                  full_name
                  owner { name }
                  maintainer { name }
                  license { key name }
                }
              }
            }
        "#};

        api.execute(query).await
    });

    let expected = expect![[r#"
        {
          "data": {
            "repos": {
              "nodes": [
                {
                  "full_name": "alice/datasette",
                  "owner": {
                    "name": "alice"
                  },
                  "maintainer": {
                    "name": "bob"
                  },
                  "license": {
                    "key": "apache",
                    "name": "Apache License 2.0"
                  }
                },
                {
                  "full_name": "alice/sqlite-utils",
                  "owner": {
                    "name": "alice"
                  },
                  "maintainer": {
                    "name": "alice"
                  },
                  "license": {
                    "key": "mit",
                    "name": "MIT License"
                  }
                },
                {
                  "full_name": "bob/dogsheep",
                  "owner": {
                    "name": "bob"
                  },
                  "maintainer": null,
                  "license": null
                }
              ]
            }
          }
        }"#]];

    expected.assert_eq(&response);
}

#[test]
fn reverse_relations_are_collections() {
    let response = query_sqlite(|api| async move {
        with_fixture(&api).await;

        let query = indoc! {r#"
            {
              users_row(id: 1) {
                repos_by_owner_list(sort_desc: stars) {
                  totalCount
                  nodes { full_name }
                }
                repos_by_maintainer_list {
                  totalCount
                  nodes { full_name }
                }
              }
              licenses_row(key: "apache") {
                repos_list { totalCount }
              }
            }
        "#};

        api.execute(query).await
    });

    let expected = expect![[r#"
        {
          "data": {
            "users_row": {
              "repos_by_owner_list": {
                "totalCount": 2,
                "nodes": [
                  {
                    "full_name": "alice/datasette"
                  },
                  {
                    "full_name": "alice/sqlite-utils"
                  }
                ]
              },
              "repos_by_maintainer_list": {
                "totalCount": 1,
                "nodes": [
                  {
                    "full_name": "alice/sqlite-utils"
                  }
                ]
              }
            },
            "licenses_row": {
              "repos_list": {
                "totalCount": 1
              }
            }
          }
        }"#]];

    expected.assert_eq(&response);
}

#[test]
fn nested_relations_paginate() {
    let response = query_sqlite(|api| async move {
        with_fixture(&api).await;

        let query = indoc! {r#"
            {
              repos(first: 1) {
                nodes {
                  full_name
                  issues_list(first: 1) {
                    totalCount
                    nodes { title repo { owner { name } } }
                    pageInfo { hasNextPage endCursor }
                  }
                }
              }
            }
        "#};

        api.execute(query).await
    });

    let expected = expect![[r#"
        {
          "data": {
            "repos": {
              "nodes": [
                {
                  "full_name": "alice/datasette",
                  "issues_list": {
                    "totalCount": 2,
                    "nodes": [
                      {
                        "title": "Crash",
                        "repo": {
                          "owner": {
                            "name": "alice"
                          }
                        }
                      }
                    ],
                    "pageInfo": {
                      "hasNextPage": true,
                      "endCursor": "1,1"
                    }
                  }
                }
              ]
            }
          }
        }"#]];

    expected.assert_eq(&response);
}

#[test]
fn unmatched_foreign_keys_are_null() {
    let response = query_sqlite(|api| async move {
        with_fixture(&api).await;

        api.execute_sql("PRAGMA foreign_keys = OFF; INSERT INTO repos VALUES (4, 'eve/ghost', 9, NULL, 'gpl', 0)")
            .await;

        api.execute("{ repos_row(id: 4) { full_name owner { name } license { name } } }")
            .await
    });

    let expected = expect![[r#"
        {
          "data": {
            "repos_row": {
              "full_name": "eve/ghost",
              "owner": null,
              "license": null
            }
          }
        }"#]];

    expected.assert_eq(&response);
}
