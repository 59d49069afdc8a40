use expect_test::expect;
use indoc::indoc;
use integration_tests::{query_sqlite, with_sqlite, TestApi};
use serde_json::json;

use super::with_fixture;

#[test]
fn rows_by_key() {
    let response = query_sqlite(|api| async move {
        with_fixture(&api).await;

        let query = indoc! {r#"
            {
              users_row(id: 2) { id name }
              licenses_row(key: "mit") { name }
              issues_row(id: 1, repo: 2) { title }
              missing: users_row(id: 9) { name }
            }
        "#};

        api.execute(query).await
    });

    let expected = expect![[r#"
        {
          "data": {
            "users_row": {
              "id": 2,
              "name": "bob"
            },
            "licenses_row": {
              "name": "MIT License"
            },
            "issues_row": {
              "title": "Typo"
            },
            "missing": null
          }
        }"#]];

    expected.assert_eq(&response);
}

#[test]
fn rows_by_rowid() {
    let data = with_sqlite(TestApi::builder(), |api| async move {
        api.execute_sql("CREATE TABLE notes (body TEXT); INSERT INTO notes VALUES ('a'), ('b')")
            .await;

        api.execute_as_json("{ notes_row(rowid: 2) { rowid body } }").await
    });

    assert_eq!(json!({"notes_row": {"rowid": 2, "body": "b"}}), data);
}

#[test]
fn rows_by_filter_and_sort() {
    let data = with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;

        let query = indoc! {r#"
            {
              filtered: users_row(filter: {name: {eq: "carol"}}) { id }
              top: users_row(sort_desc: score) { name }
              view: popular_row { full_name }
            }
        "#};

        api.execute_sql("CREATE VIEW popular AS SELECT full_name FROM repos ORDER BY stars DESC")
            .await;

        api.execute_as_json(query).await
    });

    let expected = json!({
        "filtered": {"id": 3},
        "top": {"name": "alice"},
        "view": {"full_name": "alice/datasette"},
    });

    assert_eq!(expected, data);
}

#[test]
fn rows_do_not_take_first() {
    let response = with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;
        api.execute("{ users_row(first: 2) { name } }").await
    });

    assert_eq!(1, response.errors.len());
    assert!(
        response.errors[0].message.contains("first"),
        "{}",
        response.errors[0].message
    );
}
