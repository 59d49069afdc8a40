use integration_tests::{with_sqlite, TestApi};
use rstest::rstest;
use serde_json::{json, Value};

use super::with_fixture;

/// Follows `endCursor` one row at a time, collecting the field of every row.
async fn walk(api: &TestApi, table: &str, arguments: &str, field: &str) -> Vec<Value> {
    let query = format!(
        "query($after: String) {{ {table}(first: 1, after: $after{arguments}) {{ nodes {{ {field} }} pageInfo {{ hasNextPage endCursor }} }} }}"
    );

    let mut after = Value::Null;
    let mut values = Vec::new();

    loop {
        let response = api.execute_parameterized(query.clone(), json!({ "after": after })).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);

        let data = response.data.into_json().unwrap();
        let page = &data[table];

        values.extend(page["nodes"].as_array().unwrap().iter().map(|node| node[field].clone()));

        if page["pageInfo"]["hasNextPage"] != json!(true) {
            assert_eq!(Value::Null, page["pageInfo"]["endCursor"]);
            break;
        }

        after = page["pageInfo"]["endCursor"].clone();
        assert!(values.len() <= 10, "pagination does not terminate");
    }

    values
}

#[rstest]
#[case::integer_key("users", "", "name", json!(["alice", "bob", "carol"]))]
#[case::text_key("licenses", "", "key", json!(["apache", "mit"]))]
#[case::compound_key("issues", "", "title", json!(["Crash", "Typo", "Docs"]))]
#[case::sorted_with_nulls("users", ", sort: score", "name", json!(["carol", "bob", "alice"]))]
#[case::sorted_descending_with_nulls("users", ", sort_desc: score", "name", json!(["alice", "bob", "carol"]))]
#[case::sorted_with_ties("repos", ", sort: owner", "full_name", json!(["alice/datasette", "alice/sqlite-utils", "bob/dogsheep"]))]
#[case::sorted_compound_key("issues", ", sort_desc: title", "title", json!(["Typo", "Docs", "Crash"]))]
#[case::filtered("users", r#", filter: {score: {notnull: true}}"#, "name", json!(["alice", "bob"]))]
fn every_row_is_visited_once(
    #[case] table: &str,
    #[case] arguments: &str,
    #[case] field: &str,
    #[case] expected: Value,
) {
    let values = with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;
        walk(&api, table, arguments, field).await
    });

    assert_eq!(expected, Value::Array(values));
}

#[rstest]
#[case::untyped_key("things", "", json!(["one", "two", "ten"]))]
#[case::blob_key("files", "", json!(["first", "second", "last"]))]
#[case::sorted_by_blob("digests", ", sort: digest", json!(["low", "mid", "high", "top"]))]
#[case::sorted_descending_by_blob("digests", ", sort_desc: digest", json!(["top", "high", "mid", "low"]))]
fn keys_compare_with_their_stored_types(#[case] table: &str, #[case] arguments: &str, #[case] expected: Value) {
    let values = with_sqlite(TestApi::builder(), |api| async move {
        api.execute_sql(
            r#"
            CREATE TABLE things (id PRIMARY KEY, name TEXT);
            INSERT INTO things VALUES (10, 'ten'), (2, 'two'), (1, 'one');
            CREATE TABLE files (hash BLOB PRIMARY KEY, name TEXT);
            INSERT INTO files VALUES (X'FF00', 'last'), (X'01', 'first'), (X'02', 'second');
            CREATE TABLE digests (id INTEGER PRIMARY KEY, digest BLOB, name TEXT);
            INSERT INTO digests VALUES (1, X'0A', 'mid'), (2, X'01', 'low'), (3, X'F0', 'high'), (4, X'FF', 'top')
            "#,
        )
        .await;

        walk(&api, table, arguments, "name").await
    });

    assert_eq!(expected, Value::Array(values));
}

#[test]
fn empty_cursors_start_from_the_first_row() {
    let data = with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;

        api.execute_as_json(r#"{ users(first: 1, after: "") { nodes { name } } }"#)
            .await
    });

    assert_eq!(json!([{"name": "alice"}]), data["users"]["nodes"]);
}

#[test]
fn rowid_tables() {
    let values = with_sqlite(TestApi::builder(), |api| async move {
        api.execute_sql("CREATE TABLE notes (body TEXT); INSERT INTO notes VALUES ('a'), ('b'), ('c')")
            .await;

        api.execute_sql("DELETE FROM notes WHERE body = 'b'").await;

        walk(&api, "notes", "", "rowid").await
    });

    assert_eq!(json!([1, 3]), Value::Array(values));
}

#[test]
fn cursors_of_deleted_rows_still_page_by_key() {
    let data = with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;
        api.execute_sql("DELETE FROM users WHERE id = 1").await;

        api.execute_as_json(r#"{ users(first: 1, after: "1") { nodes { name } } }"#)
            .await
    });

    assert_eq!(json!([{"name": "bob"}]), data["users"]["nodes"]);
}

#[test]
fn sorted_cursors_of_deleted_rows_fail() {
    let response = with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;
        api.execute_sql("DELETE FROM users WHERE id = 1").await;

        api.execute(r#"{ users(first: 1, after: "1", sort: score) { nodes { name } } }"#)
            .await
    });

    assert_eq!(1, response.errors.len());
    assert_eq!(
        "the row of the pagination cursor no longer exists",
        response.errors[0].message
    );
}

#[test]
fn malformed_cursors_fail() {
    let response = with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;

        api.execute(r#"{ issues(first: 1, after: "1") { nodes { title } } }"#)
            .await
    });

    assert_eq!(1, response.errors.len());
}

#[test]
fn first_zero_returns_only_counts() {
    let data = with_sqlite(TestApi::builder(), |api| async move {
        with_fixture(&api).await;

        api.execute_as_json("{ users(first: 0) { totalCount nodes { name } pageInfo { hasNextPage } } }")
            .await
    });

    assert_eq!(json!(3), data["users"]["totalCount"]);
    assert_eq!(json!([]), data["users"]["nodes"]);
}
