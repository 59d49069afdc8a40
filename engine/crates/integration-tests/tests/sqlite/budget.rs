use integration_tests::{with_sqlite, TestApi};
use sqlite_graphql_config::Config;

use super::with_fixture;

fn limited_to(num_queries_limit: u64) -> integration_tests::sqlite::TestApiBuilder {
    let config = Config {
        num_queries_limit,
        ..Default::default()
    };

    TestApi::builder().config(config)
}

#[test]
fn query_limit_fails_the_fetch_going_over() {
    let response = with_sqlite(limited_to(2), |api| async move {
        with_fixture(&api).await;

        api.execute("{ a: users { totalCount } b: users { totalCount } c: users { totalCount } }")
            .await
    });

    assert_eq!(1, response.errors.len());

    let message = &response.errors[0].message;
    assert!(message.starts_with("Query limit exceeded: 3 > 2 - /test/users.json?_size=10"), "{message}");

    let data = response.data.into_json().unwrap();
    let resolved = ["a", "b", "c"].iter().filter(|field| !data[**field].is_null()).count();

    assert_eq!(2, resolved);
}

#[test]
fn nested_collections_count_per_parent_row() {
    let response = with_sqlite(limited_to(3), |api| async move {
        with_fixture(&api).await;

        api.execute("{ repos { nodes { issues_list { totalCount } } } }").await
    });

    // One fetch for repos and one per repo.
    assert_eq!(1, response.errors.len());
    assert!(response.errors[0].message.contains("/test/issues.json"));
}

#[test]
fn foreign_key_lookups_are_free() {
    let data = with_sqlite(limited_to(1), |api| async move {
        with_fixture(&api).await;

        api.execute_as_json("{ repos { nodes { owner { name } license { name } } } }")
            .await
    });

    assert_eq!("alice", data["repos"]["nodes"][0]["owner"]["name"]);
}

#[test]
fn every_request_starts_a_fresh_budget() {
    with_sqlite(limited_to(1), |api| async move {
        with_fixture(&api).await;

        for _ in 0..3 {
            let data = api.execute_as_json("{ users { totalCount } }").await;
            assert_eq!(3, data["users"]["totalCount"]);
        }
    });
}

#[test]
fn zero_disables_the_limits() {
    let config = Config {
        num_queries_limit: 0,
        time_limit_ms: 0,
        ..Default::default()
    };

    with_sqlite(TestApi::builder().config(config), |api| async move {
        with_fixture(&api).await;

        let fields = (0..150).map(|i| format!("u{i}: users {{ totalCount }}")).collect::<Vec<_>>();
        let data = api.execute_as_json(format!("{{ {} }}", fields.join(" "))).await;

        assert_eq!(3, data["u149"]["totalCount"]);
    });
}
