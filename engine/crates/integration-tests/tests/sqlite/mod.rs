mod budget;
mod cache;
mod collections;
mod filters;
mod pagination;
mod relations;
mod rows;
mod schema;

use integration_tests::TestApi;

/// Users owning and maintaining repos, repos with a license and issues keyed by
/// the repo.
pub(crate) const FIXTURE: &str = r#"
    CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, score REAL);
    INSERT INTO users VALUES (1, 'alice', 50.5), (2, 'bob', 10), (3, 'carol', NULL);

    CREATE TABLE licenses (key TEXT PRIMARY KEY, name TEXT);
    INSERT INTO licenses VALUES ('mit', 'MIT License'), ('apache', 'Apache License 2.0');

    CREATE TABLE repos (
        id INTEGER PRIMARY KEY,
        full_name TEXT NOT NULL,
        owner INTEGER REFERENCES users (id),
        maintainer INTEGER REFERENCES users (id),
        license TEXT REFERENCES licenses (key),
        stars INTEGER
    );

    INSERT INTO repos VALUES
        (1, 'alice/datasette', 1, 2, 'apache', 30),
        (2, 'alice/sqlite-utils', 1, 1, 'mit', 20),
        (3, 'bob/dogsheep', 2, NULL, NULL, 10);

    CREATE TABLE issues (
        id INTEGER NOT NULL,
        repo INTEGER NOT NULL REFERENCES repos (id),
        title TEXT,
        PRIMARY KEY (id, repo)
    );

    INSERT INTO issues VALUES (1, 1, 'Crash'), (2, 1, 'Docs'), (1, 2, 'Typo')
"#;

pub(crate) async fn with_fixture(api: &TestApi) {
    api.execute_sql(FIXTURE).await;
}
