#![allow(unused_crate_dependencies, clippy::panic)]

pub mod sqlite;

use std::sync::OnceLock;

use tokio::runtime::Runtime;

pub use sqlite::{query_sqlite, query_sqlite_with_config, with_sqlite, TestApi};

pub fn runtime() -> &'static Runtime {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| Runtime::new().unwrap())
}
