//! The table fetch seam: a page of rows of one table, filtered, sorted and
//! paginated. Resolvers only shape the parameters and consume the page.

mod sqlite;

pub use sqlite::SqliteTableFetch;

use async_trait::async_trait;
use graphql_cursor::{CursorError, GraphqlCursor};
use serde_json::{Map, Value};
use sqlite_connector_types::{database_definition::TableWalker, filter::FilterOperator};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] sqlite_connector_types::Error),
    #[error("first must be between 0 and {max}, got {requested}")]
    PageSize { requested: i64, max: u64 },
    #[error(transparent)]
    Cursor(#[from] CursorError),
    #[error("the row of the pagination cursor no longer exists")]
    CursorRowMissing,
    #[error("where clauses are disabled")]
    RawWhereDisabled,
}

/// One column predicate. List operands arrive joined with commas.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    /// The column name in the database.
    pub column: String,
    pub operator: FilterOperator,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EqualityConstraint {
    /// The column name in the database, or `rowid`.
    pub column: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub column: String,
    pub descending: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableFetchParams {
    /// The conditions of one group are AND-ed, the groups OR-ed.
    pub filters: Vec<Vec<FilterCondition>>,
    /// An SQL expression AND-ed to the conditions as is.
    pub raw_where: Option<String>,
    pub sort: Option<Sort>,
    pub search: Option<String>,
    pub page_size: i64,
    pub after: Option<GraphqlCursor>,
    /// Primary key lookups of single row fields.
    pub key_constraints: Vec<EqualityConstraint>,
    /// The foreign key to the parent row of a reverse relation.
    pub related: Option<EqualityConstraint>,
}

impl TableFetchParams {
    /// The fetch as a Datasette style table URL, naming it in budget errors.
    pub fn path(&self, database: &str, table: &str) -> String {
        let mut pairs = Vec::new();

        for condition in self.filters.iter().flatten() {
            pairs.push((
                format!("{}__{}", condition.column, condition.operator),
                value_to_string(&condition.value),
            ));
        }

        for constraint in &self.key_constraints {
            pairs.push((constraint.column.clone(), value_to_string(&constraint.value)));
        }

        if let Some(after) = &self.after {
            pairs.push(("_next".to_string(), after.to_string()));
        }

        pairs.push(("_size".to_string(), self.page_size.to_string()));

        if let Some(search) = &self.search {
            pairs.push(("_search".to_string(), search.clone()));
        }

        if let Some(related) = &self.related {
            pairs.push((related.column.clone(), value_to_string(&related.value)));
        }

        if let Some(raw_where) = &self.raw_where {
            pairs.push(("_where".to_string(), raw_where.clone()));
        }

        if let Some(sort) = &self.sort {
            let key = if sort.descending { "_sort_desc" } else { "_sort" };
            pairs.push((key.to_string(), sort.column.clone()));
        }

        let query = serde_urlencoded::to_string(&pairs).unwrap_or_default();

        format!("/{database}/{table}.json?{query}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchedRow {
    /// Keyed by the column names of the database, plus `rowid` for tables without
    /// a declared primary key.
    pub values: Map<String, Value>,
    pub cursor: Option<GraphqlCursor>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TablePage {
    pub rows: Vec<FetchedRow>,
    /// Rows matching the constraints on all pages.
    pub filtered_count: i64,
    /// Set when more rows follow.
    pub next_cursor: Option<GraphqlCursor>,
}

#[async_trait]
pub trait TableFetch: Send + Sync {
    async fn fetch(&self, table: TableWalker<'_>, params: &TableFetchParams) -> Result<TablePage, FetchError>;
}

/// An SQL identifier in double quotes.
pub(crate) fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Plain text of a scalar: strings without quotes, null as nothing.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(value) => value.clone(),
        Value::Null => String::new(),
        value => value.to_string(),
    }
}
