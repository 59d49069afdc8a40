use std::{fmt::Write, sync::Arc, sync::OnceLock};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::TryStreamExt;
use graphql_cursor::GraphqlCursor;
use regex::Regex;
use serde_json::{Map, Value};
use sqlite_connector_types::{
    database_definition::{PrimaryKey, ScalarKind, TableColumnWalker, TableWalker},
    filter::FilterOperator,
    transport::Transport,
};
use sqlite_graphql_config::Config;

use super::{quote, value_to_string, FetchError, FetchedRow, FilterCondition, Sort, TableFetch, TableFetchParams, TablePage};

/// Fetches pages straight from the tables over a [`Transport`].
///
/// Tables paginate by keyset over the primary key, also when sorted. Views have
/// no key, their cursors are row offsets.
pub struct SqliteTableFetch {
    transport: Arc<dyn Transport>,
    max_page_size: u64,
    allow_raw_where: bool,
}

impl SqliteTableFetch {
    pub fn new(transport: Arc<dyn Transport>, config: &Config) -> Self {
        Self {
            transport,
            max_page_size: config.max_page_size,
            allow_raw_where: config.allow_raw_where,
        }
    }
}

#[async_trait]
impl TableFetch for SqliteTableFetch {
    async fn fetch(&self, table: TableWalker<'_>, params: &TableFetchParams) -> Result<TablePage, FetchError> {
        let page_size = u64::try_from(params.page_size)
            .ok()
            .filter(|size| *size <= self.max_page_size)
            .ok_or(FetchError::PageSize {
                requested: params.page_size,
                max: self.max_page_size,
            })?;

        if params.raw_where.is_some() && !self.allow_raw_where {
            return Err(FetchError::RawWhereDisabled);
        }

        let mut query = SelectQuery::new(table);
        query.push_constraints(params);

        let filtered_count = self.count(&query).await?;

        let primary_key = table.primary_key();

        let offset = match (&primary_key, &params.after) {
            (None, Some(after)) => after.offset()?,
            (Some(primary_key), Some(after)) => {
                let sort_value = match &params.sort {
                    Some(sort) => Some(self.cursor_sort_value(table, primary_key, after, &sort.column).await?),
                    None => None,
                };

                query.push_cursor(primary_key, after, params.sort.as_ref(), sort_value)?;

                0
            }
            (_, None) => 0,
        };

        query.push_order(primary_key.as_ref(), params.sort.as_ref());

        let (sql, bindings) = query.into_select(page_size + 1, offset);

        tracing::debug!(table = table.database_name(), sql, "fetching a page");

        let mut rows = self
            .transport
            .parameterized_query(&sql, bindings)
            .try_collect::<Vec<_>>()
            .await?
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(values) => Some(values),
                _ => None,
            })
            .collect::<Vec<_>>();

        let has_more = rows.len() as u64 > page_size;
        rows.truncate(page_size as usize);

        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(position, values)| {
                let cursor = match &primary_key {
                    Some(primary_key) => row_cursor(primary_key, &values),
                    None => GraphqlCursor::from_offset(offset + position as u64 + 1),
                };

                FetchedRow {
                    values,
                    cursor: Some(cursor),
                }
            })
            .collect::<Vec<_>>();

        let next_cursor = if has_more {
            rows.last().and_then(|row| row.cursor.clone())
        } else {
            None
        };

        Ok(TablePage {
            rows,
            filtered_count,
            next_cursor,
        })
    }
}

impl SqliteTableFetch {
    async fn count(&self, query: &SelectQuery<'_>) -> Result<i64, FetchError> {
        let (sql, bindings) = query.count();

        let row = self
            .transport
            .parameterized_query(&sql, bindings)
            .try_next()
            .await?;

        let count = row
            .as_ref()
            .and_then(|row| row.get("count"))
            .and_then(Value::as_i64)
            .unwrap_or_default();

        Ok(count)
    }

    /// The sort column value of the row a cursor points to.
    async fn cursor_sort_value(
        &self,
        table: TableWalker<'_>,
        primary_key: &PrimaryKey<'_>,
        cursor: &GraphqlCursor,
        sort_column: &str,
    ) -> Result<Operand, FetchError> {
        let key = key_values(primary_key, cursor)?;
        let columns = key_columns(primary_key);
        let column = quote(sort_column);

        let sql = format!(
            "SELECT {column} AS value, typeof({column}) AS type FROM {} WHERE {} = {} LIMIT 1",
            quote(table.database_name()),
            row_value(&columns),
            operand_list(&key),
        );

        let row = self
            .transport
            .parameterized_query(&sql, bindings(&key))
            .try_next()
            .await?
            .ok_or(FetchError::CursorRowMissing)?;

        let is_blob = row.get("type").and_then(Value::as_str) == Some("blob");
        let value = row.get("value").cloned().unwrap_or_default();

        // blobs come back as base64 text and must compare as blobs again
        let operand = match value.as_str().filter(|_| is_blob).map(|encoded| STANDARD.decode(encoded)) {
            Some(Ok(bytes)) => Operand::Blob(bytes),
            _ => Operand::Bound(value),
        };

        Ok(operand)
    }
}

/// A select over one table, built up condition by condition.
struct SelectQuery<'a> {
    table: TableWalker<'a>,
    conditions: Vec<String>,
    bindings: Vec<Value>,
    order: Vec<String>,
}

impl<'a> SelectQuery<'a> {
    fn new(table: TableWalker<'a>) -> Self {
        Self {
            table,
            conditions: Vec::new(),
            bindings: Vec::new(),
            order: Vec::new(),
        }
    }

    fn push_constraints(&mut self, params: &TableFetchParams) {
        self.push_filters(&params.filters);

        for constraint in params.key_constraints.iter().chain(params.related.as_ref()) {
            self.conditions.push(format!("{} = ?", quote(&constraint.column)));
            self.bindings.push(constraint.value.clone());
        }

        if let Some(search) = &params.search {
            self.push_search(search);
        }

        if let Some(raw_where) = &params.raw_where {
            self.conditions.push(format!("({raw_where})"));
        }
    }

    fn push_filters(&mut self, filters: &[Vec<FilterCondition>]) {
        let mut groups = Vec::new();
        let mut bindings = Vec::new();

        for group in filters {
            let predicates = group
                .iter()
                .filter_map(|condition| predicate(condition, &mut bindings))
                .collect::<Vec<_>>();

            // a group without predicates matches every row
            if predicates.is_empty() {
                return;
            }

            groups.push(format!("({})", predicates.join(" AND ")));
        }

        if !groups.is_empty() {
            self.conditions.push(format!("({})", groups.join(" OR ")));
            self.bindings.extend(bindings);
        }
    }

    fn push_search(&mut self, search: &str) {
        let Some(full_text_search) = self.table.full_text_search() else {
            return;
        };

        let terms = escape_fts(search);

        if terms.is_empty() {
            return;
        }

        let fts_table = quote(full_text_search.table());

        self.conditions.push(format!(
            "{} IN (SELECT rowid FROM {fts_table} WHERE {fts_table} MATCH ?)",
            quote(full_text_search.key_column()),
        ));

        self.bindings.push(Value::String(terms));
    }

    /// Rows after the cursor row. When sorted, the rows after it in the sort
    /// order, ties broken by the key.
    fn push_cursor(
        &mut self,
        primary_key: &PrimaryKey<'_>,
        cursor: &GraphqlCursor,
        sort: Option<&Sort>,
        sort_value: Option<Operand>,
    ) -> Result<(), FetchError> {
        let key = key_values(primary_key, cursor)?;
        let columns = key_columns(primary_key);

        let after_key = format!("{} > {}", row_value(&columns), operand_list(&key));
        let key = bindings(&key);

        let Some((sort, sort_value)) = sort.zip(sort_value) else {
            self.conditions.push(after_key);
            self.bindings.extend(key);

            return Ok(());
        };

        let column = quote(&sort.column);
        let value = sort_value.sql();

        let condition = match (sort.descending, sort_value.is_null()) {
            (false, true) => {
                self.bindings.extend(key);
                format!("(({column} IS NULL AND {after_key}) OR {column} IS NOT NULL)")
            }
            (false, false) => {
                self.bindings.extend(sort_value.binding());
                self.bindings.extend(sort_value.binding());
                self.bindings.extend(key);
                format!("({column} > {value} OR ({column} = {value} AND {after_key}))")
            }
            (true, true) => {
                self.bindings.extend(key);
                format!("({column} IS NULL AND {after_key})")
            }
            (true, false) => {
                self.bindings.extend(sort_value.binding());
                self.bindings.extend(sort_value.binding());
                self.bindings.extend(key);
                format!("({column} < {value} OR ({column} = {value} AND {after_key}) OR {column} IS NULL)")
            }
        };

        self.conditions.push(condition);

        Ok(())
    }

    fn push_order(&mut self, primary_key: Option<&PrimaryKey<'_>>, sort: Option<&Sort>) {
        if let Some(sort) = sort {
            let direction = if sort.descending { " DESC" } else { "" };
            self.order.push(format!("{}{direction}", quote(&sort.column)));
        }

        if let Some(primary_key) = primary_key {
            self.order.extend(key_columns(primary_key));
        }
    }

    fn from_clause(&self) -> String {
        let mut clause = format!("FROM {}", quote(self.table.database_name()));

        if !self.conditions.is_empty() {
            let _ = write!(clause, " WHERE {}", self.conditions.join(" AND "));
        }

        clause
    }

    fn count(&self) -> (String, Vec<Value>) {
        let sql = format!("SELECT count(*) AS count {}", self.from_clause());
        (sql, self.bindings.clone())
    }

    fn into_select(self, limit: u64, offset: u64) -> (String, Vec<Value>) {
        let columns = if self.table.uses_rowid() { "rowid AS rowid, *" } else { "*" };
        let mut sql = format!("SELECT {columns} {}", self.from_clause());

        if !self.order.is_empty() {
            let _ = write!(sql, " ORDER BY {}", self.order.join(", "));
        }

        let _ = write!(sql, " LIMIT {limit}");

        if offset > 0 {
            let _ = write!(sql, " OFFSET {offset}");
        }

        (sql, self.bindings)
    }
}

/// The SQL of one condition, `None` for flags set to false.
fn predicate(condition: &FilterCondition, bindings: &mut Vec<Value>) -> Option<String> {
    let column = quote(&condition.column);
    let value = &condition.value;
    let text = value_to_string(value);

    let flag = || match value {
        Value::Bool(flag) => *flag,
        _ => !matches!(text.as_str(), "" | "0" | "false"),
    };

    let sql = match condition.operator {
        FilterOperator::Eq => binding(bindings, value.clone(), format!("{column} = ?")),
        FilterOperator::Not => binding(bindings, value.clone(), format!("{column} != ?")),
        FilterOperator::Contains => binding(bindings, Value::String(format!("%{text}%")), format!("{column} LIKE ?")),
        FilterOperator::StartsWith => binding(bindings, Value::String(format!("{text}%")), format!("{column} LIKE ?")),
        FilterOperator::EndsWith => binding(bindings, Value::String(format!("%{text}")), format!("{column} LIKE ?")),
        FilterOperator::Gt => binding(bindings, numeric(value), format!("{column} > ?")),
        FilterOperator::Gte => binding(bindings, numeric(value), format!("{column} >= ?")),
        FilterOperator::Lt => binding(bindings, numeric(value), format!("{column} < ?")),
        FilterOperator::Lte => binding(bindings, numeric(value), format!("{column} <= ?")),
        FilterOperator::Like => binding(bindings, value.clone(), format!("{column} LIKE ?")),
        FilterOperator::NotLike => binding(bindings, value.clone(), format!("{column} NOT LIKE ?")),
        FilterOperator::Glob => binding(bindings, value.clone(), format!("{column} GLOB ?")),
        FilterOperator::In | FilterOperator::NotIn => {
            let items = text.split(',').map(|item| Value::String(item.to_string())).collect::<Vec<_>>();
            let negation = if condition.operator == FilterOperator::NotIn { "NOT " } else { "" };
            let sql = format!("{column} {negation}IN ({})", placeholders(items.len()));

            bindings.extend(items);
            sql
        }
        FilterOperator::ArrayContains => binding(
            bindings,
            value.clone(),
            format!("? IN (SELECT value FROM json_each({column}))"),
        ),
        FilterOperator::Date => binding(bindings, value.clone(), format!("date({column}) = ?")),
        FilterOperator::IsNull => return flag().then(|| format!("{column} IS NULL")),
        FilterOperator::NotNull => return flag().then(|| format!("{column} IS NOT NULL")),
        FilterOperator::IsBlank => return flag().then(|| format!("({column} IS NULL OR {column} = '')")),
        FilterOperator::NotBlank => return flag().then(|| format!("({column} IS NOT NULL AND {column} != '')")),
    };

    Some(sql)
}

fn binding(bindings: &mut Vec<Value>, value: Value, sql: String) -> String {
    bindings.push(value);
    sql
}

/// Numeric looking text compares as a number.
fn numeric(value: &Value) -> Value {
    let Value::String(text) = value else {
        return value.clone();
    };

    if let Ok(integer) = text.trim().parse::<i64>() {
        return Value::from(integer);
    }

    match text.trim().parse::<f64>() {
        Ok(float) if float.is_finite() => Value::from(float),
        _ => value.clone(),
    }
}

fn key_columns(primary_key: &PrimaryKey<'_>) -> Vec<String> {
    primary_key.database_names().into_iter().map(quote).collect()
}

/// A value compared against a column: a bound parameter, or a blob literal.
/// Blobs travel as base64 text and would otherwise compare as text.
#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Bound(Value),
    Blob(Vec<u8>),
}

impl Operand {
    fn sql(&self) -> String {
        match self {
            Operand::Bound(_) => "?".to_string(),
            Operand::Blob(bytes) => {
                let mut literal = String::with_capacity(bytes.len() * 2 + 3);
                literal.push_str("X'");

                for byte in bytes {
                    let _ = write!(literal, "{byte:02X}");
                }

                literal.push('\'');
                literal
            }
        }
    }

    fn binding(&self) -> Option<Value> {
        match self {
            Operand::Bound(value) => Some(value.clone()),
            Operand::Blob(_) => None,
        }
    }

    fn is_null(&self) -> bool {
        matches!(self, Operand::Bound(Value::Null))
    }
}

/// How a cursor component is typed before it is compared with its key column.
#[derive(Debug, Clone, Copy, PartialEq)]
enum KeyType {
    Kind(ScalarKind),
    /// No declared type, so no affinity converts the operand: numbers must be
    /// bound as numbers.
    Untyped,
}

impl KeyType {
    fn of(column: TableColumnWalker<'_>) -> Self {
        if column.declared_type().trim().is_empty() {
            KeyType::Untyped
        } else {
            KeyType::Kind(column.kind())
        }
    }

    fn operand(self, component: String) -> Operand {
        let integer = |component: &str| component.parse::<i64>().ok().map(Value::from);

        let float = |component: &str| {
            component
                .parse::<f64>()
                .ok()
                .filter(|float| float.is_finite())
                .map(Value::from)
        };

        let value = match self {
            KeyType::Kind(ScalarKind::Integer) => integer(&component),
            KeyType::Kind(ScalarKind::Float) => float(&component),
            KeyType::Untyped => integer(&component).or_else(|| float(&component)),
            KeyType::Kind(ScalarKind::Bytes) => match STANDARD.decode(&component) {
                Ok(bytes) => return Operand::Blob(bytes),
                Err(_) => None,
            },
            KeyType::Kind(ScalarKind::String) => None,
        };

        Operand::Bound(value.unwrap_or(Value::String(component)))
    }
}

/// The cursor components typed like the values of their key columns.
fn key_values(primary_key: &PrimaryKey<'_>, cursor: &GraphqlCursor) -> Result<Vec<Operand>, FetchError> {
    let components = cursor.key()?;

    let types = match primary_key {
        PrimaryKey::Rowid => vec![KeyType::Kind(ScalarKind::Integer)],
        PrimaryKey::Columns(columns) => columns.iter().map(|column| KeyType::of(*column)).collect(),
    };

    if components.len() != types.len() {
        return Err(graphql_cursor::CursorError::Malformed(cursor.to_string()).into());
    }

    let operands = components
        .into_iter()
        .zip(types)
        .map(|(component, key_type)| key_type.operand(component))
        .collect();

    Ok(operands)
}

fn bindings(operands: &[Operand]) -> Vec<Value> {
    operands.iter().filter_map(Operand::binding).collect()
}

fn operand_list(operands: &[Operand]) -> String {
    let list = operands.iter().map(Operand::sql).collect::<Vec<_>>().join(", ");

    if operands.len() == 1 {
        list
    } else {
        format!("({list})")
    }
}

fn row_cursor(primary_key: &PrimaryKey<'_>, values: &Map<String, Value>) -> GraphqlCursor {
    let components = primary_key
        .database_names()
        .into_iter()
        .map(|column| values.get(column).map(value_to_string).unwrap_or_default());

    GraphqlCursor::from_key(components)
}

fn row_value(columns: &[String]) -> String {
    match columns {
        [column] => column.clone(),
        columns => format!("({})", columns.join(", ")),
    }
}

fn placeholders(count: usize) -> String {
    let placeholders = vec!["?"; count].join(", ");

    if count == 1 {
        placeholders
    } else {
        format!("({placeholders})")
    }
}

/// Quotes every term of a full-text query, keeping quoted phrases together.
fn escape_fts(query: &str) -> String {
    static TERMS: OnceLock<Regex> = OnceLock::new();
    let terms = TERMS.get_or_init(|| Regex::new(r#""[^"]*"|[^\s"]+"#).expect("must be valid"));

    let mut query = query.to_string();

    if query.matches('"').count() % 2 == 1 {
        query.push('"');
    }

    terms
        .find_iter(&query)
        .map(|term| term.as_str())
        .filter(|term| *term != "\"\"")
        .map(|term| {
            if term.starts_with('"') {
                term.to_string()
            } else {
                format!("\"{term}\"")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
