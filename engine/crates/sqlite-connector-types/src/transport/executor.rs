use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::{stream::BoxStream, StreamExt};
use serde_json::{Map, Value};
use sqlx::{
    query::Query,
    sqlite::{SqliteArguments, SqliteRow},
    Column, Row, Sqlite, TypeInfo, ValueRef,
};

use crate::Error;

pub(super) fn query<'e, E>(executor: E, query: &'e str, params: Vec<Value>) -> BoxStream<'e, crate::Result<Value>>
where
    E: sqlx::Executor<'e, Database = Sqlite> + 'e,
{
    Box::pin(async_stream::try_stream! {
        let query = bind(sqlx::query(query), params)?;
        let mut rows = query.fetch(executor);

        while let Some(row) = rows.next().await {
            yield row_to_json(&row?)?;
        }
    })
}

pub(super) async fn execute<'e, E>(executor: E, query: &'e str, params: Vec<Value>) -> crate::Result<i64>
where
    E: sqlx::Executor<'e, Database = Sqlite> + 'e,
{
    let result = bind(sqlx::query(query), params)?.execute(executor).await?;

    Ok(result.rows_affected() as i64)
}

fn bind<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: Vec<Value>,
) -> crate::Result<Query<'q, Sqlite, SqliteArguments<'q>>> {
    for param in params {
        query = match param {
            Value::Null => query.bind(None::<String>),
            Value::Bool(value) => query.bind(value),
            Value::Number(number) => match (number.as_i64(), number.as_f64()) {
                (Some(value), _) => query.bind(value),
                (None, Some(value)) => query.bind(value),
                (None, None) => return Err(Error::InvalidParameter(number.to_string())),
            },
            Value::String(value) => query.bind(value),
            value @ (Value::Array(_) | Value::Object(_)) => query.bind(value.to_string()),
        };
    }

    Ok(query)
}

/// SQLite types values, not columns: every value is decoded by its own storage class.
fn row_to_json(row: &SqliteRow) -> crate::Result<Value> {
    let mut object = Map::with_capacity(row.columns().len());

    for column in row.columns() {
        let index = column.ordinal();

        let storage_class = {
            let raw = row.try_get_raw(index)?;

            if raw.is_null() {
                object.insert(column.name().to_string(), Value::Null);
                continue;
            }

            raw.type_info().name().to_string()
        };

        let value = match storage_class.as_str() {
            "INTEGER" => Value::from(row.try_get_unchecked::<i64, _>(index)?),
            "REAL" => {
                let value = row.try_get_unchecked::<f64, _>(index)?;
                serde_json::Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
            }
            "BLOB" => Value::String(STANDARD.encode(row.try_get_unchecked::<Vec<u8>, _>(index)?)),
            _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
        };

        object.insert(column.name().to_string(), value);
    }

    Ok(Value::Object(object))
}
