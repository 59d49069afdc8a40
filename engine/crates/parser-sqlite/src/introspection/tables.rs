use std::{collections::HashSet, sync::OnceLock};

use regex::Regex;
use serde::Deserialize;
use sqlite_connector_types::{
    database_definition::{DatabaseDefinition, FullTextSearch, Table, TableKind, ROWID},
    transport::{Transport, TransportExt},
};
use sqlite_graphql_config::DatabaseConfig;

/// Tables SQLite creates next to an FTS virtual table.
static FTS_SHADOW_SUFFIXES: &[&str] = &[
    "content", "segments", "segdir", "docsize", "stat", "data", "idx", "config",
];

#[derive(Debug, Deserialize)]
struct Row {
    name: String,
    kind: String,
    sql: Option<String>,
}

/// An FTS virtual table and what it indexes.
#[derive(Debug, PartialEq)]
struct FtsTable {
    name: String,
    content: Option<String>,
    content_rowid: Option<String>,
}

pub(super) async fn introspect<T>(
    transport: &T,
    database_definition: &mut DatabaseDefinition,
    config: Option<&DatabaseConfig>,
) -> sqlite_connector_types::Result<()>
where
    T: Transport + Sync,
{
    let query = include_str!("queries/tables.sql");
    let rows = transport.collect_query::<Row>(query, Vec::new()).await?;

    let fts_tables = rows
        .iter()
        .filter_map(|row| parse_fts_table(&row.name, row.sql.as_deref()?))
        .collect::<Vec<_>>();

    let hidden = hidden_tables(&rows, &fts_tables);

    for row in rows {
        let kind = if row.kind == "view" { TableKind::View } else { TableKind::Table };
        let table_config = config.and_then(|config| config.table(&row.name));

        let mut table = Table::new(row.name.clone(), kind);

        let configured_hidden = table_config.map(|config| config.hidden).unwrap_or_default();
        table.set_hidden(configured_hidden || hidden.contains(&row.name));

        if kind == TableKind::Table {
            if let Some(full_text_search) = full_text_search(&row.name, table_config, &fts_tables) {
                tracing::debug!(table = %row.name, fts_table = full_text_search.table(), "full-text search");
                table.set_full_text_search(full_text_search);
            }
        }

        if let Some(label_column) = table_config.and_then(|config| config.label_column.as_deref()) {
            table.set_label_column(label_column);
        }

        database_definition.push_table(table);
    }

    Ok(())
}

fn full_text_search(
    table: &str,
    config: Option<&sqlite_graphql_config::TableConfig>,
    fts_tables: &[FtsTable],
) -> Option<FullTextSearch> {
    if let Some(fts_table) = config.and_then(|config| config.fts_table.as_deref()) {
        let key_column = config.and_then(|config| config.fts_pk.as_deref()).unwrap_or(ROWID);
        return Some(FullTextSearch::new(fts_table, key_column));
    }

    fts_tables
        .iter()
        .find(|fts| fts.content.as_deref().is_some_and(|content| content.eq_ignore_ascii_case(table)))
        .map(|fts| FullTextSearch::new(fts.name.as_str(), fts.content_rowid.as_deref().unwrap_or(ROWID)))
}

fn hidden_tables(rows: &[Row], fts_tables: &[FtsTable]) -> HashSet<String> {
    let mut shadow_tables = HashSet::new();

    for fts in fts_tables {
        shadow_tables.insert(fts.name.to_ascii_lowercase());

        for suffix in FTS_SHADOW_SUFFIXES {
            shadow_tables.insert(format!("{}_{suffix}", fts.name).to_ascii_lowercase());
        }
    }

    rows.iter()
        .filter(|row| {
            let name = row.name.to_ascii_lowercase();
            name.starts_with("sqlite_") || shadow_tables.contains(&name)
        })
        .map(|row| row.name.clone())
        .collect()
}

fn parse_fts_table(name: &str, sql: &str) -> Option<FtsTable> {
    static VIRTUAL_TABLE: OnceLock<Regex> = OnceLock::new();
    static CONTENT: OnceLock<Regex> = OnceLock::new();
    static CONTENT_ROWID: OnceLock<Regex> = OnceLock::new();

    let virtual_table = VIRTUAL_TABLE.get_or_init(|| {
        Regex::new(r"(?is)^\s*CREATE\s+VIRTUAL\s+TABLE\b.*?\bUSING\s+fts\d*\s*\((.*)\)").expect("must be valid")
    });

    let arguments = virtual_table.captures(sql)?.get(1)?.as_str();

    let content = CONTENT.get_or_init(|| {
        Regex::new(r#"(?i)\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)'|\[([^\]]*)\]|([A-Za-z0-9_]+))"#).expect("must be valid")
    });

    let content_rowid = CONTENT_ROWID.get_or_init(|| {
        Regex::new(r#"(?i)\bcontent_rowid\s*=\s*(?:"([^"]*)"|'([^']*)'|\[([^\]]*)\]|([A-Za-z0-9_]+))"#)
            .expect("must be valid")
    });

    let first_group = |regex: &Regex| {
        let captures = regex.captures(arguments)?;
        (1..=4)
            .find_map(|group| captures.get(group))
            .map(|value| value.as_str().to_string())
            .filter(|value| !value.is_empty())
    };

    Some(FtsTable {
        name: name.to_string(),
        content: first_group(content),
        content_rowid: first_group(content_rowid),
    })
}
