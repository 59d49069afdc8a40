//! Documentation queries selecting every plain column of a table and one level
//! of its foreign keys.

use std::fmt::Write;

use sqlite_connector_types::database_definition::{TableWalker, ROWID};

use super::context::InputContext;

const COLUMN_INDENT: &str = "      ";

pub(crate) fn render(input_ctx: &InputContext<'_>, table: TableWalker<'_>, collection_field: &str) -> String {
    let mut columns = Vec::new();
    let mut references = Vec::new();

    if let Some(rowid) = input_ctx.rowid_field_name(table) {
        columns.push(format!("{COLUMN_INDENT}{rowid}"));
    }

    for column in table.columns() {
        let field_name = input_ctx.column_field_name(column);

        let foreign_key = column
            .foreign_key()
            .filter(|foreign_key| !foreign_key.referenced_table().hidden());

        let Some(foreign_key) = foreign_key else {
            columns.push(format!("{COLUMN_INDENT}{field_name}"));
            continue;
        };

        let target = foreign_key.referenced_table();

        let referenced = match foreign_key.referenced_column() {
            Some(column) => input_ctx.column_field_name(column),
            None => input_ctx.rowid_field_name(target).unwrap_or(ROWID),
        };

        let label = target
            .label_column()
            .map(|column| input_ctx.column_field_name(column))
            .filter(|label| *label != referenced);

        let mut block = format!("{COLUMN_INDENT}{field_name} {{\n{COLUMN_INDENT}  {referenced}\n");

        if let Some(label) = label {
            let _ = writeln!(block, "{COLUMN_INDENT}  {label}");
        }

        block.push_str(COLUMN_INDENT);
        block.push('}');

        references.push(block);
    }

    columns.extend(references);

    let mut query = String::new();

    let _ = writeln!(query, "{{");
    let _ = writeln!(query, "  {collection_field} {{");
    let _ = writeln!(query, "    totalCount");
    let _ = writeln!(query, "    pageInfo {{");
    let _ = writeln!(query, "      hasNextPage");
    let _ = writeln!(query, "      endCursor");
    let _ = writeln!(query, "    }}");
    let _ = writeln!(query, "    nodes {{");
    let _ = writeln!(query, "{}", columns.join("\n"));
    let _ = writeln!(query, "    }}");
    let _ = writeln!(query, "  }}");
    query.push('}');

    query
}
