use sqlite_connector_types::database_definition::{PrimaryKey, TableWalker, ROWID};

use crate::registry::{
    context::{InputContext, OutputContext},
    types::{scalar, table::CollectionArguments},
    FetchMode, KeyArgument, MetaField, MetaInputValue, Resolver, TableResolver,
};

/// Registers the root field returning a single row of a table, optionally looked
/// up by its primary key. Returns the name of the field.
pub(crate) fn register(
    input_ctx: &InputContext<'_>,
    table: TableWalker<'_>,
    arguments: &CollectionArguments,
    output_ctx: &mut OutputContext,
) -> String {
    let field_name = output_ctx.root_field_name(&format!("{}_row", table.client_name()));
    let kind = if table.is_view() { "view" } else { "table" };

    let mut args = arguments.args.clone();
    args.shift_remove(&input_ctx.arguments().first);

    let mut namer = input_ctx.root_field_namer();

    for name in args.keys() {
        namer.reserve(name);
    }

    let mut keys = Vec::new();

    match table.primary_key() {
        Some(PrimaryKey::Rowid) => {
            let name = namer.name(ROWID);
            args.insert(name.clone(), MetaInputValue::new(&name, "Int"));
            keys.push(KeyArgument { name, column: None });
        }
        Some(PrimaryKey::Columns(columns)) => {
            for column in columns {
                let name = namer.name(column.client_name());
                let ty = scalar::output_type(column.kind());

                args.insert(name.clone(), MetaInputValue::new(&name, ty));

                keys.push(KeyArgument {
                    name,
                    column: Some(column.id()),
                });
            }
        }
        None => (),
    }

    let resolver = Resolver::Table(TableResolver {
        table_id: table.id(),
        mode: FetchMode::Row { keys },
        related: None,
    });

    let mut field = MetaField::new(&field_name, input_ctx.type_name(table), resolver)
        .with_description(format!("Single row from the {} {kind}", table.database_name()));

    field.args = args;
    output_ctx.push_query(field);

    field_name
}
