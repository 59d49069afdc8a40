use sqlite_connector_types::database_definition::TableWalker;

use crate::registry::{
    context::{InputContext, OutputContext},
    types::table::CollectionArguments,
    FetchMode, MetaField, Resolver, TableResolver,
};

/// Registers the root field paginating over the rows of a table. Returns the
/// name of the field.
pub(crate) fn register(
    input_ctx: &InputContext<'_>,
    table: TableWalker<'_>,
    arguments: &CollectionArguments,
    output_ctx: &mut OutputContext,
) -> String {
    let field_name = output_ctx.root_field_name(table.client_name());
    let kind = if table.is_view() { "view" } else { "table" };

    let resolver = Resolver::Table(TableResolver {
        table_id: table.id(),
        mode: FetchMode::Collection,
        related: None,
    });

    let mut field = MetaField::new(&field_name, input_ctx.collection_type_name(table), resolver)
        .with_description(format!("Rows from the {} {kind}", table.database_name()));

    field.args = arguments.args.clone();
    output_ctx.push_query(field);

    field_name
}
