use std::collections::HashMap;

use indexmap::IndexMap;
use sqlite_connector_types::database_definition::{ForeignKeyWalker, TableId, TableWalker, ROWID};

use super::{page_info::PAGE_INFO, scalar};
use crate::registry::{
    context::{InputContext, OutputContext},
    CollectionField, EdgeField, EnumType, FetchMode, InputObjectType, MetaField, MetaInputValue, ObjectType,
    Resolver, TableResolver,
};

/// Enum values GraphQL does not allow.
const INVALID_ENUM_VALUES: &[&str] = &["true", "false", "null"];

/// The arguments of the fields returning a collection of a table.
#[derive(Debug, Clone)]
pub(crate) struct CollectionArguments {
    pub(crate) args: IndexMap<String, MetaInputValue>,
    pub(crate) sort: Option<String>,
    pub(crate) sort_desc: Option<String>,
}

/// Registers the filter input and the sort enums, returning the collection
/// arguments using them.
pub(crate) fn register_inputs(
    input_ctx: &InputContext<'_>,
    table: TableWalker<'_>,
    output_ctx: &mut OutputContext,
) -> CollectionArguments {
    let names = input_ctx.arguments();
    let filter_type = register_filter(input_ctx, table, output_ctx);

    let sort_values = table
        .columns()
        .map(|column| column.client_name().to_string())
        .filter(|name| !INVALID_ENUM_VALUES.contains(&name.as_str()))
        .collect::<Vec<_>>();

    let (sort, sort_desc) = if sort_values.is_empty() {
        (None, None)
    } else {
        let sort = input_ctx.sort_type_name(table);
        let sort_desc = input_ctx.sort_desc_type_name(table);

        for name in [&sort, &sort_desc] {
            output_ctx.create_enum_type(EnumType {
                name: name.clone(),
                description: None,
                values: sort_values.clone(),
            });
        }

        (Some(sort), Some(sort_desc))
    };

    let mut args = vec![
        MetaInputValue::new(&names.filter, format!("[{filter_type}]"))
            .with_description(r#"Filters e.g. {name: {eq: "datasette"}}"#),
        MetaInputValue::new(&names.r#where, "String")
            .with_description(r#"Extra SQL where clauses, e.g. "name='datasette'""#),
        MetaInputValue::new(&names.first, "Int").with_description("Number of results to return"),
        MetaInputValue::new(&names.after, "String")
            .with_description("Start at this pagination cursor (from pageInfo { endCursor })"),
    ];

    if let Some((sort, sort_desc)) = sort.as_ref().zip(sort_desc.as_ref()) {
        args.push(MetaInputValue::new(&names.sort, sort).with_description("Sort by this column"));

        args.push(
            MetaInputValue::new(&names.sort_desc, sort_desc).with_description("Sort by this column descending"),
        );
    }

    if table.supports_full_text_search() {
        args.push(MetaInputValue::new(&names.search, "String").with_description("Search for this term"));
    }

    CollectionArguments {
        args: args.into_iter().map(|arg| (arg.name.clone(), arg)).collect(),
        sort,
        sort_desc,
    }
}

/// Registers the node, edge and collection types of a table.
pub(crate) fn register_outputs(
    input_ctx: &InputContext<'_>,
    table: TableWalker<'_>,
    collection_arguments: &HashMap<TableId, CollectionArguments>,
    output_ctx: &mut OutputContext,
) {
    let type_name = input_ctx.type_name(table);

    register_node(input_ctx, table, collection_arguments, output_ctx);

    let edge_type_name = input_ctx.edge_type_name(table);

    let cursor = MetaField::new("cursor", "String", Resolver::Edge(EdgeField::Cursor));
    let node = MetaField::new("node", type_name, Resolver::Edge(EdgeField::Node));

    output_ctx.create_object_type(ObjectType::new(edge_type_name.clone(), [cursor, node]));

    let fields = [
        MetaField::new("totalCount", "Int", Resolver::Collection(CollectionField::TotalCount))
            .with_description("Number of rows matching the filters, regardless of pagination"),
        MetaField::new("pageInfo", PAGE_INFO, Resolver::Collection(CollectionField::PageInfo)),
        MetaField::new("nodes", format!("[{type_name}]"), Resolver::Collection(CollectionField::Nodes)),
        MetaField::new(
            "edges",
            format!("[{edge_type_name}]"),
            Resolver::Collection(CollectionField::Edges),
        ),
    ];

    output_ctx.create_object_type(ObjectType::new(input_ctx.collection_type_name(table), fields));
}

fn register_filter(input_ctx: &InputContext<'_>, table: TableWalker<'_>, output_ctx: &mut OutputContext) -> String {
    let type_name = input_ctx.filter_type_name(table);

    let fields = table.columns().map(|column| {
        let field_name = input_ctx.column_field_name(column);
        output_ctx.push_field_mapping(table.id(), field_name, column.id());

        MetaInputValue::new(field_name, scalar::operations_type(column.kind()))
    });

    let fields = fields.collect::<Vec<_>>();
    output_ctx.create_input_type(InputObjectType::new(type_name.clone(), fields));

    type_name
}

fn register_node(
    input_ctx: &InputContext<'_>,
    table: TableWalker<'_>,
    collection_arguments: &HashMap<TableId, CollectionArguments>,
    output_ctx: &mut OutputContext,
) {
    let mut object = ObjectType::new(input_ctx.type_name(table), []);

    if let Some(rowid) = input_ctx.rowid_field_name(table) {
        let field = MetaField::new(rowid, "Int", Resolver::Select { key: ROWID.to_string() });
        object.push_field(field);
    }

    for column in table.columns() {
        let field_name = input_ctx.column_field_name(column);
        let key = column.client_name().to_string();

        let field = match column.foreign_key().filter(|foreign_key| !foreign_key.referenced_table().hidden()) {
            Some(foreign_key) => MetaField::new(
                field_name,
                input_ctx.type_name(foreign_key.referenced_table()),
                Resolver::ForeignKey(foreign_key.id()),
            ),
            None if column.is_json() => MetaField::new(field_name, scalar::GENERIC_SCALAR, Resolver::Json { key }),
            None => MetaField::new(field_name, scalar::output_type(column.kind()), Resolver::Select { key }),
        };

        object.push_field(field);
    }

    let back_relations = table
        .foreign_keys_back()
        .filter(|foreign_key| !foreign_key.table().hidden())
        .collect::<Vec<_>>();

    let mut namer = input_ctx.node_field_namer(table);

    for foreign_key in &back_relations {
        let Some(arguments) = collection_arguments.get(&foreign_key.table().id()) else {
            continue;
        };

        let (name, description) = back_relation_name(*foreign_key, &back_relations);

        let resolver = Resolver::Table(TableResolver {
            table_id: foreign_key.table().id(),
            mode: FetchMode::Collection,
            related: Some(foreign_key.id()),
        });

        let mut field = MetaField::new(
            namer.name(&name),
            input_ctx.collection_type_name(foreign_key.table()),
            resolver,
        )
        .with_description(description);

        field.args = arguments.args.clone();
        object.push_field(field);
    }

    output_ctx.create_object_type(object);
}

/// `{other}_list`, or `{other}_by_{column}_list` when the other table points here
/// more than once.
fn back_relation_name(foreign_key: ForeignKeyWalker<'_>, all: &[ForeignKeyWalker<'_>]) -> (String, String) {
    let other = foreign_key.table();

    let count = all
        .iter()
        .filter(|candidate| candidate.table().id() == other.id())
        .count();

    if count > 1 {
        let column = foreign_key.column();

        (
            format!("{}_by_{}_list", other.client_name(), column.client_name()),
            format!(
                "Related rows from the {} table (by {})",
                other.database_name(),
                column.database_name()
            ),
        )
    } else {
        (
            format!("{}_list", other.client_name()),
            format!("Related rows from the {} table", other.database_name()),
        )
    }
}
