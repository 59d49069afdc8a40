use crate::registry::{context::OutputContext, MetaField, ObjectType, PageInfoField, Resolver};

pub(crate) const PAGE_INFO: &str = "PageInfo";

pub(crate) fn register(output_ctx: &mut OutputContext) {
    let end_cursor = MetaField::new("endCursor", "String", Resolver::PageInfo(PageInfoField::EndCursor))
        .with_description("Cursor of the last row of the page, pass it as `after` to get the next page");

    let has_next_page = MetaField::new("hasNextPage", "Boolean", Resolver::PageInfo(PageInfoField::HasNextPage));

    output_ctx.create_object_type(ObjectType::new(PAGE_INFO, [end_cursor, has_next_page]));
}
