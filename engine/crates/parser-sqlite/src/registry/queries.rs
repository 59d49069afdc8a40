pub(super) mod collection;
pub(super) mod row;
