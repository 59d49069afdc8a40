pub(super) mod page_info;
pub(super) mod scalar;
pub(super) mod table;
