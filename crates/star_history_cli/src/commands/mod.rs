pub(crate) mod history;
pub(crate) mod meta;
