pub mod buffer;
pub(crate) mod cursor;
