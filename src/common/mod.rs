pub(crate) mod bits;
pub(crate) mod function;
mod parse;
mod serialize;
pub(crate) mod traits;
