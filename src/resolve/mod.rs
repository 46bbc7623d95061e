//! Node query and variant resolution.

pub(crate) mod resolver;
