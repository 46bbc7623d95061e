//! Transient render trees produced by customization and consumed by layout and merge.

pub(crate) mod arena;
