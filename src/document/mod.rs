//! Authored design document: views, styles, component roles and node queries.
//!
//! A [`Document`](model::Document) is immutable after construction. Hosts replace it wholesale
//! when a newer version is fetched.

pub(crate) mod dsl;
pub(crate) mod model;
pub(crate) mod query;
pub mod style;
