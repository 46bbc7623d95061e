//! Render-thread session tying document, layout engine, caches and transitions together.

pub(crate) mod design_session;
pub(crate) mod opts;
