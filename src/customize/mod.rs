//! Host customizations and the pass that merges them into a render tree.
//!
//! A [`context::CustomizationContext`] maps node names to per-node customizations. The apply pass
//! walks a resolved tree once, top-down, and produces a new tree with every customization in
//! effect.

pub(crate) mod apply;
pub(crate) mod context;
