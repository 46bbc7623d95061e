//! Layout bridge between render trees and an external flex layout engine.
//!
//! [`bridge::flatten`] assigns every render node a dense [`LayoutId`] in pre-order and emits the
//! node/edge protocol a [`LayoutEngine`] consumes. After the engine solves, [`bridge::apply_layout`]
//! writes the boxes back onto the tree. [`taffy_bridge::TaffyLayoutEngine`] is the bundled engine.

use std::collections::BTreeMap;

use crate::foundation::core::{LayoutId, Size};
use crate::foundation::error::DesignResult;
use crate::tree::arena::RenderNode;

pub(crate) mod bridge;
pub(crate) mod cache;
pub(crate) mod paths;
pub(crate) mod taffy_bridge;

use bridge::LayoutNode;

/// Box computed for one node, relative to its parent.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ComputedLayout {
    /// Paint order among siblings.
    pub order: u32,
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
    /// Width of the content, which may overflow the box.
    pub content_width: f32,
    /// Height of the content.
    pub content_height: f32,
}

impl ComputedLayout {
    /// Box as a rectangle in parent coordinates.
    pub fn rect(&self) -> crate::foundation::core::Rect {
        crate::foundation::core::Rect::new(
            f64::from(self.left),
            f64::from(self.top),
            f64::from(self.left + self.width),
            f64::from(self.top + self.height),
        )
    }

    /// Box size.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

/// Size constraints handed to a measure function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasureConstraints {
    /// Width already fixed by the engine.
    pub known_width: Option<f32>,
    /// Height already fixed by the engine.
    pub known_height: Option<f32>,
    /// Width available; `f32::MAX` under max-content sizing, `0` under min-content.
    pub available_width: f32,
    /// Height available.
    pub available_height: f32,
}

/// Measure callback driven by the engine for nodes registered with `use_measure_func`.
pub type MeasureFn<'a> = dyn FnMut(LayoutId, MeasureConstraints) -> anyhow::Result<Size> + 'a;

/// Layouts that changed during one solve.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutChanges {
    /// Incremented on every solve.
    pub layout_state: u64,
    /// Changed nodes plus the parents that position them.
    pub changed: BTreeMap<LayoutId, ComputedLayout>,
}

/// An incremental layout engine driven through the flatten/apply protocol.
///
/// Node registrations persist across frames; a node not re-registered between two
/// [`LayoutEngine::end_frame`] calls is dropped.
pub trait LayoutEngine {
    /// Register a node or update the style of a registered one.
    fn add_style(&mut self, node: &LayoutNode) -> DesignResult<()>;

    /// Replace the ordered children of `parent`.
    fn update_children(&mut self, parent: LayoutId, children: &[LayoutId]) -> DesignResult<()>;

    /// Solve the subtree at `root` within `available` space.
    fn compute_node_layout(
        &mut self,
        root: LayoutId,
        available: Size,
        measure: &mut MeasureFn<'_>,
    ) -> DesignResult<LayoutChanges>;

    /// Last computed box of `id`.
    fn node_layout(&self, id: LayoutId) -> Option<ComputedLayout>;

    /// Drop nodes not registered since the previous call; returns how many were dropped.
    fn end_frame(&mut self) -> usize;
}

/// Host text measurement.
///
/// Called for text nodes only, possibly several times per solve with different constraints.
pub trait TextMeasure {
    /// Size of `node`'s text under `constraints`.
    fn measure(&mut self, node: &RenderNode, constraints: MeasureConstraints)
    -> anyhow::Result<Size>;
}

impl<F> TextMeasure for F
where
    F: FnMut(&RenderNode, MeasureConstraints) -> anyhow::Result<Size>,
{
    fn measure(
        &mut self,
        node: &RenderNode,
        constraints: MeasureConstraints,
    ) -> anyhow::Result<Size> {
        self(node, constraints)
    }
}
