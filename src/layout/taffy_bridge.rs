use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt::Write as _;

use taffy::prelude::{AvailableSpace, NodeId, Rect, Size as TaffySize};
use taffy::style::{
    AlignContent, AlignItems, Dimension as TaffyDimension, Display, FlexDirection, FlexWrap,
    JustifyContent, LengthPercentage, LengthPercentageAuto, Position, Style,
};

use crate::document::style::{self as ds, Dimension, Edges, LayoutStyle};
use crate::foundation::core::{LayoutId, Size};
use crate::foundation::error::{DesignError, DesignResult};
use crate::foundation::hash::StableHasher;
use crate::layout::bridge::LayoutNode;
use crate::layout::{ComputedLayout, LayoutChanges, LayoutEngine, MeasureConstraints, MeasureFn};

#[derive(Debug, Clone, Copy)]
struct LayoutNodeCtx {
    layout_id: LayoutId,
}

#[derive(Debug)]
struct Registered {
    node: NodeId,
    name: String,
    /// Hash of the last pushed style; `u64::MAX` forces the next push.
    style_hash: u64,
    measured: bool,
}

/// Incremental Taffy-backed [`LayoutEngine`].
///
/// Nodes persist across frames so Taffy's own caches survive; styles are only pushed when their
/// hash changes. Fixed sizes set through [`set_node_size`](Self::set_node_size) persist until the
/// node is removed.
#[derive(Debug)]
pub struct TaffyLayoutEngine {
    taffy: taffy::TaffyTree<LayoutNodeCtx>,
    nodes: HashMap<LayoutId, Registered>,
    ids: HashMap<NodeId, LayoutId>,
    roots: BTreeSet<LayoutId>,
    fixed_sizes: HashMap<LayoutId, (f32, f32)>,
    layouts: HashMap<LayoutId, ComputedLayout>,
    touched: HashSet<LayoutId>,
    layout_state: u64,
}

impl Default for TaffyLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TaffyLayoutEngine {
    /// Engine with no registered nodes.
    pub fn new() -> Self {
        Self {
            taffy: taffy::TaffyTree::new(),
            nodes: HashMap::new(),
            ids: HashMap::new(),
            roots: BTreeSet::new(),
            fixed_sizes: HashMap::new(),
            layouts: HashMap::new(),
            touched: HashSet::new(),
            layout_state: 0,
        }
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Current layout state counter.
    pub fn layout_state(&self) -> u64 {
        self.layout_state
    }

    /// Ids registered without a parent.
    pub fn root_layout_ids(&self) -> impl Iterator<Item = LayoutId> + '_ {
        self.roots.iter().copied()
    }

    /// Remove a node and forget everything recorded about it. Its children stay registered.
    pub fn remove_view(&mut self, id: LayoutId) -> DesignResult<bool> {
        let Some(reg) = self.nodes.remove(&id) else {
            tracing::warn!(layout_id = %id, "remove_view: node not registered");
            return Ok(false);
        };
        if let Some(parent) = self.taffy.parent(reg.node) {
            // Siblings after the removed node must be re-laid out.
            self.taffy.mark_dirty(parent)?;
        }
        self.taffy.remove(reg.node)?;
        self.ids.remove(&reg.node);
        self.roots.remove(&id);
        self.fixed_sizes.remove(&id);
        self.layouts.remove(&id);
        self.touched.remove(&id);
        Ok(true)
    }

    /// Pin a node to `width` x `height`; the size survives later style updates.
    ///
    /// Takes effect on the next [`compute_node_layout`](LayoutEngine::compute_node_layout).
    pub fn set_node_size(&mut self, id: LayoutId, width: f32, height: f32) -> DesignResult<()> {
        self.fixed_sizes.insert(id, (width, height));
        let Some(reg) = self.nodes.get_mut(&id) else {
            return Ok(());
        };
        let mut style = self.taffy.style(reg.node)?.clone();
        pin_size(&mut style, width, height);
        self.taffy.set_style(reg.node, style)?;
        // Force the next add_style to rebuild from the layout style plus the pin.
        reg.style_hash = u64::MAX;
        Ok(())
    }

    /// Mark a node dirty, e.g. after its measured content changed.
    pub fn mark_dirty(&mut self, id: LayoutId) -> DesignResult<()> {
        if let Some(reg) = self.nodes.get(&id) {
            self.taffy.mark_dirty(reg.node)?;
        }
        Ok(())
    }

    /// Indented dump of the subtree at `root`, one `Node <name> <id>:` line per node followed by
    /// its box.
    pub fn print_layout(&self, root: LayoutId) -> String {
        let mut out = String::new();
        self.print_layout_recurse(root, "", &mut out);
        out
    }

    fn print_layout_recurse(&self, id: LayoutId, indent: &str, out: &mut String) {
        let Some(reg) = self.nodes.get(&id) else {
            return;
        };
        let Ok(layout) = self.taffy.layout(reg.node) else {
            return;
        };
        let _ = writeln!(out, "{indent}Node {} {}:", reg.name, id.0);
        let _ = writeln!(
            out,
            "{indent}  x={} y={} w={} h={}",
            layout.location.x, layout.location.y, layout.size.width, layout.size.height
        );
        let Ok(children) = self.taffy.children(reg.node) else {
            return;
        };
        let child_indent = format!("{indent}  ");
        for child in children {
            if let Some(child_id) = self.ids.get(&child) {
                self.print_layout_recurse(*child_id, &child_indent, out);
            }
        }
    }

    fn collect_changes(
        &mut self,
        id: LayoutId,
        parent: Option<LayoutId>,
        changed: &mut BTreeMap<LayoutId, ComputedLayout>,
    ) -> DesignResult<()> {
        let Some(reg) = self.nodes.get(&id) else {
            return Ok(());
        };
        let node = reg.node;
        let layout = from_taffy_layout(self.taffy.layout(node)?);
        if self.layouts.get(&id) != Some(&layout) {
            changed.insert(id, layout);
            // A child is positioned by its parent, so the parent is reported too.
            if let Some(p) = parent {
                if let Some(pl) = self.layouts.get(&p) {
                    changed.entry(p).or_insert(*pl);
                }
            }
            self.layouts.insert(id, layout);
        }
        for child in self.taffy.children(node)? {
            if let Some(&child_id) = self.ids.get(&child) {
                self.collect_changes(child_id, Some(id), changed)?;
            }
        }
        Ok(())
    }
}

impl LayoutEngine for TaffyLayoutEngine {
    fn add_style(&mut self, node: &LayoutNode) -> DesignResult<()> {
        self.touched.insert(node.layout_id);
        let pinned = self.fixed_sizes.get(&node.layout_id).copied();
        let hash = style_hash(node, pinned);
        let ctx = node.use_measure_func.then_some(LayoutNodeCtx {
            layout_id: node.layout_id,
        });

        if let Some(reg) = self.nodes.get_mut(&node.layout_id) {
            if reg.style_hash != hash {
                self.taffy
                    .set_style(reg.node, to_taffy_style(node, pinned))?;
                reg.style_hash = hash;
            }
            if reg.measured != node.use_measure_func {
                self.taffy.set_node_context(reg.node, ctx)?;
                reg.measured = node.use_measure_func;
            }
            reg.name.clone_from(&node.name);
            match node.parent_layout_id {
                Some(_) => self.roots.remove(&node.layout_id),
                None => self.roots.insert(node.layout_id),
            };
            return Ok(());
        }

        let style = to_taffy_style(node, pinned);
        let nid = match ctx {
            Some(ctx) => self.taffy.new_leaf_with_context(style, ctx)?,
            None => self.taffy.new_leaf(style)?,
        };
        self.ids.insert(nid, node.layout_id);
        self.nodes.insert(
            node.layout_id,
            Registered {
                node: nid,
                name: node.name.clone(),
                style_hash: hash,
                measured: node.use_measure_func,
            },
        );

        let parent = node
            .parent_layout_id
            .and_then(|p| self.nodes.get(&p))
            .map(|r| r.node);
        match parent {
            Some(parent) => {
                self.roots.remove(&node.layout_id);
                let mut children = self.taffy.children(parent)?;
                let at = (node.child_index as usize).min(children.len());
                children.insert(at, nid);
                self.taffy.set_children(parent, &children)?;
            }
            None => {
                self.roots.insert(node.layout_id);
            }
        }
        Ok(())
    }

    fn update_children(&mut self, parent: LayoutId, children: &[LayoutId]) -> DesignResult<()> {
        let Some(reg) = self.nodes.get(&parent) else {
            return Err(DesignError::layout_inconsistency(format!(
                "update_children: parent {parent} is not registered"
            )));
        };
        let wanted: Vec<NodeId> = children
            .iter()
            .filter_map(|c| match self.nodes.get(c) {
                Some(r) => Some(r.node),
                None => {
                    tracing::warn!(parent = %parent, child = %c, "update_children: child not registered");
                    None
                }
            })
            .collect();
        if self.taffy.children(reg.node)? != wanted {
            self.taffy.set_children(reg.node, &wanted)?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, measure))]
    fn compute_node_layout(
        &mut self,
        root: LayoutId,
        available: Size,
        measure: &mut MeasureFn<'_>,
    ) -> DesignResult<LayoutChanges> {
        let node = self
            .nodes
            .get(&root)
            .map(|r| r.node)
            .ok_or_else(|| {
                DesignError::layout_inconsistency(format!("root {root} is not registered"))
            })?;

        let mut measure_error: Option<anyhow::Error> = None;
        self.taffy.compute_layout_with_measure(
            node,
            TaffySize {
                width: AvailableSpace::Definite(available.width as f32),
                height: AvailableSpace::Definite(available.height as f32),
            },
            |known_dimensions, available_space, _node_id, node_context, _style| {
                if let TaffySize {
                    width: Some(width),
                    height: Some(height),
                } = known_dimensions
                {
                    return TaffySize { width, height };
                }
                let Some(ctx) = node_context else {
                    return TaffySize::ZERO;
                };
                let constraints = MeasureConstraints {
                    known_width: known_dimensions.width,
                    known_height: known_dimensions.height,
                    available_width: available_extent(available_space.width),
                    available_height: available_extent(available_space.height),
                };
                match measure(ctx.layout_id, constraints) {
                    Ok(size) => TaffySize {
                        width: known_dimensions.width.unwrap_or(size.width as f32),
                        height: known_dimensions.height.unwrap_or(size.height as f32),
                    },
                    Err(e) => {
                        if measure_error.is_none() {
                            measure_error = Some(e);
                        }
                        TaffySize::ZERO
                    }
                }
            },
        )?;
        if let Some(e) = measure_error {
            return Err(DesignError::Other(e.context(format!("measuring under root {root}"))));
        }

        let mut changed = BTreeMap::new();
        self.collect_changes(root, None, &mut changed)?;
        self.layout_state += 1;
        Ok(LayoutChanges {
            layout_state: self.layout_state,
            changed,
        })
    }

    fn node_layout(&self, id: LayoutId) -> Option<ComputedLayout> {
        let reg = self.nodes.get(&id)?;
        self.taffy.layout(reg.node).ok().map(from_taffy_layout)
    }

    fn end_frame(&mut self) -> usize {
        let stale: Vec<LayoutId> = self
            .nodes
            .keys()
            .filter(|id| !self.touched.contains(*id))
            .copied()
            .collect();
        let mut removed = 0;
        for id in stale {
            match self.remove_view(id) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!(layout_id = %id, error = %e, "failed to prune layout node"),
            }
        }
        self.touched.clear();
        if removed > 0 {
            tracing::debug!(removed, remaining = self.nodes.len(), "pruned layout nodes");
        }
        removed
    }
}

fn available_extent(space: AvailableSpace) -> f32 {
    match space {
        AvailableSpace::Definite(v) => v,
        AvailableSpace::MaxContent => f32::MAX,
        AvailableSpace::MinContent => 0.0,
    }
}

fn from_taffy_layout(l: &taffy::tree::Layout) -> ComputedLayout {
    ComputedLayout {
        order: l.order,
        left: l.location.x,
        top: l.location.y,
        width: l.size.width,
        height: l.size.height,
        content_width: l.content_size.width,
        content_height: l.content_size.height,
    }
}

fn style_hash(node: &LayoutNode, pinned: Option<(f32, f32)>) -> u64 {
    let mut h = StableHasher::new();
    h.put(&node.style);
    h.put(&node.fixed_width);
    h.put(&node.fixed_height);
    h.write_u64(node.measure_key);
    h.write_opt_f32(pinned.map(|(pw, _)| pw));
    h.write_opt_f32(pinned.map(|(_, ph)| ph));
    h.finish()
}

fn pin_size(style: &mut Style, width: f32, height: f32) {
    let (w, h) = (TaffyDimension::length(width), TaffyDimension::length(height));
    style.min_size = TaffySize { width: w, height: h };
    style.size = TaffySize { width: w, height: h };
    style.max_size = TaffySize { width: w, height: h };
}

fn to_taffy_style(node: &LayoutNode, pinned: Option<(f32, f32)>) -> Style {
    let ls = &node.style;
    let mut style = Style {
        display: match ls.display {
            ds::Display::Flex => Display::Flex,
            ds::Display::None => Display::None,
        },
        position: match ls.position_type {
            ds::PositionType::Relative => Position::Relative,
            ds::PositionType::Absolute => Position::Absolute,
        },
        flex_direction: match ls.flex_direction {
            ds::FlexDirection::Row => FlexDirection::Row,
            ds::FlexDirection::Column => FlexDirection::Column,
            ds::FlexDirection::RowReverse => FlexDirection::RowReverse,
            ds::FlexDirection::ColumnReverse => FlexDirection::ColumnReverse,
        },
        flex_wrap: match ls.flex_wrap {
            ds::FlexWrap::NoWrap => FlexWrap::NoWrap,
            ds::FlexWrap::Wrap => FlexWrap::Wrap,
            ds::FlexWrap::WrapReverse => FlexWrap::WrapReverse,
        },
        align_items: Some(align_items(ls.align_items)),
        align_self: align_self(ls.align_self),
        align_content: Some(align_content(ls.align_content)),
        justify_content: Some(justify_content(ls.justify_content)),
        inset: edges_auto(&ls.inset),
        margin: edges_auto(&ls.margin),
        padding: edges(&ls.padding),
        gap: gap(ls),
        flex_grow: ls.flex_grow,
        flex_shrink: ls.flex_shrink,
        flex_basis: dimension(ls.flex_basis),
        size: TaffySize {
            width: dimension(ls.width),
            height: dimension(ls.height),
        },
        min_size: TaffySize {
            width: dimension(ls.min_width),
            height: dimension(ls.min_height),
        },
        max_size: TaffySize {
            width: dimension(ls.max_width),
            height: dimension(ls.max_height),
        },
        aspect_ratio: ls.aspect_ratio,
        ..Style::default()
    };
    if let Some(w) = node.fixed_width {
        style.min_size.width = TaffyDimension::length(w as f32);
    }
    if let Some(h) = node.fixed_height {
        style.min_size.height = TaffyDimension::length(h as f32);
    }
    if let Some((w, h)) = pinned {
        pin_size(&mut style, w, h);
    }
    style
}

fn gap(ls: &LayoutStyle) -> TaffySize<LengthPercentage> {
    let main = LengthPercentage::length(ls.item_spacing.max(0.0));
    let cross = LengthPercentage::length(ls.cross_axis_item_spacing.max(0.0));
    match ls.flex_direction {
        ds::FlexDirection::Row | ds::FlexDirection::RowReverse => TaffySize {
            width: main,
            height: cross,
        },
        ds::FlexDirection::Column | ds::FlexDirection::ColumnReverse => TaffySize {
            width: cross,
            height: main,
        },
    }
}

fn dimension(d: Dimension) -> TaffyDimension {
    match d {
        Dimension::Auto | Dimension::Undefined => TaffyDimension::auto(),
        Dimension::Points(v) => TaffyDimension::length(v),
        Dimension::Percent(v) => TaffyDimension::percent(v),
    }
}

fn length_auto(d: Dimension) -> LengthPercentageAuto {
    match d {
        Dimension::Auto => LengthPercentageAuto::auto(),
        Dimension::Undefined => LengthPercentageAuto::length(0.0),
        Dimension::Points(v) => LengthPercentageAuto::length(v),
        Dimension::Percent(v) => LengthPercentageAuto::percent(v),
    }
}

fn length(d: Dimension) -> LengthPercentage {
    match d {
        Dimension::Auto | Dimension::Undefined => LengthPercentage::length(0.0),
        Dimension::Points(v) => LengthPercentage::length(v),
        Dimension::Percent(v) => LengthPercentage::percent(v),
    }
}

fn edges_auto(e: &Edges<Dimension>) -> Rect<LengthPercentageAuto> {
    Rect {
        left: length_auto(e.left),
        right: length_auto(e.right),
        top: length_auto(e.top),
        bottom: length_auto(e.bottom),
    }
}

fn edges(e: &Edges<Dimension>) -> Rect<LengthPercentage> {
    Rect {
        left: length(e.left),
        right: length(e.right),
        top: length(e.top),
        bottom: length(e.bottom),
    }
}

fn align_items(a: ds::AlignItems) -> AlignItems {
    match a {
        ds::AlignItems::FlexStart => AlignItems::FlexStart,
        ds::AlignItems::FlexEnd => AlignItems::FlexEnd,
        ds::AlignItems::Center => AlignItems::Center,
        ds::AlignItems::Stretch => AlignItems::Stretch,
        ds::AlignItems::Baseline => AlignItems::Baseline,
    }
}

fn align_self(a: ds::AlignSelf) -> Option<AlignItems> {
    match a {
        ds::AlignSelf::Auto => None,
        ds::AlignSelf::FlexStart => Some(AlignItems::FlexStart),
        ds::AlignSelf::FlexEnd => Some(AlignItems::FlexEnd),
        ds::AlignSelf::Center => Some(AlignItems::Center),
        ds::AlignSelf::Stretch => Some(AlignItems::Stretch),
        ds::AlignSelf::Baseline => Some(AlignItems::Baseline),
    }
}

fn align_content(a: ds::AlignContent) -> AlignContent {
    match a {
        ds::AlignContent::FlexStart => AlignContent::FlexStart,
        ds::AlignContent::FlexEnd => AlignContent::FlexEnd,
        ds::AlignContent::Center => AlignContent::Center,
        ds::AlignContent::Stretch => AlignContent::Stretch,
        ds::AlignContent::SpaceBetween => AlignContent::SpaceBetween,
        ds::AlignContent::SpaceAround => AlignContent::SpaceAround,
    }
}

fn justify_content(j: ds::JustifyContent) -> JustifyContent {
    match j {
        ds::JustifyContent::FlexStart => JustifyContent::FlexStart,
        ds::JustifyContent::FlexEnd => JustifyContent::FlexEnd,
        ds::JustifyContent::Center => JustifyContent::Center,
        ds::JustifyContent::SpaceBetween => JustifyContent::SpaceBetween,
        ds::JustifyContent::SpaceAround => JustifyContent::SpaceAround,
        ds::JustifyContent::SpaceEvenly => JustifyContent::SpaceEvenly,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/taffy_bridge.rs"]
mod tests;
