use std::collections::HashMap;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::document::style::{LayoutSizing, LayoutStyle};
use crate::foundation::core::{LayoutId, Size};
use crate::foundation::error::{DesignError, DesignResult};
use crate::foundation::hash::StableHasher;
use crate::layout::cache::FrameCaches;
use crate::layout::paths::{path_fingerprint, shape_path};
use crate::layout::{ComputedLayout, LayoutChanges, LayoutEngine, MeasureConstraints, TextMeasure};
use crate::tree::arena::{NodeHandle, RenderContent, RenderNode, RenderTree};

/// One node registration sent to a layout engine.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    /// Id assigned by [`flatten`].
    pub layout_id: LayoutId,
    /// Parent id, `None` for roots.
    pub parent_layout_id: Option<LayoutId>,
    /// Position among the parent's children.
    pub child_index: u32,
    /// Layout attributes.
    pub style: LayoutStyle,
    /// Node name, for debug dumps.
    pub name: String,
    /// The engine must call the measure function for this node.
    pub use_measure_func: bool,
    /// Minimum width dictated by content.
    pub fixed_width: Option<i32>,
    /// Minimum height dictated by content.
    pub fixed_height: Option<i32>,
    /// Fingerprint of measured content; a change forces re-measurement.
    pub measure_key: u64,
    /// Node in the flattened tree.
    pub handle: NodeHandle,
}

/// Ordered child ids of one parent.
#[derive(Clone, Debug, PartialEq)]
pub struct ParentChildren {
    /// Parent id.
    pub parent_layout_id: LayoutId,
    /// Child ids in order; empty for leaves.
    pub child_layout_ids: SmallVec<[LayoutId; 8]>,
}

/// Output of [`flatten`]: registrations in pre-order plus one edge list per node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutNodeList {
    /// Registrations in pre-order.
    pub layout_nodes: Vec<LayoutNode>,
    /// Edge lists, parallel to `layout_nodes`.
    pub parent_children: Vec<ParentChildren>,
}

impl LayoutNodeList {
    /// Id of the first root, if the tree was not empty.
    pub fn root(&self) -> Option<LayoutId> {
        self.layout_nodes.first().map(|n| n.layout_id)
    }
}

/// Assign layout ids in pre-order and produce the engine protocol for `tree`.
///
/// Ids start at zero and are written onto the tree's nodes. Any previous layout results on the
/// tree are cleared.
pub fn flatten(tree: &mut RenderTree) -> LayoutNodeList {
    flatten_from(tree, LayoutId(0))
}

/// [`flatten`] with ids starting at `first`, so several trees can share one engine.
#[tracing::instrument(skip_all, fields(nodes = tree.len(), first = first.0))]
pub fn flatten_from(tree: &mut RenderTree, first: LayoutId) -> LayoutNodeList {
    let order = tree.preorder();
    let mut next = first;
    for &h in &order {
        let node = tree.get_mut(h);
        node.layout_id = Some(next);
        node.layout = None;
        next = next.next();
    }

    let mut child_index = vec![0u32; tree.len()];
    for &h in &order {
        for (i, c) in tree.children(h).enumerate() {
            child_index[c.index()] = i as u32;
        }
    }

    let mut out = LayoutNodeList {
        layout_nodes: Vec::with_capacity(order.len()),
        parent_children: Vec::with_capacity(order.len()),
    };
    for &h in &order {
        let node = tree.get(h);
        let id = assigned(node);
        let parent = node.parent();
        let (fixed_width, fixed_height) = fixed_size(node);
        out.layout_nodes.push(LayoutNode {
            layout_id: id,
            parent_layout_id: parent.map(|p| assigned(tree.get(p))),
            child_index: child_index[h.index()],
            style: node.style.layout.clone(),
            name: node.name.clone(),
            use_measure_func: node.content.is_text(),
            fixed_width,
            fixed_height,
            measure_key: if node.content.is_text() {
                text_key(node)
            } else {
                0
            },
            handle: h,
        });
        out.parent_children.push(ParentChildren {
            parent_layout_id: id,
            child_layout_ids: tree.children(h).map(|c| assigned(tree.get(c))).collect(),
        });
    }
    out
}

fn assigned(node: &RenderNode) -> LayoutId {
    node.layout_id.unwrap_or(LayoutId(0))
}

/// Text with a fixed design width keeps at least that width so it wraps as authored.
fn fixed_size(node: &RenderNode) -> (Option<i32>, Option<i32>) {
    if !node.content.is_text() {
        return (None, None);
    }
    let style = &node.style.node;
    let w = (style.horizontal_sizing == LayoutSizing::Fixed && style.node_size.width > 0.0)
        .then(|| style.node_size.width.round() as i32);
    let h = (style.vertical_sizing == LayoutSizing::Fixed && style.node_size.height > 0.0)
        .then(|| style.node_size.height.round() as i32);
    (w, h)
}

/// Write computed boxes onto every flattened node of `tree`.
///
/// A flattened node without a box means the engine and the bridge disagree about the tree; that
/// is reported as [`DesignError::LayoutInconsistency`] and no box is written.
pub fn apply_layout(
    tree: &mut RenderTree,
    boxes: &HashMap<LayoutId, ComputedLayout>,
) -> DesignResult<()> {
    let handles: Vec<NodeHandle> = tree.handles().collect();
    if let Some(missing) = handles
        .iter()
        .filter_map(|h| tree.get(*h).layout_id)
        .find(|id| !boxes.contains_key(id))
    {
        return Err(DesignError::layout_inconsistency(format!(
            "no computed layout for node {missing}"
        )));
    }
    for h in handles {
        let node = tree.get_mut(h);
        node.layout = node.layout_id.and_then(|id| boxes.get(&id).copied());
    }
    Ok(())
}

/// Result of one [`layout_tree`] pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutPass {
    /// Registrations sent to the engine.
    pub nodes: LayoutNodeList,
    /// What the engine reported as changed.
    pub changes: LayoutChanges,
}

/// Flatten `tree`, drive `engine`, and write boxes and outlines back onto the tree.
///
/// Text measurements and shape outlines go through `caches`, which also hands out the layout ids:
/// every tree laid out between two [`FrameCaches::collect`] calls gets its own id range.
#[tracing::instrument(skip_all, fields(nodes = tree.len()))]
pub fn layout_tree<E: LayoutEngine + ?Sized>(
    engine: &mut E,
    tree: &mut RenderTree,
    available: Size,
    caches: &mut FrameCaches,
    measure: &mut dyn TextMeasure,
) -> DesignResult<LayoutPass> {
    let first = caches.reserve_layout_ids(tree.len());
    let nodes = flatten_from(tree, first);
    if nodes.layout_nodes.is_empty() {
        return Ok(LayoutPass::default());
    }
    for node in &nodes.layout_nodes {
        engine.add_style(node)?;
    }
    for edges in &nodes.parent_children {
        engine.update_children(edges.parent_layout_id, &edges.child_layout_ids)?;
    }

    let by_id: HashMap<LayoutId, (NodeHandle, u64)> = nodes
        .layout_nodes
        .iter()
        .map(|n| (n.layout_id, (n.handle, n.measure_key)))
        .collect();
    let cache_text = caches.cache_text;
    let text_cache = &mut caches.text;
    let measured: &RenderTree = tree;
    let mut measure_fn = |id: LayoutId, c: MeasureConstraints| -> anyhow::Result<Size> {
        let Some(&(h, key)) = by_id.get(&id) else {
            return Ok(Size::ZERO);
        };
        let node = measured.get(h);
        if !cache_text {
            return measure.measure(node, c);
        }
        let fp = text_fingerprint(key, &c);
        text_cache
            .try_get_or_insert_with(id, fp, || measure.measure(node, c))
            .copied()
    };
    let mut changes = LayoutChanges::default();
    for root in nodes.layout_nodes.iter().filter(|n| n.parent_layout_id.is_none()) {
        let solved = engine.compute_node_layout(root.layout_id, available, &mut measure_fn)?;
        changes.layout_state = solved.layout_state;
        changes.changed.extend(solved.changed);
    }

    let boxes: HashMap<LayoutId, ComputedLayout> = nodes
        .layout_nodes
        .iter()
        .filter_map(|n| engine.node_layout(n.layout_id).map(|l| (n.layout_id, l)))
        .collect();
    apply_layout(tree, &boxes)?;
    attach_paths(tree, caches);
    tracing::debug!(
        layout_state = changes.layout_state,
        changed = changes.changed.len(),
        "layout pass"
    );
    Ok(LayoutPass { nodes, changes })
}

/// Fingerprint of everything text measurement reads from the node.
fn text_key(node: &RenderNode) -> u64 {
    let mut h = StableHasher::new();
    match &node.content {
        RenderContent::Text { content, res_name } => {
            h.write_u8(0);
            h.put(content);
            h.put(res_name);
        }
        RenderContent::StyledText { runs, res_name } => {
            h.write_u8(1);
            h.put(runs);
            h.put(res_name);
        }
        RenderContent::Container { .. }
        | RenderContent::Shape { .. }
        | RenderContent::Replaced { .. } => h.write_u8(2),
    }
    let style = &node.style.node;
    h.write_f32(style.font_size);
    h.put(&style.font_family);
    h.put(&style.font_weight);
    h.put(&style.italic);
    h.put(&style.line_height);
    h.put(&style.letter_spacing);
    h.put(&style.line_count);
    h.finish()
}

fn text_fingerprint(key: u64, c: &MeasureConstraints) -> u64 {
    let mut h = StableHasher::new();
    h.write_u64(key);
    h.write_opt_f32(c.known_width);
    h.write_opt_f32(c.known_height);
    h.write_f32(c.available_width);
    h.write_f32(c.available_height);
    h.finish()
}

fn attach_paths(tree: &mut RenderTree, caches: &mut FrameCaches) {
    let handles: Vec<NodeHandle> = tree.handles().collect();
    for h in handles {
        let node = tree.get(h);
        let path = match (node.layout_id, node.layout, node.content.shape()) {
            (Some(id), Some(layout), Some(shape)) => {
                let size = layout.size();
                let design = node.style.node.node_size;
                let radius = node.style.node.corner_radius;
                let fp = path_fingerprint(shape, size, design, &radius);
                let path = caches.paths.get_or_insert_with(id, fp, || {
                    Arc::new(shape_path(shape, size, design, &radius))
                });
                Some(Arc::clone(path))
            }
            _ => None,
        };
        tree.get_mut(h).path = path;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/bridge.rs"]
mod tests;
