//! Arena-backed render tree with intrusive parent/first-child/next-sibling links.
//!
//! A render tree is built fresh for every pass. The arena owns every node; links are handles into
//! the arena, so re-parenting a subtree or appending a child is O(1) and there are no ownership
//! cycles.

use std::sync::Arc;

use crate::customize::context::{ImageData, ReplacementToken};
use crate::document::model::{ComponentInfo, NodeData, StyledTextRun, View, ViewShape};
use crate::document::style::{GridSpan, ViewStyle};
use crate::foundation::core::{Affine, BezPath, LayoutId};
use crate::layout::ComputedLayout;

/// Handle to a node inside one [`RenderTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeHandle(u32);

impl NodeHandle {
    /// Handle of the first node pushed into a tree.
    pub const ROOT: NodeHandle = NodeHandle(0);

    /// Arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which input tree a transition node was cloned from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeOrigin {
    /// Cloned from this node of the "from" tree.
    From(NodeHandle),
    /// Cloned from this node of the "to" tree.
    To(NodeHandle),
}

/// Resolved content of a render node.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderContent {
    /// Container outline; children are linked in the arena.
    Container {
        /// Outline.
        shape: ViewShape,
    },
    /// Plain text.
    Text {
        /// Text content.
        content: String,
        /// Localization resource name.
        res_name: Option<String>,
    },
    /// Styled text runs.
    StyledText {
        /// Runs.
        runs: Vec<StyledTextRun>,
        /// Localization resource name.
        res_name: Option<String>,
    },
    /// Childless vector shape.
    Shape {
        /// Geometry.
        shape: ViewShape,
    },
    /// Rendered by a host-supplied component instead of the design.
    Replaced {
        /// Host handle of the replacement renderer.
        token: ReplacementToken,
    },
}

impl RenderContent {
    /// Geometry of containers and shapes.
    pub fn shape(&self) -> Option<&ViewShape> {
        match self {
            Self::Container { shape } | Self::Shape { shape } => Some(shape),
            Self::Text { .. } | Self::StyledText { .. } | Self::Replaced { .. } => None,
        }
    }

    /// `true` for text and styled text.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. } | Self::StyledText { .. })
    }
}

/// One node of a resolved render tree.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderNode {
    /// Node name, used for customization lookup and merge matching.
    pub name: String,
    /// Id of the source view.
    pub view_id: String,
    /// Effective style, copy-on-write against the document style.
    pub style: Arc<ViewStyle>,
    /// Resolved content.
    pub content: RenderContent,
    /// Component instance info.
    pub component: Option<ComponentInfo>,
    /// Host-supplied image.
    pub image: Option<ImageData>,
    /// Grid span hint from list content.
    pub grid_span: Option<GridSpan>,
    /// Developer-supplied merge key.
    pub merge_key: Option<String>,
    /// Id assigned by the layout bridge for the current pass.
    pub layout_id: Option<LayoutId>,
    /// Box computed by the layout engine.
    pub layout: Option<ComputedLayout>,
    /// Outline of containers and shapes for the computed box.
    pub path: Option<Arc<BezPath>>,
    /// Extra transform applied on top of the style transform by a running transition.
    pub anim_transform: Option<Affine>,
    /// Provenance inside a transition tree.
    pub origin: Option<NodeOrigin>,
    parent: Option<NodeHandle>,
    first_child: Option<NodeHandle>,
    last_child: Option<NodeHandle>,
    next_sibling: Option<NodeHandle>,
}

impl RenderNode {
    /// Detached node for `view`, without its children.
    pub fn from_view(view: &View) -> Self {
        let content = match &view.data {
            NodeData::Container { shape, .. } => RenderContent::Container {
                shape: shape.clone(),
            },
            NodeData::Text { content, res_name } => RenderContent::Text {
                content: content.clone(),
                res_name: res_name.clone(),
            },
            NodeData::StyledText { runs, res_name } => RenderContent::StyledText {
                runs: runs.clone(),
                res_name: res_name.clone(),
            },
            NodeData::Shape { shape } => RenderContent::Shape {
                shape: shape.clone(),
            },
        };
        Self {
            name: view.name.clone(),
            view_id: view.id.clone(),
            style: Arc::clone(&view.style),
            content,
            component: view.instance().cloned(),
            image: None,
            grid_span: None,
            merge_key: None,
            layout_id: None,
            layout: None,
            path: None,
            anim_transform: None,
            origin: None,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
        }
    }

    /// Copy of this node with all links cleared.
    pub fn detached(&self) -> Self {
        Self {
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            ..self.clone()
        }
    }

    /// Mutable access to the style, cloning it first if it is shared.
    pub fn style_mut(&mut self) -> &mut ViewStyle {
        Arc::make_mut(&mut self.style)
    }

    /// Parent handle.
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// First child handle.
    pub fn first_child(&self) -> Option<NodeHandle> {
        self.first_child
    }

    /// Next sibling handle.
    pub fn next_sibling(&self) -> Option<NodeHandle> {
        self.next_sibling
    }
}

/// Arena of render nodes plus the ordered list of roots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderTree {
    nodes: Vec<RenderNode>,
    roots: Vec<NodeHandle>,
}

impl RenderTree {
    /// Empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tree mirroring `view` and all of its descendants.
    pub fn from_view(view: &View) -> Self {
        let mut tree = Self::new();
        tree.push_view(view, None);
        tree
    }

    /// Append `view` and its descendants under `parent` (or as a root).
    pub fn push_view(&mut self, view: &View, parent: Option<NodeHandle>) -> NodeHandle {
        let h = self.push(RenderNode::from_view(view), parent);
        for child in view.children() {
            self.push_view(child, Some(h));
        }
        h
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root handles in order.
    pub fn roots(&self) -> &[NodeHandle] {
        &self.roots
    }

    /// First root, if any.
    pub fn root(&self) -> Option<NodeHandle> {
        self.roots.first().copied()
    }

    /// Node behind a handle. Handles always come from this tree.
    pub fn get(&self, h: NodeHandle) -> &RenderNode {
        &self.nodes[h.index()]
    }

    /// Mutable node behind a handle.
    pub fn get_mut(&mut self, h: NodeHandle) -> &mut RenderNode {
        &mut self.nodes[h.index()]
    }

    /// Append a detached node as the last child of `parent`, or as the last root.
    pub fn push(&mut self, mut node: RenderNode, parent: Option<NodeHandle>) -> NodeHandle {
        let h = NodeHandle(self.nodes.len() as u32);
        node.parent = parent;
        node.first_child = None;
        node.last_child = None;
        node.next_sibling = None;
        self.nodes.push(node);
        match parent {
            Some(p) => {
                let last = self.nodes[p.index()].last_child;
                match last {
                    Some(last) => self.nodes[last.index()].next_sibling = Some(h),
                    None => self.nodes[p.index()].first_child = Some(h),
                }
                self.nodes[p.index()].last_child = Some(h);
            }
            None => self.roots.push(h),
        }
        h
    }

    /// Children of `h` in order.
    pub fn children(&self, h: NodeHandle) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(h).first_child,
        }
    }

    /// Every handle in pre-order, roots in order.
    pub fn preorder(&self) -> Vec<NodeHandle> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeHandle> = self.roots.iter().rev().copied().collect();
        while let Some(h) = stack.pop() {
            out.push(h);
            let first = stack.len();
            stack.extend(self.children(h));
            stack[first..].reverse();
        }
        out
    }

    /// Copy the subtree rooted at `src_node` of `src` under `parent`; returns the new root.
    ///
    /// `origin` tags every copied node with its source handle when set.
    pub fn copy_subtree(
        &mut self,
        src: &RenderTree,
        src_node: NodeHandle,
        parent: Option<NodeHandle>,
        origin: Option<fn(NodeHandle) -> NodeOrigin>,
    ) -> NodeHandle {
        let mut node = src.get(src_node).detached();
        if let Some(tag) = origin {
            node.origin = Some(tag(src_node));
        }
        let h = self.push(node, parent);
        for child in src.children(src_node) {
            self.copy_subtree(src, child, Some(h), origin);
        }
        h
    }

    /// First node named `name` in pre-order.
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.preorder()
            .into_iter()
            .find(|h| self.get(*h).name == name)
    }

    /// First node created from the view with id `view_id`, in pre-order.
    pub fn find_by_view_id(&self, view_id: &str) -> Option<NodeHandle> {
        self.preorder()
            .into_iter()
            .find(|h| self.get(*h).view_id == view_id)
    }

    /// Node whose layout id is `id`.
    pub fn find_by_layout_id(&self, id: LayoutId) -> Option<NodeHandle> {
        (0..self.nodes.len())
            .map(|i| NodeHandle(i as u32))
            .find(|h| self.get(*h).layout_id == Some(id))
    }

    /// Every handle in arena order.
    pub fn handles(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        (0..self.nodes.len()).map(|i| NodeHandle(i as u32))
    }
}

/// Iterator over the children of one node.
pub struct Children<'a> {
    tree: &'a RenderTree,
    next: Option<NodeHandle>,
}

impl Iterator for Children<'_> {
    type Item = NodeHandle;

    fn next(&mut self) -> Option<Self::Item> {
        let h = self.next?;
        self.next = self.tree.get(h).next_sibling;
        Some(h)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tree/arena.rs"]
mod tests;
