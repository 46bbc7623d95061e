//! Typed document graph: views, payloads, component roles and the id/name indexes.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use smallvec::SmallVec;

use crate::document::query::canonical_variant_key;
use crate::document::style::{StyleOverride, ViewStyle};

/// Line cap used for open path strokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum StrokeCap {
    /// Butt cap.
    #[default]
    None,
    /// Round cap.
    Round,
    /// Square cap.
    Square,
}

/// Fill rule for a vector path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum WindingRule {
    /// Non-zero winding.
    #[default]
    NonZero,
    /// Even-odd.
    EvenOdd,
}

/// One vector path in SVG path-data syntax, in node-local design coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PathData {
    /// SVG path data (`M 0 0 L 10 0 Z`).
    pub data: String,
    /// Fill rule.
    pub winding: WindingRule,
}

/// Geometry of a container or shape node.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ViewShape {
    /// Plain rectangle covering the layout box.
    Rect,
    /// Rectangle with the style's corner radii.
    RoundRect {
        /// Squircle smoothing in `[0, 1]`.
        corner_smoothing: f32,
    },
    /// Arbitrary vector paths.
    Path {
        /// Fill geometry.
        paths: Vec<PathData>,
        /// Stroke geometry.
        strokes: Vec<PathData>,
        /// Stroke cap.
        stroke_cap: StrokeCap,
    },
    /// Ellipse arc, optionally a ring segment.
    Arc {
        /// Fill geometry as exported.
        paths: Vec<PathData>,
        /// Stroke geometry as exported.
        strokes: Vec<PathData>,
        /// Stroke cap.
        stroke_cap: StrokeCap,
        /// Start angle in degrees.
        start_angle_degrees: f32,
        /// Sweep in degrees.
        sweep_angle_degrees: f32,
        /// Inner radius as a fraction of the outer radius.
        inner_radius: f32,
        /// Corner rounding of the arc ends.
        corner_radius: f32,
    },
    /// Rectangle drawn from exported vector paths.
    VectorRect {
        /// Fill geometry.
        paths: Vec<PathData>,
        /// Stroke geometry.
        strokes: Vec<PathData>,
    },
}

/// Discriminant of [`ViewShape`], used by tweenability checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// [`ViewShape::Rect`].
    Rect,
    /// [`ViewShape::RoundRect`].
    RoundRect,
    /// [`ViewShape::Path`].
    Path,
    /// [`ViewShape::Arc`].
    Arc,
    /// [`ViewShape::VectorRect`].
    VectorRect,
}

impl ViewShape {
    /// Shape discriminant.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rect => ShapeKind::Rect,
            Self::RoundRect { .. } => ShapeKind::RoundRect,
            Self::Path { .. } => ShapeKind::Path,
            Self::Arc { .. } => ShapeKind::Arc,
            Self::VectorRect { .. } => ShapeKind::VectorRect,
        }
    }
}

/// Per-run text attributes of styled text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextRunStyle {
    /// Run color.
    pub color: crate::foundation::core::Color,
    /// Font size in points.
    pub font_size: f32,
    /// Font family, `None` for the node's family.
    pub font_family: Option<String>,
    /// Font weight.
    pub font_weight: f32,
    /// Italic run.
    pub italic: bool,
}

/// One run of styled text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StyledTextRun {
    /// Run text.
    pub text: String,
    /// Run attributes.
    pub style: TextRunStyle,
}

/// Payload of a view. Exactly one kind per node.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum NodeData {
    /// Frame, group or component with ordered children.
    Container {
        /// Container outline.
        shape: ViewShape,
        /// Owned children in paint order.
        children: Vec<View>,
    },
    /// Plain text.
    Text {
        /// Text content.
        content: String,
        /// Localization resource name.
        res_name: Option<String>,
    },
    /// Ordered runs of differently styled text.
    StyledText {
        /// Text runs.
        runs: Vec<StyledTextRun>,
        /// Localization resource name.
        res_name: Option<String>,
    },
    /// Childless vector shape.
    Shape {
        /// Geometry.
        shape: ViewShape,
    },
}

/// Content replacement carried by a component instance.
#[derive(Clone, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub enum ContentOverride {
    /// Keep the member's content.
    #[default]
    None,
    /// Replace text content.
    Text {
        /// Text content.
        content: String,
        /// Localization resource name.
        res_name: Option<String>,
    },
    /// Replace with styled runs.
    StyledText {
        /// Text runs.
        runs: Vec<StyledTextRun>,
        /// Localization resource name.
        res_name: Option<String>,
    },
}

/// Overrides an instance applies on top of whichever variant member it shows.
#[derive(Clone, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ComponentOverrides {
    /// Field-level style patch.
    pub style: Option<StyleOverride>,
    /// Content patch.
    pub content: ContentOverride,
}

/// Link from an instance back to its component.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ComponentInfo {
    /// Id of the component (variant member) the instance was created from.
    pub component_id: String,
    /// Name of that component, the member's `Prop=Value` name for variants.
    pub component_name: String,
    /// Owning component set, empty for standalone components.
    pub component_set_name: String,
    /// Instance-level overrides.
    pub overrides: Option<ComponentOverrides>,
}

/// Component set metadata.
#[derive(Clone, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ComponentSetInfo {
    /// Id of the declared default member.
    pub default_member_id: Option<String>,
}

/// Component role of a view.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ComponentRole {
    /// The view is a component set; its children are variant members.
    Set(ComponentSetInfo),
    /// The view is an instance of a component.
    Instance(ComponentInfo),
}

/// A node of the authored design.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct View {
    /// Stable id assigned by the design tool.
    pub id: String,
    /// Author-visible name, not unique.
    pub name: String,
    /// Authored style, shared with render nodes until customized.
    pub style: Arc<ViewStyle>,
    /// Payload.
    pub data: NodeData,
    /// Component role, if any.
    pub component: Option<ComponentRole>,
}

impl View {
    /// Children of a container, empty for every other payload.
    pub fn children(&self) -> &[View] {
        match &self.data {
            NodeData::Container { children, .. } => children,
            NodeData::Text { .. } | NodeData::StyledText { .. } | NodeData::Shape { .. } => &[],
        }
    }

    /// Geometry for containers and shapes.
    pub fn shape(&self) -> Option<&ViewShape> {
        match &self.data {
            NodeData::Container { shape, .. } | NodeData::Shape { shape } => Some(shape),
            NodeData::Text { .. } | NodeData::StyledText { .. } => None,
        }
    }

    /// `true` for component sets.
    pub fn is_component_set(&self) -> bool {
        matches!(self.component, Some(ComponentRole::Set(_)))
    }

    /// Instance info, if the view is a component instance.
    pub fn instance(&self) -> Option<&ComponentInfo> {
        match &self.component {
            Some(ComponentRole::Instance(info)) => Some(info),
            _ => None,
        }
    }
}

/// Document header metadata.
#[derive(Clone, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct DocumentHeader {
    /// Design file id.
    pub id: String,
    /// Design file name.
    pub name: String,
    /// Last-modified timestamp as reported by the design tool.
    pub last_modified: String,
    /// Design tool revision.
    pub version: String,
}

/// Root-index-first child path to a view.
pub(crate) type NodePath = SmallVec<[u32; 8]>;

#[derive(Debug, Default)]
pub(crate) struct DocumentIndex {
    by_id: HashMap<String, NodePath>,
    by_name: HashMap<String, Vec<NodePath>>,
}

impl DocumentIndex {
    /// Record a view. Call in pre-order so name lookups see document order.
    pub(crate) fn record(&mut self, id: &str, name: &str, path: &[u32]) {
        let path = NodePath::from_slice(path);
        if !self.by_id.contains_key(id) {
            self.by_id.insert(id.to_owned(), path.clone());
        } else {
            tracing::warn!(id, "duplicate view id, keeping first occurrence");
        }
        self.by_name.entry(name.to_owned()).or_default().push(path);
    }

    fn build(roots: &[View]) -> Self {
        fn walk(index: &mut DocumentIndex, view: &View, path: &mut Vec<u32>) {
            index.record(&view.id, &view.name, path);
            for (i, child) in view.children().iter().enumerate() {
                path.push(i as u32);
                walk(index, child, path);
                path.pop();
            }
        }

        let mut index = Self::default();
        let mut path = Vec::new();
        for (i, root) in roots.iter().enumerate() {
            path.push(i as u32);
            walk(&mut index, root, &mut path);
            path.pop();
        }
        index
    }
}

/// Canonical-key index over the members of one component set.
#[derive(Debug, Default)]
pub(crate) struct VariantIndex {
    pub(crate) members: HashMap<String, NodePath>,
    pub(crate) default_member: Option<NodePath>,
    pub(crate) first_member: Option<NodePath>,
    pub(crate) member_count: usize,
}

/// Decoded design document.
///
/// Immutable once built. A newer version replaces the whole document; the id and name indexes
/// and the lazily built variant indexes live and die with it.
#[derive(Debug)]
pub struct Document {
    header: DocumentHeader,
    roots: Vec<View>,
    index: DocumentIndex,
    variants: OnceLock<HashMap<String, VariantIndex>>,
}

impl Document {
    /// Build a document and its indexes.
    pub fn new(header: DocumentHeader, roots: Vec<View>) -> Self {
        let index = DocumentIndex::build(&roots);
        Self::with_index(header, roots, index)
    }

    pub(crate) fn with_index(header: DocumentHeader, roots: Vec<View>, index: DocumentIndex) -> Self {
        Self {
            header,
            roots,
            index,
            variants: OnceLock::new(),
        }
    }

    /// Header metadata.
    pub fn header(&self) -> &DocumentHeader {
        &self.header
    }

    /// Top-level views (pages/frames).
    pub fn roots(&self) -> &[View] {
        &self.roots
    }

    /// Number of views in the document.
    pub fn len(&self) -> usize {
        self.index.by_name.values().map(Vec::len).sum()
    }

    /// `true` when the document has no views.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// View with the given id.
    pub fn view_by_id(&self, id: &str) -> Option<&View> {
        self.index.by_id.get(id).and_then(|p| self.view_at(p))
    }

    /// Views with the given name in document order.
    pub fn views_by_name<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a View> + 'a {
        self.index
            .by_name
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|p| self.view_at(p))
    }

    pub(crate) fn view_at(&self, path: &[u32]) -> Option<&View> {
        let (first, rest) = path.split_first()?;
        let mut view = self.roots.get(*first as usize)?;
        for i in rest {
            view = view.children().get(*i as usize)?;
        }
        Some(view)
    }

    pub(crate) fn first_path_named(&self, name: &str) -> Option<&[u32]> {
        self.index
            .by_name
            .get(name)
            .and_then(|paths| paths.first())
            .map(|p| p.as_slice())
    }

    /// Variant indexes of every component set, built on first use.
    pub(crate) fn variant_indexes(&self) -> &HashMap<String, VariantIndex> {
        self.variants.get_or_init(|| self.build_variant_indexes())
    }

    fn build_variant_indexes(&self) -> HashMap<String, VariantIndex> {
        fn walk(
            doc: &Document,
            view: &View,
            path: &mut Vec<u32>,
            out: &mut HashMap<String, VariantIndex>,
        ) {
            if let Some(ComponentRole::Set(info)) = &view.component {
                if out.contains_key(&view.name) {
                    tracing::warn!(set = %view.name, "duplicate component set name, keeping first");
                } else {
                    out.insert(view.name.clone(), doc.index_set(view, info, path));
                }
            }
            for (i, child) in view.children().iter().enumerate() {
                path.push(i as u32);
                walk(doc, child, path, out);
                path.pop();
            }
        }

        let mut out = HashMap::new();
        let mut path = Vec::new();
        for (i, root) in self.roots.iter().enumerate() {
            path.push(i as u32);
            walk(self, root, &mut path, &mut out);
            path.pop();
        }
        tracing::debug!(sets = out.len(), "built variant indexes");
        out
    }

    fn index_set(&self, set: &View, info: &ComponentSetInfo, path: &[u32]) -> VariantIndex {
        let mut index = VariantIndex {
            member_count: set.children().len(),
            ..VariantIndex::default()
        };
        for (i, member) in set.children().iter().enumerate() {
            let mut member_path = NodePath::from_slice(path);
            member_path.push(i as u32);
            if i == 0 {
                index.first_member = Some(member_path.clone());
            }
            if info.default_member_id.as_deref() == Some(member.id.as_str()) {
                index.default_member = Some(member_path.clone());
            }
            index
                .members
                .entry(canonical_variant_key(&member.name))
                .or_insert(member_path);
        }
        index
    }
}

// Indexes are derived from `roots`; two documents are equal when their content is.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header && self.roots == other.roots
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
