use std::sync::Arc;

use crate::document::model::{
    ComponentInfo, ComponentOverrides, ComponentRole, ComponentSetInfo, Document, DocumentHeader,
    NodeData, StyledTextRun, View, ViewShape,
};
use crate::document::style::{Dimension, LayoutStyle, NodeStyle, ViewStyle};
use crate::foundation::core::Size;
use crate::foundation::error::{DesignError, DesignResult};

/// Builds one [`View`]; nest built views with [`ViewBuilder::child`].
pub struct ViewBuilder {
    id: String,
    name: String,
    style: ViewStyle,
    data: NodeData,
    children: Vec<View>,
    component: Option<ComponentRole>,
}

impl ViewBuilder {
    fn new(id: impl Into<String>, name: impl Into<String>, data: NodeData) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            style: ViewStyle::default(),
            data,
            children: Vec::new(),
            component: None,
        }
    }

    /// Rectangular container.
    pub fn frame(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(
            id,
            name,
            NodeData::Container {
                shape: ViewShape::Rect,
                children: Vec::new(),
            },
        )
    }

    /// Plain text node.
    pub fn text(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(
            id,
            name,
            NodeData::Text {
                content: content.into(),
                res_name: None,
            },
        )
    }

    /// Styled text node.
    pub fn styled_text(
        id: impl Into<String>,
        name: impl Into<String>,
        runs: Vec<StyledTextRun>,
    ) -> Self {
        Self::new(
            id,
            name,
            NodeData::StyledText {
                runs,
                res_name: None,
            },
        )
    }

    /// Childless vector shape.
    pub fn shape(id: impl Into<String>, name: impl Into<String>, shape: ViewShape) -> Self {
        Self::new(id, name, NodeData::Shape { shape })
    }

    /// Replace the outline of a container or shape.
    pub fn outline(mut self, outline: ViewShape) -> Self {
        match &mut self.data {
            NodeData::Container { shape, .. } | NodeData::Shape { shape } => *shape = outline,
            NodeData::Text { .. } | NodeData::StyledText { .. } => {}
        }
        self
    }

    /// Localization resource name for text nodes.
    pub fn res_name(mut self, name: impl Into<String>) -> Self {
        match &mut self.data {
            NodeData::Text { res_name, .. } | NodeData::StyledText { res_name, .. } => {
                *res_name = Some(name.into())
            }
            NodeData::Container { .. } | NodeData::Shape { .. } => {}
        }
        self
    }

    /// Replace the whole style.
    pub fn style(mut self, style: ViewStyle) -> Self {
        self.style = style;
        self
    }

    /// Edit the layout half of the style in place.
    pub fn layout(mut self, f: impl FnOnce(&mut LayoutStyle)) -> Self {
        f(&mut self.style.layout);
        self
    }

    /// Edit the paint half of the style in place.
    pub fn node_style(mut self, f: impl FnOnce(&mut NodeStyle)) -> Self {
        f(&mut self.style.node);
        self
    }

    /// Fixed design size: layout width/height in points and the design node size.
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.style.layout.width = Dimension::Points(width);
        self.style.layout.height = Dimension::Points(height);
        self.style.node.node_size = Size::new(f64::from(width), f64::from(height));
        self
    }

    /// Paint opacity in `0..=1`.
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.style.node.opacity = opacity;
        self
    }

    /// Append a child; only containers accept children.
    pub fn child(mut self, child: View) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children in order.
    pub fn children(mut self, children: impl IntoIterator<Item = View>) -> Self {
        self.children.extend(children);
        self
    }

    /// Mark the view as a component set; children become its variant members.
    pub fn component_set(mut self, default_member_id: Option<&str>) -> Self {
        self.component = Some(ComponentRole::Set(ComponentSetInfo {
            default_member_id: default_member_id.map(str::to_owned),
        }));
        self
    }

    /// Mark the view as an instance of `component_name` in `component_set_name`.
    pub fn instance(
        mut self,
        component_id: impl Into<String>,
        component_name: impl Into<String>,
        component_set_name: impl Into<String>,
        overrides: Option<ComponentOverrides>,
    ) -> Self {
        self.component = Some(ComponentRole::Instance(ComponentInfo {
            component_id: component_id.into(),
            component_name: component_name.into(),
            component_set_name: component_set_name.into(),
            overrides,
        }));
        self
    }

    /// Finish the view.
    ///
    /// Fails with [`DesignError::Validation`] for an empty id, children on a non-container, or a
    /// component set that is not a container.
    pub fn build(self) -> DesignResult<View> {
        if self.id.trim().is_empty() {
            return Err(DesignError::validation(format!(
                "view '{}' needs a non-empty id",
                self.name
            )));
        }
        let data = match self.data {
            NodeData::Container { shape, mut children } => {
                children.extend(self.children);
                NodeData::Container { shape, children }
            }
            other => {
                if !self.children.is_empty() {
                    return Err(DesignError::validation(format!(
                        "view '{}' is not a container and cannot have children",
                        self.id
                    )));
                }
                other
            }
        };
        if matches!(self.component, Some(ComponentRole::Set(_)))
            && !matches!(data, NodeData::Container { .. })
        {
            return Err(DesignError::validation(format!(
                "component set '{}' must be a container",
                self.id
            )));
        }
        Ok(View {
            id: self.id,
            name: self.name,
            style: Arc::new(self.style),
            data,
            component: self.component,
        })
    }
}

/// Builds a [`Document`] from top-level views.
pub struct DocumentBuilder {
    header: DocumentHeader,
    roots: Vec<View>,
}

impl DocumentBuilder {
    /// Empty document with the given file id and title.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            header: DocumentHeader {
                id: id.into(),
                name: name.into(),
                ..DocumentHeader::default()
            },
            roots: Vec::new(),
        }
    }

    /// Last modification timestamp, as given by the host.
    pub fn last_modified(mut self, ts: impl Into<String>) -> Self {
        self.header.last_modified = ts.into();
        self
    }

    /// Document version string.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.header.version = version.into();
        self
    }

    /// Append a top-level view.
    pub fn root(mut self, view: View) -> Self {
        self.roots.push(view);
        self
    }

    /// Build the document and its id and name indexes.
    pub fn build(self) -> Document {
        Document::new(self.header, self.roots)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/dsl.rs"]
mod tests;
