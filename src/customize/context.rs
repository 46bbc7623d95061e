use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::document::query::NodeQuery;
use crate::document::style::{GridSpan, LayoutOverride, StyleOverride};

/// Encoded image bytes supplied by the host.
pub type ImageData = Arc<[u8]>;

/// Opaque host handle naming a replacement renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ReplacementToken(pub u64);

/// Grid span per list item index.
pub type SpanFn = Arc<dyn Fn(usize) -> GridSpan + Send + Sync>;

/// One item of injected list content.
#[derive(Clone, Debug)]
pub struct ListItem {
    /// Design node rendered for this item.
    pub query: NodeQuery,
    /// Customizations scoped to this item; the enclosing context when `None`.
    pub customizations: Option<Arc<CustomizationContext>>,
}

impl ListItem {
    /// Item rendering `query` with the enclosing customizations.
    pub fn new(query: NodeQuery) -> Self {
        Self {
            query,
            customizations: None,
        }
    }

    /// Item rendering `query` with its own customizations.
    pub fn with_customizations(query: NodeQuery, ctx: CustomizationContext) -> Self {
        Self {
            query,
            customizations: Some(Arc::new(ctx)),
        }
    }
}

/// Ordered children that replace a node's authored children.
#[derive(Clone, Default)]
pub struct ListContent {
    /// Items in order.
    pub items: Vec<ListItem>,
    /// Span hint per item index.
    pub span: Option<SpanFn>,
}

impl ListContent {
    /// Content without span hints.
    pub fn new(items: Vec<ListItem>) -> Self {
        Self { items, span: None }
    }

    /// Attach a span function.
    pub fn with_span(mut self, span: impl Fn(usize) -> GridSpan + Send + Sync + 'static) -> Self {
        self.span = Some(Arc::new(span));
        self
    }

    pub(crate) fn span_for(&self, index: usize) -> Option<GridSpan> {
        self.span.as_ref().map(|f| f(index))
    }
}

impl std::fmt::Debug for ListContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListContent")
            .field("items", &self.items)
            .field("span", &self.span.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Everything the host customizes on nodes with one name.
#[derive(Clone, Debug, Default)]
pub struct NodeCustomization {
    /// Replacement text.
    pub text: Option<String>,
    /// Text attribute patch.
    pub text_style: Option<StyleOverride>,
    /// Replacement image.
    pub image: Option<ImageData>,
    /// Visibility; `Some(false)` removes the node and its subtree.
    pub visible: Option<bool>,
    /// Variant property assignment.
    pub variant: Option<BTreeMap<String, String>>,
    /// Injected children.
    pub content: Option<ListContent>,
    /// Host renderer replacing the node's descendants.
    pub replacement: Option<ReplacementToken>,
    /// Paint patch.
    pub style: Option<StyleOverride>,
    /// Layout patch.
    pub layout: Option<LayoutOverride>,
    /// Merge key used when matching nodes during transitions.
    pub key: Option<String>,
}

impl NodeCustomization {
    /// Overlay `other`; its set fields win. Variant maps merge key by key.
    pub fn merge(&mut self, other: NodeCustomization) {
        fn take<T>(dst: &mut Option<T>, src: Option<T>) {
            if src.is_some() {
                *dst = src;
            }
        }
        if let Some(props) = other.variant {
            self.variant.get_or_insert_with(BTreeMap::new).extend(props);
        }
        take(&mut self.text, other.text);
        take(&mut self.text_style, other.text_style);
        take(&mut self.image, other.image);
        take(&mut self.visible, other.visible);
        take(&mut self.content, other.content);
        take(&mut self.replacement, other.replacement);
        take(&mut self.style, other.style);
        take(&mut self.layout, other.layout);
        take(&mut self.key, other.key);
    }

    pub(crate) fn is_hidden(&self) -> bool {
        self.visible == Some(false)
    }
}

/// Per-pass customizations keyed by node name.
///
/// Every node with a matching name receives the same customization, which is how repeated list
/// items share one setting.
#[derive(Clone, Debug, Default)]
pub struct CustomizationContext {
    by_name: HashMap<String, NodeCustomization>,
}

impl CustomizationContext {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of customized names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// `true` when nothing is customized.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Customization for `name`.
    pub fn get(&self, name: &str) -> Option<&NodeCustomization> {
        self.by_name.get(name)
    }

    /// Variant properties assigned to `name` (a component set or an instance).
    pub fn variant_properties(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.get(name).and_then(|c| c.variant.as_ref())
    }

    /// Merge a whole customization into `name`.
    pub fn customize(&mut self, name: impl Into<String>, c: NodeCustomization) -> &mut Self {
        self.by_name.entry(name.into()).or_default().merge(c);
        self
    }

    /// Merge every entry of `other` into this context.
    pub fn extend(&mut self, other: CustomizationContext) -> &mut Self {
        for (name, c) in other.by_name {
            self.customize(name, c);
        }
        self
    }

    fn entry(&mut self, name: impl Into<String>) -> &mut NodeCustomization {
        self.by_name.entry(name.into()).or_default()
    }

    /// Replace the text content of nodes named `name`.
    pub fn set_text(&mut self, name: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.entry(name).text = Some(text.into());
        self
    }

    /// Patch the text style of nodes named `name`.
    pub fn set_text_style(&mut self, name: impl Into<String>, style: StyleOverride) -> &mut Self {
        self.entry(name).text_style = Some(style);
        self
    }

    /// Fill nodes named `name` with the given encoded image.
    pub fn set_image(&mut self, name: impl Into<String>, bytes: impl Into<ImageData>) -> &mut Self {
        self.entry(name).image = Some(bytes.into());
        self
    }

    /// Show or hide nodes named `name`; hidden nodes drop their subtree.
    pub fn set_visible(&mut self, name: impl Into<String>, visible: bool) -> &mut Self {
        self.entry(name).visible = Some(visible);
        self
    }

    /// Assign variant properties; repeated calls merge property by property.
    pub fn set_variant_properties<K, V>(
        &mut self,
        name: impl Into<String>,
        props: impl IntoIterator<Item = (K, V)>,
    ) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entry = self.entry(name).variant.get_or_insert_with(BTreeMap::new);
        entry.extend(props.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Replace the children of nodes named `name` with list items.
    pub fn set_content(&mut self, name: impl Into<String>, content: ListContent) -> &mut Self {
        self.entry(name).content = Some(content);
        self
    }

    /// Hand nodes named `name` to the host as a replaced element.
    pub fn set_replacement(
        &mut self,
        name: impl Into<String>,
        token: ReplacementToken,
    ) -> &mut Self {
        self.entry(name).replacement = Some(token);
        self
    }

    /// Merge a paint patch; fields set later win.
    pub fn set_style(&mut self, name: impl Into<String>, style: StyleOverride) -> &mut Self {
        let entry = self.entry(name);
        entry.style = Some(match entry.style.take() {
            Some(prev) => style.layered_over(&prev),
            None => style,
        });
        self
    }

    /// Patch the layout style of nodes named `name`.
    pub fn set_layout(&mut self, name: impl Into<String>, layout: LayoutOverride) -> &mut Self {
        self.entry(name).layout = Some(layout);
        self
    }

    /// Merge key used to pair nodes named `name` across transitions.
    pub fn set_key(&mut self, name: impl Into<String>, key: impl Into<String>) -> &mut Self {
        self.entry(name).key = Some(key.into());
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/customize/context.rs"]
mod tests;
