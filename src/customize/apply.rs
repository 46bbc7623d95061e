use std::sync::Arc;

use crate::customize::context::{CustomizationContext, ListContent, NodeCustomization};
use crate::document::model::{ComponentInfo, ContentOverride, View};
use crate::resolve::resolver::Resolver;
use crate::tree::arena::{NodeHandle, RenderContent, RenderNode, RenderTree};

/// Merge `ctx` into `tree`, producing a new tree.
///
/// One top-down pass. Per node, the effective style is built field by field in precedence order:
/// authored style, then the instance's component overrides, then the host customization. Hidden
/// nodes are dropped with their subtree. Instances whose variant properties are customized are
/// swapped for the selected member. List content and replacements discard the authored children.
///
/// The input tree is never modified, and applying the same context twice yields the same tree.
#[tracing::instrument(skip_all, fields(nodes = tree.len(), customizations = ctx.len()))]
pub fn apply(tree: &RenderTree, ctx: &CustomizationContext, resolver: &Resolver<'_>) -> RenderTree {
    let mut out = RenderTree::new();
    let mut pass = ApplyPass {
        resolver,
        out: &mut out,
        expanding: Vec::new(),
        skipped: 0,
    };
    for &root in tree.roots() {
        pass.node(tree, root, None, ctx);
    }
    if pass.skipped > 0 {
        tracing::debug!(skipped = pass.skipped, "hidden or unresolvable nodes omitted");
    }
    out
}

/// Resolve `view` into a fresh tree and apply `ctx` to it.
pub fn apply_view(view: &View, ctx: &CustomizationContext, resolver: &Resolver<'_>) -> RenderTree {
    apply(&RenderTree::from_view(view), ctx, resolver)
}

struct ApplyPass<'a, 'd> {
    resolver: &'a Resolver<'d>,
    out: &'a mut RenderTree,
    /// Views of list items currently being expanded, outermost first.
    expanding: Vec<String>,
    skipped: usize,
}

impl ApplyPass<'_, '_> {
    fn node(
        &mut self,
        src: &RenderTree,
        h: NodeHandle,
        parent: Option<NodeHandle>,
        ctx: &CustomizationContext,
    ) -> Option<NodeHandle> {
        let node = src.get(h);
        let custom = ctx.get(&node.name);
        if custom.is_some_and(NodeCustomization::is_hidden) {
            self.skipped += 1;
            return None;
        }

        if let Some(info) = &node.component {
            if let Some(member) = self.resolver.instance_swap(info, &node.name, ctx) {
                tracing::trace!(instance = %node.name, member = %member.id, "variant swap");
                let swapped = swapped_instance(node, info, member);
                return self.node(&swapped, NodeHandle::ROOT, parent, ctx);
            }
        }

        let mut merged = node.detached();
        if let Some(overrides) = node.component.as_ref().and_then(|c| c.overrides.as_ref()) {
            if let Some(style) = &overrides.style {
                style.apply_to(&mut merged.style_mut().node);
            }
            apply_content_override(&mut merged.content, &overrides.content);
        }
        if let Some(custom) = custom {
            apply_customization(&mut merged, custom);
        }
        let replaced = matches!(merged.content, RenderContent::Replaced { .. });
        let out_h = self.out.push(merged, parent);

        if replaced {
            return Some(out_h);
        }
        if let Some(content) = custom.and_then(|c| c.content.as_ref()) {
            self.list_content(content, out_h, ctx);
            return Some(out_h);
        }
        for child in src.children(h) {
            self.node(src, child, Some(out_h), ctx);
        }
        Some(out_h)
    }

    fn list_content(&mut self, content: &ListContent, parent: NodeHandle, ctx: &CustomizationContext) {
        for (i, item) in content.items.iter().enumerate() {
            let item_ctx = item.customizations.as_deref().unwrap_or(ctx);
            let view = match self.resolver.resolve(&item.query, item_ctx) {
                Ok(view) => view,
                Err(e) => {
                    tracing::warn!(item = i, query = %item.query, error = %e, "list item not resolved, omitting");
                    self.skipped += 1;
                    continue;
                }
            };
            if self.expanding.contains(&view.id) {
                tracing::warn!(item = i, view = %view.id, "list item contains itself, omitting");
                self.skipped += 1;
                continue;
            }
            self.expanding.push(view.id.clone());
            let item_tree = RenderTree::from_view(view);
            if let Some(h) = self.node(&item_tree, NodeHandle::ROOT, Some(parent), item_ctx) {
                self.out.get_mut(h).grid_span = content.span_for(i);
            }
            self.expanding.pop();
        }
    }
}

/// Instance node rebuilt from `member`, keeping the instance's name and overrides.
fn swapped_instance(instance: &RenderNode, info: &ComponentInfo, member: &View) -> RenderTree {
    let mut tree = RenderTree::from_view(member);
    let root = tree.get_mut(NodeHandle::ROOT);
    root.name = instance.name.clone();
    root.view_id = instance.view_id.clone();
    root.merge_key = instance.merge_key.clone();
    root.component = Some(ComponentInfo {
        component_id: member.id.clone(),
        component_name: member.name.clone(),
        component_set_name: info.component_set_name.clone(),
        overrides: info.overrides.clone(),
    });
    tree
}

fn apply_content_override(content: &mut RenderContent, over: &ContentOverride) {
    match (content, over) {
        (_, ContentOverride::None) => {}
        (
            content @ (RenderContent::Text { .. } | RenderContent::StyledText { .. }),
            ContentOverride::Text {
                content: text,
                res_name,
            },
        ) => {
            *content = RenderContent::Text {
                content: text.clone(),
                res_name: res_name.clone(),
            };
        }
        (
            content @ (RenderContent::Text { .. } | RenderContent::StyledText { .. }),
            ContentOverride::StyledText { runs, res_name },
        ) => {
            *content = RenderContent::StyledText {
                runs: runs.clone(),
                res_name: res_name.clone(),
            };
        }
        _ => {}
    }
}

fn apply_customization(node: &mut RenderNode, custom: &NodeCustomization) {
    if let Some(style) = &custom.style {
        style.apply_to(&mut node.style_mut().node);
    }
    if let Some(style) = custom.text_style.as_ref().filter(|_| node.content.is_text()) {
        style.apply_to(&mut node.style_mut().node);
    }
    if let Some(layout) = &custom.layout {
        layout.apply_to(&mut node.style_mut().layout);
    }
    if let Some(text) = &custom.text {
        if node.content.is_text() {
            node.content = RenderContent::Text {
                content: text.clone(),
                res_name: None,
            };
        } else {
            tracing::warn!(node = %node.name, "text customization on a non-text node ignored");
        }
    }
    if let Some(image) = &custom.image {
        node.image = Some(Arc::clone(image));
    }
    if let Some(key) = &custom.key {
        node.merge_key = Some(key.clone());
    }
    if let Some(token) = custom.replacement {
        node.content = RenderContent::Replaced { token };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/customize/apply.rs"]
mod tests;
