use std::collections::HashSet;

use crate::animation::ease::AnimationSpec;
use crate::animation::transition::{Transition, TransitionSpec};
use crate::animation::tween::{AnimatedItem, ArcAngles, Decomposed, Tween};
use crate::document::model::ViewShape;
use crate::document::style::{Fill, ShaderData};
use crate::foundation::core::Affine;
use crate::foundation::error::DesignError;
use crate::tree::arena::{NodeHandle, NodeOrigin, RenderContent, RenderNode, RenderTree};

/// Merge two laid-out trees into a transition tree plus its animated items.
///
/// The first roots of both trees are paired. An empty "to" tree degrades to a static copy of
/// "from".
#[tracing::instrument(skip_all, fields(from = from.len(), to = to.len()))]
pub fn merge(from: &RenderTree, to: &RenderTree, spec: &TransitionSpec) -> Transition {
    let mut m = Merger::new(from, to, spec);
    match (from.root(), to.root()) {
        (Some(f), Some(t)) => m.pair(f, t, None),
        (Some(f), None) => m.static_snapshot(f, "the to tree is empty"),
        (None, Some(t)) => {
            let h = m.out.copy_subtree(to, t, None, Some(NodeOrigin::To));
            m.fade_in(h, to.get(t));
        }
        (None, None) => {}
    }
    m.finish()
}

/// Merge the subtree at `from_node` against the "to" node created from view `to_view_id`.
///
/// A missing target logs [`DesignError::AnimationTargetMissing`] and yields a static copy of the
/// "from" subtree with no animated items.
#[tracing::instrument(skip(from, to, spec))]
pub fn merge_target(
    from: &RenderTree,
    from_node: NodeHandle,
    to: &RenderTree,
    to_view_id: &str,
    spec: &TransitionSpec,
) -> Transition {
    let mut m = Merger::new(from, to, spec);
    match to.find_by_view_id(to_view_id) {
        Some(t) => m.pair(from_node, t, None),
        None => m.static_snapshot(from_node, &format!("no node '{to_view_id}' in the to tree")),
    }
    m.finish()
}

struct Merger<'a> {
    from: &'a RenderTree,
    to: &'a RenderTree,
    base: AnimationSpec,
    enter: AnimationSpec,
    out: RenderTree,
    items: Vec<AnimatedItem>,
    matched: HashSet<NodeHandle>,
}

impl<'a> Merger<'a> {
    fn new(from: &'a RenderTree, to: &'a RenderTree, spec: &TransitionSpec) -> Self {
        Self {
            from,
            to,
            base: spec.item(),
            enter: spec.enter_item(),
            out: RenderTree::new(),
            items: Vec::new(),
            matched: HashSet::new(),
        }
    }

    fn finish(self) -> Transition {
        tracing::debug!(
            nodes = self.out.len(),
            items = self.items.len(),
            "transition tree built"
        );
        Transition::new(self.out, self.items)
    }

    fn static_snapshot(&mut self, f: NodeHandle, reason: &str) {
        let err = DesignError::animation_target_missing(reason);
        tracing::warn!(error = %err, "transition degrades to a static snapshot");
        self.out
            .copy_subtree(self.from, f, None, Some(NodeOrigin::From));
    }

    fn pair(&mut self, f: NodeHandle, t: NodeHandle, parent: Option<NodeHandle>) {
        let (from, to) = (self.from, self.to);
        let (fnode, tnode) = (from.get(f), to.get(t));
        if !tweenable(fnode, tnode) {
            self.side_by_side(f, t, parent);
            return;
        }

        let mut node = tnode.detached();
        node.origin = Some(NodeOrigin::To(t));
        let h = self.out.push(node, parent);
        self.property_tweens(fnode, tnode, h);

        let from_children: Vec<NodeHandle> = from.children(f).collect();
        for tc in to.children(t) {
            let tchild = to.get(tc);
            let found = from_children
                .iter()
                .copied()
                .find(|fc| !self.matched.contains(fc) && same_node(from.get(*fc), tchild));
            match found {
                Some(fc) => {
                    self.matched.insert(fc);
                    self.pair(fc, tc, Some(h));
                }
                None => {
                    let c = self.out.copy_subtree(to, tc, Some(h), Some(NodeOrigin::To));
                    self.fade_in(c, tchild);
                }
            }
        }
        for fc in from_children {
            if self.matched.contains(&fc) {
                continue;
            }
            let c = self
                .out
                .copy_subtree(from, fc, Some(h), Some(NodeOrigin::From));
            self.fade_out(c, from.get(fc));
        }
    }

    /// Incompatible pair: both subtrees are kept and crossfade while moving together.
    fn side_by_side(&mut self, f: NodeHandle, t: NodeHandle, parent: Option<NodeHandle>) {
        let (from, to) = (self.from, self.to);
        let (fnode, tnode) = (from.get(f), to.get(t));
        let fh = self
            .out
            .copy_subtree(from, f, parent, Some(NodeOrigin::From));
        let th = self.out.copy_subtree(to, t, parent, Some(NodeOrigin::To));
        self.fade_out(fh, fnode);
        self.fade_in(th, tnode);
        if let Some(tween) = layout_tween(fnode, tnode) {
            self.push(fh, tween.clone(), self.base);
            self.push(th, tween, self.base);
        }
    }

    fn property_tweens(&mut self, f: &RenderNode, t: &RenderNode, h: NodeHandle) {
        let (fs, ts) = (&f.style.node, &t.style.node);
        if fs.opacity != ts.opacity {
            self.push(
                h,
                Tween::Opacity {
                    from: fs.opacity,
                    to: ts.opacity,
                },
                self.base,
            );
        }
        if let Some(tween) = layout_tween(f, t) {
            self.push(h, tween, self.base);
        }
        if fs.transform != ts.transform {
            self.push(
                h,
                Tween::Transform {
                    from: decompose(fs.transform),
                    to: decompose(ts.transform),
                },
                self.base,
            );
        }
        if let (Some(a), Some(b)) = (arc_angles(f), arc_angles(t)) {
            if a != b {
                self.push(h, Tween::ArcSweep { from: a, to: b }, self.base);
            }
        }
        if let Some(tween) = uniform_tween(fs.shader.as_ref(), ts.shader.as_ref()) {
            self.push(h, tween, self.base);
        }
    }

    fn fade_in(&mut self, h: NodeHandle, node: &RenderNode) {
        let opacity = node.style.node.opacity;
        self.push(h, Tween::FadeIn { opacity }, self.enter);
    }

    fn fade_out(&mut self, h: NodeHandle, node: &RenderNode) {
        let opacity = node.style.node.opacity;
        self.push(h, Tween::FadeOut { opacity }, self.base);
    }

    fn push(&mut self, target: NodeHandle, tween: Tween, spec: AnimationSpec) {
        self.items.push(AnimatedItem {
            target,
            tween,
            spec,
        });
    }
}

/// Developer keys win over names when both nodes carry one.
fn same_node(a: &RenderNode, b: &RenderNode) -> bool {
    match (&a.merge_key, &b.merge_key) {
        (Some(ka), Some(kb)) => ka == kb,
        _ => a.name == b.name,
    }
}

fn tweenable(a: &RenderNode, b: &RenderNode) -> bool {
    let (sa, sb) = (&a.style.node, &b.style.node);
    if let (Some(sha), Some(shb)) = (&sa.shader, &sb.shader) {
        if same_shader(sha, shb) {
            return true;
        }
    }
    if !same_paint_kinds(&sa.fills, &sb.fills)
        || !same_paint_kinds(&sa.stroke.paints, &sb.stroke.paints)
    {
        return false;
    }
    match (&a.content, &b.content) {
        (RenderContent::Container { shape: sa }, RenderContent::Container { shape: sb })
        | (RenderContent::Shape { shape: sa }, RenderContent::Shape { shape: sb }) => {
            sa.kind() == sb.kind()
        }
        _ => false,
    }
}

/// Paint stacks only tween layer by layer between paints of the same kind.
fn same_paint_kinds(a: &[Fill], b: &[Fill]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| std::mem::discriminant(x) == std::mem::discriminant(y))
}

/// Hash first, then the full source.
fn same_shader(a: &ShaderData, b: &ShaderData) -> bool {
    a.source_hash() == b.source_hash() && a.source == b.source
}

/// Bounds, or a scale when resizing would distort the content.
fn layout_tween(a: &RenderNode, b: &RenderNode) -> Option<Tween> {
    let (from, to) = (a.layout?.rect(), b.layout?.rect());
    Some(if prefers_scale(a, b) {
        Tween::Scale { from, to }
    } else {
        Tween::Bounds { from, to }
    })
}

fn prefers_scale(a: &RenderNode, b: &RenderNode) -> bool {
    let is_path = |n: &RenderNode| matches!(n.content.shape(), Some(ViewShape::Path { .. }));
    if is_path(a) && is_path(b) {
        return true;
    }
    let same_text = match (&a.content, &b.content) {
        (
            RenderContent::Text {
                content: ca,
                res_name: ra,
            },
            RenderContent::Text {
                content: cb,
                res_name: rb,
            },
        ) => ca == cb && ra == rb,
        (
            RenderContent::StyledText { runs: ca, res_name: ra },
            RenderContent::StyledText { runs: cb, res_name: rb },
        ) => ca == cb && ra == rb,
        _ => false,
    };
    same_text && a.style.node.font_family == b.style.node.font_family
}

fn decompose(m: Option<Affine>) -> Decomposed {
    m.map_or(Decomposed::IDENTITY, Decomposed::from_affine)
}

fn arc_angles(n: &RenderNode) -> Option<ArcAngles> {
    match n.content.shape()? {
        ViewShape::Arc {
            start_angle_degrees,
            sweep_angle_degrees,
            ..
        } => Some(ArcAngles {
            start: *start_angle_degrees,
            sweep: *sweep_angle_degrees,
        }),
        _ => None,
    }
}

/// Same static shader with the same uniform names and different values.
fn uniform_tween(a: Option<&ShaderData>, b: Option<&ShaderData>) -> Option<Tween> {
    let (a, b) = (a?, b?);
    if a.live || b.live || !same_shader(a, b) || a.uniforms == b.uniforms {
        return None;
    }
    fn names(s: &ShaderData) -> Vec<&str> {
        let mut n: Vec<&str> = s.uniforms.iter().map(|u| u.name.as_str()).collect();
        n.sort_unstable();
        n
    }
    if names(a) != names(b) {
        return None;
    }
    // Start values in the order of the "to" node, whose uniforms are written in place.
    let from = b
        .uniforms
        .iter()
        .filter_map(|u| a.uniforms.iter().find(|x| x.name == u.name).cloned())
        .collect();
    Some(Tween::ShaderUniforms {
        from,
        to: b.uniforms.clone(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/animation/merge.rs"]
mod tests;
