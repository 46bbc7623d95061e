use super::*;
use crate::animation::ease::Easing;
use crate::document::dsl::ViewBuilder;
use crate::document::model::{PathData, StrokeCap, View, WindingRule};
use crate::document::style::{ScaleMode, ShaderUniform, UniformValue};
use crate::foundation::core::{Color, Rect};
use crate::layout::ComputedLayout;

fn spec() -> TransitionSpec {
    TransitionSpec {
        easing: Easing::Linear,
        duration: 1.0,
        delay: 0.0,
        enter_delay: 0.0,
    }
}

/// Render tree with every node boxed at its design size.
fn laid(view: View) -> RenderTree {
    let mut tree = RenderTree::from_view(&view);
    let handles: Vec<NodeHandle> = tree.handles().collect();
    for h in handles {
        let size = tree.get(h).style.node.node_size;
        tree.get_mut(h).layout = Some(ComputedLayout {
            width: size.width as f32,
            height: size.height as f32,
            ..ComputedLayout::default()
        });
    }
    tree
}

fn place(tree: &mut RenderTree, name: &str, left: f32, top: f32) {
    let h = tree.find_by_name(name).unwrap();
    if let Some(l) = tree.get_mut(h).layout.as_mut() {
        l.left = left;
        l.top = top;
    }
}

fn frame(id: &str, name: &str, children: Vec<View>) -> View {
    ViewBuilder::frame(id, name)
        .size(100.0, 100.0)
        .children(children)
        .build()
        .unwrap()
}

fn leaf(id: &str, name: &str) -> View {
    ViewBuilder::frame(id, name).size(20.0, 20.0).build().unwrap()
}

fn arc(sweep: f32) -> ViewShape {
    ViewShape::Arc {
        paths: Vec::new(),
        strokes: Vec::new(),
        stroke_cap: StrokeCap::None,
        start_angle_degrees: 0.0,
        sweep_angle_degrees: sweep,
        inner_radius: 0.5,
        corner_radius: 0.0,
    }
}

fn path_shape() -> ViewShape {
    ViewShape::Path {
        paths: vec![PathData {
            data: "M0 0 L10 0 L10 10 Z".into(),
            winding: WindingRule::NonZero,
        }],
        strokes: Vec::new(),
        stroke_cap: StrokeCap::None,
    }
}

fn on(t: &Transition, h: NodeHandle) -> Vec<&Tween> {
    t.items()
        .iter()
        .filter(|i| i.target == h)
        .map(|i| &i.tween)
        .collect()
}

fn set_key(tree: &mut RenderTree, view_id: &str, key: &str) {
    let h = tree.find_by_view_id(view_id).unwrap();
    tree.get_mut(h).merge_key = Some(key.to_owned());
}

fn count(t: &Transition, pred: impl Fn(&Tween) -> bool) -> usize {
    t.items().iter().filter(|i| pred(&i.tween)).count()
}

#[test]
fn matched_rects_tween_instead_of_crossfading() {
    let from = laid(frame("a", "box", vec![]));
    let to_view = ViewBuilder::frame("a", "box")
        .size(150.0, 150.0)
        .opacity(0.5)
        .build()
        .unwrap();
    let mut to = laid(to_view);
    place(&mut to, "box", 10.0, 10.0);

    let t = merge(&from, &to, &spec());
    assert_eq!(t.items().len(), 2);
    assert_eq!(count(&t, Tween::is_fade), 0);
    assert!(t.items().iter().any(|i| i.tween == Tween::Opacity { from: 1.0, to: 0.5 }));
    assert!(t.items().iter().any(|i| i.tween
        == Tween::Bounds {
            from: Rect::new(0.0, 0.0, 100.0, 100.0),
            to: Rect::new(10.0, 10.0, 160.0, 160.0),
        }));
    assert_eq!(t.tree().len(), 1);
    assert_eq!(t.tree().get(NodeHandle::ROOT).origin, Some(NodeOrigin::To(NodeHandle::ROOT)));
}

#[test]
fn starts_in_the_from_state_and_ends_in_the_to_state() {
    let from = laid(frame("a", "box", vec![]));
    let to_view = ViewBuilder::frame("a", "box")
        .size(150.0, 150.0)
        .opacity(0.5)
        .build()
        .unwrap();
    let to = laid(to_view);

    let mut t = merge(&from, &to, &spec());
    let root = t.tree().get(NodeHandle::ROOT);
    assert_eq!(root.style.node.opacity, 1.0);
    assert_eq!(root.layout.unwrap().width, 100.0);

    t.apply(t.duration());
    let root = t.tree().get(NodeHandle::ROOT);
    assert_eq!(root.style.node.opacity, 0.5);
    assert_eq!(root.layout.unwrap().width, 150.0);
    assert!(t.is_finished(1.0));
}

#[test]
fn new_child_fades_in_and_nothing_fades_out() {
    let from = laid(frame("r", "root", vec![leaf("a", "A")]));
    let to = laid(frame("r", "root", vec![leaf("a", "A"), leaf("b", "B")]));

    let t = merge(&from, &to, &spec());
    assert_eq!(t.tree().len(), 3);
    assert_eq!(count(&t, |tw| matches!(tw, Tween::FadeOut { .. })), 0);
    let fade_ins: Vec<_> = t
        .items()
        .iter()
        .filter(|i| matches!(i.tween, Tween::FadeIn { .. }))
        .collect();
    assert_eq!(fade_ins.len(), 1);
    assert_eq!(t.tree().get(fade_ins[0].target).name, "B");
    assert_eq!(t.tree().get(fade_ins[0].target).style.node.opacity, 0.0);
}

#[test]
fn removed_child_fades_out() {
    let from = laid(frame("r", "root", vec![leaf("a", "A"), leaf("b", "B")]));
    let to = laid(frame("r", "root", vec![leaf("a", "A")]));

    let t = merge(&from, &to, &spec());
    let outs: Vec<_> = t
        .items()
        .iter()
        .filter(|i| matches!(i.tween, Tween::FadeOut { .. }))
        .collect();
    assert_eq!(outs.len(), 1);
    let gone = t.tree().get(outs[0].target);
    assert_eq!(gone.name, "B");
    assert!(matches!(gone.origin, Some(NodeOrigin::From(_))));
}

#[test]
fn duplicate_names_match_first_in_sibling_order() {
    let from = laid(frame("r", "root", vec![leaf("f1", "row"), leaf("f2", "row")]));
    let to = laid(frame("r", "root", vec![leaf("t1", "row")]));

    let t = merge(&from, &to, &spec());
    let out: Vec<_> = t
        .items()
        .iter()
        .filter(|i| matches!(i.tween, Tween::FadeOut { .. }))
        .map(|i| t.tree().get(i.target).view_id.as_str())
        .collect();
    assert_eq!(out, ["f2"]);
}

#[test]
fn developer_keys_override_names() {
    let mut from = laid(frame("r", "root", vec![leaf("f1", "row"), leaf("f2", "row")]));
    let mut to = laid(frame("r", "root", vec![leaf("t1", "row")]));
    set_key(&mut from, "f1", "one");
    set_key(&mut from, "f2", "two");
    set_key(&mut to, "t1", "two");

    let t = merge(&from, &to, &spec());
    let out: Vec<_> = t
        .items()
        .iter()
        .filter(|i| matches!(i.tween, Tween::FadeOut { .. }))
        .map(|i| t.tree().get(i.target).view_id.as_str())
        .collect();
    assert_eq!(out, ["f1"]);
}

#[test]
fn incompatible_shapes_crossfade_side_by_side() {
    let from = laid(frame("r", "root", vec![leaf("a", "A")]));
    let to_child = ViewBuilder::frame("a", "A")
        .outline(arc(90.0))
        .size(40.0, 40.0)
        .build()
        .unwrap();
    let to = laid(frame("r", "root", vec![to_child]));

    let t = merge(&from, &to, &spec());
    let root = t.tree().root().unwrap();
    let kids: Vec<_> = t.tree().children(root).collect();
    assert_eq!(kids.len(), 2);
    assert!(matches!(t.tree().get(kids[0]).origin, Some(NodeOrigin::From(_))));
    assert!(matches!(t.tree().get(kids[1]).origin, Some(NodeOrigin::To(_))));

    let from_items = on(&t, kids[0]);
    assert!(matches!(from_items[0], Tween::FadeOut { .. }));
    assert!(matches!(from_items[1], Tween::Bounds { .. }));
    let to_items = on(&t, kids[1]);
    assert!(matches!(to_items[0], Tween::FadeIn { .. }));
    assert_eq!(from_items[1], to_items[1]);
}

#[test]
fn paths_scale_instead_of_resizing() {
    let from = laid(
        ViewBuilder::frame("p", "icon")
            .outline(path_shape())
            .size(10.0, 10.0)
            .build()
            .unwrap(),
    );
    let to = laid(
        ViewBuilder::frame("p", "icon")
            .outline(path_shape())
            .size(30.0, 30.0)
            .build()
            .unwrap(),
    );
    let t = merge(&from, &to, &spec());
    assert_eq!(count(&t, |tw| matches!(tw, Tween::Scale { .. })), 1);
    assert_eq!(count(&t, |tw| matches!(tw, Tween::Bounds { .. })), 0);
}

#[test]
fn identical_text_scales() {
    let text = |w: f32| ViewBuilder::text("t", "label", "Hello").size(w, 20.0).build().unwrap();
    let from = laid(text(100.0));
    let to = laid(text(200.0));
    let t = merge(&from, &to, &spec());
    assert_eq!(count(&t, |tw| matches!(tw, Tween::Scale { .. })), 2);

    let other = laid(ViewBuilder::text("t", "label", "Bye").size(200.0, 20.0).build().unwrap());
    let t = merge(&from, &other, &spec());
    assert_eq!(count(&t, |tw| matches!(tw, Tween::Bounds { .. })), 2);
}

#[test]
fn arcs_tween_their_sweep() {
    let dial = |sweep| {
        laid(
            ViewBuilder::frame("d", "dial")
                .outline(arc(sweep))
                .size(50.0, 50.0)
                .build()
                .unwrap(),
        )
    };
    let mut t = merge(&dial(90.0), &dial(270.0), &spec());
    assert_eq!(count(&t, |tw| matches!(tw, Tween::ArcSweep { .. })), 1);
    t.apply(0.5);
    match t.tree().get(NodeHandle::ROOT).content.shape() {
        Some(ViewShape::Arc {
            sweep_angle_degrees,
            ..
        }) => assert_eq!(*sweep_angle_degrees, 180.0),
        other => panic!("unexpected shape {other:?}"),
    }
}

#[test]
fn transforms_tween_decomposed() {
    let from = laid(frame("a", "box", vec![]));
    let to = laid(
        ViewBuilder::frame("a", "box")
            .size(100.0, 100.0)
            .node_style(|s| s.transform = Some(Affine::rotate(1.0)))
            .build()
            .unwrap(),
    );
    let t = merge(&from, &to, &spec());
    assert!(t.items().iter().any(|i| i.tween
        == Tween::Transform {
            from: Decomposed::IDENTITY,
            to: Decomposed::from_affine(Affine::rotate(1.0)),
        }));
}

#[test]
fn uniforms_tween_only_for_the_same_static_shader() {
    let shaded = |value: f32, source: &str, live: bool| {
        laid(
            ViewBuilder::frame("s", "glow")
                .size(10.0, 10.0)
                .node_style(|s| {
                    s.shader = Some(ShaderData {
                        source: source.to_owned(),
                        uniforms: vec![ShaderUniform {
                            name: "u_amount".into(),
                            value: UniformValue::Float(value),
                        }],
                        live,
                    })
                })
                .build()
                .unwrap(),
        )
    };
    let uniforms = |t: &Transition| count(t, |tw| matches!(tw, Tween::ShaderUniforms { .. }));

    let t = merge(&shaded(0.0, "a", false), &shaded(1.0, "a", false), &spec());
    assert_eq!(uniforms(&t), 1);
    let t = merge(&shaded(0.0, "a", true), &shaded(1.0, "a", false), &spec());
    assert_eq!(uniforms(&t), 0);
    let t = merge(&shaded(0.0, "a", false), &shaded(1.0, "b", false), &spec());
    assert_eq!(uniforms(&t), 0);
}

#[test]
fn missing_target_degrades_to_a_static_copy() {
    let from = laid(frame("r", "root", vec![leaf("a", "A")]));
    let to = laid(frame("r", "root", vec![]));

    let t = merge_target(&from, NodeHandle::ROOT, &to, "nope", &spec());
    assert!(t.items().is_empty());
    assert_eq!(t.tree().len(), 2);
    assert!(t
        .tree()
        .handles()
        .all(|h| matches!(t.tree().get(h).origin, Some(NodeOrigin::From(_)))));

    let t = merge(&from, &RenderTree::new(), &spec());
    assert!(t.items().is_empty());
    assert_eq!(t.tree().len(), 2);
}

#[test]
fn every_node_traces_back_to_an_input() {
    let from = laid(frame(
        "r",
        "root",
        vec![leaf("a", "A"), leaf("b", "B"), leaf("x", "row"), leaf("y", "row")],
    ));
    let to = laid(frame(
        "r",
        "root",
        vec![leaf("b", "B"), leaf("c", "C"), leaf("z", "row")],
    ));
    let t = merge(&from, &to, &spec());
    for h in t.tree().handles() {
        let node = t.tree().get(h);
        let source = match node.origin {
            Some(NodeOrigin::From(s)) => from.get(s),
            Some(NodeOrigin::To(s)) => to.get(s),
            None => panic!("fabricated node {}", node.name),
        };
        assert_eq!(source.view_id, node.view_id);
    }
    // root + matched B + new C + matched row + removed A + removed second row
    assert_eq!(t.tree().len(), 6);
}

fn filled(fill: Fill) -> View {
    ViewBuilder::frame("a", "A")
        .size(20.0, 20.0)
        .node_style(|s| s.fills = vec![fill])
        .build()
        .unwrap()
}

#[test]
fn paint_kind_change_crossfades() {
    let from = laid(frame("r", "root", vec![filled(Fill::Solid(Color::BLACK))]));
    let image = Fill::Image {
        key: "hero".into(),
        scale_mode: ScaleMode::Fill,
    };
    let to = laid(frame("r", "root", vec![filled(image)]));

    let t = merge(&from, &to, &spec());
    let root = t.tree().root().unwrap();
    let kids: Vec<_> = t.tree().children(root).collect();
    assert_eq!(kids.len(), 2);
    assert!(matches!(on(&t, kids[0])[0], Tween::FadeOut { .. }));
    assert!(matches!(on(&t, kids[1])[0], Tween::FadeIn { .. }));
}

#[test]
fn same_paint_kind_keeps_one_node() {
    let from = laid(frame("r", "root", vec![filled(Fill::Solid(Color::BLACK))]));
    let to = laid(frame("r", "root", vec![filled(Fill::Solid(Color::WHITE))]));

    let t = merge(&from, &to, &spec());
    assert_eq!(t.tree().len(), 2);
    assert!(!t.items().iter().any(|i| i.tween.is_fade()));
}
