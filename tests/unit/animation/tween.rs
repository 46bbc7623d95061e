use kurbo::Shape;

use super::*;
use crate::animation::ease::Easing;
use crate::document::dsl::ViewBuilder;
use crate::document::style::ShaderData;
use crate::foundation::core::Point;
use crate::layout::ComputedLayout;

fn linear() -> AnimationSpec {
    AnimationSpec {
        easing: Easing::Linear,
        duration: 1.0,
        delay: 0.0,
    }
}

fn boxed_tree() -> RenderTree {
    let view = ViewBuilder::frame("n", "n").size(100.0, 100.0).build().unwrap();
    let mut tree = RenderTree::from_view(&view);
    tree.get_mut(NodeHandle::ROOT).layout = Some(ComputedLayout {
        width: 100.0,
        height: 100.0,
        ..ComputedLayout::default()
    });
    tree
}

fn close(a: Affine, b: Affine) -> bool {
    a.as_coeffs()
        .iter()
        .zip(b.as_coeffs().iter())
        .all(|(x, y)| (x - y).abs() < 1e-9)
}

#[test]
fn decomposition_recomposes() {
    let m = Affine::translate((5.0, -3.0))
        * Affine::rotate(0.7)
        * Affine::new([1.0, 0.0, 0.25, 1.0, 0.0, 0.0])
        * Affine::scale_non_uniform(2.0, 3.0);
    let d = Decomposed::from_affine(m);
    assert!((d.rotation - 0.7).abs() < 1e-9);
    assert!((d.skew - 0.25).abs() < 1e-9);
    assert!(close(d.to_affine(), m));
    assert!(close(Decomposed::IDENTITY.to_affine(), Affine::IDENTITY));
}

#[test]
fn rotation_takes_the_short_way() {
    let a = Decomposed {
        rotation: 3.0,
        ..Decomposed::IDENTITY
    };
    let b = Decomposed {
        rotation: -3.0,
        ..Decomposed::IDENTITY
    };
    let mid = Decomposed::lerp(&a, &b, 0.5);
    assert!((mid.rotation - PI).abs() < 1e-9);
}

#[test]
fn decomposed_midpoint_stays_rigid() {
    let a = Decomposed::from_affine(Affine::IDENTITY);
    let b = Decomposed::from_affine(Affine::rotate(PI / 2.0));
    let mid = Decomposed::lerp(&a, &b, 0.5).to_affine();
    assert!((mid.determinant() - 1.0).abs() < 1e-9);
}

#[test]
fn opacity_and_bounds_hit_both_ends() {
    let mut tree = boxed_tree();
    let from = Rect::new(0.0, 0.0, 100.0, 100.0);
    let to = Rect::new(10.0, 10.0, 160.0, 160.0);
    let items = [
        AnimatedItem {
            target: NodeHandle::ROOT,
            tween: Tween::Opacity { from: 1.0, to: 0.5 },
            spec: linear(),
        },
        AnimatedItem {
            target: NodeHandle::ROOT,
            tween: Tween::Bounds { from, to },
            spec: linear(),
        },
    ];
    for item in &items {
        item.apply(&mut tree, 0.0);
    }
    let node = tree.get(NodeHandle::ROOT);
    assert_eq!(node.style.node.opacity, 1.0);
    assert_eq!(node.layout.unwrap().rect(), from);

    for item in &items {
        item.apply(&mut tree, 1.0);
    }
    let node = tree.get(NodeHandle::ROOT);
    assert!((node.style.node.opacity - 0.5).abs() < 1e-6);
    assert_eq!(node.layout.unwrap().rect(), to);
    let bbox = node.path.as_ref().unwrap().bounding_box();
    assert!((bbox.width() - 150.0).abs() < 1e-6);
    assert!(items.iter().all(|i| i.is_finished(1.0)));
}

#[test]
fn fades_cross_zero() {
    let mut tree = boxed_tree();
    let fade_out = AnimatedItem {
        target: NodeHandle::ROOT,
        tween: Tween::FadeOut { opacity: 0.8 },
        spec: linear(),
    };
    fade_out.apply(&mut tree, 0.5);
    assert!((tree.get(NodeHandle::ROOT).style.node.opacity - 0.4).abs() < 1e-6);
    fade_out.apply(&mut tree, 1.0);
    assert_eq!(tree.get(NodeHandle::ROOT).style.node.opacity, 0.0);
    assert!(fade_out.tween.is_fade());
    assert!(!fade_out.tween.is_layout());
}

#[test]
fn scale_maps_own_box_onto_target() {
    let mut tree = boxed_tree();
    let item = AnimatedItem {
        target: NodeHandle::ROOT,
        tween: Tween::Scale {
            from: Rect::new(0.0, 0.0, 100.0, 100.0),
            to: Rect::new(10.0, 10.0, 160.0, 160.0),
        },
        spec: linear(),
    };
    item.apply(&mut tree, 0.0);
    let m = tree.get(NodeHandle::ROOT).anim_transform.unwrap();
    assert!(close(m, Affine::IDENTITY));

    item.apply(&mut tree, 1.0);
    let node = tree.get(NodeHandle::ROOT);
    let m = node.anim_transform.unwrap();
    let corner = m * Point::new(100.0, 100.0);
    assert!((corner.x - 160.0).abs() < 1e-9 && (corner.y - 160.0).abs() < 1e-9);
    assert_eq!(node.layout.unwrap().width, 100.0);
}

#[test]
fn shader_uniforms_interpolate_numerically() {
    let mut tree = boxed_tree();
    let uniforms = |f: f32, i: i32| {
        vec![
            ShaderUniform {
                name: "u_mix".into(),
                value: UniformValue::Float(f),
            },
            ShaderUniform {
                name: "u_steps".into(),
                value: UniformValue::Int(i),
            },
        ]
    };
    tree.get_mut(NodeHandle::ROOT).style_mut().node.shader = Some(ShaderData {
        source: "half4 main(float2 p) { return half4(1); }".into(),
        uniforms: uniforms(0.0, 0),
        live: false,
    });
    let item = AnimatedItem {
        target: NodeHandle::ROOT,
        tween: Tween::ShaderUniforms {
            from: uniforms(0.0, 0),
            to: uniforms(1.0, 10),
        },
        spec: linear(),
    };
    item.apply(&mut tree, 0.5);
    let shader = tree.get(NodeHandle::ROOT).style.node.shader.clone().unwrap();
    assert_eq!(shader.uniforms, uniforms(0.5, 5));
}

#[test]
fn delayed_item_holds_its_start_value() {
    let mut tree = boxed_tree();
    let item = AnimatedItem {
        target: NodeHandle::ROOT,
        tween: Tween::FadeIn { opacity: 1.0 },
        spec: AnimationSpec {
            delay: 0.5,
            ..linear()
        },
    };
    item.apply(&mut tree, 0.4);
    assert_eq!(tree.get(NodeHandle::ROOT).style.node.opacity, 0.0);
    assert!(!item.is_finished(1.0));
    assert!(item.is_finished(1.5));
}

#[test]
fn lerp_impls_use_the_shared_helpers() {
    let (a, b) = (Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(10.0, 20.0, 30.0, 40.0));
    assert_eq!(<Rect as Lerp>::lerp(&a, &b, 0.25), lerp_rect(a, b, 0.25));
    assert_eq!(<f32 as Lerp>::lerp(&1.0, &3.0, 0.5), lerp_f32(1.0, 3.0, 0.5));
}
