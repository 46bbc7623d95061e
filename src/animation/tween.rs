use std::f64::consts::{PI, TAU};
use std::sync::Arc;

use crate::animation::ease::AnimationSpec;
use crate::document::model::ViewShape;
use crate::document::style::{ShaderUniform, UniformValue};
use crate::foundation::core::{Affine, Rect, Vec2, lerp_f32, lerp_rect};
use crate::layout::paths::shape_path;
use crate::tree::arena::{NodeHandle, RenderContent, RenderTree};

/// Interpolation contract for animated values.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with factor `t`; `t` may leave `[0, 1]` for overshooting curves.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        lerp_f32(*a, *b, t)
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Rect {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        lerp_rect(*a, *b, t)
    }
}

/// Affine transform split into translate, rotate, skew and scale.
///
/// Interpolating the parts instead of the matrix keeps rotations rigid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decomposed {
    /// Translation.
    pub translate: Vec2,
    /// Rotation in radians.
    pub rotation: f64,
    /// Horizontal shear applied before scaling.
    pub skew: f64,
    /// Scale factors.
    pub scale: Vec2,
}

impl Decomposed {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        rotation: 0.0,
        skew: 0.0,
        scale: Vec2::new(1.0, 1.0),
    };

    /// Decompose `m` as `translate * rotate * skew * scale`.
    pub fn from_affine(m: Affine) -> Self {
        let [a, b, c, d, e, f] = m.as_coeffs();
        let translate = Vec2::new(e, f);
        let sx = a.hypot(b);
        if sx < 1e-12 {
            return Self {
                translate,
                rotation: 0.0,
                skew: 0.0,
                scale: Vec2::new(0.0, c.hypot(d)),
            };
        }
        let sy = (a * d - b * c) / sx;
        let skew = if sy.abs() < 1e-12 {
            0.0
        } else {
            (a * c + b * d) / (sx * sy)
        };
        Self {
            translate,
            rotation: b.atan2(a),
            skew,
            scale: Vec2::new(sx, sy),
        }
    }

    /// Recompose into a matrix.
    pub fn to_affine(self) -> Affine {
        Affine::translate(self.translate)
            * Affine::rotate(self.rotation)
            * Affine::new([1.0, 0.0, self.skew, 1.0, 0.0, 0.0])
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }
}

impl Lerp for Decomposed {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        // Shortest way around.
        let mut delta = (b.rotation - a.rotation) % TAU;
        if delta > PI {
            delta -= TAU;
        } else if delta < -PI {
            delta += TAU;
        }
        Self {
            translate: Lerp::lerp(&a.translate, &b.translate, t),
            rotation: a.rotation + delta * t,
            skew: Lerp::lerp(&a.skew, &b.skew, t),
            scale: Lerp::lerp(&a.scale, &b.scale, t),
        }
    }
}

/// Arc angles in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcAngles {
    /// Start angle.
    pub start: f32,
    /// Sweep.
    pub sweep: f32,
}

/// Property delta carried by one [`AnimatedItem`].
#[derive(Clone, Debug, PartialEq)]
pub enum Tween {
    /// Opacity change between two matched nodes.
    Opacity {
        /// Start opacity.
        from: f32,
        /// End opacity.
        to: f32,
    },
    /// Node appears: opacity rises from zero.
    FadeIn {
        /// Final opacity.
        opacity: f32,
    },
    /// Node disappears: opacity falls to zero.
    FadeOut {
        /// Initial opacity.
        opacity: f32,
    },
    /// Layout box moves and resizes. Rects are relative to the parent.
    Bounds {
        /// Start box.
        from: Rect,
        /// End box.
        to: Rect,
    },
    /// Node keeps its own layout box and is scaled so it covers a box moving from `from` to `to`.
    Scale {
        /// Start box.
        from: Rect,
        /// End box.
        to: Rect,
    },
    /// Style transform, interpolated in decomposed form.
    Transform {
        /// Start transform.
        from: Decomposed,
        /// End transform.
        to: Decomposed,
    },
    /// Arc start and sweep.
    ArcSweep {
        /// Start angles.
        from: ArcAngles,
        /// End angles.
        to: ArcAngles,
    },
    /// Numeric shader uniforms with the same names on both sides.
    ShaderUniforms {
        /// Start values.
        from: Vec<ShaderUniform>,
        /// End values.
        to: Vec<ShaderUniform>,
    },
}

impl Tween {
    /// `true` for opacity fades of unmatched nodes.
    pub fn is_fade(&self) -> bool {
        matches!(self, Self::FadeIn { .. } | Self::FadeOut { .. })
    }

    /// `true` for bounds and scale tweens.
    pub fn is_layout(&self) -> bool {
        matches!(self, Self::Bounds { .. } | Self::Scale { .. })
    }
}

/// One animated property of one transition-tree node, with its own timing.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimatedItem {
    /// Node in the transition tree.
    pub target: NodeHandle,
    /// What is animated.
    pub tween: Tween,
    /// Curve and delay.
    pub spec: AnimationSpec,
}

impl AnimatedItem {
    /// `true` once this item reached its end state at `elapsed` seconds.
    pub fn is_finished(&self, elapsed: f64) -> bool {
        self.spec.is_finished(elapsed)
    }

    /// Write the value at `elapsed` seconds onto the target node.
    pub fn apply(&self, tree: &mut RenderTree, elapsed: f64) {
        let t = self.spec.progress(elapsed);
        let node = tree.get_mut(self.target);
        match &self.tween {
            Tween::Opacity { from, to } => {
                node.style_mut().node.opacity = Lerp::lerp(from, to, t).clamp(0.0, 1.0);
            }
            Tween::FadeIn { opacity } => {
                node.style_mut().node.opacity = Lerp::lerp(&0.0, opacity, t).clamp(0.0, 1.0);
            }
            Tween::FadeOut { opacity } => {
                node.style_mut().node.opacity = Lerp::lerp(opacity, &0.0, t).clamp(0.0, 1.0);
            }
            Tween::Bounds { from, to } => {
                let r = Lerp::lerp(from, to, t);
                if let Some(layout) = node.layout.as_mut() {
                    layout.left = r.x0 as f32;
                    layout.top = r.y0 as f32;
                    layout.width = r.width().max(0.0) as f32;
                    layout.height = r.height().max(0.0) as f32;
                }
                refresh_path(tree, self.target);
            }
            Tween::Scale { from, to } => {
                let Some(own) = node.layout.map(|l| l.rect()) else {
                    return;
                };
                node.anim_transform = Some(cover(own, Lerp::lerp(from, to, t)));
            }
            Tween::Transform { from, to } => {
                node.style_mut().node.transform = Some(Lerp::lerp(from, to, t).to_affine());
            }
            Tween::ArcSweep { from, to } => {
                let start = Lerp::lerp(&from.start, &to.start, t);
                let sweep = Lerp::lerp(&from.sweep, &to.sweep, t);
                let (RenderContent::Container { shape } | RenderContent::Shape { shape }) =
                    &mut node.content
                else {
                    return;
                };
                if let ViewShape::Arc {
                    start_angle_degrees,
                    sweep_angle_degrees,
                    ..
                } = shape
                {
                    *start_angle_degrees = start;
                    *sweep_angle_degrees = sweep;
                }
                refresh_path(tree, self.target);
            }
            Tween::ShaderUniforms { from, to } => {
                let Some(shader) = node.style_mut().node.shader.as_mut() else {
                    return;
                };
                for (slot, (a, b)) in shader.uniforms.iter_mut().zip(from.iter().zip(to)) {
                    slot.value = lerp_uniform(&a.value, &b.value, t);
                }
            }
        }
    }
}

/// Transform that maps `own` onto `target`, in the parent's coordinates.
fn cover(own: Rect, target: Rect) -> Affine {
    let sx = if own.width() > 0.0 {
        target.width() / own.width()
    } else {
        1.0
    };
    let sy = if own.height() > 0.0 {
        target.height() / own.height()
    } else {
        1.0
    };
    Affine::translate(Vec2::new(target.x0, target.y0))
        * Affine::scale_non_uniform(sx, sy)
        * Affine::translate(Vec2::new(-own.x0, -own.y0))
}

fn lerp_uniform(a: &UniformValue, b: &UniformValue, t: f64) -> UniformValue {
    match (a, b) {
        (UniformValue::Float(x), UniformValue::Float(y)) => UniformValue::Float(Lerp::lerp(x, y, t)),
        (UniformValue::Floats(xs), UniformValue::Floats(ys)) if xs.len() == ys.len() => {
            UniformValue::Floats(xs.iter().zip(ys).map(|(x, y)| Lerp::lerp(x, y, t)).collect())
        }
        (UniformValue::Int(x), UniformValue::Int(y)) => {
            UniformValue::Int(Lerp::lerp(&f64::from(*x), &f64::from(*y), t).round() as i32)
        }
        _ => {
            if t < 1.0 {
                a.clone()
            } else {
                b.clone()
            }
        }
    }
}

/// Regenerate the outline after the box or the shape changed.
fn refresh_path(tree: &mut RenderTree, h: NodeHandle) {
    let node = tree.get(h);
    let path = match (node.layout, node.content.shape()) {
        (Some(layout), Some(shape)) => Some(Arc::new(shape_path(
            shape,
            layout.size(),
            node.style.node.node_size,
            &node.style.node.corner_radius,
        ))),
        _ => None,
    };
    tree.get_mut(h).path = path;
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
