use kurbo::{Arc as ArcShape, PathEl, RoundedRect, RoundedRectRadii, Shape};

use crate::document::model::{PathData, ViewShape};
use crate::foundation::core::{Affine, BezPath, Point, Rect, Size, Vec2};
use crate::foundation::hash::StableHasher;

const TOLERANCE: f64 = 0.1;

/// Fingerprint of everything [`shape_path`] reads.
pub(crate) fn path_fingerprint(
    shape: &ViewShape,
    size: Size,
    design_size: Size,
    corner_radius: &[f32; 4],
) -> u64 {
    let mut h = StableHasher::new();
    h.put(shape);
    h.put(&size);
    h.put(&design_size);
    h.put(corner_radius);
    h.finish()
}

/// Outline of `shape` laid out at `size`.
///
/// Vector path data is authored against `design_size` and is scaled to the laid-out box.
/// Malformed path data is skipped with a warning.
pub fn shape_path(
    shape: &ViewShape,
    size: Size,
    design_size: Size,
    corner_radius: &[f32; 4],
) -> BezPath {
    let bounds = Rect::from_origin_size(Point::ORIGIN, size);
    match shape {
        ViewShape::Rect => {
            if corner_radius.iter().any(|r| *r > 0.0) {
                rounded(bounds, corner_radius)
            } else {
                bounds.to_path(TOLERANCE)
            }
        }
        ViewShape::RoundRect { .. } => rounded(bounds, corner_radius),
        ViewShape::Path { paths, .. } | ViewShape::VectorRect { paths, .. } => {
            let mut out = svg_paths(paths);
            if design_size.width > 0.0 && design_size.height > 0.0 {
                out.apply_affine(Affine::scale_non_uniform(
                    size.width / design_size.width,
                    size.height / design_size.height,
                ));
            }
            out
        }
        ViewShape::Arc {
            start_angle_degrees,
            sweep_angle_degrees,
            inner_radius,
            ..
        } => arc(
            bounds,
            f64::from(*start_angle_degrees),
            f64::from(*sweep_angle_degrees),
            f64::from(*inner_radius),
        ),
    }
}

fn rounded(bounds: Rect, r: &[f32; 4]) -> BezPath {
    let radii = RoundedRectRadii::new(
        f64::from(r[0]),
        f64::from(r[1]),
        f64::from(r[2]),
        f64::from(r[3]),
    );
    RoundedRect::from_rect(bounds, radii).to_path(TOLERANCE)
}

fn svg_paths(paths: &[PathData]) -> BezPath {
    let mut out = BezPath::new();
    for p in paths {
        match BezPath::from_svg(&p.data) {
            Ok(parsed) => out.extend(parsed.elements().iter().copied()),
            Err(e) => tracing::warn!(error = %e, "skipping malformed path data"),
        }
    }
    out
}

/// Annular sector inscribed in `bounds`; `inner` is the inner radius as a fraction of the outer.
fn arc(bounds: Rect, start_deg: f64, sweep_deg: f64, inner: f64) -> BezPath {
    let center = bounds.center();
    let radii = Vec2::new(bounds.width() / 2.0, bounds.height() / 2.0);
    let start = start_deg.to_radians();
    let sweep = sweep_deg.to_radians();

    let outer = ArcShape {
        center,
        radii,
        start_angle: start,
        sweep_angle: sweep,
        x_rotation: 0.0,
    };
    let mut path = BezPath::new();
    path.extend(outer.path_elements(TOLERANCE));

    let inner = inner.clamp(0.0, 1.0);
    if inner > 0.0 {
        let inner_radii = radii * inner;
        let end = start + sweep;
        let inner_start = center + Vec2::new(inner_radii.x * end.cos(), inner_radii.y * end.sin());
        path.push(PathEl::LineTo(inner_start));
        let back = ArcShape {
            center,
            radii: inner_radii,
            start_angle: end,
            sweep_angle: -sweep,
            x_rotation: 0.0,
        };
        path.extend(back.append_iter(TOLERANCE));
    } else {
        path.push(PathEl::LineTo(center));
    }
    path.push(PathEl::ClosePath);
    path
}

#[cfg(test)]
#[path = "../../tests/unit/layout/paths.rs"]
mod tests;
