use super::*;
use crate::document::model::{StrokeCap, WindingRule};

fn approx_rect(a: Rect, b: Rect) -> bool {
    (a.x0 - b.x0).abs() < 1e-6
        && (a.y0 - b.y0).abs() < 1e-6
        && (a.x1 - b.x1).abs() < 1e-6
        && (a.y1 - b.y1).abs() < 1e-6
}

#[test]
fn rect_covers_the_box() {
    let p = shape_path(&ViewShape::Rect, Size::new(40.0, 20.0), Size::ZERO, &[0.0; 4]);
    assert!(approx_rect(p.bounding_box(), Rect::new(0.0, 0.0, 40.0, 20.0)));
}

#[test]
fn rounded_rect_stays_inside_the_box() {
    let p = shape_path(
        &ViewShape::RoundRect {
            corner_smoothing: 0.0,
        },
        Size::new(40.0, 20.0),
        Size::ZERO,
        &[4.0; 4],
    );
    assert!(approx_rect(p.bounding_box(), Rect::new(0.0, 0.0, 40.0, 20.0)));
    assert!(!p.contains(Point::new(0.2, 0.2)));
    assert!(p.contains(Point::new(20.0, 10.0)));
}

#[test]
fn vector_paths_scale_to_the_laid_out_box() {
    let shape = ViewShape::Path {
        paths: vec![PathData {
            data: "M0 0 L10 0 L10 10 L0 10 Z".into(),
            winding: WindingRule::NonZero,
        }],
        strokes: Vec::new(),
        stroke_cap: StrokeCap::None,
    };
    let p = shape_path(&shape, Size::new(20.0, 30.0), Size::new(10.0, 10.0), &[0.0; 4]);
    assert!(approx_rect(p.bounding_box(), Rect::new(0.0, 0.0, 20.0, 30.0)));
}

#[test]
fn malformed_path_data_is_skipped() {
    let shape = ViewShape::VectorRect {
        paths: vec![PathData {
            data: "M0 0 Q".into(),
            winding: WindingRule::NonZero,
        }],
        strokes: Vec::new(),
    };
    let p = shape_path(&shape, Size::new(20.0, 30.0), Size::new(10.0, 10.0), &[0.0; 4]);
    assert!(p.elements().is_empty());
}

#[test]
fn ring_segment_excludes_the_center() {
    let shape = ViewShape::Arc {
        paths: Vec::new(),
        strokes: Vec::new(),
        stroke_cap: StrokeCap::None,
        start_angle_degrees: 0.0,
        sweep_angle_degrees: 360.0,
        inner_radius: 0.5,
        corner_radius: 0.0,
    };
    let p = shape_path(&shape, Size::new(100.0, 100.0), Size::ZERO, &[0.0; 4]);
    let b = p.bounding_box();
    assert!(b.width() <= 100.5 && b.height() <= 100.5);
    assert!(!p.contains(Point::new(50.0, 50.0)));
    assert!(p.contains(Point::new(50.0, 10.0)));
}

#[test]
fn fingerprint_tracks_size_and_shape() {
    let a = path_fingerprint(&ViewShape::Rect, Size::new(1.0, 1.0), Size::ZERO, &[0.0; 4]);
    let b = path_fingerprint(&ViewShape::Rect, Size::new(2.0, 1.0), Size::ZERO, &[0.0; 4]);
    let c = path_fingerprint(&ViewShape::Rect, Size::new(1.0, 1.0), Size::ZERO, &[1.0; 4]);
    assert_ne!(a, b);
    assert_ne!(a, c);
    assert_eq!(
        a,
        path_fingerprint(&ViewShape::Rect, Size::new(1.0, 1.0), Size::ZERO, &[0.0; 4])
    );
}
