use super::*;

#[test]
fn color_lerp_hits_endpoints_and_midpoint() {
    let a = Color::rgba(0, 0, 0, 0);
    let b = Color::rgba(200, 100, 50, 255);
    assert_eq!(Color::lerp(a, b, 0.0), a);
    assert_eq!(Color::lerp(a, b, 1.0), b);
    assert_eq!(Color::lerp(a, b, 0.5), Color::rgba(100, 50, 25, 128));
}

#[test]
fn rect_lerp_interpolates_all_edges() {
    let a = Rect::new(0.0, 0.0, 100.0, 100.0);
    let b = Rect::new(10.0, 10.0, 160.0, 160.0);
    let mid = lerp_rect(a, b, 0.5);
    assert_eq!(mid, Rect::new(5.0, 5.0, 130.0, 130.0));
}

#[test]
fn layout_id_next_is_monotonic() {
    assert_eq!(LayoutId(4).next(), LayoutId(5));
    assert_eq!(LayoutId(u32::MAX).next(), LayoutId(u32::MAX));
    assert_eq!(LayoutId(7).to_string(), "#7");
}

#[test]
fn f32_lerp_extrapolates_for_overshooting_curves() {
    assert_eq!(lerp_f32(0.0, 10.0, 0.25), 2.5);
    assert_eq!(lerp_f32(0.0, 10.0, 1.2), 12.0);
}
