use super::*;

const CURVES: [Easing; 10] = [
    Easing::Linear,
    Easing::InQuad,
    Easing::OutQuad,
    Easing::InOutQuad,
    Easing::InCubic,
    Easing::OutCubic,
    Easing::InOutCubic,
    Easing::CubicBezier {
        x1: 0.42,
        y1: 0.0,
        x2: 0.58,
        y2: 1.0,
    },
    Easing::Spring {
        damping_ratio: 1.0,
        stiffness: 170.0,
    },
    Easing::Steps { n: 4 },
];

#[test]
fn endpoints_are_stable() {
    for ease in CURVES {
        assert!(ease.apply(0.0).abs() < 1e-9, "{ease:?}");
        assert_eq!(ease.apply(1.0), 1.0, "{ease:?}");
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in &CURVES[..9] {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b, "{ease:?}");
        assert!(b < c, "{ease:?}");
    }
}

#[test]
fn linear_bezier_matches_linear() {
    let ease = Easing::CubicBezier {
        x1: 0.0,
        y1: 0.0,
        x2: 1.0,
        y2: 1.0,
    };
    for t in [0.1, 0.3, 0.5, 0.9] {
        assert!((ease.apply(t) - t).abs() < 1e-4);
    }
    assert!((CURVES[7].apply(0.5) - 0.5).abs() < 1e-4);
}

#[test]
fn steps_hold_values() {
    let ease = Easing::Steps { n: 4 };
    assert_eq!(ease.apply(0.3), 0.25);
    assert_eq!(ease.apply(0.74), 0.5);
    assert_eq!(Easing::Steps { n: 0 }.apply(0.99), 0.0);
}

#[test]
fn underdamped_spring_overshoots() {
    let bouncy = Easing::Spring {
        damping_ratio: 0.3,
        stiffness: 200.0,
    };
    let peak = (0..100)
        .map(|i| bouncy.apply(f64::from(i) / 100.0))
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.0);

    let critical = CURVES[8];
    assert!((0..=100).all(|i| critical.apply(f64::from(i) / 100.0) <= 1.0 + 1e-9));
}

#[test]
fn springs_own_their_duration() {
    let spring = CURVES[8];
    let settle = spring.settle_time().unwrap();
    assert!(settle > 0.0 && settle.is_finite());
    assert_eq!(Easing::Linear.settle_time(), None);

    let spec = AnimationSpec {
        easing: spring,
        duration: 100.0,
        delay: 0.25,
    };
    assert!((spec.total() - (settle + 0.25)).abs() < 1e-9);
    assert!(!spec.is_finished(settle));
    assert!(spec.is_finished(settle + 0.25));
}

#[test]
fn delay_holds_the_start_state() {
    let spec = AnimationSpec {
        easing: Easing::Linear,
        duration: 1.0,
        delay: 0.5,
    };
    assert_eq!(spec.progress(0.25), 0.0);
    assert!((spec.progress(1.0) - 0.5).abs() < 1e-12);
    assert_eq!(spec.progress(3.0), 1.0);
    assert!(!spec.is_finished(1.49));
    assert!(spec.is_finished(1.5));
}

#[test]
fn zero_duration_jumps_to_the_end() {
    let spec = AnimationSpec {
        easing: Easing::Linear,
        duration: 0.0,
        delay: 0.0,
    };
    assert_eq!(spec.progress(0.01), 1.0);
    assert!(spec.is_finished(0.0));
}

#[test]
fn easing_deserializes_from_tagged_json() {
    let e: Easing =
        serde_json::from_str(r#"{"type":"spring","damping_ratio":0.8,"stiffness":300.0}"#).unwrap();
    assert_eq!(
        e,
        Easing::Spring {
            damping_ratio: 0.8,
            stiffness: 300.0
        }
    );
    let e: Easing = serde_json::from_str(r#"{"type":"linear"}"#).unwrap();
    assert_eq!(e, Easing::Linear);
}
