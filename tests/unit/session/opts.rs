use super::*;
use crate::animation::ease::Easing;

#[test]
fn defaults_are_valid() {
    let opts = SessionOpts::default();
    opts.validate().unwrap();
    assert!(opts.text_cache_enabled);
}

#[test]
fn partial_json_keeps_defaults() {
    let opts = SessionOpts::from_json(
        r#"{ "viewport": { "width": 390.0, "height": 844.0 },
             "transition": { "easing": { "type": "linear" }, "duration": 0.5 } }"#,
    )
    .unwrap();
    assert_eq!(opts.viewport, Size::new(390.0, 844.0));
    assert_eq!(opts.transition.easing, Easing::Linear);
    assert_eq!(opts.transition.duration, 0.5);
    assert!(opts.text_cache_enabled);
}

#[test]
fn bad_json_is_a_config_error() {
    let err = SessionOpts::from_json("{ not json").unwrap_err();
    assert!(matches!(err, DesignError::Config(_)));
    assert!(err.is_recoverable());
}

#[test]
fn invalid_values_are_rejected() {
    let err = SessionOpts::from_json(r#"{ "viewport": { "width": 0.0, "height": 10.0 } }"#)
        .unwrap_err();
    assert!(matches!(err, DesignError::Config(_)));

    let err = SessionOpts::from_json(r#"{ "transition": { "duration": -1.0 } }"#).unwrap_err();
    assert!(matches!(err, DesignError::Config(_)));
}

#[test]
fn round_trips_through_json() {
    let opts = SessionOpts {
        text_cache_enabled: false,
        ..SessionOpts::default()
    };
    let json = serde_json::to_string(&opts).unwrap();
    assert_eq!(SessionOpts::from_json(&json).unwrap(), opts);
}
