use super::*;
use crate::foundation::core::Color;

#[test]
fn setters_accumulate_under_one_name() {
    let mut ctx = CustomizationContext::new();
    ctx.set_text("#title", "Hello")
        .set_visible("#title", true)
        .set_key("#title", "k1");
    assert_eq!(ctx.len(), 1);
    let c = ctx.get("#title").unwrap();
    assert_eq!(c.text.as_deref(), Some("Hello"));
    assert_eq!(c.visible, Some(true));
    assert_eq!(c.key.as_deref(), Some("k1"));
    assert!(!c.is_hidden());
}

#[test]
fn variant_properties_merge_per_property() {
    let mut ctx = CustomizationContext::new();
    ctx.set_variant_properties("Square", [("Shadow", "On"), ("Color", "Red")]);
    ctx.set_variant_properties("Square", [("Color", "Blue")]);
    let props = ctx.variant_properties("Square").unwrap();
    assert_eq!(props.get("Shadow").map(String::as_str), Some("On"));
    assert_eq!(props.get("Color").map(String::as_str), Some("Blue"));
    assert!(ctx.variant_properties("#other").is_none());
}

#[test]
fn style_patches_layer_instead_of_replacing() {
    let mut ctx = CustomizationContext::new();
    ctx.set_style(
        "#card",
        StyleOverride {
            opacity: Some(0.5),
            ..StyleOverride::default()
        },
    );
    ctx.set_style(
        "#card",
        StyleOverride {
            text_color: Some(Color::WHITE),
            ..StyleOverride::default()
        },
    );
    let style = ctx.get("#card").unwrap().style.as_ref().unwrap();
    assert_eq!(style.opacity, Some(0.5));
    assert_eq!(style.text_color, Some(Color::WHITE));
}

#[test]
fn extend_merges_contexts() {
    let mut a = CustomizationContext::new();
    a.set_text("#x", "a");
    let mut b = CustomizationContext::new();
    b.set_text("#x", "b").set_visible("#y", false);
    a.extend(b);
    assert_eq!(a.get("#x").unwrap().text.as_deref(), Some("b"));
    assert!(a.get("#y").unwrap().is_hidden());
}

#[test]
fn list_content_evaluates_span_per_index() {
    let content = ListContent::new(vec![
        ListItem::new(NodeQuery::name("#row")),
        ListItem::new(NodeQuery::name("#row")),
    ])
    .with_span(|i| GridSpan {
        span: if i == 0 { 2 } else { 1 },
        max_span: false,
    });
    assert_eq!(content.span_for(0).map(|s| s.span), Some(2));
    assert_eq!(content.span_for(1).map(|s| s.span), Some(1));
    assert!(format!("{content:?}").contains("<fn>"));
}
