use super::*;
use crate::document::dsl::{DocumentBuilder, ViewBuilder};

fn member(id: &str, name: &str) -> View {
    ViewBuilder::frame(id, name).build().unwrap()
}

fn squares() -> Document {
    let mut set = ViewBuilder::frame("s", "Square").component_set(Some("off-red"));
    for (shadow, sid) in [("On", "on"), ("Off", "off")] {
        for color in ["Red", "Green", "Blue"] {
            let id = format!("{sid}-{}", color.to_lowercase());
            set = set.child(member(&id, &format!("Shadow={shadow}, Color={color}")));
        }
    }
    let empty = ViewBuilder::frame("e", "Empty").component_set(None).build().unwrap();
    let root = ViewBuilder::frame("r", "root")
        .child(set.build().unwrap())
        .child(empty)
        .child(ViewBuilder::text("t", "#name", "Hello").build().unwrap())
        .build()
        .unwrap();
    DocumentBuilder::new("f", "file").root(root).build()
}

#[test]
fn variant_lookup_is_order_independent() {
    let doc = squares();
    let r = Resolver::new(&doc);
    let ctx = CustomizationContext::new();
    let a = r
        .resolve(&NodeQuery::variant("Shadow=On, Color=Green", "Square"), &ctx)
        .unwrap();
    let b = r
        .resolve(&NodeQuery::variant("Color=Green,Shadow=On", "Square"), &ctx)
        .unwrap();
    assert_eq!(a.id, "on-green");
    assert!(std::ptr::eq(a, b));
}

#[test]
fn unregistered_combination_falls_back_to_default() {
    let doc = squares();
    let r = Resolver::new(&doc);
    let ctx = CustomizationContext::new();
    let q = NodeQuery::variant("Shadow=Maybe, Color=Green", "Square");
    assert_eq!(r.resolve(&q, &ctx).unwrap().id, "off-red");
    assert!(matches!(
        r.resolve_exact(&q, &ctx),
        Err(DesignError::VariantMismatch { .. })
    ));
}

#[test]
fn empty_component_set_is_not_found() {
    let doc = squares();
    let r = Resolver::new(&doc);
    let ctx = CustomizationContext::new();
    let err = r
        .resolve(&NodeQuery::variant("A=B", "Empty"), &ctx)
        .unwrap_err();
    assert!(matches!(err, DesignError::NodeNotFound(_)));
    assert!(matches!(
        r.resolve(&NodeQuery::component_set("Empty"), &ctx),
        Err(DesignError::NodeNotFound(_))
    ));
}

#[test]
fn customized_properties_override_query_properties() {
    let doc = squares();
    let r = Resolver::new(&doc);
    let mut ctx = CustomizationContext::new();
    ctx.set_variant_properties("Square", [("Color", "Blue")]);
    let q = NodeQuery::variant("Shadow=On, Color=Red", "Square");
    assert_eq!(r.resolve(&q, &ctx).unwrap().id, "on-blue");
    assert_eq!(
        r.resolve(&NodeQuery::component_set("Square"), &ctx)
            .unwrap()
            .id,
        "off-blue"
    );
}

#[test]
fn component_set_queries_resolve_to_a_member() {
    let doc = squares();
    let r = Resolver::new(&doc);
    let ctx = CustomizationContext::new();
    assert_eq!(
        r.resolve(&NodeQuery::component_set("Square"), &ctx)
            .unwrap()
            .id,
        "off-red"
    );
    assert_eq!(r.resolve(&NodeQuery::id("s"), &ctx).unwrap().id, "off-red");
}

#[test]
fn set_without_default_customizes_from_its_first_member() {
    let set = ViewBuilder::frame("t", "Toggle")
        .component_set(None)
        .child(member("off-s", "State=Off, Size=Small"))
        .child(member("on-l", "State=On, Size=Large"))
        .child(member("on-s", "State=On, Size=Small"))
        .build()
        .unwrap();
    let doc = DocumentBuilder::new("f", "file").root(set).build();
    let r = Resolver::new(&doc);

    let plain = CustomizationContext::new();
    let q = NodeQuery::component_set("Toggle");
    assert_eq!(r.resolve(&q, &plain).unwrap().id, "off-s");

    let mut ctx = CustomizationContext::new();
    ctx.set_variant_properties("Toggle", [("State", "On")]);
    assert_eq!(r.resolve(&q, &ctx).unwrap().id, "on-s");
}

#[test]
fn missing_nodes_are_reported() {
    let doc = squares();
    let r = Resolver::new(&doc);
    let ctx = CustomizationContext::new();
    assert_eq!(r.resolve(&NodeQuery::name("#name"), &ctx).unwrap().id, "t");
    assert!(matches!(
        r.resolve(&NodeQuery::name("#missing"), &ctx),
        Err(DesignError::NodeNotFound(_))
    ));
    assert!(matches!(
        r.resolve(&NodeQuery::variant("A=B", "Nope"), &ctx),
        Err(DesignError::NodeNotFound(_))
    ));
}

#[test]
fn expansion_maps_canonical_keys_to_members() {
    let doc = squares();
    let members = Resolver::new(&doc).expand_component_set("Square").unwrap();
    assert_eq!(members.len(), 6);
    assert_eq!(members["Color=Blue,Shadow=Off"].id, "off-blue");
}

#[test]
fn instance_swap_prefers_instance_name_properties() {
    let doc = squares();
    let r = Resolver::new(&doc);
    let info = ComponentInfo {
        component_id: "off-red".into(),
        component_name: "Shadow=Off, Color=Red".into(),
        component_set_name: "Square".into(),
        overrides: None,
    };
    let mut ctx = CustomizationContext::new();
    assert!(r.instance_swap(&info, "#sq", &ctx).is_none());
    ctx.set_variant_properties("Square", [("Color", "Green")]);
    ctx.set_variant_properties("#sq", [("Color", "Blue")]);
    assert_eq!(r.instance_swap(&info, "#sq", &ctx).unwrap().id, "off-blue");
    assert_eq!(r.instance_swap(&info, "#other", &ctx).unwrap().id, "off-green");

    let mut same = CustomizationContext::new();
    same.set_variant_properties("#sq", [("Color", "Red")]);
    assert!(r.instance_swap(&info, "#sq", &same).is_none());
}
