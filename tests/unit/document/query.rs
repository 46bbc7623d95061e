use super::*;

#[test]
fn tagged_forms_round_trip() {
    for q in [
        NodeQuery::id("12:34"),
        NodeQuery::name("#title"),
        NodeQuery::name("name:deadbeef"),
        NodeQuery::variant("Shadow=On, Color=Green", "Square"),
        NodeQuery::component_set("Square"),
    ] {
        let encoded = q.encode().unwrap();
        assert_eq!(NodeQuery::decode(&encoded).unwrap(), q);
    }
    assert_eq!(
        NodeQuery::variant("a", "b").encode().unwrap(),
        "variant:a\x1fb"
    );
    assert_eq!(NodeQuery::name("x").encode().unwrap(), "name:x");
}

#[test]
fn malformed_queries_are_rejected() {
    for bad in [
        "invalid_query",
        "id",
        "variant:name",
        "variant:name\x1fparent\x1fextra",
        "unknown:value",
    ] {
        let err = NodeQuery::decode(bad).unwrap_err();
        assert!(matches!(err, DesignError::InvalidQuery(_)), "{bad:?}");
    }
}

#[test]
fn variant_names_with_separator_cannot_be_encoded() {
    let err = NodeQuery::variant("a\x1fb", "set").encode().unwrap_err();
    assert!(matches!(err, DesignError::InvalidQuery(_)));
}

#[test]
fn canonical_key_ignores_order_and_whitespace() {
    assert_eq!(
        canonical_variant_key("Size=S, Color=Red"),
        canonical_variant_key("Color=Red,Size=S")
    );
    assert_eq!(canonical_variant_key(" Color = Red ,Size=S"), "Color=Red,Size=S");
}

#[test]
fn variant_from_properties_sorts_pairs() {
    let a = variant_from_properties([("Shadow", "On"), ("Color", "Green")], "Square");
    let b = variant_from_properties([("Color", "Green"), ("Shadow", "On")], "Square");
    assert_eq!(a, b);
    assert_eq!(a, NodeQuery::variant("Color=Green, Shadow=On", "Square"));
}
