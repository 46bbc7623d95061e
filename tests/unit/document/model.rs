use super::*;
use crate::document::dsl::{DocumentBuilder, ViewBuilder};

fn member(id: &str, name: &str) -> View {
    ViewBuilder::frame(id, name).build().unwrap()
}

fn sample() -> Document {
    let set = ViewBuilder::frame("s", "Square")
        .component_set(Some("m2"))
        .child(member("m1", "Shadow=On, Color=Red"))
        .child(member("m2", "Shadow=Off, Color=Red"))
        .child(member("m3", "Color=Green, Shadow=On"))
        .build()
        .unwrap();
    let page = ViewBuilder::frame("p", "page")
        .child(ViewBuilder::text("t1", "#label", "a").build().unwrap())
        .child(ViewBuilder::text("t2", "#label", "b").build().unwrap())
        .child(set)
        .build()
        .unwrap();
    DocumentBuilder::new("f", "file").root(page).build()
}

#[test]
fn indexes_find_views_by_id_and_name_in_document_order() {
    let doc = sample();
    assert_eq!(doc.view_by_id("m3").map(|v| v.name.as_str()), Some("Color=Green, Shadow=On"));
    let labels: Vec<_> = doc.views_by_name("#label").map(|v| v.id.as_str()).collect();
    assert_eq!(labels, ["t1", "t2"]);
    assert_eq!(doc.len(), 7);
    assert!(doc.view_by_id("missing").is_none());
}

#[test]
fn variant_index_uses_canonical_keys_and_default_member() {
    let doc = sample();
    let sets = doc.variant_indexes();
    let square = &sets["Square"];
    assert_eq!(square.member_count, 3);
    let green = square.members.get("Color=Green,Shadow=On").unwrap();
    assert_eq!(doc.view_at(green).unwrap().id, "m3");
    let default = square.default_member.as_ref().unwrap();
    assert_eq!(doc.view_at(default).unwrap().id, "m2");
}

#[test]
fn equality_ignores_lazily_built_indexes() {
    let a = sample();
    let b = sample();
    let _ = a.variant_indexes();
    assert_eq!(a, b);
}

#[test]
fn children_and_shape_follow_payload_kind() {
    let doc = sample();
    let text = doc.view_by_id("t1").unwrap();
    assert!(text.children().is_empty());
    assert!(text.shape().is_none());
    let page = doc.view_by_id("p").unwrap();
    assert_eq!(page.shape().map(ViewShape::kind), Some(ShapeKind::Rect));
    assert!(doc.view_by_id("s").unwrap().is_component_set());
}
