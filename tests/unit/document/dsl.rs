use super::*;

#[test]
fn builder_nests_children_and_sets_size() {
    let view = ViewBuilder::frame("1:1", "root")
        .size(320.0, 200.0)
        .child(ViewBuilder::text("1:2", "#title", "Hello").build().unwrap())
        .build()
        .unwrap();
    assert_eq!(view.children().len(), 1);
    assert_eq!(view.style.layout.width, Dimension::Points(320.0));
    assert_eq!(view.style.node.node_size, Size::new(320.0, 200.0));
}

#[test]
fn non_containers_reject_children() {
    let err = ViewBuilder::text("1", "t", "x")
        .child(ViewBuilder::frame("2", "f").build().unwrap())
        .build()
        .unwrap_err();
    assert!(matches!(err, DesignError::Validation(_)));
}

#[test]
fn empty_ids_are_rejected() {
    assert!(ViewBuilder::frame(" ", "f").build().is_err());
}

#[test]
fn component_sets_must_be_containers() {
    let err = ViewBuilder::text("1", "t", "x")
        .component_set(None)
        .build()
        .unwrap_err();
    assert!(matches!(err, DesignError::Validation(_)));
}

#[test]
fn document_builder_carries_header() {
    let doc = DocumentBuilder::new("file", "Design")
        .last_modified("2024-01-01T00:00:00Z")
        .version("42")
        .root(ViewBuilder::frame("0:1", "page").build().unwrap())
        .build();
    assert_eq!(doc.header().name, "Design");
    assert_eq!(doc.header().version, "42");
    assert_eq!(doc.roots().len(), 1);
}
