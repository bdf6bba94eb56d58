//! Fragment splicing tests for fos-html
//!
//! Parsed markup enters a live tree through ordinary insertions, so
//! mutation observers see it like any scripted append.

use fos_dom::{MutationObserverInit, MutationType, NodeId};
use fos_html::{Document, HtmlParser};

fn observed_document() -> (Document, fos_dom::ObserverId) {
    let mut doc = Document::default();
    let observer = doc.tree_mut().observers_mut().create();
    doc.tree_mut()
        .observers_mut()
        .observe(observer, NodeId::ROOT, MutationObserverInit::child_list_subtree());
    (doc, observer)
}

#[test]
fn test_fragment_top_level_nodes_inserted() {
    let (mut doc, _) = observed_document();
    let body = doc.body();

    let inserted = HtmlParser::new().parse_fragment_into(
        doc.tree_mut(),
        body,
        "<my-card><my-title>Hi</my-title></my-card><p>text</p>",
    );

    assert_eq!(inserted.len(), 2);
    assert_eq!(doc.tree().local_name(inserted[0]), Some("my-card"));
    assert_eq!(doc.tree().local_name(inserted[1]), Some("p"));
    assert!(doc.tree().is_connected(inserted[0]));
}

#[test]
fn test_fragment_produces_one_record_per_top_level_node() {
    let (mut doc, observer) = observed_document();
    let body = doc.body();

    let inserted = HtmlParser::new().parse_fragment_into(
        doc.tree_mut(),
        body,
        "<x-a><x-b></x-b><x-c></x-c></x-a><x-d></x-d>",
    );

    let records = doc.tree_mut().observers_mut().take_records(observer);
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.mutation_type == MutationType::ChildList && r.target == body));
    assert_eq!(records[0].added_nodes, vec![inserted[0]]);

    // Nested nodes are present when the record is processed
    let subtree: Vec<_> = doc.tree().inclusive_descendants(inserted[0])
        .filter_map(|id| doc.tree().local_name(id).map(str::to_string))
        .collect();
    assert_eq!(subtree, vec!["x-a", "x-b", "x-c"]);
}

#[test]
fn test_fragment_attributes_and_namespace() {
    let (mut doc, _) = observed_document();
    let body = doc.body();

    let inserted = HtmlParser::new().parse_fragment_into(
        doc.tree_mut(),
        body,
        r#"<fancy-input value="1" data-x="y"></fancy-input>"#,
    );

    let el = inserted[0];
    let data = doc
        .tree()
        .get(el)
        .and_then(|n| n.as_element())
        .map(|e| e.namespace().map(str::to_string));
    assert_eq!(data, Some(Some(fos_dom::HTML_NAMESPACE.to_string())));
    assert_eq!(doc.tree().get_attribute(el, "value"), Some("1"));
    assert_eq!(doc.tree().get_attribute(el, "data-x"), Some("y"));
}

#[test]
fn test_fragment_keeps_leading_metadata() {
    let (mut doc, observer) = observed_document();
    let body = doc.body();
    let head_children = doc.tree().children(doc.head()).count();

    let inserted = HtmlParser::new().parse_fragment_into(
        doc.tree_mut(),
        body,
        "<style>p{}</style><meta charset=x><my-widget></my-widget>",
    );

    let names: Vec<_> = inserted.iter().map(|&id| doc.tree().local_name(id)).collect();
    assert_eq!(names, vec![Some("style"), Some("meta"), Some("my-widget")]);
    assert!(inserted.iter().all(|&id| doc.tree().parent(id) == Some(body)));
    assert_eq!(doc.tree().children(doc.head()).count(), head_children);
    assert_eq!(doc.tree_mut().observers_mut().take_records(observer).len(), 3);
}

#[test]
fn test_fragment_text_and_comments_at_top_level() {
    let (mut doc, _) = observed_document();
    let body = doc.body();

    let inserted =
        HtmlParser::new().parse_fragment_into(doc.tree_mut(), body, "hello <!-- note --><b>x</b>");

    assert_eq!(inserted.len(), 3);
    assert!(doc.tree().get(inserted[0]).is_some_and(|n| n.is_text()));
    assert_eq!(doc.tree().local_name(inserted[2]), Some("b"));
}

#[test]
fn test_empty_fragment() {
    let (mut doc, observer) = observed_document();
    let body = doc.body();

    let inserted = HtmlParser::new().parse_fragment_into(doc.tree_mut(), body, "   ");
    assert!(inserted.is_empty());
    assert!(!doc.tree().observers().has_records(observer));
}

#[test]
fn test_parse_whole_document() {
    let doc = fos_html::parse("<!DOCTYPE html><title>T</title><my-app></my-app>");
    assert_eq!(doc.title(), "T");
    assert_eq!(doc.get_elements_by_tag_name("my-app").len(), 1);
}
