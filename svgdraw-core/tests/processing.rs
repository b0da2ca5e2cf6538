//! Document processing integration tests
//!
//! Covers the full text -> scene pipeline:
//! - The concrete rect scenario
//! - Fill/stroke inheritance and terminal defaults
//! - fill="none" versus an unset fill
//! - Diagnostics versus fatal errors

use svgdraw_core::{
    Color, ElementKind, NodeId, ParsedDocument, Rect, Severity, SvgError, SvgProcessor,
};

/// Parse a document that is expected to succeed.
fn parse(svg: &str) -> ParsedDocument {
    SvgProcessor::new()
        .parse_str(svg)
        .expect("document should parse")
}

/// Follow child positions from the root.
fn node(doc: &ParsedDocument, path: &[usize]) -> NodeId {
    doc.scene
        .node_at_index_path(path)
        .expect("index path should resolve")
}

const RED: Color = Color::rgb(1.0, 0.0, 0.0);

// ============================================================================
// Concrete Scenario
// ============================================================================

#[test]
fn test_single_rect_document() {
    let doc = parse(
        r##"<svg viewBox="0 0 300 200" version="1.1"><rect x="0" y="0" width="100" height="50" fill="#ff0000"/></svg>"##,
    );
    let root = doc.root().expect("root");
    assert!(matches!(doc.scene[root].kind, ElementKind::Document(_)));
    assert_eq!(doc.scene.children(root).len(), 1);

    let rect = node(&doc, &[0]);
    match doc.scene[rect].kind {
        ElementKind::Rect { rect, .. } => assert_eq!(rect, Rect::new(0.0, 0.0, 100.0, 50.0)),
        ref other => panic!("expected rect, got {other:?}"),
    }
    assert_eq!(doc.scene.fill_color(rect), Some(RED));
    assert!(!doc.scene.has_stroke(rect));
}

// ============================================================================
// Inheritance
// ============================================================================

#[test]
fn test_fill_from_group() {
    let doc = parse(r#"<svg><g fill="red"><path d="M0 0 L5 5"/></g></svg>"#);
    let path = node(&doc, &[0, 0]);
    assert_eq!(doc.scene.fill_color(path), Some(RED));
}

#[test]
fn test_terminal_defaults_differ_for_fill_and_stroke() {
    let doc = parse(r#"<svg><g><path d="M0 0 L5 5"/></g></svg>"#);
    let path = node(&doc, &[0, 0]);
    assert_eq!(doc.scene.fill_color(path), Some(Color::BLACK));
    assert!(!doc.scene.has_stroke(path));
}

#[test]
fn test_stroke_inherits_but_has_no_default() {
    let doc = parse(r#"<svg stroke="blue"><g><line x2="1"/></g></svg>"#);
    let line = node(&doc, &[0, 0]);
    assert_eq!(doc.scene.stroke_color(line), Some(Color::rgb(0.0, 0.0, 1.0)));
}

#[test]
fn test_fill_none_on_leaf_ignores_ancestors() {
    let doc = parse(r#"<svg><g fill="red"><path d="M0 0 L5 5" fill="none"/></g></svg>"#);
    let path = node(&doc, &[0, 0]);
    assert!(!doc.scene.has_fill(path));
}

#[test]
fn test_unset_fill_looks_up_ancestors() {
    let doc = parse(r#"<svg fill="green"><path d="M0 0 L5 5"/></svg>"#);
    let path = node(&doc, &[0]);
    assert!(doc.scene.has_fill(path));
    assert_eq!(doc.scene.fill_color(path), Some(Color::from_rgb8(0, 128, 0)));
}

#[test]
fn test_font_inheritance() {
    let doc = parse(
        r#"<svg><g font-family="Arial" font-size="40"><text font-size="12">Hi</text></g></svg>"#,
    );
    let text = node(&doc, &[0, 0]);
    assert_eq!(doc.scene.font_family(text), Some("Arial"));
    assert_eq!(doc.scene.font_size(text), Some(12.0));
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn test_diagnostics_do_not_abort() {
    let doc = parse(
        r#"<svg><foo/><rect width="1" height="1" id="x" data-x="1"/><circle r="1" id="x" fill="nope"/></svg>"#,
    );
    assert_eq!(doc.scene.children(doc.root().expect("root")).len(), 2);
    assert_eq!(doc.events.len(), 4);
    assert!(doc.events.iter().all(|e| e.severity == Severity::Warning));
}

#[test]
fn test_missing_required_attributes() {
    for (svg, attribute) in [
        (r#"<svg><rect width="1"/></svg>"#, "height"),
        ("<svg><circle/></svg>", "r"),
        (r#"<svg><ellipse rx="1"/></svg>"#, "ry"),
        ("<svg><polyline/></svg>", "points"),
        ("<svg><path/></svg>", "d"),
    ] {
        match SvgProcessor::new().parse_str(svg) {
            Err(SvgError::MissingRequiredAttribute { attribute: a, .. }) => {
                assert_eq!(a, attribute, "{svg}");
            }
            other => panic!("{svg}: expected missing attribute, got {other:?}"),
        }
    }
}

#[test]
fn test_process_document_accepts_tokenized_tree() {
    let xml = roxmltree::Document::parse(r#"<svg xmlns="http://www.w3.org/2000/svg"><g/></svg>"#)
        .expect("xml");
    let doc = SvgProcessor::new().process_document(&xml).expect("process");
    assert_eq!(doc.scene.element_count(), 2);
    assert!(doc.events.is_empty());
}

#[test]
fn test_cancelling_transform_is_stored_as_absent() {
    let doc = parse(
        r#"<svg><path d="M0 0 L1 1" transform="translate(5) translate(-5)"/><path d="M0 0 L1 1" transform="scale(2)"/></svg>"#,
    );
    assert!(doc.scene[node(&doc, &[0])].transform.is_none());
    assert!(doc.scene[node(&doc, &[1])].transform.is_some());
}

#[test]
fn test_percentage_root_size_is_ignored_with_warning() {
    let doc = parse(r#"<svg width="100%" height="50px"><rect width="1" height="1"/></svg>"#);
    let info = doc.scene.document_info().expect("document info");
    assert_eq!(info.size, None);
    assert_eq!(info.view_box, None);
    assert!(doc.warnings().any(|e| e.message.contains("width=\"100%\"")));
}
