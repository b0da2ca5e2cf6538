//! Optimizer integration tests
//!
//! Property tests over randomly nested groups plus the merge rules.

use proptest::prelude::*;
use svgdraw_core::{combine, flatten, optimise, Color, ElementKind, NodeId, Scene, SvgProcessor};

fn scene(svg: &str) -> Scene {
    SvgProcessor::new().parse_str(svg).expect("parse").scene
}

/// Fill colors of all leaves in document order.
fn leaf_fills(scene: &Scene) -> Vec<Option<Color>> {
    let mut leaves: Vec<NodeId> = Vec::new();
    scene.walk(|id, element, _| {
        if !element.is_container() {
            leaves.push(id);
        }
    });
    leaves.into_iter().map(|id| scene.fill_color(id)).collect()
}

/// Random `<g>` nesting with path and circle leaves.
fn group_tree() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        Just(r#"<path d="M0 0 L1 1"/>"#.to_string()),
        Just(r#"<circle r="1" fill="blue"/>"#.to_string()),
        Just(r#"<path d="M2 2 L3 3" fill="none"/>"#.to_string()),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        (prop::collection::vec(inner, 1..4), 0..3_u8).prop_map(|(children, paint)| {
            let attr = match paint {
                0 => "",
                1 => r#" fill="red""#,
                _ => r#" fill="none""#,
            };
            format!("<g{attr}>{}</g>", children.concat())
        })
    })
}

proptest! {
    #[test]
    fn flatten_is_idempotent(body in group_tree()) {
        let mut once = scene(&format!("<svg>{body}</svg>"));
        flatten(&mut once);
        let mut twice = once.clone();
        flatten(&mut twice);
        prop_assert_eq!(once.dump(), twice.dump());
        prop_assert_eq!(leaf_fills(&once), leaf_fills(&twice));
    }

    #[test]
    fn flatten_preserves_resolved_fill(body in group_tree()) {
        let mut s = scene(&format!("<svg>{body}</svg>"));
        let before = leaf_fills(&s);
        flatten(&mut s);
        prop_assert_eq!(before, leaf_fills(&s));
    }

    #[test]
    fn optimise_is_idempotent(body in group_tree()) {
        let mut once = scene(&format!("<svg>{body}</svg>"));
        optimise(&mut once);
        let mut twice = once.clone();
        optimise(&mut twice);
        prop_assert_eq!(once.dump(), twice.dump());
    }
}

#[test]
fn test_identical_red_paths_merge_in_order() {
    let mut s = scene(
        r#"<svg><path d="M0 0 L1 1" fill="red"/><path d="M2 2 Q 3 3 4 2" fill="red"/></svg>"#,
    );
    let root = s.root().expect("root");
    let first = s.children(root)[0];
    combine(&mut s);
    assert_eq!(s.children(root), &[first]);
    let ElementKind::Path { path, instructions } = &s[first].kind else {
        panic!("expected a path");
    };
    assert_eq!(instructions.len(), 4);
    assert_eq!(path.to_svg_data(), "M0 0 L1 1 M2 2 Q3 3 4 2");
}

#[test]
fn test_differing_stroke_width_does_not_merge() {
    let mut s = scene(
        r#"<svg><path d="M0 0 L1 1" stroke-width="1"/><path d="M2 2 L3 3" stroke-width="2"/></svg>"#,
    );
    combine(&mut s);
    assert_eq!(s.children(s.root().expect("root")).len(), 2);
}

#[test]
fn test_differing_transforms_do_not_merge() {
    let mut s = scene(
        r#"<svg><path d="M0 0 L1 1" transform="translate(1)"/><path d="M2 2 L3 3"/></svg>"#,
    );
    combine(&mut s);
    assert_eq!(s.children(s.root().expect("root")).len(), 2);
}

#[test]
fn test_equivalent_transform_spellings_merge() {
    let mut s = scene(
        r#"<svg><path d="M0 0 L1 1" transform="translate(1 0)"/><path d="M2 2 L3 3" transform="matrix(1 0 0 1 1 0)"/></svg>"#,
    );
    combine(&mut s);
    assert_eq!(s.children(s.root().expect("root")).len(), 1);
}

#[test]
fn test_flatten_drops_transforms_that_cancel() {
    let mut s = scene(
        r#"<svg><g transform="translate(3 4)"><path d="M0 0 L1 1" transform="translate(-3 -4)"/></g></svg>"#,
    );
    flatten(&mut s);
    let path = s.children(s.root().expect("root"))[0];
    assert!(matches!(s[path].kind, ElementKind::Path { .. }));
    assert!(s[path].transform.is_none());
}
