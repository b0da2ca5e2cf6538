//! Tree optimization passes run after parsing.

use crate::element::{ElementKind, NodeId};
use crate::scene::Scene;
use crate::transform::{AffineTransform, Transform};

/// Run [`flatten`] then [`combine`].
pub fn optimise(scene: &mut Scene) {
    flatten(scene);
    combine(scene);
}

/// Remove every group that has exactly one child, moving the child into
/// the group's place.
///
/// The group's style is added under the child's (the child's own values
/// win) and its transform is applied before the child's. `fill="none"`,
/// `stroke="none"`, `display="none"` and font properties of the group carry
/// over when the child does not set them. A group without a parent is left
/// alone.
pub fn flatten(scene: &mut Scene) {
    let Some(root) = scene.root() else {
        return;
    };

    // Snapshot first: the tree must not change while it is walked.
    let groups: Vec<NodeId> = scene
        .descendants(root)
        .into_iter()
        .filter(|id| {
            matches!(scene[*id].kind, ElementKind::Group) && scene.children(*id).len() == 1
        })
        .collect();

    for group in groups {
        let Some(grandparent) = scene.parent(group) else {
            continue;
        };
        let child = scene.children(group)[0];
        let outer = scene[group].clone();
        let inner = &mut scene[child];

        let own_fill = inner.style.as_ref().is_some_and(|s| s.fill_color.is_some());
        let own_stroke = inner.style.as_ref().is_some_and(|s| s.stroke_color.is_some());

        let style = outer
            .style
            .unwrap_or_default()
            .add(&inner.style.take().unwrap_or_default());
        inner.set_style(style);

        let text_style = outer
            .text_style
            .unwrap_or_default()
            .add(&inner.text_style.take().unwrap_or_default());
        inner.set_text_style(text_style);

        let transform = outer
            .transform
            .unwrap_or_default()
            .then(&inner.transform.take().unwrap_or_default());
        inner.set_transform(transform);

        if !own_fill {
            inner.draw_fill &= outer.draw_fill;
        }
        if !own_stroke {
            inner.draw_stroke &= outer.draw_stroke;
        }
        inner.display &= outer.display;

        scene.replace(grandparent, group, child);
        tracing::debug!("Flattened single-child group {:?} into {:?}", group, child);
    }
}

/// Merge runs of adjacent, identically styled and transformed paths.
///
/// Containers are processed innermost first. Within one container the scan
/// restarts after every merge until a full pass merges nothing.
pub fn combine(scene: &mut Scene) {
    if let Some(root) = scene.root() {
        combine_container(scene, root);
    }
}

fn combine_container(scene: &mut Scene, container: NodeId) {
    for child in scene.children(container).to_vec() {
        if scene[child].is_container() {
            combine_container(scene, child);
        }
    }

    loop {
        let Some((first, second)) = scene
            .children(container)
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .find(|&(a, b)| mergeable(scene, a, b))
        else {
            break;
        };

        let ElementKind::Path { path: appended, .. } = scene[second].kind.clone() else {
            break;
        };
        if let ElementKind::Path { path, instructions } = &mut scene[first].kind {
            path.append(&appended);
            *instructions = path.instructions();
        }
        scene.remove_child(container, second);
        tracing::debug!("Merged path {:?} into {:?}", second, first);
    }
}

/// Siblings share every ancestor, so equal own values mean equal resolved
/// values.
fn mergeable(scene: &Scene, a: NodeId, b: NodeId) -> bool {
    let (a, b) = (&scene[a], &scene[b]);
    matches!(a.kind, ElementKind::Path { .. })
        && matches!(b.kind, ElementKind::Path { .. })
        && a.style == b.style
        && a.text_style == b.text_style
        && a.draw_fill == b.draw_fill
        && a.draw_stroke == b.draw_stroke
        && a.display == b.display
        && affine(a.transform.as_ref()) == affine(b.transform.as_ref())
}

fn affine(transform: Option<&Transform>) -> AffineTransform {
    transform.map_or(AffineTransform::IDENTITY, Transform::to_affine)
}
