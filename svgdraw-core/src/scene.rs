//! Scene tree: an arena of elements with parent links.
//!
//! Containers own their children through `children` lists of [`NodeId`]s;
//! the `parent` link is a plain index back into the same arena. Detached
//! elements stay in the arena but are unreachable from the root.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::element::{DocumentInfo, Element, ElementId, ElementKind, NodeId};
use crate::style::{Style, TextStyle};
use crate::transform::Transform;
use crate::walker::Walker;
use crate::SvgResult;

/// A tree of elements rooted (normally) at a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    nodes: Vec<Element>,
    root: Option<NodeId>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detached element and return its id.
    pub fn add(&mut self, mut element: Element) -> NodeId {
        element.parent = None;
        element.children.clear();
        let id = NodeId(self.nodes.len());
        self.nodes.push(element);
        id
    }

    /// Make `id` the root.
    pub fn set_root(&mut self, id: NodeId) {
        self.detach(id);
        self.root = Some(id);
    }

    /// The root element.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Look up an element.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0)
    }

    /// Look up an element mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0)
    }

    /// Metadata of the root document, if the root is a document.
    #[must_use]
    pub fn document_info(&self) -> Option<&DocumentInfo> {
        match &self.get(self.root?)?.kind {
            ElementKind::Document(info) => Some(info),
            _ => None,
        }
    }

    /// Mutable metadata of the root document.
    pub fn document_info_mut(&mut self) -> Option<&mut DocumentInfo> {
        let root = self.root?;
        match &mut self.get_mut(root)?.kind {
            ElementKind::Document(info) => Some(info),
            _ => None,
        }
    }

    /// Find the element with a given identity.
    #[must_use]
    pub fn find_by_uid(&self, uid: ElementId) -> Option<NodeId> {
        self.nodes.iter().position(|e| e.uid == uid).map(NodeId)
    }

    /// Find the first reachable element with a user `id`.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root?)
            .into_iter()
            .find(|n| self[*n].id.as_deref() == Some(id))
    }

    /// Number of elements reachable from the root.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.root.map_or(0, |root| self.descendants(root).len())
    }

    /// True when no element is reachable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Children of `id` in drawing order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self[id].children
    }

    /// Parent of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].parent
    }

    /// Ancestors of `id`, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self[id].parent;
        while let Some(p) = current {
            out.push(p);
            current = self[p].parent;
        }
        out
    }

    /// Number of ancestors.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).len()
    }

    /// Child positions leading from the top-most ancestor to `id`.
    #[must_use]
    pub fn index_path(&self, id: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = id;
        while let Some(parent) = self[current].parent {
            if let Some(index) = self[parent].children.iter().position(|c| *c == current) {
                path.push(index);
            }
            current = parent;
        }
        path.reverse();
        path
    }

    /// Resolve an index path from the root.
    #[must_use]
    pub fn node_at_index_path(&self, path: &[usize]) -> Option<NodeId> {
        let mut current = self.root?;
        for &index in path {
            current = *self.get(current)?.children.get(index)?;
        }
        Some(current)
    }

    /// Remove `id` from its parent, if any.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self[id].parent.take() {
            self[parent].children.retain(|c| *c != id);
        }
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a container or if the move would make an
    /// element its own ancestor.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.assert_can_adopt(parent, child);
        self.detach(child);
        self[child].parent = Some(parent);
        self[parent].children.push(child);
    }

    /// Replace the children of `parent` in one step.
    ///
    /// Previous children are detached, each new child is removed from its
    /// previous container, and all of them are re-parented to `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a container or if a child is an ancestor
    /// of `parent`.
    pub fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        for &child in &children {
            self.assert_can_adopt(parent, child);
        }
        for old in std::mem::take(&mut self[parent].children) {
            self[old].parent = None;
        }
        let mut unique = Vec::with_capacity(children.len());
        for child in children {
            if unique.contains(&child) {
                continue;
            }
            self.detach(child);
            self[child].parent = Some(parent);
            unique.push(child);
        }
        self[parent].children = unique;
    }

    /// Remove `child` from `parent`. Returns false if it was not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self[child].parent == Some(parent) {
            self.detach(child);
            true
        } else {
            false
        }
    }

    /// Put `new` in the place `old` occupies among `parent`'s children.
    ///
    /// # Panics
    ///
    /// Panics if `old` is not a child of `parent`; callers only replace
    /// elements they just found there.
    pub fn replace(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        self.assert_can_adopt(parent, new);
        self.detach(new);
        let Some(index) = self[parent].children.iter().position(|c| *c == old) else {
            panic!("replace: {old:?} is not a child of {parent:?}");
        };
        self[old].parent = None;
        self[parent].children[index] = new;
        self[new].parent = Some(parent);
    }

    fn assert_can_adopt(&self, parent: NodeId, child: NodeId) {
        assert!(
            self[parent].is_container(),
            "<{}> cannot hold children",
            self[parent].kind.tag_name()
        );
        assert!(
            parent != child && !self.ancestors(parent).contains(&child),
            "{child:?} cannot become a descendant of itself"
        );
    }

    // ------------------------------------------------------------------
    // Inheritance
    // ------------------------------------------------------------------

    /// Effective fill color.
    ///
    /// `fill="none"` yields `None` without looking at ancestors. An unset
    /// fill inherits; a document root without a fill defaults to black.
    #[must_use]
    pub fn fill_color(&self, id: NodeId) -> Option<Color> {
        let element = &self[id];
        if !element.draw_fill {
            return None;
        }
        if let Some(color) = element.style.as_ref().and_then(|s| s.fill_color) {
            return Some(color);
        }
        match element.parent {
            Some(parent) => self.fill_color(parent),
            None => matches!(element.kind, ElementKind::Document(_)).then_some(Color::BLACK),
        }
    }

    /// Effective stroke color. Unlike fill there is no default.
    #[must_use]
    pub fn stroke_color(&self, id: NodeId) -> Option<Color> {
        let element = &self[id];
        if !element.draw_stroke {
            return None;
        }
        if let Some(color) = element.style.as_ref().and_then(|s| s.stroke_color) {
            return Some(color);
        }
        element.parent.and_then(|parent| self.stroke_color(parent))
    }

    /// True when the element is filled.
    #[must_use]
    pub fn has_fill(&self, id: NodeId) -> bool {
        self.fill_color(id).is_some()
    }

    /// True when the element is stroked.
    #[must_use]
    pub fn has_stroke(&self, id: NodeId) -> bool {
        self.stroke_color(id).is_some()
    }

    /// Effective font family.
    #[must_use]
    pub fn font_family(&self, id: NodeId) -> Option<&str> {
        let element = &self[id];
        match element.text_style.as_ref().and_then(|t| t.font_family.as_deref()) {
            Some(family) => Some(family),
            None => element.parent.and_then(|parent| self.font_family(parent)),
        }
    }

    /// Effective font size.
    #[must_use]
    pub fn font_size(&self, id: NodeId) -> Option<f64> {
        let element = &self[id];
        element
            .text_style
            .as_ref()
            .and_then(|t| t.font_size)
            .or_else(|| element.parent.and_then(|parent| self.font_size(parent)))
    }

    /// Styles of all ancestors and the element, folded root to leaf.
    #[must_use]
    pub fn resolved_style(&self, id: NodeId) -> Style {
        self.lineage(id)
            .into_iter()
            .filter_map(|n| self[n].style.as_ref())
            .fold(Style::default(), |acc, style| acc.add(style))
    }

    /// Text styles of all ancestors and the element, folded root to leaf.
    #[must_use]
    pub fn resolved_text_style(&self, id: NodeId) -> TextStyle {
        self.lineage(id)
            .into_iter()
            .filter_map(|n| self[n].text_style.as_ref())
            .fold(TextStyle::default(), |acc, style| acc.add(style))
    }

    /// Transforms of all ancestors and the element, composed root to leaf.
    /// `None` when the composition is the identity.
    #[must_use]
    pub fn resolved_transform(&self, id: NodeId) -> Option<Transform> {
        let combined = self
            .lineage(id)
            .into_iter()
            .filter_map(|n| self[n].transform.as_ref())
            .fold(Transform::default(), |acc, t| acc.then(t));
        (!combined.is_identity()).then_some(combined)
    }

    /// Ancestors and the element, root first.
    fn lineage(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = self.ancestors(id);
        chain.reverse();
        chain.push(id);
        chain
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Visit every element below and including `start` in pre-order with
    /// its depth relative to `start`.
    pub fn walk_from<V>(&self, start: NodeId, mut visit: V)
    where
        V: FnMut(NodeId, &Element, usize),
    {
        let walker = Walker::new(|id: &NodeId| {
            let element = &self[*id];
            element.is_container().then(|| element.children.clone())
        });
        walker.walk(start, |id, depth| visit(*id, &self[*id], depth));
    }

    /// Visit every reachable element in pre-order.
    pub fn walk<V>(&self, visit: V)
    where
        V: FnMut(NodeId, &Element, usize),
    {
        if let Some(root) = self.root {
            self.walk_from(root, visit);
        }
    }

    /// Pre-order list of `start` and everything below it.
    #[must_use]
    pub fn descendants(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk_from(start, |id, _, _| out.push(id));
        out
    }

    /// Indented one-line-per-element description of the tree.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.walk(|_, element, depth| {
            out.push_str(&"  ".repeat(depth));
            out.push('<');
            out.push_str(element.kind.tag_name());
            if let Some(id) = &element.id {
                out.push_str(" id=\"");
                out.push_str(id);
                out.push('"');
            }
            if element.style.is_some() {
                out.push_str(" styled");
            }
            if element.transform.is_some() {
                out.push_str(" transformed");
            }
            if !element.display {
                out.push_str(" hidden");
            }
            out.push_str(">\n");
        });
        out
    }

    /// Serialize the whole arena to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> SvgResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn from_json(json: &str) -> SvgResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Index<NodeId> for Scene {
    type Output = Element;

    fn index(&self, id: NodeId) -> &Element {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Scene {
    fn index_mut(&mut self, id: NodeId) -> &mut Element {
        &mut self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::path::line_path;
    use crate::transform::TransformFunction;

    fn line() -> Element {
        let path = line_path(Point::ZERO, Point::new(1.0, 1.0));
        let instructions = path.instructions();
        Element::new(ElementKind::Path { path, instructions })
    }

    fn red() -> Style {
        Style {
            fill_color: Some(Color::rgb(1.0, 0.0, 0.0)),
            ..Style::default()
        }
    }

    /// document -> group -> path
    fn three_levels(group: Element) -> (Scene, NodeId, NodeId, NodeId) {
        let mut scene = Scene::new();
        let doc = scene.add(Element::new(ElementKind::Document(DocumentInfo::default())));
        scene.set_root(doc);
        let group = scene.add(group);
        let path = scene.add(line());
        scene.append_child(doc, group);
        scene.append_child(group, path);
        (scene, doc, group, path)
    }

    #[test]
    fn test_parent_links() {
        let (scene, doc, group, path) = three_levels(Element::new(ElementKind::Group));
        assert_eq!(scene.parent(path), Some(group));
        assert_eq!(scene.children(doc), &[group]);
        assert_eq!(scene.depth(path), 2);
        assert_eq!(scene.index_path(path), vec![0, 0]);
        assert_eq!(scene.node_at_index_path(&[0, 0]), Some(path));
        assert_eq!(scene.element_count(), 3);
    }

    #[test]
    fn test_fill_inherits_from_group() {
        let (scene, _, _, path) = three_levels(Element::new(ElementKind::Group).with_style(red()));
        assert_eq!(scene.fill_color(path), Some(Color::rgb(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_document_defaults() {
        let (scene, _, _, path) = three_levels(Element::new(ElementKind::Group));
        assert_eq!(scene.fill_color(path), Some(Color::BLACK));
        assert!(!scene.has_stroke(path));
    }

    #[test]
    fn test_fill_none_blocks_inheritance() {
        let (mut scene, _, group, path) =
            three_levels(Element::new(ElementKind::Group).with_style(red()));
        scene[path].draw_fill = false;
        assert!(!scene.has_fill(path));

        scene[path].draw_fill = true;
        scene[group].draw_fill = false;
        assert!(!scene.has_fill(path));
    }

    #[test]
    fn test_detached_element_has_no_default_fill() {
        let mut scene = Scene::new();
        let path = scene.add(line());
        assert_eq!(scene.fill_color(path), None);
    }

    #[test]
    fn test_set_children_reparents() {
        let (mut scene, doc, group, path) = three_levels(Element::new(ElementKind::Group));
        let other = scene.add(line());
        scene.set_children(doc, vec![path, other]);
        assert_eq!(scene.parent(group), None);
        assert!(scene.children(group).is_empty());
        assert_eq!(scene.parent(path), Some(doc));
        assert_eq!(scene.children(doc), &[path, other]);
    }

    #[test]
    fn test_replace_splices() {
        let (mut scene, doc, group, path) = three_levels(Element::new(ElementKind::Group));
        scene.replace(doc, group, path);
        assert_eq!(scene.children(doc), &[path]);
        assert_eq!(scene.parent(path), Some(doc));
        assert_eq!(scene.parent(group), None);
        assert!(scene.children(group).is_empty());
    }

    #[test]
    #[should_panic(expected = "is not a child")]
    fn test_replace_non_child_panics() {
        let (mut scene, doc, _, path) = three_levels(Element::new(ElementKind::Group));
        let stray = scene.add(line());
        scene.replace(doc, path, stray);
    }

    #[test]
    #[should_panic(expected = "cannot hold children")]
    fn test_leaf_cannot_adopt() {
        let (mut scene, _, _, path) = three_levels(Element::new(ElementKind::Group));
        let other = scene.add(line());
        scene.append_child(path, other);
    }

    #[test]
    fn test_remove_child() {
        let (mut scene, doc, group, path) = three_levels(Element::new(ElementKind::Group));
        assert!(!scene.remove_child(doc, path));
        assert!(scene.remove_child(group, path));
        assert!(scene.children(group).is_empty());
    }

    #[test]
    fn test_resolved_transform_and_style() {
        let group = Element::new(ElementKind::Group)
            .with_style(red())
            .with_transform(crate::parse_transform_list("translate(10 0)").expect("t"));
        let (mut scene, _, _, path) = three_levels(group);
        scene[path].set_transform(crate::parse_transform_list("scale(2)").expect("t"));
        scene[path].set_style(Style {
            line_width: Some(2.0),
            ..Style::default()
        });

        let t = scene.resolved_transform(path).expect("transform");
        assert_eq!(t.apply(Point::new(1.0, 1.0)), Point::new(12.0, 2.0));
        let style = scene.resolved_style(path);
        assert_eq!(style.fill_color, Some(Color::rgb(1.0, 0.0, 0.0)));
        assert_eq!(style.line_width, Some(2.0));
    }

    #[test]
    fn test_walk_and_dump() {
        let (mut scene, _, group, _) = three_levels(Element::new(ElementKind::Group));
        scene[group].id = Some("layer".into());
        let mut depths = Vec::new();
        scene.walk(|_, _, depth| depths.push(depth));
        assert_eq!(depths, vec![0, 1, 2]);
        assert_eq!(scene.dump(), "<svg>\n  <g id=\"layer\">\n    <path>\n");
        assert_eq!(scene.find_by_id("layer"), Some(group));
    }

    #[test]
    fn test_lookup_by_identity_and_document_info() {
        let (mut scene, _, group, _) = three_levels(Element::new(ElementKind::Group));
        let uid = scene[group].uid;
        assert_eq!(scene.find_by_uid(uid), Some(group));
        assert_eq!(scene.find_by_uid(ElementId::new()), None);

        if let Some(info) = scene.document_info_mut() {
            info.title = Some("Badge".into());
        }
        assert_eq!(
            scene.document_info().and_then(|i| i.title.as_deref()),
            Some("Badge")
        );

        let tagged = scene.add(line().with_id("tagged"));
        scene.append_child(group, tagged);
        assert_eq!(scene.find_by_id("tagged"), Some(tagged));
    }

    #[test]
    fn test_dump_marks_styled_transformed_and_hidden() {
        let group = Element::new(ElementKind::Group)
            .with_style(red())
            .with_transform(Transform::new(vec![TransformFunction::Translate { tx: 1.0, ty: 0.0 }]))
            .with_id("g1");
        let (mut scene, _, _, path) = three_levels(group);
        scene[path].display = false;
        assert_eq!(
            scene.dump(),
            "<svg>\n  <g id=\"g1\" styled transformed>\n    <path hidden>\n"
        );
    }

    #[test]
    fn test_json_round_trip() {
        let (scene, _, _, path) = three_levels(Element::new(ElementKind::Group));
        let restored = Scene::from_json(&scene.to_json().expect("json")).expect("parse");
        assert_eq!(restored[path], scene[path]);
        assert_eq!(restored.element_count(), 3);
    }
}
