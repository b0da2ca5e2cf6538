//! Drawing-instruction document generation.
//!
//! Walks a [`Scene`] and produces a nested [`DrawingElement`] describing the
//! image in terms of path elements, rectangles, ovals, lines and text runs.
//! The scene is never mutated.
//!
//! Paint selection follows the resolved fill and stroke of each element:
//!
//! | fill | stroke | rect                     | circle / ellipse        | path / polygon          |
//! |------|--------|--------------------------|-------------------------|-------------------------|
//! | yes  | no     | `rectangleFillElement`   | `ovalFillElement`       | `fillElement`           |
//! | no   | yes    | `rectangleStrokeElement` | `ovalStrokeElement`     | `strokeElement`         |
//! | yes  | yes    | `fillAndStrokeElement`   | `fillAndStrokeElement`  | `fillAndStrokeElement`  |
//! | no   | no     | omitted                  | omitted                 | omitted                 |

use serde::{Deserialize, Serialize};
use svgdraw_core::{
    rounded_rect_path, AffineTransform, BlendMode, Color, Element, ElementKind, LineCap, LineJoin,
    NodeId, PathInstruction, PathSegment, Point, Rect, Scene, TextSpan,
};

use crate::error::RenderResult;

/// Tag naming what a [`DrawingElement`] draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementType {
    /// Fill a path.
    FillElement,
    /// Stroke a path.
    StrokeElement,
    /// Fill then stroke a path.
    FillAndStrokeElement,
    /// A list of nested elements.
    ArrayOfElements,
    /// A single stroked line.
    LineElement,
    /// Fill a rectangle.
    RectangleFillElement,
    /// Stroke a rectangle.
    RectangleStrokeElement,
    /// Fill an ellipse inscribed in a rectangle.
    OvalFillElement,
    /// Stroke an ellipse inscribed in a rectangle.
    OvalStrokeElement,
    /// A run of text.
    BasicStringElement,
}

impl ElementType {
    /// Path element type for the given paint, `None` when nothing is drawn.
    #[must_use]
    pub fn for_path(fill: bool, stroke: bool) -> Option<Self> {
        match (fill, stroke) {
            (true, true) => Some(Self::FillAndStrokeElement),
            (true, false) => Some(Self::FillElement),
            (false, true) => Some(Self::StrokeElement),
            (false, false) => None,
        }
    }
}

/// A color as it appears in the drawing document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorDescriptor {
    /// Red component in `[0, 1]`.
    pub red: f64,
    /// Green component in `[0, 1]`.
    pub green: f64,
    /// Blue component in `[0, 1]`.
    pub blue: f64,
    /// Name of the color space the components are in.
    pub color_profile_name: String,
}

/// An affine matrix as it appears in the drawing document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineDescriptor {
    /// `a`
    pub m11: f64,
    /// `b`
    pub m12: f64,
    /// `c`
    pub m21: f64,
    /// `d`
    pub m22: f64,
    /// Horizontal translation.
    #[serde(rename = "tX")]
    pub t_x: f64,
    /// Vertical translation.
    #[serde(rename = "tY")]
    pub t_y: f64,
}

impl From<AffineTransform> for AffineDescriptor {
    fn from(m: AffineTransform) -> Self {
        Self {
            m11: m.a,
            m12: m.b,
            m21: m.c,
            m22: m.d,
            t_x: m.tx,
            t_y: m.ty,
        }
    }
}

/// Endpoints of a `lineElement`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDescriptor {
    /// First endpoint.
    pub start_point: Point,
    /// Second endpoint.
    pub end_point: Point,
}

/// Dash pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDash {
    /// Alternating dash and gap lengths.
    pub line_dash_array: Vec<f64>,
    /// Offset into the pattern.
    pub line_dash_phase: f64,
}

/// One node of the drawing-instruction document.
///
/// Every key is optional; which ones are present depends on
/// [`DrawingElement::element_type`]. A descriptor without an element type
/// draws nothing and is pruned from its parent's list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingElement {
    /// What this element draws.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<ElementType>,
    /// Initial pen position of a path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_point: Option<Point>,
    /// Path instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_of_path_elements: Option<Vec<PathInstruction>>,
    /// Line endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<LineDescriptor>,
    /// Rectangle or oval bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
    /// Fill color set by this element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<ColorDescriptor>,
    /// Stroke color set by this element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<ColorDescriptor>,
    /// Stroke width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    /// Line end style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_cap: Option<LineCap>,
    /// Line corner style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_join: Option<LineJoin>,
    /// Miter limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miter: Option<f64>,
    /// Dash pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_dash: Option<LineDash>,
    /// Opacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    /// Compositing mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
    /// Transform concatenated before drawing this element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affine_transform: Option<AffineDescriptor>,
    /// Text of a string element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_text: Option<String>,
    /// Baseline origin of a string element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<Point>,
    /// Font of a string element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postscript_font_name: Option<String>,
    /// Font size of a string element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_size: Option<f64>,
    /// Text outline width; negative when the text is also filled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    /// Nested elements of an `arrayOfElements`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_of_elements: Option<Vec<DrawingElement>>,
}

impl DrawingElement {
    /// True when this element draws something.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.element_type.is_some()
    }

    fn set_path(&mut self, start: Option<Point>, instructions: Vec<PathInstruction>) {
        self.start_point = start;
        self.array_of_path_elements = Some(instructions);
    }
}

/// Generator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Color space name attached to every color.
    pub color_profile_name: String,
    /// Font used by text that inherits no font family.
    pub default_font_family: String,
    /// Size used by text that inherits no font size.
    pub default_font_size: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            color_profile_name: "kCGColorSpaceSRGB".to_string(),
            default_font_family: "Helvetica".to_string(),
            default_font_size: 12.0,
        }
    }
}

/// Rectangle-shaped primitives with their own element types.
#[derive(Debug, Clone, Copy)]
enum BoxShape {
    Rectangle,
    Oval,
}

/// Turns scenes into drawing-instruction documents.
#[derive(Debug, Clone, Default)]
pub struct InstructionGenerator {
    config: GeneratorConfig,
}

impl InstructionGenerator {
    /// Create a generator with the given settings.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// The generator settings.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build the drawing document for `scene`. An empty scene yields an
    /// empty descriptor.
    #[must_use]
    pub fn generate(&self, scene: &Scene) -> DrawingElement {
        let Some(root) = scene.root() else {
            return DrawingElement::default();
        };
        let document = self.describe(scene, root);
        tracing::debug!(
            "Generated drawing document for {} elements: {:?}",
            scene.element_count(),
            document.element_type
        );
        document
    }

    /// Compact JSON text of the drawing document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RenderError::Serialization`] if serialization fails.
    pub fn to_json(&self, scene: &Scene) -> RenderResult<String> {
        Ok(serde_json::to_string(&self.generate(scene))?)
    }

    /// Indented JSON text of the drawing document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RenderError::Serialization`] if serialization fails.
    pub fn to_json_pretty(&self, scene: &Scene) -> RenderResult<String> {
        Ok(serde_json::to_string_pretty(&self.generate(scene))?)
    }

    fn describe(&self, scene: &Scene, id: NodeId) -> DrawingElement {
        let element = &scene[id];
        let mut out = self.metadata(element);
        let fill = scene.has_fill(id);
        let stroke = scene.has_stroke(id);

        match &element.kind {
            ElementKind::Document(_) | ElementKind::Group => {
                return self.describe_container(scene, id, out);
            }
            ElementKind::Path { path, instructions } => {
                out.set_path(path.start_point(), instructions.clone());
                out.element_type = ElementType::for_path(fill, stroke);
            }
            ElementKind::Line { start, end } => {
                out.line = Some(LineDescriptor {
                    start_point: *start,
                    end_point: *end,
                });
                out.element_type = Some(ElementType::LineElement);
            }
            ElementKind::Rect { rect, rx, ry } => {
                if *rx > 0.0 && *ry > 0.0 {
                    let path = rounded_rect_path(rect, Some(*rx), Some(*ry));
                    out.set_path(path.start_point(), path.instructions());
                    out.element_type = ElementType::for_path(fill, stroke);
                } else {
                    describe_box(&mut out, *rect, BoxShape::Rectangle, fill, stroke);
                }
            }
            kind @ (ElementKind::Ellipse { .. } | ElementKind::Circle { .. }) => {
                if let Some(rect) = kind.oval_rect() {
                    describe_box(&mut out, rect, BoxShape::Oval, fill, stroke);
                }
            }
            ElementKind::Polygon { points } => {
                describe_polygon(&mut out, points, true, fill, stroke);
            }
            ElementKind::Polyline { points } => {
                describe_polygon(&mut out, points, false, fill, stroke);
            }
            ElementKind::SimpleText { spans } => {
                self.describe_text(scene, id, spans, &mut out);
            }
        }

        tracing::trace!(
            "Described <{}> as {:?}",
            element.kind.tag_name(),
            out.element_type
        );
        out
    }

    fn describe_container(
        &self,
        scene: &Scene,
        id: NodeId,
        mut out: DrawingElement,
    ) -> DrawingElement {
        let element = &scene[id];
        let children = scene.children(id);
        if children.is_empty() {
            return out;
        }

        // A lone unstyled path is drawn with the container's own paint.
        if let [only] = children {
            let child = &scene[*only];
            if let ElementKind::Path { path, instructions } = &child.kind {
                if child.style.is_none()
                    && child.transform.is_none()
                    && child.display
                    && child.draw_fill
                    && child.draw_stroke
                {
                    out.set_path(path.start_point(), instructions.clone());
                    out.element_type =
                        ElementType::for_path(scene.has_fill(id), scene.has_stroke(id));
                    return out;
                }
            }
        }

        let mut elements: Vec<DrawingElement> = children
            .iter()
            .filter(|child| scene[**child].display)
            .map(|child| self.describe(scene, *child))
            .filter(DrawingElement::is_drawable)
            .collect();

        if elements.is_empty() {
            return out;
        }
        if elements.len() == 1 && element.style.is_none() && element.transform.is_none() {
            if let Some(single) = elements.pop() {
                return single;
            }
        }

        out.element_type = Some(ElementType::ArrayOfElements);
        out.array_of_elements = Some(elements);
        out
    }

    fn describe_text(
        &self,
        scene: &Scene,
        id: NodeId,
        spans: &[TextSpan],
        out: &mut DrawingElement,
    ) {
        let fill = scene.has_fill(id);
        let stroke = scene.has_stroke(id);
        if spans.is_empty() || !(fill || stroke) {
            return;
        }

        let font = scene
            .font_family(id)
            .unwrap_or(&self.config.default_font_family)
            .to_string();
        let size = scene.font_size(id).unwrap_or(self.config.default_font_size);
        let stroke_width = stroke.then(|| {
            let width = scene.resolved_style(id).line_width.unwrap_or(1.0);
            if fill {
                -width
            } else {
                width
            }
        });

        let mut strings: Vec<DrawingElement> = spans
            .iter()
            .map(|span| DrawingElement {
                element_type: Some(ElementType::BasicStringElement),
                string_text: Some(span.text.clone()),
                point: Some(span.origin),
                postscript_font_name: Some(font.clone()),
                text_size: Some(size),
                stroke_width,
                ..DrawingElement::default()
            })
            .collect();

        if strings.len() == 1 {
            if let Some(string) = strings.pop() {
                out.element_type = string.element_type;
                out.string_text = string.string_text;
                out.point = string.point;
                out.postscript_font_name = string.postscript_font_name;
                out.text_size = string.text_size;
                out.stroke_width = string.stroke_width;
            }
        } else {
            out.element_type = Some(ElementType::ArrayOfElements);
            out.array_of_elements = Some(strings);
        }
    }

    /// Keys every element carries from its own style and transform.
    fn metadata(&self, element: &Element) -> DrawingElement {
        let mut out = DrawingElement {
            affine_transform: element
                .transform
                .as_ref()
                .map(|t| AffineDescriptor::from(t.to_affine())),
            ..DrawingElement::default()
        };
        if let Some(style) = &element.style {
            out.fill_color = style.fill_color.map(|c| self.color(c));
            out.stroke_color = style.stroke_color.map(|c| self.color(c));
            out.line_width = style.line_width;
            out.line_cap = style.line_cap;
            out.line_join = style.line_join;
            out.miter = style.miter_limit;
            out.line_dash = style.line_dash.clone().map(|lengths| LineDash {
                line_dash_array: lengths,
                line_dash_phase: style.line_dash_phase.unwrap_or(0.0),
            });
            out.alpha = style.alpha;
            out.blend_mode = style.blend_mode;
        }
        out
    }

    fn color(&self, color: Color) -> ColorDescriptor {
        ColorDescriptor {
            red: color.red,
            green: color.green,
            blue: color.blue,
            color_profile_name: self.config.color_profile_name.clone(),
        }
    }
}

fn describe_box(out: &mut DrawingElement, rect: Rect, shape: BoxShape, fill: bool, stroke: bool) {
    let (fill_type, stroke_type, instruction) = match shape {
        BoxShape::Rectangle => (
            ElementType::RectangleFillElement,
            ElementType::RectangleStrokeElement,
            PathInstruction::rectangle(rect),
        ),
        BoxShape::Oval => (
            ElementType::OvalFillElement,
            ElementType::OvalStrokeElement,
            PathInstruction::oval(rect),
        ),
    };
    match (fill, stroke) {
        (true, true) => {
            out.set_path(Some(rect.origin), vec![instruction]);
            out.element_type = Some(ElementType::FillAndStrokeElement);
        }
        (true, false) => {
            out.rect = Some(rect);
            out.element_type = Some(fill_type);
        }
        (false, true) => {
            out.rect = Some(rect);
            out.element_type = Some(stroke_type);
        }
        (false, false) => {}
    }
}

fn describe_polygon(
    out: &mut DrawingElement,
    points: &[Point],
    close: bool,
    fill: bool,
    stroke: bool,
) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    let mut instructions: Vec<PathInstruction> = rest
        .iter()
        .map(|p| PathInstruction::from(&PathSegment::LineTo(*p)))
        .collect();
    if close {
        instructions.push(PathInstruction::from(&PathSegment::Close));
    }
    out.set_path(Some(*first), instructions);
    out.element_type = ElementType::for_path(fill, stroke);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use svgdraw_core::{optimise, SvgProcessor};

    fn scene(svg: &str) -> Scene {
        SvgProcessor::new().parse_str(svg).expect("parse").scene
    }

    fn generate(svg: &str) -> DrawingElement {
        InstructionGenerator::default().generate(&scene(svg))
    }

    fn json(svg: &str) -> Value {
        serde_json::to_value(generate(svg)).expect("json")
    }

    #[test]
    fn test_single_rect_collapses_to_root() {
        let doc = json(
            r##"<svg viewBox="0 0 300 200" version="1.1"><rect x="0" y="0" width="100" height="50" fill="#ff0000"/></svg>"##,
        );
        assert_eq!(doc["elementType"], "rectangleFillElement");
        assert_eq!(
            doc["rect"],
            json!({"origin": {"x": 0.0, "y": 0.0}, "size": {"width": 100.0, "height": 50.0}})
        );
        assert_eq!(
            doc["fillColor"],
            json!({"red": 1.0, "green": 0.0, "blue": 0.0, "colorProfileName": "kCGColorSpaceSRGB"})
        );
        assert!(doc.get("arrayOfElements").is_none());
    }

    #[test]
    fn test_fill_and_stroke_rect_becomes_path() {
        let doc = generate(r#"<svg><rect width="4" height="2" stroke="blue"/></svg>"#);
        assert_eq!(doc.element_type, Some(ElementType::FillAndStrokeElement));
        let instructions = doc.array_of_path_elements.expect("path");
        assert_eq!(instructions, vec![PathInstruction::rectangle(Rect::new(0.0, 0.0, 4.0, 2.0))]);
        assert!(doc.rect.is_none());
    }

    #[test]
    fn test_stroke_only_oval() {
        let doc = generate(r#"<svg><circle cx="5" cy="5" r="2" fill="none" stroke="red"/></svg>"#);
        assert_eq!(doc.element_type, Some(ElementType::OvalStrokeElement));
        assert_eq!(doc.rect, Some(Rect::new(3.0, 3.0, 4.0, 4.0)));
    }

    #[test]
    fn test_rounded_rect_is_path() {
        let doc = generate(r#"<svg><rect width="10" height="4" rx="1"/></svg>"#);
        assert_eq!(doc.element_type, Some(ElementType::FillElement));
        assert_eq!(doc.array_of_path_elements.map(|p| p.len()), Some(10));
    }

    #[test]
    fn test_multiple_children_form_array() {
        let doc = generate(r#"<svg><rect width="1" height="1"/><line x2="5" stroke="red"/></svg>"#);
        assert_eq!(doc.element_type, Some(ElementType::ArrayOfElements));
        let elements = doc.array_of_elements.expect("array");
        assert_eq!(elements[0].element_type, Some(ElementType::RectangleFillElement));
        assert_eq!(elements[1].element_type, Some(ElementType::LineElement));
    }

    #[test]
    fn test_hidden_and_unpainted_children_are_pruned() {
        let doc = generate(
            r#"<svg><rect width="1" height="1" display="none"/><path d="M0 0 L1 1" fill="none"/><circle r="1"/><g/></svg>"#,
        );
        assert_eq!(doc.element_type, Some(ElementType::OvalFillElement));
    }

    #[test]
    fn test_lone_unstyled_path_is_hoisted_into_group() {
        let doc = generate(
            r#"<svg><g stroke="red" transform="translate(5 0)"><path d="M0 0 L1 1"/></g></svg>"#,
        );
        assert_eq!(doc.element_type, Some(ElementType::FillAndStrokeElement));
        assert_eq!(doc.start_point, Some(Point::new(0.0, 0.0)));
        assert_eq!(doc.array_of_path_elements.map(|p| p.len()), Some(2));
        assert_eq!(
            doc.affine_transform,
            Some(AffineDescriptor::from(AffineTransform::translation(5.0, 0.0)))
        );
        assert!(doc.stroke_color.is_some());
    }

    #[test]
    fn test_styled_group_keeps_array_wrapper() {
        let doc = generate(r#"<svg><g stroke-width="3"><circle r="1"/></g></svg>"#);
        assert_eq!(doc.element_type, Some(ElementType::ArrayOfElements));
        assert_eq!(doc.line_width, Some(3.0));
        assert_eq!(doc.array_of_elements.map(|e| e.len()), Some(1));
    }

    #[test]
    fn test_polygon_and_polyline() {
        let doc = generate(r#"<svg><polygon points="0,0 4,0 4,4"/><polyline points="0 0 1 1" stroke="red" fill="none"/></svg>"#);
        let elements = doc.array_of_elements.expect("array");
        let polygon = &elements[0];
        assert_eq!(polygon.element_type, Some(ElementType::FillElement));
        assert_eq!(polygon.start_point, Some(Point::new(0.0, 0.0)));
        let kinds: Vec<_> = polygon
            .array_of_path_elements
            .as_ref()
            .expect("path")
            .iter()
            .map(|i| i.element_type)
            .collect();
        assert_eq!(
            kinds,
            vec![
                svgdraw_core::PathInstructionKind::Line,
                svgdraw_core::PathInstructionKind::Line,
                svgdraw_core::PathInstructionKind::CloseSubPath
            ]
        );
        assert_eq!(elements[1].element_type, Some(ElementType::StrokeElement));
        assert_eq!(elements[1].array_of_path_elements.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_text_with_fill_and_stroke() {
        let doc = json(
            r#"<svg><text x="1" y="2" stroke="red" stroke-width="2" font-family="Arial" font-size="20">Hi</text></svg>"#,
        );
        assert_eq!(doc["elementType"], "basicStringElement");
        assert_eq!(doc["stringText"], "Hi");
        assert_eq!(doc["point"], json!({"x": 1.0, "y": 2.0}));
        assert_eq!(doc["postscriptFontName"], "Arial");
        assert_eq!(doc["textSize"], 20.0);
        assert_eq!(doc["strokeWidth"], -2.0);
    }

    #[test]
    fn test_text_defaults_and_spans() {
        let doc = generate(r#"<svg><text>One<tspan x="0" y="20">Two</tspan></text></svg>"#);
        assert_eq!(doc.element_type, Some(ElementType::ArrayOfElements));
        let strings = doc.array_of_elements.expect("spans");
        assert_eq!(strings.len(), 2);
        assert_eq!(strings[0].postscript_font_name.as_deref(), Some("Helvetica"));
        assert_eq!(strings[0].text_size, Some(12.0));
        assert_eq!(strings[0].stroke_width, None);
        assert_eq!(strings[1].point, Some(Point::new(0.0, 20.0)));
    }

    #[test]
    fn test_affine_keys() {
        let doc = json(r#"<svg><g transform="matrix(1 2 3 4 5 6)"><circle r="1"/><circle r="2"/></g></svg>"#);
        assert_eq!(
            doc["affineTransform"],
            json!({"m11": 1.0, "m12": 2.0, "m21": 3.0, "m22": 4.0, "tX": 5.0, "tY": 6.0})
        );
    }

    #[test]
    fn test_generation_does_not_mutate_scene() {
        let mut s = scene(r#"<svg><g><path d="M0 0 L1 1"/><path d="M2 2 L3 3"/></g></svg>"#);
        optimise(&mut s);
        let before = s.dump();
        let generator = InstructionGenerator::default();
        let first = generator.to_json(&s).expect("json");
        assert_eq!(s.dump(), before);
        assert_eq!(generator.to_json(&s).expect("json"), first);
    }

    #[test]
    fn test_custom_profile_name() {
        let generator = InstructionGenerator::new(GeneratorConfig {
            color_profile_name: "kCGColorSpaceGenericRGB".to_string(),
            ..GeneratorConfig::default()
        });
        let doc = generator.generate(&scene(r#"<svg><rect width="1" height="1" fill="red"/></svg>"#));
        assert_eq!(
            doc.fill_color.map(|c| c.color_profile_name),
            Some("kCGColorSpaceGenericRGB".to_string())
        );
    }
}
