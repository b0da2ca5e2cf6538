//! Document processor: turns an XML node tree into a [`Scene`].

use std::collections::HashMap;

use crate::attributes::{number_list, parse_length, AttributeSet};
use crate::element::{DocumentInfo, Element, ElementKind, NodeId, Profile, TextSpan, Version};
use crate::event::{Event, Severity};
use crate::geometry::{Point, Rect, Size};
use crate::path::{parse_path, resolve_corner_radii};
use crate::scene::Scene;
use crate::style::parse_presentation_attributes;
use crate::transform::parse_transform_list;
use crate::{SvgError, SvgResult};

/// The result of processing one document.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// The element tree, rooted at the document.
    pub scene: Scene,
    /// Diagnostics in the order they were recorded.
    pub events: Vec<Event>,
    /// Elements by user `id`; the last of several duplicates wins.
    pub ids: HashMap<String, NodeId>,
}

impl ParsedDocument {
    /// The document root.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.scene.root()
    }

    /// Warning-level events only.
    pub fn warnings(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.is_warning())
    }
}

/// Per-parse state. A fresh one is created for every document.
#[derive(Default)]
struct State {
    scene: Scene,
    document: Option<NodeId>,
    ids: HashMap<String, NodeId>,
    events: Vec<Event>,
}

impl State {
    fn record(&mut self, event: Event) {
        match event.severity {
            Severity::Warning => tracing::warn!("{}", event.message),
            Severity::Info => tracing::info!("{}", event.message),
        }
        self.events.push(event);
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.record(Event::warning(message));
    }
}

/// Builds scenes from SVG documents.
///
/// The processor holds no state between calls; each document gets its own
/// tree and diagnostics, so one processor can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgProcessor;

impl SvgProcessor {
    /// Create a processor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Tokenize `text` as XML and process it.
    ///
    /// # Errors
    ///
    /// Returns [`SvgError::CorruptXml`] when the text is not well-formed XML,
    /// otherwise the errors of [`SvgProcessor::process_document`].
    pub fn parse_str(&self, text: &str) -> SvgResult<ParsedDocument> {
        let xml = roxmltree::Document::parse(text).map_err(|e| SvgError::CorruptXml(e.to_string()))?;
        self.process_document(&xml)
    }

    /// Process an XML document whose root must be `<svg>`.
    ///
    /// # Errors
    ///
    /// Returns [`SvgError::MissingSvgRoot`] for another root element and
    /// propagates fatal errors from shape construction: missing required
    /// attributes, invalid numbers, malformed path data, transforms or point
    /// lists.
    pub fn process_document(&self, xml: &roxmltree::Document<'_>) -> SvgResult<ParsedDocument> {
        let root = xml.root_element();
        let name = root.tag_name().name();
        if name != "svg" {
            return Err(SvgError::MissingSvgRoot(name.to_string()));
        }

        let mut state = State::default();
        let document = Self::process_svg_document(root, &mut state)?;
        state.scene.set_root(document);

        tracing::info!(
            "Processed SVG document: {} elements, {} diagnostics",
            state.scene.element_count(),
            state.events.len()
        );
        Ok(ParsedDocument {
            scene: state.scene,
            events: state.events,
            ids: state.ids,
        })
    }

    fn process_svg_document(
        node: roxmltree::Node<'_, '_>,
        state: &mut State,
    ) -> SvgResult<NodeId> {
        let mut attrs = AttributeSet::from_node(node);
        let mut info = DocumentInfo::default();

        if let Some(version) = attrs.take("version") {
            if version.trim() == "1.1" {
                info.profile = Some(Profile::Full);
                info.version = Some(Version { major: 1, minor: 1 });
            }
        }

        let x = lenient_number(&mut attrs, "x", state).unwrap_or(0.0);
        let y = lenient_number(&mut attrs, "y", state).unwrap_or(0.0);
        let width = lenient_number(&mut attrs, "width", state);
        let height = lenient_number(&mut attrs, "height", state);
        let synthesized = width
            .zip(height)
            .map(|(w, h)| Rect::new(x, y, w, h));
        info.size = width.zip(height).map(|(w, h)| Size::new(w, h));

        info.view_box = match attrs.take("viewBox") {
            Some(value) => match number_list(&value).as_deref() {
                Some(&[vx, vy, vw, vh]) => Some(Rect::new(vx, vy, vw, vh)),
                _ => {
                    state.warn(format!("Malformed viewBox \"{value}\""));
                    synthesized
                }
            },
            None => synthesized,
        };

        let document = state.scene.add(Element::new(ElementKind::Document(info)));
        state.document = Some(document);
        tracing::debug!("Created <svg> document");

        Self::process_children(node, document, state)?;
        Self::finish_element(document, &mut attrs, state)?;
        Ok(document)
    }

    fn process_children(
        node: roxmltree::Node<'_, '_>,
        container: NodeId,
        state: &mut State,
    ) -> SvgResult<()> {
        for child in node.children().filter(roxmltree::Node::is_element) {
            if let Some(element) = Self::process_element(child, state)? {
                state.scene.append_child(container, element);
            }
        }
        Ok(())
    }

    /// Build the element for one source tag, or `None` for tags that do not
    /// produce elements.
    fn process_element(
        node: roxmltree::Node<'_, '_>,
        state: &mut State,
    ) -> SvgResult<Option<NodeId>> {
        let name = node.tag_name().name();
        let mut attrs = AttributeSet::from_node(node);

        let kind = match name {
            "g" => ElementKind::Group,
            "path" => {
                let d = attrs.required("d")?;
                let (path, instructions) = parse_path(&d)?;
                ElementKind::Path { path, instructions }
            }
            "line" => ElementKind::Line {
                start: Point::new(attrs.number_or("x1", 0.0)?, attrs.number_or("y1", 0.0)?),
                end: Point::new(attrs.number_or("x2", 0.0)?, attrs.number_or("y2", 0.0)?),
            },
            "rect" => {
                let x = attrs.number_or("x", 0.0)?;
                let y = attrs.number_or("y", 0.0)?;
                let width = attrs.required_number("width")?;
                let height = attrs.required_number("height")?;
                let rect = Rect::new(x, y, width, height);
                let (rx, ry) = resolve_corner_radii(&rect, attrs.number("rx")?, attrs.number("ry")?);
                ElementKind::Rect { rect, rx, ry }
            }
            "circle" => ElementKind::Circle {
                center: Point::new(attrs.number_or("cx", 0.0)?, attrs.number_or("cy", 0.0)?),
                radius: attrs.required_number("r")?,
            },
            "ellipse" => ElementKind::Ellipse {
                center: Point::new(attrs.number_or("cx", 0.0)?, attrs.number_or("cy", 0.0)?),
                rx: attrs.required_number("rx")?,
                ry: attrs.required_number("ry")?,
            },
            "polygon" => ElementKind::Polygon {
                points: parse_points(&attrs.required("points")?)?,
            },
            "polyline" => ElementKind::Polyline {
                points: parse_points(&attrs.required("points")?)?,
            },
            "text" => ElementKind::SimpleText {
                spans: Self::process_text(node, &mut attrs, state)?,
            },
            "title" => {
                if let Some(info) = document_info(state) {
                    info.title = Some(text_content(node));
                }
                return Ok(None);
            }
            "desc" => {
                if let Some(info) = document_info(state) {
                    info.description = Some(text_content(node));
                }
                return Ok(None);
            }
            other => {
                state.warn(format!("Unhandled element <{other}>"));
                return Ok(None);
            }
        };

        let id = state.scene.add(Element::new(kind));
        tracing::debug!("Created <{}> element", name);
        if name == "g" {
            Self::process_children(node, id, state)?;
        }
        Self::finish_element(id, &mut attrs, state)?;
        Ok(Some(id))
    }

    /// Style, transform and id handling shared by every element, followed by
    /// leftover-attribute diagnostics.
    fn finish_element(
        id: NodeId,
        attrs: &mut AttributeSet,
        state: &mut State,
    ) -> SvgResult<()> {
        let presentation = parse_presentation_attributes(attrs);
        for problem in presentation.problems {
            state.warn(format!("<{}>: {problem}", attrs.element()));
        }

        let transform = attrs
            .take("transform")
            .map(|value| parse_transform_list(&value))
            .transpose()?;

        let element = &mut state.scene[id];
        element.set_style(presentation.style);
        element.set_text_style(presentation.text_style);
        element.display = presentation.display;
        element.draw_fill = presentation.draw_fill;
        element.draw_stroke = presentation.draw_stroke;
        if let Some(transform) = transform {
            element.set_transform(transform);
        }

        if let Some(user_id) = attrs.take("id") {
            state.scene[id].id = Some(user_id.clone());
            if state.ids.insert(user_id.clone(), id).is_some() {
                state.warn(format!("Duplicate elements with id \"{user_id}\""));
            }
        }

        let remaining = attrs.remaining();
        if !remaining.is_empty() {
            let message = format!(
                "Unhandled attributes on <{}>: {}",
                attrs.element(),
                remaining.join(", ")
            );
            state.warn(message);
        }
        let remaining = attrs.remaining_properties();
        if !remaining.is_empty() {
            let message = format!(
                "Unhandled style properties on <{}>: {}",
                attrs.element(),
                remaining.join(", ")
            );
            state.warn(message);
        }
        Ok(())
    }

    /// Collect the text runs of a `<text>` element.
    ///
    /// Unpositioned content continues the current run; a `<tspan>` with its
    /// own `x` or `y` starts a new one.
    fn process_text(
        node: roxmltree::Node<'_, '_>,
        attrs: &mut AttributeSet,
        state: &mut State,
    ) -> SvgResult<Vec<TextSpan>> {
        let origin = Point::new(attrs.number_or("x", 0.0)?, attrs.number_or("y", 0.0)?);
        let mut spans = Vec::new();
        let mut current = TextSpan {
            text: String::new(),
            origin,
        };

        for child in node.children() {
            if child.is_text() {
                current.text.push_str(&collapse_whitespace(child.text().unwrap_or_default()));
            } else if child.is_element() && child.tag_name().name() == "tspan" {
                let mut span_attrs = AttributeSet::from_node(child);
                let x = span_attrs.number("x")?;
                let y = span_attrs.number("y")?;
                if x.is_some() || y.is_some() {
                    let origin = Point::new(
                        x.unwrap_or(current.origin.x),
                        y.unwrap_or(current.origin.y),
                    );
                    let finished = std::mem::replace(
                        &mut current,
                        TextSpan {
                            text: String::new(),
                            origin,
                        },
                    );
                    push_span(&mut spans, finished);
                }
                current.text.push_str(&collapse_whitespace(&text_content(child)));
                let remaining = span_attrs.remaining();
                if !remaining.is_empty() {
                    state.warn(format!(
                        "Unhandled attributes on <tspan>: {}",
                        remaining.join(", ")
                    ));
                }
            } else if child.is_element() {
                state.warn(format!(
                    "Unhandled element <{}> inside <text>",
                    child.tag_name().name()
                ));
            }
        }
        push_span(&mut spans, current);
        Ok(spans)
    }
}

fn document_info(state: &mut State) -> Option<&mut DocumentInfo> {
    let document = state.document?;
    match &mut state.scene[document].kind {
        ElementKind::Document(info) => Some(info),
        _ => None,
    }
}

fn push_span(spans: &mut Vec<TextSpan>, mut span: TextSpan) {
    let trimmed = span.text.trim();
    if !trimmed.is_empty() {
        span.text = trimmed.to_string();
        spans.push(span);
    }
}

/// All text below `node`, trimmed.
fn text_content(node: roxmltree::Node<'_, '_>) -> String {
    node.descendants()
        .filter(roxmltree::Node::is_text)
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Parse a `points` list into pairs.
///
/// # Errors
///
/// Returns [`SvgError::InvalidNumber`] for a token that is not a number and
/// [`SvgError::MalformedXml`] for an odd number of values.
pub fn parse_points(value: &str) -> SvgResult<Vec<Point>> {
    let numbers = number_list(value).ok_or_else(|| SvgError::InvalidNumber {
        attribute: "points".to_string(),
        value: value.to_string(),
    })?;
    if numbers.len() % 2 != 0 {
        return Err(SvgError::MalformedXml(format!(
            "points list has an odd number of values: \"{value}\""
        )));
    }
    Ok(numbers
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect())
}

/// Root geometry is informational, so bad values are diagnostics.
fn lenient_number(attrs: &mut AttributeSet, name: &str, state: &mut State) -> Option<f64> {
    let value = attrs.take(name)?;
    let number = parse_length(&value);
    if number.is_none() {
        state.warn(format!("Ignoring <svg> {name}=\"{value}\""));
    }
    number
}
