//! Scene elements - the nodes of a parsed document.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Point, Rect, Size};
use crate::path::{line_path, oval_path, polygon_path, rounded_rect_path, Path, PathInstruction};
use crate::style::{Style, TextStyle};
use crate::transform::Transform;

/// Process-unique identity of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of an element in its [`Scene`](crate::Scene) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// SVG conformance profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// SVG Full.
    Full,
    /// SVG Tiny.
    Tiny,
    /// SVG Basic.
    Basic,
}

/// SVG language version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Major number.
    pub major: u32,
    /// Minor number.
    pub minor: u32,
}

/// Metadata carried by the document root.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Profile, only known for version 1.1.
    pub profile: Option<Profile>,
    /// Version, only known for 1.1.
    pub version: Option<Version>,
    /// Explicit or synthesized view box.
    pub view_box: Option<Rect>,
    /// `width`/`height` of the root element.
    pub size: Option<Size>,
    /// Contents of `<title>`.
    pub title: Option<String>,
    /// Contents of `<desc>`.
    pub description: Option<String>,
}

/// One run of text drawn at a single origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// The characters.
    pub text: String,
    /// Baseline origin.
    pub origin: Point,
}

/// The variant-specific content of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ElementKind {
    /// The document root.
    Document(DocumentInfo),

    /// A `<g>` container.
    Group,

    /// A `<path>`.
    Path {
        /// Geometry.
        path: Path,
        /// Structured instructions, parallel to `path`.
        instructions: Vec<PathInstruction>,
    },

    /// A `<line>`.
    Line {
        /// First endpoint.
        start: Point,
        /// Second endpoint.
        end: Point,
    },

    /// A `<rect>`, radii already resolved and clamped.
    Rect {
        /// Box.
        rect: Rect,
        /// Horizontal corner radius.
        rx: f64,
        /// Vertical corner radius.
        ry: f64,
    },

    /// An `<ellipse>`.
    Ellipse {
        /// Center.
        center: Point,
        /// Horizontal radius.
        rx: f64,
        /// Vertical radius.
        ry: f64,
    },

    /// A `<circle>`.
    Circle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
    },

    /// A closed `<polygon>`.
    Polygon {
        /// Vertices.
        points: Vec<Point>,
    },

    /// An open `<polyline>`.
    Polyline {
        /// Vertices.
        points: Vec<Point>,
    },

    /// A single-line `<text>`.
    SimpleText {
        /// Text runs.
        spans: Vec<TextSpan>,
    },
}

impl ElementKind {
    /// True for the kinds that own children.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Document(_) | Self::Group)
    }

    /// The source tag this kind is built from.
    #[must_use]
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::Document(_) => "svg",
            Self::Group => "g",
            Self::Path { .. } => "path",
            Self::Line { .. } => "line",
            Self::Rect { .. } => "rect",
            Self::Ellipse { .. } => "ellipse",
            Self::Circle { .. } => "circle",
            Self::Polygon { .. } => "polygon",
            Self::Polyline { .. } => "polyline",
            Self::SimpleText { .. } => "text",
        }
    }

    /// Bounding box of an ellipse or circle.
    #[must_use]
    pub fn oval_rect(&self) -> Option<Rect> {
        match *self {
            Self::Ellipse { center, rx, ry } => {
                Some(Rect::new(center.x - rx, center.y - ry, rx * 2.0, ry * 2.0))
            }
            Self::Circle { center, radius } => Some(Rect::new(
                center.x - radius,
                center.y - radius,
                radius * 2.0,
                radius * 2.0,
            )),
            _ => None,
        }
    }

    /// The element's own geometry as a path, `None` for containers and text.
    #[must_use]
    pub fn to_path(&self) -> Option<Path> {
        match self {
            Self::Path { path, .. } => Some(path.clone()),
            Self::Line { start, end } => Some(line_path(*start, *end)),
            Self::Rect { rect, rx, ry } => Some(rounded_rect_path(rect, Some(*rx), Some(*ry))),
            Self::Ellipse { .. } | Self::Circle { .. } => self.oval_rect().map(|r| oval_path(&r)),
            Self::Polygon { points } => Some(polygon_path(points, true)),
            Self::Polyline { points } => Some(polygon_path(points, false)),
            Self::Document(_) | Self::Group | Self::SimpleText { .. } => None,
        }
    }
}

/// A node of the scene tree.
///
/// Elements compare equal only when they are the same element: two
/// structurally identical paths are still distinct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    /// Process-unique identity.
    pub uid: ElementId,
    /// User-supplied `id` attribute.
    pub id: Option<String>,
    /// Variant content.
    pub kind: ElementKind,
    /// Own style; `None` inherits everything.
    pub style: Option<Style>,
    /// Own font properties.
    pub text_style: Option<TextStyle>,
    /// Own transform; `None` is the identity.
    pub transform: Option<Transform>,
    /// False suppresses the element and its subtree from output.
    pub display: bool,
    /// False after an explicit `fill="none"`.
    pub draw_fill: bool,
    /// False after an explicit `stroke="none"`.
    pub draw_stroke: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Element {
    /// Create a detached element with default flags.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            uid: ElementId::new(),
            id: None,
            kind,
            style: None,
            text_style: None,
            transform: None,
            display: true,
            draw_fill: true,
            draw_stroke: true,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Set the style; an empty style is stored as `None`.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.set_style(style);
        self
    }

    /// Set the transform; an identity transform is stored as `None`.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.set_transform(transform);
        self
    }

    /// Set the user `id`.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Replace the own style, normalizing empty to `None`.
    pub fn set_style(&mut self, style: Style) {
        self.style = (!style.is_empty()).then_some(style);
    }

    /// Replace the own text style, normalizing empty to `None`.
    pub fn set_text_style(&mut self, text_style: TextStyle) {
        self.text_style = (!text_style.is_empty()).then_some(text_style);
    }

    /// Replace the own transform, normalizing identity to `None`.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = (!transform.is_identity()).then_some(transform);
    }

    /// The containing element, `None` for a root or detached element.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in drawing order; always empty for non-containers.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// True for documents and groups.
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for Element {}
