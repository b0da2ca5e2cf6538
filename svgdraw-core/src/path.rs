//! Path geometry and the path-data (`d` attribute) grammar.
//!
//! A [`Path`] holds absolute segments. The structured instruction list that
//! accompanies it is always derived from the same segments, so the two views
//! cannot disagree.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::transform::AffineTransform;
use crate::{SvgError, SvgResult};

/// Control-point distance for a quarter ellipse drawn with one cubic curve.
const KAPPA: f64 = 0.552_284_749_8;

/// One absolute path segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PathSegment {
    /// Begin a new subpath.
    MoveTo(Point),
    /// Straight line to a point.
    LineTo(Point),
    /// Quadratic Bézier curve.
    QuadTo {
        /// Control point.
        control: Point,
        /// End point.
        to: Point,
    },
    /// Cubic Bézier curve.
    CubicTo {
        /// First control point.
        control1: Point,
        /// Second control point.
        control2: Point,
        /// End point.
        to: Point,
    },
    /// Close the current subpath.
    Close,
}

impl PathSegment {
    /// End point of the segment, `None` for [`PathSegment::Close`].
    #[must_use]
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) => Some(p),
            Self::QuadTo { to, .. } | Self::CubicTo { to, .. } => Some(to),
            Self::Close => None,
        }
    }

    fn points(&self) -> Vec<Point> {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) => vec![p],
            Self::QuadTo { control, to } => vec![control, to],
            Self::CubicTo {
                control1,
                control2,
                to,
            } => vec![control1, control2, to],
            Self::Close => Vec::new(),
        }
    }

    fn map(&self, m: &AffineTransform) -> Self {
        match *self {
            Self::MoveTo(p) => Self::MoveTo(m.apply(p)),
            Self::LineTo(p) => Self::LineTo(m.apply(p)),
            Self::QuadTo { control, to } => Self::QuadTo {
                control: m.apply(control),
                to: m.apply(to),
            },
            Self::CubicTo {
                control1,
                control2,
                to,
            } => Self::CubicTo {
                control1: m.apply(control1),
                control2: m.apply(control2),
                to: m.apply(to),
            },
            Self::Close => Self::Close,
        }
    }
}

/// Renderer-agnostic path: an ordered list of absolute segments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Create an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a path from existing segments.
    #[must_use]
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// The segments in drawing order.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// True when the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Begin a subpath.
    pub fn move_to(&mut self, p: Point) {
        self.segments.push(PathSegment::MoveTo(p));
    }

    /// Add a line.
    pub fn line_to(&mut self, p: Point) {
        self.segments.push(PathSegment::LineTo(p));
    }

    /// Add a quadratic curve.
    pub fn quad_to(&mut self, control: Point, to: Point) {
        self.segments.push(PathSegment::QuadTo { control, to });
    }

    /// Add a cubic curve.
    pub fn cubic_to(&mut self, control1: Point, control2: Point, to: Point) {
        self.segments.push(PathSegment::CubicTo {
            control1,
            control2,
            to,
        });
    }

    /// Close the current subpath.
    pub fn close(&mut self) {
        self.segments.push(PathSegment::Close);
    }

    /// Append all of `other`'s segments after this path's.
    pub fn append(&mut self, other: &Self) {
        self.segments.extend_from_slice(&other.segments);
    }

    /// The first point of the path.
    #[must_use]
    pub fn start_point(&self) -> Option<Point> {
        self.segments.iter().find_map(PathSegment::end_point)
    }

    /// The pen position after the last segment.
    #[must_use]
    pub fn current_point(&self) -> Option<Point> {
        let mut current = None;
        let mut subpath_start = None;
        for segment in &self.segments {
            match segment {
                PathSegment::MoveTo(p) => {
                    subpath_start = Some(*p);
                    current = Some(*p);
                }
                PathSegment::Close => current = subpath_start,
                other => current = other.end_point(),
            }
        }
        current
    }

    /// Bounds of all vertices and control points.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rect> {
        Rect::bounding(self.segments.iter().flat_map(PathSegment::points))
    }

    /// A copy of the path with every point mapped through `m`.
    #[must_use]
    pub fn transformed(&self, m: &AffineTransform) -> Self {
        Self {
            segments: self.segments.iter().map(|s| s.map(m)).collect(),
        }
    }

    /// The structured instruction list describing this path.
    #[must_use]
    pub fn instructions(&self) -> Vec<PathInstruction> {
        self.segments.iter().map(PathInstruction::from).collect()
    }

    /// Serialize as absolute `M`/`L`/`Q`/`C`/`Z` path data.
    #[must_use]
    pub fn to_svg_data(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if !out.is_empty() {
                out.push(' ');
            }
            // Writing into a String cannot fail.
            let _ = match *segment {
                PathSegment::MoveTo(p) => write!(out, "M{} {}", p.x, p.y),
                PathSegment::LineTo(p) => write!(out, "L{} {}", p.x, p.y),
                PathSegment::QuadTo { control, to } => {
                    write!(out, "Q{} {} {} {}", control.x, control.y, to.x, to.y)
                }
                PathSegment::CubicTo {
                    control1,
                    control2,
                    to,
                } => write!(
                    out,
                    "C{} {} {} {} {} {}",
                    control1.x, control1.y, control2.x, control2.y, to.x, to.y
                ),
                PathSegment::Close => write!(out, "Z"),
            };
        }
        out
    }
}

/// Kind tag of a [`PathInstruction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathInstructionKind {
    /// Begin a subpath.
    MoveTo,
    /// Straight line.
    Line,
    /// Quadratic curve.
    QuadraticCurve,
    /// Cubic curve.
    CubicCurve,
    /// Close the subpath.
    CloseSubPath,
    /// Whole rectangle.
    Rectangle,
    /// Whole ellipse inscribed in a rectangle.
    Oval,
}

/// One structured path instruction as it appears in the drawing document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathInstruction {
    /// Instruction kind.
    pub element_type: PathInstructionKind,
    /// End point of the segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_point: Option<Point>,
    /// First (or only) control point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_point1: Option<Point>,
    /// Second control point of a cubic curve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_point2: Option<Point>,
    /// Rectangle for rectangle and oval instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
}

impl PathInstruction {
    fn bare(element_type: PathInstructionKind) -> Self {
        Self {
            element_type,
            end_point: None,
            control_point1: None,
            control_point2: None,
            rect: None,
        }
    }

    /// A rectangle instruction.
    #[must_use]
    pub fn rectangle(rect: Rect) -> Self {
        Self {
            rect: Some(rect),
            ..Self::bare(PathInstructionKind::Rectangle)
        }
    }

    /// An oval instruction.
    #[must_use]
    pub fn oval(rect: Rect) -> Self {
        Self {
            rect: Some(rect),
            ..Self::bare(PathInstructionKind::Oval)
        }
    }
}

impl From<&PathSegment> for PathInstruction {
    fn from(segment: &PathSegment) -> Self {
        match *segment {
            PathSegment::MoveTo(p) => Self {
                end_point: Some(p),
                ..Self::bare(PathInstructionKind::MoveTo)
            },
            PathSegment::LineTo(p) => Self {
                end_point: Some(p),
                ..Self::bare(PathInstructionKind::Line)
            },
            PathSegment::QuadTo { control, to } => Self {
                end_point: Some(to),
                control_point1: Some(control),
                ..Self::bare(PathInstructionKind::QuadraticCurve)
            },
            PathSegment::CubicTo {
                control1,
                control2,
                to,
            } => Self {
                end_point: Some(to),
                control_point1: Some(control1),
                control_point2: Some(control2),
                ..Self::bare(PathInstructionKind::CubicCurve)
            },
            PathSegment::Close => Self::bare(PathInstructionKind::CloseSubPath),
        }
    }
}

/// Parse path data into a path and its instruction list.
///
/// Tokens come from [`svgtypes::PathParser`]; relative coordinates, smooth
/// curve reflection, subpath restarts after closepath and arcs are resolved
/// here into absolute segments.
///
/// # Errors
///
/// Returns [`SvgError::MalformedPathData`] when the data does not start with
/// a moveto, has coordinates without a command, uses an unknown command
/// letter, ends inside a coordinate group, or has an invalid arc flag.
pub fn parse_path(d: &str) -> SvgResult<(Path, Vec<PathInstruction>)> {
    let mut builder = PathBuilder::new();
    for segment in svgtypes::PathParser::from(d) {
        let segment =
            segment.map_err(|e| SvgError::MalformedPathData(format!("{e} in \"{d}\"")))?;
        builder.push(segment);
    }
    let path = builder.path;
    let instructions = path.instructions();
    tracing::trace!(
        "Parsed path data into {} segments",
        instructions.len()
    );
    Ok((path, instructions))
}

struct PathBuilder {
    path: Path,
    current: Point,
    subpath_start: Point,
    last_cubic_control: Option<Point>,
    last_quad_control: Option<Point>,
    needs_move: bool,
}

impl PathBuilder {
    fn new() -> Self {
        Self {
            path: Path::new(),
            current: Point::ZERO,
            subpath_start: Point::ZERO,
            last_cubic_control: None,
            last_quad_control: None,
            needs_move: false,
        }
    }

    fn push(&mut self, segment: svgtypes::PathSegment) {
        use svgtypes::PathSegment as Segment;

        match segment {
            Segment::MoveTo { abs, x, y } => {
                let to = self.resolve(abs, x, y);
                self.path.move_to(to);
                self.subpath_start = to;
                self.needs_move = false;
                self.finish(to, None, None);
            }
            Segment::LineTo { abs, x, y } => {
                let to = self.resolve(abs, x, y);
                self.line_to(to);
            }
            Segment::HorizontalLineTo { abs, x } => {
                let x = if abs { x } else { self.current.x + x };
                self.line_to(Point::new(x, self.current.y));
            }
            Segment::VerticalLineTo { abs, y } => {
                let y = if abs { y } else { self.current.y + y };
                self.line_to(Point::new(self.current.x, y));
            }
            Segment::CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let control1 = self.resolve(abs, x1, y1);
                let control2 = self.resolve(abs, x2, y2);
                let to = self.resolve(abs, x, y);
                self.cubic_to(control1, control2, to);
            }
            Segment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let control1 = self
                    .last_cubic_control
                    .map_or(self.current, |c| c.reflected_about(self.current));
                let control2 = self.resolve(abs, x2, y2);
                let to = self.resolve(abs, x, y);
                self.cubic_to(control1, control2, to);
            }
            Segment::Quadratic { abs, x1, y1, x, y } => {
                let control = self.resolve(abs, x1, y1);
                let to = self.resolve(abs, x, y);
                self.quad_to(control, to);
            }
            Segment::SmoothQuadratic { abs, x, y } => {
                let control = self
                    .last_quad_control
                    .map_or(self.current, |c| c.reflected_about(self.current));
                let to = self.resolve(abs, x, y);
                self.quad_to(control, to);
            }
            Segment::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let to = self.resolve(abs, x, y);
                self.ensure_subpath();
                let arc = Arc {
                    from: self.current,
                    radii: (rx, ry),
                    rotation: x_axis_rotation,
                    large_arc,
                    sweep,
                    to,
                };
                arc.append_to(&mut self.path);
                self.finish(to, None, None);
            }
            Segment::ClosePath { .. } => {
                self.path.close();
                self.needs_move = true;
                self.finish(self.subpath_start, None, None);
            }
        }
    }

    /// Absolute point for a coordinate pair of an absolute or relative command.
    fn resolve(&self, absolute: bool, x: f64, y: f64) -> Point {
        if absolute {
            Point::new(x, y)
        } else {
            Point::new(self.current.x + x, self.current.y + y)
        }
    }

    fn line_to(&mut self, to: Point) {
        self.ensure_subpath();
        self.path.line_to(to);
        self.finish(to, None, None);
    }

    fn quad_to(&mut self, control: Point, to: Point) {
        self.ensure_subpath();
        self.path.quad_to(control, to);
        self.finish(to, None, Some(control));
    }

    fn cubic_to(&mut self, control1: Point, control2: Point, to: Point) {
        self.ensure_subpath();
        self.path.cubic_to(control1, control2, to);
        self.finish(to, Some(control2), None);
    }

    /// A drawing command after closepath starts a new subpath at the old start.
    fn ensure_subpath(&mut self) {
        if self.needs_move {
            self.path.move_to(self.subpath_start);
            self.needs_move = false;
        }
    }

    fn finish(&mut self, to: Point, cubic: Option<Point>, quad: Option<Point>) {
        self.current = to;
        self.last_cubic_control = cubic;
        self.last_quad_control = quad;
    }
}

/// An elliptical arc in endpoint parameterization.
struct Arc {
    from: Point,
    radii: (f64, f64),
    rotation: f64,
    large_arc: bool,
    sweep: bool,
    to: Point,
}

impl Arc {
    /// Append the arc as at most 90° cubic pieces.
    fn append_to(&self, path: &mut Path) {
        if self.from == self.to {
            return;
        }
        let (mut rx, mut ry) = (self.radii.0.abs(), self.radii.1.abs());
        if rx == 0.0 || ry == 0.0 {
            path.line_to(self.to);
            return;
        }

        let (sin_phi, cos_phi) = self.rotation.to_radians().sin_cos();
        let dx2 = (self.from.x - self.to.x) / 2.0;
        let dy2 = (self.from.y - self.to.y) / 2.0;
        let x1p = cos_phi * dx2 + sin_phi * dy2;
        let y1p = -sin_phi * dx2 + cos_phi * dy2;

        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let scale = lambda.sqrt();
            rx *= scale;
            ry *= scale;
        }

        let numerator = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
        let denominator = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
        let sign = if self.large_arc == self.sweep { -1.0 } else { 1.0 };
        let coefficient = sign * (numerator / denominator).max(0.0).sqrt();
        let cxp = coefficient * rx * y1p / ry;
        let cyp = -coefficient * ry * x1p / rx;
        let center = Point::new(
            cos_phi * cxp - sin_phi * cyp + (self.from.x + self.to.x) / 2.0,
            sin_phi * cxp + cos_phi * cyp + (self.from.y + self.to.y) / 2.0,
        );

        let start_angle = vector_angle((1.0, 0.0), ((x1p - cxp) / rx, (y1p - cyp) / ry));
        let mut sweep_angle = vector_angle(
            ((x1p - cxp) / rx, (y1p - cyp) / ry),
            ((-x1p - cxp) / rx, (-y1p - cyp) / ry),
        );
        if !self.sweep && sweep_angle > 0.0 {
            sweep_angle -= TAU;
        } else if self.sweep && sweep_angle < 0.0 {
            sweep_angle += TAU;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pieces = ((sweep_angle.abs() / FRAC_PI_2).ceil() as usize).max(1);
        #[allow(clippy::cast_precision_loss)]
        let step = sweep_angle / pieces as f64;
        let handle = 4.0 / 3.0 * (step / 4.0).tan();

        let at = |angle: f64| {
            let (sin, cos) = angle.sin_cos();
            Point::new(
                center.x + rx * cos * cos_phi - ry * sin * sin_phi,
                center.y + rx * cos * sin_phi + ry * sin * cos_phi,
            )
        };
        let derivative = |angle: f64| {
            let (sin, cos) = angle.sin_cos();
            (
                -rx * sin * cos_phi - ry * cos * sin_phi,
                -rx * sin * sin_phi + ry * cos * cos_phi,
            )
        };

        let mut angle = start_angle;
        let mut from = self.from;
        for piece in 0..pieces {
            let next = angle + step;
            let end = if piece + 1 == pieces { self.to } else { at(next) };
            let (d1x, d1y) = derivative(angle);
            let (d2x, d2y) = derivative(next);
            path.cubic_to(
                Point::new(from.x + handle * d1x, from.y + handle * d1y),
                Point::new(end.x - handle * d2x, end.y - handle * d2y),
                end,
            );
            from = end;
            angle = next;
        }
    }
}

fn vector_angle(u: (f64, f64), v: (f64, f64)) -> f64 {
    (u.0 * v.1 - u.1 * v.0).atan2(u.0 * v.0 + u.1 * v.1)
}

/// Corner radii for a rounded rectangle.
///
/// A missing radius copies the supplied one; both are then clamped to half
/// the corresponding side. Negative radii count as zero.
#[must_use]
pub fn resolve_corner_radii(rect: &Rect, rx: Option<f64>, ry: Option<f64>) -> (f64, f64) {
    let (rx, ry) = match (rx, ry) {
        (Some(rx), Some(ry)) => (rx, ry),
        (Some(r), None) | (None, Some(r)) => (r, r),
        (None, None) => (0.0, 0.0),
    };
    (
        rx.max(0.0).min(rect.size.width / 2.0),
        ry.max(0.0).min(rect.size.height / 2.0),
    )
}

/// A rectangle with quadratic-curve corners.
///
/// With non-zero radii the path is a move followed by four line/curve pairs
/// and a close. Zero radii give a plain four-sided path.
#[must_use]
pub fn rounded_rect_path(rect: &Rect, rx: Option<f64>, ry: Option<f64>) -> Path {
    let (rx, ry) = resolve_corner_radii(rect, rx, ry);
    let (x0, y0, x1, y1) = (rect.min_x(), rect.min_y(), rect.max_x(), rect.max_y());
    let mut path = Path::new();

    if rx == 0.0 || ry == 0.0 {
        path.move_to(Point::new(x0, y0));
        path.line_to(Point::new(x1, y0));
        path.line_to(Point::new(x1, y1));
        path.line_to(Point::new(x0, y1));
        path.close();
        return path;
    }

    path.move_to(Point::new(x0 + rx, y0));
    path.line_to(Point::new(x1 - rx, y0));
    path.quad_to(Point::new(x1, y0), Point::new(x1, y0 + ry));
    path.line_to(Point::new(x1, y1 - ry));
    path.quad_to(Point::new(x1, y1), Point::new(x1 - rx, y1));
    path.line_to(Point::new(x0 + rx, y1));
    path.quad_to(Point::new(x0, y1), Point::new(x0, y1 - ry));
    path.line_to(Point::new(x0, y0 + ry));
    path.quad_to(Point::new(x0, y0), Point::new(x0 + rx, y0));
    path.close();
    path
}

/// An ellipse inscribed in `rect`, as four cubic curves.
#[must_use]
pub fn oval_path(rect: &Rect) -> Path {
    let c = rect.center();
    let (rx, ry) = (rect.size.width / 2.0, rect.size.height / 2.0);
    let (kx, ky) = (rx * KAPPA, ry * KAPPA);
    let mut path = Path::new();
    path.move_to(Point::new(c.x + rx, c.y));
    path.cubic_to(
        Point::new(c.x + rx, c.y + ky),
        Point::new(c.x + kx, c.y + ry),
        Point::new(c.x, c.y + ry),
    );
    path.cubic_to(
        Point::new(c.x - kx, c.y + ry),
        Point::new(c.x - rx, c.y + ky),
        Point::new(c.x - rx, c.y),
    );
    path.cubic_to(
        Point::new(c.x - rx, c.y - ky),
        Point::new(c.x - kx, c.y - ry),
        Point::new(c.x, c.y - ry),
    );
    path.cubic_to(
        Point::new(c.x + kx, c.y - ry),
        Point::new(c.x + rx, c.y - ky),
        Point::new(c.x + rx, c.y),
    );
    path.close();
    path
}

/// A path through `points`, closed for polygons and open for polylines.
#[must_use]
pub fn polygon_path(points: &[Point], close: bool) -> Path {
    let mut path = Path::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
        if close {
            path.close();
        }
    }
    path
}

/// A single straight line.
#[must_use]
pub fn line_path(start: Point, end: Point) -> Path {
    let mut path = Path::new();
    path.move_to(start);
    path.line_to(end);
    path
}
