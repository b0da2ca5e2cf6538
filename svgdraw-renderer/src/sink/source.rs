//! A sink that emits Core Graphics C source for the drawing calls.

use std::fmt::{self, Write};

use svgdraw_core::{AffineTransform, Color, Path, PathSegment, Style};

use super::{GraphicsState, PathDrawingMode, RenderSink};
use crate::{RenderError, RenderResult};

/// Accumulates one line of C per drawing call, against a `CGContextRef`
/// named `context`.
#[derive(Debug, Clone, Default)]
pub struct SourceCodeSink {
    source: String,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl SourceCodeSink {
    /// Create an empty emitter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Source emitted so far.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Consume the emitter, returning its source.
    #[must_use]
    pub fn into_source(self) -> String {
        self.source
    }

    fn emit(&mut self, line: fmt::Arguments<'_>) -> RenderResult<()> {
        writeln!(self.source, "{line}").map_err(|e| RenderError::Sink(e.to_string()))
    }

    fn emit_color(&mut self, function: &str, color: Color) -> RenderResult<()> {
        self.emit(format_args!(
            "{function}(context, {}, {}, {}, {});",
            color.red, color.green, color.blue, color.alpha
        ))
    }
}

impl RenderSink for SourceCodeSink {
    fn concat_transform(&mut self, transform: &AffineTransform) -> RenderResult<()> {
        self.state.concat(transform);
        let AffineTransform { a, b, c, d, tx, ty } = *transform;
        self.emit(format_args!(
            "CGContextConcatCTM(context, CGAffineTransformMake({a}, {b}, {c}, {d}, {tx}, {ty}));"
        ))
    }

    fn push_graphics_state(&mut self) -> RenderResult<()> {
        self.saved.push(self.state.clone());
        self.emit(format_args!("CGContextSaveGState(context);"))
    }

    fn restore_graphics_state(&mut self) -> RenderResult<()> {
        self.state = self.saved.pop().ok_or_else(|| {
            RenderError::Sink("restore_graphics_state without a matching push".to_string())
        })?;
        self.emit(format_args!("CGContextRestoreGState(context);"))
    }

    fn add_path(&mut self, path: &Path) -> RenderResult<()> {
        self.emit(format_args!("path = CGPathCreateMutable();"))?;
        for segment in path.segments() {
            match *segment {
                PathSegment::MoveTo(p) => {
                    self.emit(format_args!("CGPathMoveToPoint(path, NULL, {}, {});", p.x, p.y))?;
                }
                PathSegment::LineTo(p) => {
                    self.emit(format_args!(
                        "CGPathAddLineToPoint(path, NULL, {}, {});",
                        p.x, p.y
                    ))?;
                }
                PathSegment::QuadTo { control, to } => {
                    self.emit(format_args!(
                        "CGPathAddQuadCurveToPoint(path, NULL, {}, {}, {}, {});",
                        control.x, control.y, to.x, to.y
                    ))?;
                }
                PathSegment::CubicTo {
                    control1,
                    control2,
                    to,
                } => {
                    self.emit(format_args!(
                        "CGPathAddCurveToPoint(path, NULL, {}, {}, {}, {}, {}, {});",
                        control1.x, control1.y, control2.x, control2.y, to.x, to.y
                    ))?;
                }
                PathSegment::Close => self.emit(format_args!("CGPathCloseSubpath(path);"))?,
            }
        }
        self.emit(format_args!("CGContextAddPath(context, path);"))?;
        self.emit(format_args!("CGPathRelease(path);"))
    }

    fn draw_path(&mut self, mode: PathDrawingMode) -> RenderResult<()> {
        let mode = match mode {
            PathDrawingMode::Fill => "kCGPathFill",
            PathDrawingMode::Stroke => "kCGPathStroke",
            PathDrawingMode::FillStroke => "kCGPathFillStroke",
        };
        self.emit(format_args!("CGContextDrawPath(context, {mode});"))
    }

    fn fill_path(&mut self) -> RenderResult<()> {
        self.emit(format_args!("CGContextFillPath(context);"))
    }

    // Clearing a color has no CG call; only the tracked state changes.
    fn set_fill_color(&mut self, color: Option<Color>) -> RenderResult<()> {
        self.state.fill_color = color;
        match color {
            Some(c) => self.emit_color("CGContextSetRGBFillColor", c),
            None => Ok(()),
        }
    }

    fn set_stroke_color(&mut self, color: Option<Color>) -> RenderResult<()> {
        self.state.stroke_color = color;
        match color {
            Some(c) => self.emit_color("CGContextSetRGBStrokeColor", c),
            None => Ok(()),
        }
    }

    fn set_style(&mut self, style: &Style) -> RenderResult<()> {
        self.state.apply_style(style);
        if let Some(c) = style.fill_color {
            self.emit_color("CGContextSetRGBFillColor", c)?;
        }
        if let Some(c) = style.stroke_color {
            self.emit_color("CGContextSetRGBStrokeColor", c)?;
        }
        if let Some(width) = style.line_width {
            self.emit(format_args!("CGContextSetLineWidth(context, {width});"))?;
        }
        if let Some(cap) = style.line_cap {
            self.emit(format_args!("CGContextSetLineCap(context, kCGLineCap{cap:?});"))?;
        }
        if let Some(join) = style.line_join {
            self.emit(format_args!("CGContextSetLineJoin(context, kCGLineJoin{join:?});"))?;
        }
        if let Some(limit) = style.miter_limit {
            self.emit(format_args!("CGContextSetMiterLimit(context, {limit});"))?;
        }
        if let Some(lengths) = &style.line_dash {
            let phase = style.line_dash_phase.unwrap_or(0.0);
            let list = lengths
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            self.emit(format_args!(
                "CGContextSetLineDash(context, {phase}, (CGFloat[]){{{list}}}, {});",
                lengths.len()
            ))?;
        }
        if let Some(flatness) = style.flatness {
            self.emit(format_args!("CGContextSetFlatness(context, {flatness});"))?;
        }
        if let Some(alpha) = style.alpha {
            self.emit(format_args!("CGContextSetAlpha(context, {alpha});"))?;
        }
        if let Some(mode) = style.blend_mode {
            self.emit(format_args!("CGContextSetBlendMode(context, kCGBlendMode{mode:?});"))?;
        }
        Ok(())
    }

    fn fill_color(&self) -> Option<Color> {
        self.state.fill_color
    }

    fn stroke_color(&self) -> Option<Color> {
        self.state.stroke_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgdraw_core::{line_path, BlendMode, LineCap, Point};

    #[test]
    fn test_path_source() {
        let mut sink = SourceCodeSink::new();
        sink.add_path(&line_path(Point::new(0.0, 0.0), Point::new(1.5, 2.0)))
            .expect("add");
        sink.draw_path(PathDrawingMode::Stroke).expect("draw");
        assert_eq!(
            sink.source(),
            "path = CGPathCreateMutable();\n\
             CGPathMoveToPoint(path, NULL, 0, 0);\n\
             CGPathAddLineToPoint(path, NULL, 1.5, 2);\n\
             CGContextAddPath(context, path);\n\
             CGPathRelease(path);\n\
             CGContextDrawPath(context, kCGPathStroke);\n"
        );
    }

    #[test]
    fn test_style_source() {
        let mut sink = SourceCodeSink::new();
        sink.set_style(&Style {
            stroke_color: Some(Color::rgb(1.0, 0.0, 0.0)),
            line_cap: Some(LineCap::Round),
            line_dash: Some(vec![2.0, 1.0]),
            blend_mode: Some(BlendMode::ColorDodge),
            ..Style::default()
        })
        .expect("style");
        assert_eq!(
            sink.source(),
            "CGContextSetRGBStrokeColor(context, 1, 0, 0, 1);\n\
             CGContextSetLineCap(context, kCGLineCapRound);\n\
             CGContextSetLineDash(context, 0, (CGFloat[]){2, 1}, 2);\n\
             CGContextSetBlendMode(context, kCGBlendModeColorDodge);\n"
        );
        assert_eq!(sink.stroke_color(), Some(Color::rgb(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_transform_and_state_source() {
        let mut sink = SourceCodeSink::new();
        sink.push_graphics_state().expect("push");
        sink.concat_transform(&AffineTransform::scale(2.0, 3.0))
            .expect("concat");
        sink.set_fill_color(None).expect("clear");
        sink.fill_path().expect("fill");
        sink.restore_graphics_state().expect("restore");
        assert_eq!(
            sink.into_source(),
            "CGContextSaveGState(context);\n\
             CGContextConcatCTM(context, CGAffineTransformMake(2, 0, 0, 3, 0, 0));\n\
             CGContextFillPath(context);\n\
             CGContextRestoreGState(context);\n"
        );
    }
}
