//! Render sinks and the tree walker that drives them.
//!
//! A [`RenderSink`] is anything that accepts Core Graphics-like drawing
//! calls. [`SceneRenderer`] walks a scene and issues those calls, so an
//! on-screen context, a source-code emitter and a structured recorder all
//! share the same traversal.

pub mod recording;
pub mod source;

pub use recording::{RecordingSink, SinkCommand};
pub use source::SourceCodeSink;

use serde::{Deserialize, Serialize};
use svgdraw_core::{AffineTransform, Color, Element, NodeId, Path, Scene, Style};

use crate::RenderResult;

/// How an added path is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathDrawingMode {
    /// Fill the interior.
    Fill,
    /// Stroke the outline.
    Stroke,
    /// Fill, then stroke.
    FillStroke,
}

impl PathDrawingMode {
    /// The mode implied by the current paint, `None` when neither is set.
    #[must_use]
    pub fn from_colors(fill: Option<Color>, stroke: Option<Color>) -> Option<Self> {
        match (fill.is_some(), stroke.is_some()) {
            (true, true) => Some(Self::FillStroke),
            (true, false) => Some(Self::Fill),
            (false, true) => Some(Self::Stroke),
            (false, false) => None,
        }
    }
}

/// Trait for drawing targets.
pub trait RenderSink {
    /// Concatenate `transform` onto the current transform; it applies to
    /// points before the existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot accept the call.
    fn concat_transform(&mut self, transform: &AffineTransform) -> RenderResult<()>;

    /// Save the current graphics state.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot accept the call.
    fn push_graphics_state(&mut self) -> RenderResult<()>;

    /// Restore the most recently saved graphics state.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no saved state.
    fn restore_graphics_state(&mut self) -> RenderResult<()>;

    /// Add a path to the current path.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot accept the call.
    fn add_path(&mut self, path: &Path) -> RenderResult<()>;

    /// Paint and clear the current path.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot accept the call.
    fn draw_path(&mut self, mode: PathDrawingMode) -> RenderResult<()>;

    /// Fill and clear the current path.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot accept the call.
    fn fill_path(&mut self) -> RenderResult<()>;

    /// Set or clear the fill color.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot accept the call.
    fn set_fill_color(&mut self, color: Option<Color>) -> RenderResult<()>;

    /// Set or clear the stroke color.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot accept the call.
    fn set_stroke_color(&mut self, color: Option<Color>) -> RenderResult<()>;

    /// Apply every field set in `style`; unset fields keep their value.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot accept the call.
    fn set_style(&mut self, style: &Style) -> RenderResult<()>;

    /// Current fill color.
    fn fill_color(&self) -> Option<Color>;

    /// Current stroke color.
    fn stroke_color(&self) -> Option<Color>;
}

/// Graphics state tracked by the bundled sinks.
///
/// The initial state matches the document defaults: black fill, no stroke,
/// identity transform.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    /// Current transform.
    pub transform: AffineTransform,
    /// Current fill color.
    pub fill_color: Option<Color>,
    /// Current stroke color.
    pub stroke_color: Option<Color>,
    /// Remaining style properties.
    pub style: Style,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            transform: AffineTransform::IDENTITY,
            fill_color: Some(Color::BLACK),
            stroke_color: None,
            style: Style::default(),
        }
    }
}

impl GraphicsState {
    /// Apply the set fields of `style`.
    pub fn apply_style(&mut self, style: &Style) {
        if style.fill_color.is_some() {
            self.fill_color = style.fill_color;
        }
        if style.stroke_color.is_some() {
            self.stroke_color = style.stroke_color;
        }
        self.style = self.style.add(style);
    }

    /// Concatenate `transform` onto the current transform.
    pub fn concat(&mut self, transform: &AffineTransform) {
        self.transform = self.transform.multiply(transform);
    }
}

/// Veto hook called before an element is drawn.
pub type PrerenderFn<'a> = Box<dyn Fn(NodeId, &Element) -> bool + 'a>;

/// Style override hook.
pub type StyleFn<'a> = Box<dyn Fn(NodeId, &Element) -> Option<Style> + 'a>;

/// Optional hooks for [`SceneRenderer`].
#[derive(Default)]
pub struct RenderCallbacks<'a> {
    /// Returning `false` skips the element and its subtree.
    pub prerender: Option<PrerenderFn<'a>>,
    /// Replaces the element's own style when it returns `Some`.
    pub style_for_element: Option<StyleFn<'a>>,
}

/// Walks a scene, issuing drawing calls to a [`RenderSink`].
///
/// Only geometry is drawn. `<text>` elements have no outline path, so they
/// produce graphics-state calls but no `add_path`/`draw_path`; text is
/// carried by the JSON instruction document instead.
pub struct SceneRenderer<'a> {
    scene: &'a Scene,
    callbacks: RenderCallbacks<'a>,
}

impl<'a> SceneRenderer<'a> {
    /// Create a renderer with no callbacks.
    #[must_use]
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            callbacks: RenderCallbacks::default(),
        }
    }

    /// Replace the callbacks.
    #[must_use]
    pub fn with_callbacks(mut self, callbacks: RenderCallbacks<'a>) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Render the whole scene.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by the sink.
    pub fn render(&self, sink: &mut dyn RenderSink) -> RenderResult<()> {
        match self.scene.root() {
            Some(root) => self.render_element(root, sink),
            None => Ok(()),
        }
    }

    /// Render one element and its subtree inside a saved graphics state.
    /// Hidden elements are skipped.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by the sink.
    pub fn render_element(&self, id: NodeId, sink: &mut dyn RenderSink) -> RenderResult<()> {
        let element = &self.scene[id];
        if !element.display {
            tracing::trace!("Skipping hidden <{}>", element.kind.tag_name());
            return Ok(());
        }
        if let Some(prerender) = &self.callbacks.prerender {
            if !prerender(id, element) {
                return Ok(());
            }
        }

        sink.push_graphics_state()?;
        let result = self.render_contents(id, element, sink);
        sink.restore_graphics_state()?;
        result
    }

    fn render_contents(
        &self,
        id: NodeId,
        element: &Element,
        sink: &mut dyn RenderSink,
    ) -> RenderResult<()> {
        if let Some(style) = self.style_for_element(id, element) {
            sink.set_style(&style)?;
        }
        if !element.draw_fill {
            sink.set_fill_color(None)?;
        }
        if !element.draw_stroke {
            sink.set_stroke_color(None)?;
        }
        if let Some(transform) = &element.transform {
            sink.concat_transform(&transform.to_affine())?;
        }

        if element.is_container() {
            for child in self.scene.children(id) {
                self.render_element(*child, sink)?;
            }
            return Ok(());
        }

        let Some(path) = element.kind.to_path() else {
            tracing::trace!("No geometry to draw for <{}>", element.kind.tag_name());
            return Ok(());
        };
        match PathDrawingMode::from_colors(sink.fill_color(), sink.stroke_color()) {
            Some(mode) => {
                sink.add_path(&path)?;
                sink.draw_path(mode)
            }
            None => Ok(()),
        }
    }

    fn style_for_element(&self, id: NodeId, element: &Element) -> Option<Style> {
        self.callbacks
            .style_for_element
            .as_ref()
            .and_then(|style_for| style_for(id, element))
            .or_else(|| element.style.clone())
    }

    /// The union of every path at or below `id`, in the coordinate system
    /// of `id`: descendant transforms are applied, the element's own is not.
    #[must_use]
    pub fn path_for_element(&self, id: NodeId) -> Path {
        let element = &self.scene[id];
        if !element.is_container() {
            return element.kind.to_path().unwrap_or_default();
        }
        let mut path = Path::new();
        for &child in self.scene.children(id) {
            let child_path = self.path_for_element(child);
            match &self.scene[child].transform {
                Some(transform) => path.append(&child_path.transformed(&transform.to_affine())),
                None => path.append(&child_path),
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgdraw_core::SvgProcessor;

    fn scene(svg: &str) -> Scene {
        SvgProcessor::new().parse_str(svg).expect("parse").scene
    }

    #[test]
    fn test_drawing_mode_from_colors() {
        let red = Some(Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(PathDrawingMode::from_colors(red, None), Some(PathDrawingMode::Fill));
        assert_eq!(PathDrawingMode::from_colors(None, red), Some(PathDrawingMode::Stroke));
        assert_eq!(
            PathDrawingMode::from_colors(red, red),
            Some(PathDrawingMode::FillStroke)
        );
        assert_eq!(PathDrawingMode::from_colors(None, None), None);
    }

    #[test]
    fn test_graphics_state_defaults_and_style() {
        let mut state = GraphicsState::default();
        assert_eq!(state.fill_color, Some(Color::BLACK));
        assert_eq!(state.stroke_color, None);

        state.apply_style(&Style {
            stroke_color: Some(Color::rgb(0.0, 0.0, 1.0)),
            line_width: Some(2.0),
            ..Style::default()
        });
        assert_eq!(state.fill_color, Some(Color::BLACK));
        assert_eq!(state.stroke_color, Some(Color::rgb(0.0, 0.0, 1.0)));
        assert_eq!(state.style.line_width, Some(2.0));
    }

    #[test]
    fn test_path_for_element_unions_descendants() {
        let s = scene(r#"<svg><g><path d="M0 0 L1 1"/><line x1="2" x2="3"/></g><circle r="1"/></svg>"#);
        let renderer = SceneRenderer::new(&s);
        let root = s.root().expect("root");
        let group = s.children(root)[0];
        assert_eq!(renderer.path_for_element(group).to_svg_data(), "M0 0 L1 1 M2 0 L3 0");
        // 2 + 2 + 6 segments
        assert_eq!(renderer.path_for_element(root).segments().len(), 10);
    }

    #[test]
    fn test_path_for_element_applies_child_transforms() {
        let s = scene(
            r#"<svg><g transform="scale(3)"><path d="M0 0 L1 1" transform="translate(10 0)"/><path d="M0 0 L1 0"/></g></svg>"#,
        );
        let renderer = SceneRenderer::new(&s);
        let root = s.root().expect("root");
        let group = s.children(root)[0];
        // The group's own scale stays out of its local path.
        assert_eq!(
            renderer.path_for_element(group).to_svg_data(),
            "M10 0 L11 1 M0 0 L1 0"
        );
        assert_eq!(
            renderer.path_for_element(root).to_svg_data(),
            "M30 0 L33 3 M0 0 L3 0"
        );
    }

    #[test]
    fn test_text_draws_no_path() {
        let s = scene(r#"<svg><text x="1" y="2">Hi</text></svg>"#);
        let mut sink = RecordingSink::new();
        SceneRenderer::new(&s).render(&mut sink).expect("render");
        assert!(sink
            .commands()
            .iter()
            .all(|c| !matches!(c, SinkCommand::AddPath { .. } | SinkCommand::DrawPath { .. })));
        assert_eq!(sink.depth(), 0);
    }
}
