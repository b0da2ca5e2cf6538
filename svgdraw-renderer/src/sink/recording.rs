//! A sink that records every call as a structured command.

use serde::{Deserialize, Serialize};
use svgdraw_core::{AffineTransform, Color, Path, Style};

use super::{GraphicsState, PathDrawingMode, RenderSink};
use crate::{RenderError, RenderResult};

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum SinkCommand {
    /// [`RenderSink::concat_transform`]
    ConcatTransform {
        /// Concatenated matrix.
        transform: AffineTransform,
    },
    /// [`RenderSink::push_graphics_state`]
    PushGraphicsState,
    /// [`RenderSink::restore_graphics_state`]
    RestoreGraphicsState,
    /// [`RenderSink::add_path`]
    AddPath {
        /// Added geometry.
        path: Path,
    },
    /// [`RenderSink::draw_path`]
    DrawPath {
        /// Paint mode.
        mode: PathDrawingMode,
    },
    /// [`RenderSink::fill_path`]
    FillPath,
    /// [`RenderSink::set_fill_color`]
    SetFillColor {
        /// New fill, `None` to clear.
        color: Option<Color>,
    },
    /// [`RenderSink::set_stroke_color`]
    SetStrokeColor {
        /// New stroke, `None` to clear.
        color: Option<Color>,
    },
    /// [`RenderSink::set_style`]
    SetStyle {
        /// Applied style.
        style: Style,
    },
}

/// Records sink calls in order while tracking graphics state.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    commands: Vec<SinkCommand>,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl RecordingSink {
    /// Create an empty recorder in the default state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far.
    #[must_use]
    pub fn commands(&self) -> &[SinkCommand] {
        &self.commands
    }

    /// Consume the recorder, returning its commands.
    #[must_use]
    pub fn into_commands(self) -> Vec<SinkCommand> {
        self.commands
    }

    /// The current graphics state.
    #[must_use]
    pub fn state(&self) -> &GraphicsState {
        &self.state
    }

    /// Number of saved, not yet restored states.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Recorded commands as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> RenderResult<String> {
        Ok(serde_json::to_string(&self.commands)?)
    }

    fn record(&mut self, command: SinkCommand) {
        tracing::trace!("Recorded {:?}", command);
        self.commands.push(command);
    }
}

impl RenderSink for RecordingSink {
    fn concat_transform(&mut self, transform: &AffineTransform) -> RenderResult<()> {
        self.state.concat(transform);
        self.record(SinkCommand::ConcatTransform {
            transform: *transform,
        });
        Ok(())
    }

    fn push_graphics_state(&mut self) -> RenderResult<()> {
        self.saved.push(self.state.clone());
        self.record(SinkCommand::PushGraphicsState);
        Ok(())
    }

    fn restore_graphics_state(&mut self) -> RenderResult<()> {
        self.state = self.saved.pop().ok_or_else(|| {
            RenderError::Sink("restore_graphics_state without a matching push".to_string())
        })?;
        self.record(SinkCommand::RestoreGraphicsState);
        Ok(())
    }

    fn add_path(&mut self, path: &Path) -> RenderResult<()> {
        self.record(SinkCommand::AddPath { path: path.clone() });
        Ok(())
    }

    fn draw_path(&mut self, mode: PathDrawingMode) -> RenderResult<()> {
        self.record(SinkCommand::DrawPath { mode });
        Ok(())
    }

    fn fill_path(&mut self) -> RenderResult<()> {
        self.record(SinkCommand::FillPath);
        Ok(())
    }

    fn set_fill_color(&mut self, color: Option<Color>) -> RenderResult<()> {
        self.state.fill_color = color;
        self.record(SinkCommand::SetFillColor { color });
        Ok(())
    }

    fn set_stroke_color(&mut self, color: Option<Color>) -> RenderResult<()> {
        self.state.stroke_color = color;
        self.record(SinkCommand::SetStrokeColor { color });
        Ok(())
    }

    fn set_style(&mut self, style: &Style) -> RenderResult<()> {
        self.state.apply_style(style);
        self.record(SinkCommand::SetStyle {
            style: style.clone(),
        });
        Ok(())
    }

    fn fill_color(&self) -> Option<Color> {
        self.state.fill_color
    }

    fn stroke_color(&self) -> Option<Color> {
        self.state.stroke_color
    }
}
