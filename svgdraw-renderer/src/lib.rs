//! # svgdraw renderer
//!
//! Consumers of a resolved [`svgdraw_core::Scene`].
//!
//! ## Outputs
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                    Scene                    │
//! ├──────────────────────┬──────────────────────┤
//! │ InstructionGenerator │ SceneRenderer        │
//! │ (drawing document,   │ (tree walk issuing   │
//! │  JSON)               │  RenderSink calls)   │
//! ├──────────────────────┼──────────────┬───────┤
//! │                      │ Recording    │ Source│
//! └──────────────────────┴──────────────┴───────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod instructions;
pub mod sink;

pub use error::{RenderError, RenderResult};
pub use instructions::{
    AffineDescriptor, ColorDescriptor, DrawingElement, ElementType, GeneratorConfig,
    InstructionGenerator, LineDash, LineDescriptor,
};
pub use sink::{
    GraphicsState, PathDrawingMode, RecordingSink, RenderCallbacks, RenderSink, SceneRenderer,
    SinkCommand, SourceCodeSink,
};
