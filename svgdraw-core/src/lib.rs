//! # svgdraw core
//!
//! Parses a constrained SVG 1.1 dialect into a scene tree with inherited
//! style, transform and font resolution.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                svgdraw-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Grammars        │  Document Processor      │
//! │  - Path data     │  - Per-tag construction  │
//! │  - Transforms    │  - Attribute consumption │
//! │  - Style/color   │  - Diagnostic events     │
//! ├─────────────────────────────────────────────┤
//! │  Scene Tree      │  Optimizer               │
//! │  - Arena nodes   │  - Group flattening      │
//! │  - Inheritance   │  - Path merging          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ```
//! use svgdraw_core::{SvgProcessor, Color};
//!
//! let doc = SvgProcessor::new()
//!     .parse_str(r##"<svg><rect width="10" height="5" fill="#ff0000"/></svg>"##)
//!     .unwrap();
//! let root = doc.scene.root().unwrap();
//! let rect = doc.scene.children(root)[0];
//! assert_eq!(doc.scene.fill_color(rect), Some(Color::rgb(1.0, 0.0, 0.0)));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod attributes;
pub mod color;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod optimizer;
pub mod path;
pub mod processor;
pub mod scene;
pub mod style;
pub mod transform;
pub mod walker;

pub use attributes::AttributeSet;
pub use color::{parse_color, Color};
pub use element::{
    DocumentInfo, Element, ElementId, ElementKind, NodeId, Profile, TextSpan, Version,
};
pub use error::{SvgError, SvgResult};
pub use event::{Event, Severity};
pub use geometry::{Point, Rect, Size};
pub use optimizer::{combine, flatten, optimise};
pub use path::{
    line_path, oval_path, parse_path, polygon_path, resolve_corner_radii, rounded_rect_path,
    Path, PathInstruction, PathInstructionKind, PathSegment,
};
pub use processor::{parse_points, ParsedDocument, SvgProcessor};
pub use scene::Scene;
pub use style::{
    parse_presentation_attributes, BlendMode, LineCap, LineJoin, Presentation, Style, TextStyle,
};
pub use transform::{parse_transform_list, AffineTransform, Transform, TransformFunction};
pub use walker::Walker;

/// svgdraw core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
