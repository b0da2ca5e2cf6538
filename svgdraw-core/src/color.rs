//! Color values and the SVG/CSS color syntax.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An RGB color with components normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component.
    pub red: f64,
    /// Green component.
    pub green: f64,
    /// Blue component.
    pub blue: f64,
    /// Opacity.
    pub alpha: f64,
}

impl Color {
    /// Opaque black, the document's default fill.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Create an opaque color from normalized components.
    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Create an opaque color from 8-bit components.
    #[must_use]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    /// The `{red, green, blue}` component dictionary of this color.
    #[must_use]
    pub fn to_component_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([("red", self.red), ("green", self.green), ("blue", self.blue)])
    }
}

/// Parse a color value: a named color, hex notation or `rgb(...)`.
///
/// Named colors are matched case-insensitively. Returns `None` for anything
/// else, including `none`, which callers treat as a paint keyword rather
/// than a color.
#[must_use]
pub fn parse_color(value: &str) -> Option<Color> {
    let parsed: svgtypes::Color = value.trim().to_ascii_lowercase().parse().ok()?;
    Some(Color::from(parsed))
}

impl From<svgtypes::Color> for Color {
    fn from(color: svgtypes::Color) -> Self {
        Self {
            alpha: f64::from(color.alpha) / 255.0,
            ..Self::from_rgb8(color.red, color.green, color.blue)
        }
    }
}
