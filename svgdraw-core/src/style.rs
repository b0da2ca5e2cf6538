//! Style value objects and presentation-attribute parsing.

use serde::{Deserialize, Serialize};

use crate::attributes::{number_list, parse_length, AttributeSet};
use crate::color::{parse_color, Color};

/// Line end style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineCap {
    /// Flat end at the endpoint.
    Butt,
    /// Semicircular end.
    Round,
    /// Square end extending past the endpoint.
    Square,
}

/// Line corner style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineJoin {
    /// Sharp corner limited by the miter limit.
    Miter,
    /// Rounded corner.
    Round,
    /// Cut-off corner.
    Bevel,
}

/// Compositing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum BlendMode {
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    SoftLight,
    HardLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    /// Parse a CSS `mix-blend-mode` keyword.
    #[must_use]
    pub fn from_css(value: &str) -> Option<Self> {
        Some(match value {
            "normal" => Self::Normal,
            "multiply" => Self::Multiply,
            "screen" => Self::Screen,
            "overlay" => Self::Overlay,
            "darken" => Self::Darken,
            "lighten" => Self::Lighten,
            "color-dodge" => Self::ColorDodge,
            "color-burn" => Self::ColorBurn,
            "soft-light" => Self::SoftLight,
            "hard-light" => Self::HardLight,
            "difference" => Self::Difference,
            "exclusion" => Self::Exclusion,
            "hue" => Self::Hue,
            "saturation" => Self::Saturation,
            "color" => Self::Color,
            "luminosity" => Self::Luminosity,
            _ => return None,
        })
    }
}

/// Paint and line properties. Every field is independently optional; an
/// unset field inherits.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// Fill color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Color>,
    /// Stroke color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Color>,
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
    pub miter_limit: Option<f64>,
    /// Dash lengths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_dash: Option<Vec<f64>>,
    /// Offset into the dash pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_dash_phase: Option<f64>,
    /// Curve flattening tolerance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flatness: Option<f64>,
    /// Opacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    /// Compositing mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
}

impl Style {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Combine two styles; fields set in `other` win.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            fill_color: other.fill_color.or(self.fill_color),
            stroke_color: other.stroke_color.or(self.stroke_color),
            line_width: other.line_width.or(self.line_width),
            line_cap: other.line_cap.or(self.line_cap),
            line_join: other.line_join.or(self.line_join),
            miter_limit: other.miter_limit.or(self.miter_limit),
            line_dash: other.line_dash.clone().or_else(|| self.line_dash.clone()),
            line_dash_phase: other.line_dash_phase.or(self.line_dash_phase),
            flatness: other.flatness.or(self.flatness),
            alpha: other.alpha.or(self.alpha),
            blend_mode: other.blend_mode.or(self.blend_mode),
        }
    }
}

/// Font properties used by text elements.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Font family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Font size in user units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

impl TextStyle {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.font_family.is_none() && self.font_size.is_none()
    }

    /// Combine two text styles; fields set in `other` win.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            font_family: other.font_family.clone().or_else(|| self.font_family.clone()),
            font_size: other.font_size.or(self.font_size),
        }
    }
}

/// Everything the presentation properties of one element say.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    /// Paint and line properties.
    pub style: Style,
    /// Font properties.
    pub text_style: TextStyle,
    /// False after `fill="none"`.
    pub draw_fill: bool,
    /// False after `stroke="none"`.
    pub draw_stroke: bool,
    /// False after `display="none"`.
    pub display: bool,
    /// Values that could not be interpreted.
    pub problems: Vec<String>,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            style: Style::default(),
            text_style: TextStyle::default(),
            draw_fill: true,
            draw_stroke: true,
            display: true,
            problems: Vec::new(),
        }
    }
}

/// Consume the presentation properties of an element.
///
/// Inline `style` declarations override attributes of the same name. A
/// value that cannot be interpreted is recorded in
/// [`Presentation::problems`] and otherwise ignored.
pub fn parse_presentation_attributes(attributes: &mut AttributeSet) -> Presentation {
    let mut out = Presentation::default();

    if let Some(value) = attributes.take_property("fill") {
        match paint(&value) {
            Paint::None => out.draw_fill = false,
            Paint::Color(color) => out.style.fill_color = Some(color),
            Paint::Invalid => out.problems.push(format!("Unrecognized fill color \"{value}\"")),
        }
    }
    if let Some(value) = attributes.take_property("stroke") {
        match paint(&value) {
            Paint::None => out.draw_stroke = false,
            Paint::Color(color) => out.style.stroke_color = Some(color),
            Paint::Invalid => out.problems.push(format!("Unrecognized stroke color \"{value}\"")),
        }
    }

    out.style.line_width = number_property(attributes, "stroke-width", &mut out.problems);
    out.style.miter_limit = number_property(attributes, "stroke-miterlimit", &mut out.problems);
    out.style.line_dash_phase =
        number_property(attributes, "stroke-dashoffset", &mut out.problems);
    out.style.alpha = number_property(attributes, "opacity", &mut out.problems)
        .map(|alpha| alpha.clamp(0.0, 1.0));

    if let Some(value) = attributes.take_property("stroke-linecap") {
        out.style.line_cap = match value.trim() {
            "butt" => Some(LineCap::Butt),
            "round" => Some(LineCap::Round),
            "square" => Some(LineCap::Square),
            _ => {
                out.problems.push(format!("Unrecognized stroke-linecap \"{value}\""));
                None
            }
        };
    }
    if let Some(value) = attributes.take_property("stroke-linejoin") {
        out.style.line_join = match value.trim() {
            "miter" => Some(LineJoin::Miter),
            "round" => Some(LineJoin::Round),
            "bevel" => Some(LineJoin::Bevel),
            _ => {
                out.problems.push(format!("Unrecognized stroke-linejoin \"{value}\""));
                None
            }
        };
    }
    if let Some(value) = attributes.take_property("stroke-dasharray") {
        if value.trim() != "none" {
            match number_list(&value) {
                Some(dashes) if !dashes.is_empty() => out.style.line_dash = Some(dashes),
                _ => out.problems.push(format!("Unrecognized stroke-dasharray \"{value}\"")),
            }
        }
    }
    if let Some(value) = attributes.take_property("mix-blend-mode") {
        out.style.blend_mode = BlendMode::from_css(value.trim());
        if out.style.blend_mode.is_none() {
            out.problems.push(format!("Unrecognized mix-blend-mode \"{value}\""));
        }
    }

    if let Some(value) = attributes.take_property("display") {
        out.display = value.trim() != "none";
    }

    if let Some(value) = attributes.take_property("font-family") {
        out.text_style.font_family = first_font_family(&value);
    }
    out.text_style.font_size = number_property(attributes, "font-size", &mut out.problems);

    out
}

enum Paint {
    None,
    Color(Color),
    Invalid,
}

fn paint(value: &str) -> Paint {
    if value.trim() == "none" {
        Paint::None
    } else {
        parse_color(value).map_or(Paint::Invalid, Paint::Color)
    }
}

fn number_property(
    attributes: &mut AttributeSet,
    name: &str,
    problems: &mut Vec<String>,
) -> Option<f64> {
    let value = attributes.take_property(name)?;
    let number = parse_length(&value);
    if number.is_none() {
        problems.push(format!("Invalid {name} \"{value}\""));
    }
    number
}

fn first_font_family(value: &str) -> Option<String> {
    let family = value
        .split(',')
        .next()?
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();
    (!family.is_empty()).then(|| family.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presentation(pairs: &[(&str, &str)]) -> Presentation {
        let mut attrs = AttributeSet::new("path", pairs.iter().copied());
        parse_presentation_attributes(&mut attrs)
    }

    #[test]
    fn test_fill_none_is_not_unset() {
        let none = presentation(&[("fill", "none")]);
        assert!(!none.draw_fill);
        assert_eq!(none.style.fill_color, None);

        let unset = presentation(&[]);
        assert!(unset.draw_fill);
        assert!(unset.style.is_empty());
    }

    #[test]
    fn test_stroke_properties() {
        let p = presentation(&[
            ("stroke", "#00ff00"),
            ("stroke-width", "2.5px"),
            ("stroke-miterlimit", "4"),
            ("stroke-linecap", "round"),
            ("stroke-linejoin", "bevel"),
            ("stroke-dasharray", "5, 3"),
            ("stroke-dashoffset", "1"),
        ]);
        assert_eq!(p.style.stroke_color, Some(Color::rgb(0.0, 1.0, 0.0)));
        assert_eq!(p.style.line_width, Some(2.5));
        assert_eq!(p.style.miter_limit, Some(4.0));
        assert_eq!(p.style.line_cap, Some(LineCap::Round));
        assert_eq!(p.style.line_join, Some(LineJoin::Bevel));
        assert_eq!(p.style.line_dash, Some(vec![5.0, 3.0]));
        assert_eq!(p.style.line_dash_phase, Some(1.0));
        assert!(p.problems.is_empty());
    }

    #[test]
    fn test_inline_style_overrides_attribute() {
        let p = presentation(&[("fill", "blue"), ("style", "fill:#ff0000;font-size:12px")]);
        assert_eq!(p.style.fill_color, Some(Color::rgb(1.0, 0.0, 0.0)));
        assert_eq!(p.text_style.font_size, Some(12.0));
    }

    #[test]
    fn test_bad_values_are_problems_not_failures() {
        let p = presentation(&[("fill", "bogus"), ("stroke-width", "wide"), ("stroke", "red")]);
        assert_eq!(p.problems.len(), 2);
        assert_eq!(p.style.fill_color, None);
        assert!(p.draw_fill);
        assert_eq!(p.style.stroke_color, Some(Color::rgb(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_display_and_font_family() {
        let p = presentation(&[("display", "none"), ("font-family", "'Helvetica Neue', Arial")]);
        assert!(!p.display);
        assert_eq!(p.text_style.font_family.as_deref(), Some("Helvetica Neue"));
    }

    #[test]
    fn test_style_add_prefers_other() {
        let parent = Style {
            fill_color: Some(Color::BLACK),
            line_width: Some(3.0),
            ..Style::default()
        };
        let child = Style {
            fill_color: Some(Color::rgb(1.0, 0.0, 0.0)),
            ..Style::default()
        };
        let combined = parent.add(&child);
        assert_eq!(combined.fill_color, child.fill_color);
        assert_eq!(combined.line_width, Some(3.0));
    }
}
