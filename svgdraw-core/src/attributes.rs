//! Consumable attribute sets.
//!
//! Every attribute of a source element is read into an [`AttributeSet`] when
//! the element is entered. Interpreting an attribute removes it, so whatever
//! is left when the element is finished was not understood.

use crate::{SvgError, SvgResult};

/// The attributes and inline `style` declarations of one element.
#[derive(Debug, Clone, Default)]
pub struct AttributeSet {
    element: String,
    attributes: Vec<(String, String)>,
    properties: Vec<(String, String)>,
}

impl AttributeSet {
    /// Create a set from name/value pairs.
    ///
    /// A `style` attribute is split into its declarations instead of being
    /// stored as an attribute.
    pub fn new<I, K, V>(element: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut set = Self {
            element: element.into(),
            ..Self::default()
        };
        for (name, value) in attributes {
            let (name, value) = (name.into(), value.into());
            if name == "style" {
                set.properties.extend(parse_declarations(&value));
            } else {
                set.attributes.push((name, value));
            }
        }
        set
    }

    /// Read the attributes of an XML element.
    #[must_use]
    pub fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        Self::new(
            node.tag_name().name(),
            node.attributes()
                .map(|a| (a.name().to_string(), a.value().to_string())),
        )
    }

    /// Tag name of the element the attributes belong to.
    #[must_use]
    pub fn element(&self) -> &str {
        &self.element
    }

    /// Remove and return an attribute.
    pub fn take(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(n, _)| n == name)?;
        Some(self.attributes.remove(index).1)
    }

    /// Remove and return an attribute that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`SvgError::MissingRequiredAttribute`] when it is absent.
    pub fn required(&mut self, name: &str) -> SvgResult<String> {
        self.take(name)
            .ok_or_else(|| SvgError::MissingRequiredAttribute {
                element: self.element.clone(),
                attribute: name.to_string(),
            })
    }

    /// Remove and parse an optional numeric attribute.
    ///
    /// # Errors
    ///
    /// Returns [`SvgError::InvalidNumber`] when the value is present but not
    /// a number.
    pub fn number(&mut self, name: &str) -> SvgResult<Option<f64>> {
        self.take(name)
            .map(|value| {
                parse_length(&value).ok_or(SvgError::InvalidNumber {
                    attribute: name.to_string(),
                    value,
                })
            })
            .transpose()
    }

    /// Remove and parse a numeric attribute, using `default` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`SvgError::InvalidNumber`] when the value is not a number.
    pub fn number_or(&mut self, name: &str, default: f64) -> SvgResult<f64> {
        Ok(self.number(name)?.unwrap_or(default))
    }

    /// Remove and parse a numeric attribute that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`SvgError::MissingRequiredAttribute`] when absent and
    /// [`SvgError::InvalidNumber`] when not a number.
    pub fn required_number(&mut self, name: &str) -> SvgResult<f64> {
        let value = self.required(name)?;
        parse_length(&value).ok_or(SvgError::InvalidNumber {
            attribute: name.to_string(),
            value,
        })
    }

    /// Remove a presentation property.
    ///
    /// Both the inline `style` declaration and the attribute of the same name
    /// are consumed; the inline declaration wins.
    pub fn take_property(&mut self, name: &str) -> Option<String> {
        let attribute = self.take(name);
        let mut inline = None;
        self.properties.retain(|(n, v)| {
            if n == name {
                inline = Some(v.clone());
                false
            } else {
                true
            }
        });
        inline.or(attribute)
    }

    /// Names of attributes nobody consumed.
    #[must_use]
    pub fn remaining(&self) -> Vec<&str> {
        self.attributes.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Names of inline style declarations nobody consumed.
    #[must_use]
    pub fn remaining_properties(&self) -> Vec<&str> {
        self.properties.iter().map(|(n, _)| n.as_str()).collect()
    }
}

/// Split `prop: value; prop: value` into pairs.
fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Parse a number with an optional absolute or font-relative unit.
///
/// The unit is dropped; percentages are rejected.
pub(crate) fn parse_length(value: &str) -> Option<f64> {
    let length: svgtypes::Length = value.trim().parse().ok()?;
    (length.unit != svgtypes::LengthUnit::Percent).then_some(length.number)
}

/// Parse a whitespace and/or comma separated list of numbers.
///
/// Returns `None` if any token is not a number.
pub(crate) fn number_list(value: &str) -> Option<Vec<f64>> {
    svgtypes::NumberListParser::from(value.trim())
        .collect::<Result<Vec<_>, _>>()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pairs: &[(&str, &str)]) -> AttributeSet {
        AttributeSet::new("rect", pairs.iter().copied())
    }

    #[test]
    fn test_take_consumes() {
        let mut attrs = set(&[("x", "1"), ("id", "a")]);
        assert_eq!(attrs.take("id").as_deref(), Some("a"));
        assert_eq!(attrs.take("id"), None);
        assert_eq!(attrs.remaining(), vec!["x"]);
    }

    #[test]
    fn test_numbers() {
        let mut attrs = set(&[("x", "12px"), ("y", "abc"), ("width", "3.5")]);
        assert_eq!(attrs.number("x").expect("x"), Some(12.0));
        assert!(matches!(
            attrs.number("y"),
            Err(SvgError::InvalidNumber { .. })
        ));
        assert_eq!(attrs.number_or("rx", 0.0).expect("rx"), 0.0);
        assert_eq!(attrs.required_number("width").expect("width"), 3.5);
        assert!(matches!(
            attrs.required_number("height"),
            Err(SvgError::MissingRequiredAttribute { ref element, ref attribute })
                if element == "rect" && attribute == "height"
        ));
    }

    #[test]
    fn test_inline_style_wins() {
        let mut attrs = set(&[("fill", "blue"), ("style", "fill: red; stroke:green;")]);
        assert_eq!(attrs.take_property("fill").as_deref(), Some("red"));
        assert!(attrs.remaining().is_empty());
        assert_eq!(attrs.remaining_properties(), vec!["stroke"]);
        assert_eq!(attrs.take_property("stroke").as_deref(), Some("green"));
        assert!(attrs.remaining_properties().is_empty());
    }

    #[test]
    fn test_number_list() {
        assert_eq!(number_list("0, 0 300,200"), Some(vec![0.0, 0.0, 300.0, 200.0]));
        assert_eq!(number_list("1-2.5.5e1"), Some(vec![1.0, -2.5, 5.0]));
        assert_eq!(number_list("1 x"), None);
        assert_eq!(number_list("   "), Some(vec![]));
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length(" 4em "), Some(4.0));
        assert_eq!(parse_length("1e3"), Some(1000.0));
        assert_eq!(parse_length("none"), None);
        assert_eq!(parse_length("5%"), None);
        assert_eq!(parse_length("12pt"), Some(12.0));
        assert_eq!(parse_length("3 apples"), None);
    }

    #[test]
    fn test_from_node() {
        let doc = roxmltree::Document::parse(r#"<rect x="1" style="fill:red"/>"#).expect("xml");
        let mut attrs = AttributeSet::from_node(doc.root_element());
        assert_eq!(attrs.element(), "rect");
        assert_eq!(attrs.take_property("fill").as_deref(), Some("red"));
        assert_eq!(attrs.remaining(), vec!["x"]);
    }
}
