//! Error types for SVG processing.

use thiserror::Error;

/// Result type for SVG operations.
pub type SvgResult<T> = Result<T, SvgError>;

/// Fatal errors that abort processing of a document.
///
/// Recoverable problems (unknown tags, duplicate ids, leftover attributes,
/// unparseable colors) are never reported through this type; they are
/// recorded as [`Event`](crate::Event)s instead.
#[derive(Debug, Error)]
pub enum SvgError {
    /// The XML text could not be tokenized or a node is unusable.
    #[error("Corrupt XML: {0}")]
    CorruptXml(String),

    /// The document root is not an `svg` element.
    #[error("Expected <svg> root element, found <{0}>")]
    MissingSvgRoot(String),

    /// A shape element lacks an attribute it cannot be drawn without.
    #[error("<{element}> is missing required attribute \"{attribute}\"")]
    MissingRequiredAttribute {
        /// Tag name of the element.
        element: String,
        /// Name of the missing attribute.
        attribute: String,
    },

    /// Path data (`d` attribute) could not be interpreted.
    #[error("Malformed path data: {0}")]
    MalformedPathData(String),

    /// A `transform` attribute could not be interpreted.
    #[error("Malformed transform: {0}")]
    MalformedTransform(String),

    /// Structurally invalid attribute content, such as an odd point list.
    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    /// A numeric geometry attribute is not a number.
    #[error("Invalid number for \"{attribute}\": \"{value}\"")]
    InvalidNumber {
        /// Attribute name.
        attribute: String,
        /// Offending value.
        value: String,
    },

    /// Serialization of a tree description failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
