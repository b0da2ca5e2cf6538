//! Affine transforms and the `transform` attribute grammar.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::{SvgError, SvgResult};

/// A 2D affine matrix.
///
/// ```text
/// [a c tx]
/// [b d ty]
/// [0 0  1]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    /// Row 1, column 1.
    pub a: f64,
    /// Row 2, column 1.
    pub b: f64,
    /// Row 1, column 2.
    pub c: f64,
    /// Row 2, column 2.
    pub d: f64,
    /// Horizontal translation.
    pub tx: f64,
    /// Vertical translation.
    pub ty: f64,
}

impl AffineTransform {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Create a matrix from its six components.
    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    /// Translation matrix.
    #[must_use]
    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Scale matrix.
    #[must_use]
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation matrix, angle in radians.
    #[must_use]
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// `self · other`: `other` is applied to points first, then `self`.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            tx: self.a * other.tx + self.c * other.ty + self.tx,
            ty: self.b * other.tx + self.d * other.ty + self.ty,
        }
    }

    /// Map a point through the matrix.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    /// True for the exact identity matrix.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One function of a `transform` attribute. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TransformFunction {
    /// `matrix(a b c d e f)`.
    Matrix(AffineTransform),
    /// `translate(tx [ty])`.
    Translate {
        /// Horizontal offset.
        tx: f64,
        /// Vertical offset.
        ty: f64,
    },
    /// `scale(sx [sy])`.
    Scale {
        /// Horizontal factor.
        sx: f64,
        /// Vertical factor.
        sy: f64,
    },
    /// `rotate(angle)` about the origin.
    ///
    /// The pivoted form `rotate(angle cx cy)` is stored as
    /// `translate(cx cy) rotate(angle) translate(-cx -cy)`.
    Rotate {
        /// Angle in degrees.
        angle: f64,
    },
    /// `skewX(angle)`.
    SkewX {
        /// Angle in degrees.
        angle: f64,
    },
    /// `skewY(angle)`.
    SkewY {
        /// Angle in degrees.
        angle: f64,
    },
}

impl TransformFunction {
    /// The matrix this function denotes.
    #[must_use]
    pub fn to_affine(&self) -> AffineTransform {
        match *self {
            Self::Matrix(m) => m,
            Self::Translate { tx, ty } => AffineTransform::translation(tx, ty),
            Self::Scale { sx, sy } => AffineTransform::scale(sx, sy),
            Self::Rotate { angle } => AffineTransform::rotation(angle.to_radians()),
            Self::SkewX { angle } => {
                AffineTransform::new(1.0, 0.0, angle.to_radians().tan(), 1.0, 0.0, 0.0)
            }
            Self::SkewY { angle } => {
                AffineTransform::new(1.0, angle.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
            }
        }
    }

    /// True when the function cannot move any point.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.to_affine().is_identity()
    }
}

/// An ordered composition of transform functions.
///
/// Elements never hold an empty composition; identity is represented by the
/// element having no transform at all.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    functions: Vec<TransformFunction>,
}

impl Transform {
    /// Build a composition, dropping functions that are exactly the identity.
    #[must_use]
    pub fn new(functions: Vec<TransformFunction>) -> Self {
        Self {
            functions: functions.into_iter().filter(|f| !f.is_identity()).collect(),
        }
    }

    /// A composition holding a single matrix.
    #[must_use]
    pub fn from_affine(matrix: AffineTransform) -> Self {
        Self::new(vec![TransformFunction::Matrix(matrix)])
    }

    /// The functions in source order.
    #[must_use]
    pub fn functions(&self) -> &[TransformFunction] {
        &self.functions
    }

    /// True when the composition cannot move any point, including
    /// functions that cancel out such as `translate(5) translate(-5)`.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.functions.is_empty() || self.to_affine().is_identity()
    }

    /// `self` followed by `child`: the child's functions act in the
    /// coordinate system established by `self`.
    #[must_use]
    pub fn then(&self, child: &Self) -> Self {
        let mut functions = self.functions.clone();
        functions.extend_from_slice(&child.functions);
        Self { functions }
    }

    /// Compose all functions, right-multiplying in source order.
    #[must_use]
    pub fn to_affine(&self) -> AffineTransform {
        self.functions
            .iter()
            .fold(AffineTransform::IDENTITY, |acc, f| acc.multiply(&f.to_affine()))
    }

    /// Map a point through the composition.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        self.to_affine().apply(p)
    }
}

/// Parse a `transform` attribute value.
///
/// Tokens come from [`svgtypes::TransformListParser`], which applies the
/// argument defaults of `translate` and `scale` and expands a pivoted
/// `rotate` into translate, rotate and translate back.
///
/// # Errors
///
/// Returns [`SvgError::MalformedTransform`] for an unknown function name, a
/// wrong argument count, or a syntax error.
pub fn parse_transform_list(value: &str) -> SvgResult<Transform> {
    let functions = svgtypes::TransformListParser::from(value)
        .map(|token| token.map(TransformFunction::from))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SvgError::MalformedTransform(format!("{e} in \"{value}\"")))?;

    tracing::trace!("Parsed {} transform functions from {:?}", functions.len(), value);
    Ok(Transform::new(functions))
}

impl From<svgtypes::TransformListToken> for TransformFunction {
    fn from(token: svgtypes::TransformListToken) -> Self {
        use svgtypes::TransformListToken as Token;

        match token {
            Token::Matrix { a, b, c, d, e, f } => {
                Self::Matrix(AffineTransform::new(a, b, c, d, e, f))
            }
            Token::Translate { tx, ty } => Self::Translate { tx, ty },
            Token::Scale { sx, sy } => Self::Scale { sx, sy },
            Token::Rotate { angle } => Self::Rotate { angle },
            Token::SkewX { angle } => Self::SkewX { angle },
            Token::SkewY { angle } => Self::SkewY { angle },
        }
    }
}
