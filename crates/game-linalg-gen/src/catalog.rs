//! The closed set of (scalar kind, dimension) pairs to generate types for.

use std::fmt;

use crate::Error;

/// Numeric representation of a generated type's components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScalarKind {
    /// Single-precision float (`f32`).
    NarrowFloat,
    /// Double-precision float (`f64`).
    WideFloat,
    /// Signed 32-bit integer (`i32`).
    Integer,
}

impl ScalarKind {
    /// All scalar kinds, in catalog order.
    pub const ALL: [Self; 3] = [Self::NarrowFloat, Self::WideFloat, Self::Integer];

    /// The Rust primitive type storing a component of this kind.
    pub fn rust_type(self) -> &'static str {
        match self {
            Self::NarrowFloat => "f32",
            Self::WideFloat => "f64",
            Self::Integer => "i32",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NarrowFloat => "narrow-float",
            Self::WideFloat => "wide-float",
            Self::Integer => "integer",
        })
    }
}

/// Component count of a vector, or row/column count of a square matrix.
///
/// Always in `2..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dimension(u8);

impl Dimension {
    pub const TWO: Self = Self(2);
    pub const THREE: Self = Self(3);
    pub const FOUR: Self = Self(4);

    /// All dimensions, in catalog order.
    pub const ALL: [Self; 3] = [Self::TWO, Self::THREE, Self::FOUR];

    pub fn new(n: usize) -> Result<Self, Error> {
        match n {
            2..=4 => Ok(Self(n as u8)),
            _ => Err(Error::InvalidDimension(n)),
        }
    }

    #[inline]
    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Vector component names, in declaration order.
///
/// The order matters: the cross product and the GPU upload argument list are defined in terms of
/// it.
pub const COMPONENT_NAMES: [&str; 4] = ["x", "y", "z", "w"];

/// A vector type to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VectorSpec {
    pub kind: ScalarKind,
    pub dim: Dimension,
}

impl VectorSpec {
    pub fn new(kind: ScalarKind, dim: Dimension) -> Self {
        Self { kind, dim }
    }

    /// Names of the vector's fields, the first `dim` entries of [`COMPONENT_NAMES`].
    pub fn components(&self) -> &'static [&'static str] {
        &COMPONENT_NAMES[..self.dim.get()]
    }
}

/// A square matrix type to generate.
///
/// Matrices store `dim * dim` scalars in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatrixSpec {
    pub kind: ScalarKind,
    pub dim: Dimension,
}

impl MatrixSpec {
    pub fn new(kind: ScalarKind, dim: Dimension) -> Self {
        Self { kind, dim }
    }

    /// Number of stored scalars.
    pub fn cardinality(&self) -> usize {
        self.dim.get() * self.dim.get()
    }

    /// The vector spec this matrix multiplies with.
    ///
    /// It must be present in the vector catalog the matrix unit is generated against.
    pub fn paired_vector(&self) -> VectorSpec {
        VectorSpec::new(self.kind, self.dim)
    }
}

/// An ordered list of specs, each appearing at most once.
///
/// Iteration order is the order types are emitted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog<S> {
    entries: Vec<S>,
}

pub type VectorCatalog = Catalog<VectorSpec>;
pub type MatrixCatalog = Catalog<MatrixSpec>;

impl<S: Copy + PartialEq + fmt::Debug> Catalog<S> {
    /// Creates a catalog from a list of specs, rejecting duplicates.
    pub fn new(entries: Vec<S>) -> Result<Self, Error> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].contains(entry) {
                return Err(Error::DuplicateEntry(format!("{entry:?}")));
            }
        }
        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> + '_ {
        self.entries.iter()
    }

    pub fn contains(&self, spec: &S) -> bool {
        self.entries.contains(spec)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl VectorCatalog {
    /// Every scalar kind at every dimension; kind is the outer loop, dimension the inner one.
    pub fn standard() -> Self {
        Self {
            entries: grid(VectorSpec::new),
        }
    }
}

impl MatrixCatalog {
    /// Every scalar kind at every dimension; kind is the outer loop, dimension the inner one.
    pub fn standard() -> Self {
        Self {
            entries: grid(MatrixSpec::new),
        }
    }
}

fn grid<S>(make: impl Fn(ScalarKind, Dimension) -> S) -> Vec<S> {
    ScalarKind::ALL
        .into_iter()
        .flat_map(|kind| Dimension::ALL.into_iter().map(move |dim| (kind, dim)))
        .map(|(kind, dim)| make(kind, dim))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_order() {
        let specs = VectorCatalog::standard()
            .iter()
            .map(|s| (s.kind, s.dim.get()))
            .collect::<Vec<_>>();
        assert_eq!(
            specs,
            [
                (ScalarKind::NarrowFloat, 2),
                (ScalarKind::NarrowFloat, 3),
                (ScalarKind::NarrowFloat, 4),
                (ScalarKind::WideFloat, 2),
                (ScalarKind::WideFloat, 3),
                (ScalarKind::WideFloat, 4),
                (ScalarKind::Integer, 2),
                (ScalarKind::Integer, 3),
                (ScalarKind::Integer, 4),
            ]
        );
    }

    #[test]
    fn standard_completeness() {
        let vectors = VectorCatalog::standard();
        let matrices = MatrixCatalog::standard();
        assert_eq!(vectors.len(), 9);
        assert_eq!(matrices.len(), 9);
        for kind in ScalarKind::ALL {
            for dim in Dimension::ALL {
                assert!(vectors.contains(&VectorSpec::new(kind, dim)));
                assert!(matrices.contains(&MatrixSpec::new(kind, dim)));
                assert!(vectors.contains(&MatrixSpec::new(kind, dim).paired_vector()));
            }
        }
    }

    #[test]
    fn dimension_range() {
        assert!(matches!(Dimension::new(1), Err(Error::InvalidDimension(1))));
        assert!(matches!(Dimension::new(5), Err(Error::InvalidDimension(5))));
        assert_eq!(Dimension::new(3).unwrap(), Dimension::THREE);
    }

    #[test]
    fn components() {
        let v = VectorSpec::new(ScalarKind::Integer, Dimension::TWO);
        assert_eq!(v.components(), ["x", "y"]);
        let v = VectorSpec::new(ScalarKind::Integer, Dimension::FOUR);
        assert_eq!(v.components(), ["x", "y", "z", "w"]);
        assert_eq!(
            MatrixSpec::new(ScalarKind::WideFloat, Dimension::THREE).cardinality(),
            9
        );
    }

    #[test]
    fn rejects_duplicates() {
        let spec = VectorSpec::new(ScalarKind::NarrowFloat, Dimension::TWO);
        let err = VectorCatalog::new(vec![spec, spec]).unwrap_err();
        assert!(matches!(err, Error::DuplicateEntry(_)));
        assert_eq!(VectorCatalog::new(vec![spec]).unwrap().len(), 1);
    }
}
