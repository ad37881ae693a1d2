//! Capability rules: which members each generated type has, and with which literals.
//!
//! This is the only place where per-type decisions are made. The emitters turn a resolved
//! [`VectorPlan`] or [`MatrixPlan`] into code without inspecting the scalar kind or dimension
//! themselves.

use std::{collections::BTreeSet, fmt};

use crate::{
    catalog::{Dimension, MatrixSpec, ScalarKind, VectorCatalog, VectorSpec},
    Error,
};

/// Absolute per-component tolerance used by `==` on floating kinds.
pub const FLOAT_EPSILON: f64 = 1e-10;

/// Number of matrices passed to a single matrix upload call.
pub const MATRIX_UNIFORM_COUNT: i32 = 1;

/// Matrices are stored row-major and the GPU expects column-major data, so uploads ask the driver
/// to transpose.
pub const MATRIX_UNIFORM_TRANSPOSE: bool = true;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    Vector,
    Matrix,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vector => "vector",
            Self::Matrix => "matrix",
        })
    }
}

/// A member (or group of closely related members) of a generated type.
///
/// The declaration order is the order in which members are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// The struct itself, its derives, array views and conversions.
    Storage,
    Construct,
    Zero,
    Identity,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Neg,
    ScalarMul,
    ScalarMulAssign,
    ScalarDiv,
    Dot,
    Length2,
    Length,
    Normalize,
    Cross,
    ElementAccess,
    MatrixVectorMul,
    MatrixMul,
    MatrixMulAssign,
    Equality,
    Approx,
    Format,
    UniformUpload,
}

impl Capability {
    pub const ALL: [Self; 25] = [
        Self::Storage,
        Self::Construct,
        Self::Zero,
        Self::Identity,
        Self::Add,
        Self::AddAssign,
        Self::Sub,
        Self::SubAssign,
        Self::Neg,
        Self::ScalarMul,
        Self::ScalarMulAssign,
        Self::ScalarDiv,
        Self::Dot,
        Self::Length2,
        Self::Length,
        Self::Normalize,
        Self::Cross,
        Self::ElementAccess,
        Self::MatrixVectorMul,
        Self::MatrixMul,
        Self::MatrixMulAssign,
        Self::Equality,
        Self::Approx,
        Self::Format,
        Self::UniformUpload,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::Construct => "construct",
            Self::Zero => "zero",
            Self::Identity => "identity",
            Self::Add => "add",
            Self::AddAssign => "add-assign",
            Self::Sub => "sub",
            Self::SubAssign => "sub-assign",
            Self::Neg => "neg",
            Self::ScalarMul => "scalar-mul",
            Self::ScalarMulAssign => "scalar-mul-assign",
            Self::ScalarDiv => "scalar-div",
            Self::Dot => "dot",
            Self::Length2 => "length2",
            Self::Length => "length",
            Self::Normalize => "normalize",
            Self::Cross => "cross",
            Self::ElementAccess => "element-access",
            Self::MatrixVectorMul => "matrix-vector-mul",
            Self::MatrixMul => "matrix-mul",
            Self::MatrixMulAssign => "matrix-mul-assign",
            Self::Equality => "equality",
            Self::Approx => "approx",
            Self::Format => "format",
            Self::UniformUpload => "uniform-upload",
        }
    }

    /// The only family this capability can appear in, or `None` if it is shared.
    pub fn family(self) -> Option<Family> {
        match self {
            Self::ScalarDiv
            | Self::Dot
            | Self::Length2
            | Self::Length
            | Self::Normalize
            | Self::Cross => Some(Family::Vector),
            Self::Identity
            | Self::ElementAccess
            | Self::MatrixVectorMul
            | Self::MatrixMul
            | Self::MatrixMulAssign => Some(Family::Matrix),
            _ => None,
        }
    }

    /// Capabilities whose members the generated code of `self` calls.
    pub fn requires(self) -> &'static [Capability] {
        match self {
            Self::Length2 => &[Self::Dot],
            Self::Length => &[Self::Length2],
            Self::Normalize => &[Self::Length, Self::ScalarMul],
            Self::MatrixMulAssign => &[Self::MatrixMul],
            _ => &[],
        }
    }

    /// Whether the capability needs square roots of the component type.
    pub fn is_transcendental(self) -> bool {
        matches!(self, Self::Length2 | Self::Length | Self::Normalize)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of capabilities a type exposes, iterated in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    pub fn contains(&self, cap: Capability) -> bool {
        self.0.contains(&cap)
    }

    pub fn insert(&mut self, cap: Capability) -> bool {
        self.0.insert(cap)
    }

    pub fn remove(&mut self, cap: Capability) -> bool {
        self.0.remove(&cap)
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Capability> for CapabilitySet {
    fn extend<I: IntoIterator<Item = Capability>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

/// The capability table.
pub fn capabilities(family: Family, kind: ScalarKind, dim: Dimension) -> CapabilitySet {
    use Capability::*;

    let mut set = CapabilitySet::from_iter([
        Storage,
        Construct,
        Zero,
        Add,
        AddAssign,
        Sub,
        SubAssign,
        Neg,
        ScalarMul,
        ScalarMulAssign,
        Equality,
        Approx,
        Format,
        UniformUpload,
    ]);
    match family {
        Family::Vector => {
            set.extend([ScalarDiv, Dot]);
            if dim == Dimension::THREE {
                set.insert(Cross);
            }
            if kind.supports_transcendental() {
                set.extend([Length2, Length, Normalize]);
            }
        }
        Family::Matrix => {
            set.extend([
                Identity,
                ElementAccess,
                MatrixVectorMul,
                MatrixMul,
                MatrixMulAssign,
            ]);
        }
    }
    set
}

/// A scalar value to be written into generated code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarLiteral {
    Float(f64),
    Int(i64),
}

impl fmt::Display for ScalarLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Int(v) => write!(f, "{v}"),
        }
    }
}

/// How `==` compares components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equality {
    /// Components must be identical.
    Exact,
    /// The absolute difference of each component pair must not exceed the type's `EPSILON`.
    Tolerance,
}

impl ScalarKind {
    pub fn supports_transcendental(self) -> bool {
        match self {
            Self::NarrowFloat | Self::WideFloat => true,
            Self::Integer => false,
        }
    }

    /// Maximum per-component difference treated as equal.
    pub fn tolerance(self) -> ScalarLiteral {
        match self {
            Self::NarrowFloat | Self::WideFloat => ScalarLiteral::Float(FLOAT_EPSILON),
            Self::Integer => ScalarLiteral::Int(0),
        }
    }

    pub fn equality(self) -> Equality {
        match self {
            Self::NarrowFloat | Self::WideFloat => Equality::Tolerance,
            Self::Integer => Equality::Exact,
        }
    }

    pub fn zero(self) -> ScalarLiteral {
        match self {
            Self::NarrowFloat | Self::WideFloat => ScalarLiteral::Float(0.0),
            Self::Integer => ScalarLiteral::Int(0),
        }
    }

    pub fn one(self) -> ScalarLiteral {
        match self {
            Self::NarrowFloat | Self::WideFloat => ScalarLiteral::Float(1.0),
            Self::Integer => ScalarLiteral::Int(1),
        }
    }

    /// Uppercase letter used in type names (`F`, `D`, `I`).
    pub fn letter(self) -> char {
        match self {
            Self::NarrowFloat => 'F',
            Self::WideFloat => 'D',
            Self::Integer => 'I',
        }
    }

    /// Letter of the GL uniform entry point used to upload this kind.
    ///
    /// Integers go through the `f` entry points: they are uploaded as floats.
    pub fn uniform_letter(self) -> char {
        match self {
            Self::NarrowFloat => 'f',
            Self::WideFloat => 'd',
            Self::Integer => 'f',
        }
    }

    /// The type components are converted to before upload, if they are not uploaded as-is.
    pub fn uniform_cast(self) -> Option<&'static str> {
        match self {
            Self::NarrowFloat | Self::WideFloat => None,
            Self::Integer => Some("f32"),
        }
    }

    /// `format!` placeholder for a single component.
    pub fn format_token(self) -> &'static str {
        match self {
            Self::NarrowFloat | Self::WideFloat => "{:.3}",
            Self::Integer => "{}",
        }
    }
}

/// `FVec3`, `DMat4x4`, ...
pub fn type_name(family: Family, kind: ScalarKind, dim: Dimension) -> String {
    let letter = kind.letter();
    match family {
        Family::Vector => format!("{letter}Vec{dim}"),
        Family::Matrix => format!("{letter}Mat{dim}x{dim}"),
    }
}

/// Name of the free constructor function of a vector type (`fvec3`, `ivec2`, ...).
pub fn constructor_name(kind: ScalarKind, dim: Dimension) -> String {
    format!("{}vec{dim}", kind.letter().to_ascii_lowercase())
}

/// Name of the GL function uploading a value of the given type (`Uniform3f`, `UniformMatrix4dv`).
pub fn uniform_entry_point(family: Family, kind: ScalarKind, dim: Dimension) -> String {
    let letter = kind.uniform_letter();
    match family {
        Family::Vector => format!("Uniform{dim}{letter}"),
        Family::Matrix => format!("UniformMatrix{dim}{letter}v"),
    }
}

/// Row-major storage of the identity matrix.
pub fn identity_storage(kind: ScalarKind, dim: Dimension) -> Vec<ScalarLiteral> {
    let n = dim.get();
    let mut storage = vec![kind.zero(); n * n];
    for i in 0..n {
        storage[i * n + i] = kind.one();
    }
    storage
}

/// Everything the vector emitter needs to render one type.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorPlan {
    pub kind: ScalarKind,
    pub name: String,
    pub constructor: String,
    pub scalar: &'static str,
    pub components: &'static [&'static str],
    pub capabilities: CapabilitySet,
    pub tolerance: ScalarLiteral,
    pub equality: Equality,
    pub zero: ScalarLiteral,
    pub one: ScalarLiteral,
    pub format_token: &'static str,
    pub uniform_entry_point: String,
    pub uniform_cast: Option<&'static str>,
}

/// Everything the matrix emitter needs to render one type.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixPlan {
    pub kind: ScalarKind,
    pub name: String,
    pub dimension: usize,
    pub scalar: &'static str,
    /// Name of the paired vector type (result and operand of matrix-vector multiplication).
    pub vector: String,
    pub capabilities: CapabilitySet,
    pub tolerance: ScalarLiteral,
    pub equality: Equality,
    pub zero: ScalarLiteral,
    pub identity: Vec<ScalarLiteral>,
    pub format_token: &'static str,
    pub uniform_entry_point: String,
    pub uniform_cast: Option<&'static str>,
}

impl MatrixPlan {
    pub fn cardinality(&self) -> usize {
        self.dimension * self.dimension
    }
}

pub fn resolve_vector(spec: &VectorSpec) -> VectorPlan {
    let VectorSpec { kind, dim } = *spec;
    VectorPlan {
        kind,
        name: type_name(Family::Vector, kind, dim),
        constructor: constructor_name(kind, dim),
        scalar: kind.rust_type(),
        components: spec.components(),
        capabilities: capabilities(Family::Vector, kind, dim),
        tolerance: kind.tolerance(),
        equality: kind.equality(),
        zero: kind.zero(),
        one: kind.one(),
        format_token: kind.format_token(),
        uniform_entry_point: uniform_entry_point(Family::Vector, kind, dim),
        uniform_cast: kind.uniform_cast(),
    }
}

/// Resolves a matrix spec against the vector catalog it will be multiplied with.
pub fn resolve_matrix(spec: &MatrixSpec, vectors: &VectorCatalog) -> Result<MatrixPlan, Error> {
    let MatrixSpec { kind, dim } = *spec;
    let name = type_name(Family::Matrix, kind, dim);
    let paired = spec.paired_vector();
    let vector = type_name(Family::Vector, paired.kind, paired.dim);
    if !vectors.contains(&paired) {
        return Err(Error::CatalogInconsistency {
            matrix: name,
            vector,
        });
    }

    Ok(MatrixPlan {
        kind,
        name,
        dimension: dim.get(),
        scalar: kind.rust_type(),
        vector,
        capabilities: capabilities(Family::Matrix, kind, dim),
        tolerance: kind.tolerance(),
        equality: kind.equality(),
        zero: kind.zero(),
        identity: identity_storage(kind, dim),
        format_token: kind.format_token(),
        uniform_entry_point: uniform_entry_point(Family::Matrix, kind, dim),
        uniform_cast: kind.uniform_cast(),
    })
}
