//! Source generator for the fixed-size vector and matrix types of `game-linalg`.
//!
//! Vectors of 2, 3 and 4 components and square matrices of order 2, 3 and 4 are generated for
//! `f32`, `f64` and `i32` components. Which members a type has is decided by a capability table
//! (see [`rules`]): every type gets storage, arithmetic, equality, formatting and GL uniform
//! upload, floating-point vectors additionally get `length` and `normalized`, and 3-component
//! vectors get `cross`.
//!
//! Generation happens in three stages:
//!
//! 1. The [`catalog`] lists the (scalar kind, dimension) pairs to generate.
//! 2. [`rules`] resolves each entry into a plan: type name, capabilities and the constants the
//!    emitted code needs.
//! 3. The emitters turn plans into items, which [`render_vectors`] and [`render_matrices`]
//!    assemble into one formatted unit each.
//!
//! Output is deterministic: rendering the same catalogs twice yields byte-identical text.
//!
//! The units are meant to be `include!`d by a build script, or written to disk through the
//! `game-linalg-gen` binary.

pub mod catalog;
mod emit;
mod error;
mod options;
mod output;
pub mod rules;

pub use catalog::{Dimension, MatrixCatalog, MatrixSpec, ScalarKind, VectorCatalog, VectorSpec};
pub use emit::{emit_matrix, emit_vector};
pub use error::Error;
pub use options::Options;
pub use output::{render_capabilities, render_matrices, render_vectors};
