//! Fixed-size vector and matrix types for real-time graphics.
//!
//! The crate provides 2-, 3- and 4-component vectors and 2×2, 3×3 and 4×4 matrices with `f32`,
//! `f64` and `i32` components:
//!
//! | Components | Vectors                     | Matrices                          |
//! |------------|-----------------------------|-----------------------------------|
//! | `f32`      | [`FVec2`] [`FVec3`] [`FVec4`] | [`FMat2x2`] [`FMat3x3`] [`FMat4x4`] |
//! | `f64`      | [`DVec2`] [`DVec3`] [`DVec4`] | [`DMat2x2`] [`DMat3x3`] [`DMat4x4`] |
//! | `i32`      | [`IVec2`] [`IVec3`] [`IVec4`] | [`IMat2x2`] [`IMat3x3`] [`IMat4x4`] |
//!
//! All types are plain `#[repr(C)]` data that implement [`bytemuck::Pod`], so they can be copied
//! into GPU buffers directly, or uploaded to a shader uniform with their `as_uniform` method.
//!
//! # Conventions
//!
//! - Matrices store their elements in row-major order and multiply column vectors:
//!   `m * v` yields the vector whose component `i` is the dot product of row `i` and `v`.
//! - `==` on `f32` and `f64` types compares every component with an absolute tolerance of
//!   `EPSILON` (`1e-10`). NaN components never compare equal. Integer types compare exactly.
//!   Use [`assert_approx_eq!`] or [`ApproxEq`] for comparisons with a larger tolerance.
//! - `Display` prints `{ 1.000, 2.000 }` for float vectors, `{ 1, 2 }` for integer vectors and
//!   nests rows for matrices: `{ { 1, 0 }, { 0, 1 } }`.
//! - Integer division by zero panics, like it does for `i32`.
//!
//! The types are generated at build time by the `game-linalg-gen` crate.

pub mod approx;

mod vec {
    include!(concat!(env!("OUT_DIR"), "/vec.rs"));
}

mod mat {
    include!(concat!(env!("OUT_DIR"), "/mat.rs"));
}

pub use approx::ApproxEq;
pub use mat::*;
pub use vec::*;
