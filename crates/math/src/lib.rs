//! Linear-algebra kernel: homogeneous vectors and row-major matrices.
//!
//! Conventions used throughout the engine:
//! - Matrices are row-major (array of rows) and compose with the
//!   row-vector convention, `v' = v * M`, so the translation lives in
//!   row 3 and `a.mul(&b)` applies `a` first.
//! - Vectors carry a homogeneous `w` (1 for points). No perspective
//!   divide is ever performed on the CPU; the GPU clip stage does it.

mod mat;
mod vec;

pub use mat::{Mat2, Mat4};
pub use vec::{Vec2, Vec3};
