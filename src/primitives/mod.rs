//! Core compute primitives.
//!
//! Feature blocks, queries, and training matrices are all `Matrix<f32>`.

mod matrix;

pub use matrix::{squared_euclidean, Matrix};
