//! # Linear algebra
//!
//! Dense matrix data structure and the row operations on which the simplex pivots are built.
pub mod matrix;
