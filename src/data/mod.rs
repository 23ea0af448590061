//! # Data structures
//!
//! Representations of linear programs and the linear algebra underneath them.
pub mod linear_algebra;
pub mod linear_program;
