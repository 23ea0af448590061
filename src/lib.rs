//! # A dense-tableau linear program solver
//!
//! Linear and mixed-integer linear programs are solved with the tableau rendition of the Simplex
//! Method: primal, dual and Big-M variants operating on one dense tableau type, and
//! branch-and-bound on top of them for integer restrictions. Every pivot is archived, so a
//! caller can replay a solve step by step.
#![warn(missing_docs)]

pub mod algorithm;
pub mod data;

#[cfg(test)]
mod tests;
