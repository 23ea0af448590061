//! # Linear program representations
//!
//! The data model an input builder fills and the engine consumes, plus the solution type a result
//! presenter reads back out.
pub mod elements;
pub mod general_form;
pub mod solution;
