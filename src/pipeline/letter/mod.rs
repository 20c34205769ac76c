//! Justification letter assembly. Pure string composition over a fixed,
//! ordered list of section descriptors; no I/O.

pub mod template;
pub mod builder;

pub use template::*;
pub use builder::*;
