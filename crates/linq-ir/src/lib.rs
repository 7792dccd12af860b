//! Compiled program representation, compiler, and bound propagation for the
//! LINQ list DSL.

pub mod analyze;
pub mod bounds;
pub mod compile;
pub mod ir;
pub mod pretty;

pub use analyze::{analyze, ProgramProfile, Warning};
pub use bounds::{propagate, Bounds, NoValidInputs};
pub use compile::{compile, pipe_to_lines, CompileError, CompileOptions, CompileResult};
pub use ir::*;
