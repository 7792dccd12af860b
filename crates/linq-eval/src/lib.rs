//! Forward execution and randomized example generation for compiled LINQ
//! programs.

pub mod exec;
pub mod generate;

pub use exec::{execute, execute_all, EvalError, EvalResult};
pub use generate::{
    draw_inputs, generate, generate_examples, Example, GenerateConfig, GenerateError,
    GenerateResult,
};
