//! Forward evaluation of compiled programs.

use linq_ir::{register_name, Instruction, Program};
use linq_lang::{ApplyError, Kind, Value};
use thiserror::Error;

/// Evaluation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("program takes {expected} inputs, got {found}")]
    InputCount { expected: usize, found: usize },

    #[error("input '{register}' must be {expected}, got {found}")]
    InputKind {
        register: char,
        expected: Kind,
        found: Kind,
    },

    #[error("register '{register}': {source}")]
    Apply {
        register: char,
        #[source]
        source: ApplyError,
    },
}

pub type EvalResult<T> = Result<T, EvalError>;

/// Evaluate every register in order and return the last one.
///
/// No range checking happens here.
pub fn execute(program: &Program, inputs: &[Value]) -> EvalResult<Value> {
    let registers = execute_all(program, inputs)?;
    Ok(registers.into_iter().last().unwrap_or(Value::List(Vec::new())))
}

/// Evaluate and return the value of every register.
pub fn execute_all(program: &Program, inputs: &[Value]) -> EvalResult<Vec<Value>> {
    let kinds = program.input_kinds();
    if inputs.len() != kinds.len() {
        return Err(EvalError::InputCount {
            expected: kinds.len(),
            found: inputs.len(),
        });
    }
    for (i, (input, expected)) in inputs.iter().zip(&kinds).enumerate() {
        if input.kind() != *expected {
            return Err(EvalError::InputKind {
                register: register_name(i),
                expected: *expected,
                found: input.kind(),
            });
        }
    }

    let null = program.value_bound;
    let mut values: Vec<Value> = Vec::with_capacity(program.registers.len());
    values.extend_from_slice(inputs);
    for register in &program.registers[inputs.len()..] {
        let Instruction::Apply { function, operands } = &register.instruction else {
            continue;
        };
        let args: Vec<&Value> = operands.iter().map(|&p| &values[p]).collect();
        let value = function.apply(&args, null).map_err(|source| EvalError::Apply {
            register: register.name(),
            source,
        })?;
        values.push(value);
    }
    Ok(values)
}
