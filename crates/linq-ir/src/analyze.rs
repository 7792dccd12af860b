//! Static analysis of compiled programs.

use crate::ir::{register_name, Program};
use linq_lang::Function;
use std::fmt;

/// Summary of a compiled program for diagnostics.
#[derive(Debug)]
pub struct ProgramProfile {
    pub num_inputs: usize,
    pub num_instructions: usize,
    /// `live[i]` is true if register `i` contributes to the output.
    pub live: Vec<bool>,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// An instruction whose result never reaches the output.
    DeadRegister { register: char, function: Function },
    /// An input nothing reads.
    UnusedInput { register: char },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DeadRegister { register, function } => {
                write!(f, "register '{}' ({}) does not reach the output", register, function)
            }
            Warning::UnusedInput { register } => {
                write!(f, "input '{}' is never used", register)
            }
        }
    }
}

/// Mark registers reachable backwards from the output and report the rest.
pub fn analyze(program: &Program) -> ProgramProfile {
    let n = program.registers.len();
    let mut live = vec![false; n];
    if let Some(last) = live.last_mut() {
        *last = true;
    }
    for register in program.registers.iter().rev() {
        if live[register.index] {
            for &p in register.operands() {
                live[p] = true;
            }
        }
    }

    let warnings = program
        .registers
        .iter()
        .filter(|r| !live[r.index])
        .map(|r| match r.function() {
            Some(function) => Warning::DeadRegister {
                register: register_name(r.index),
                function,
            },
            None => Warning::UnusedInput {
                register: register_name(r.index),
            },
        })
        .collect();

    let num_inputs = program.num_inputs();
    ProgramProfile {
        num_inputs,
        num_instructions: n - num_inputs,
        live,
        warnings,
    }
}
