//! Source text to IR compiler.
//!
//! A program is one instruction per line. A line is either an input
//! declaration (`int`, `[int]`) or a function name followed by operand
//! letters (`TAKE b a`, `MAP INC a`). Lines may carry the register prefix
//! `c <- `, which must name the register being defined.

use crate::bounds::{propagate, NoValidInputs};
use crate::ir::{register_index, register_name, Instruction, Program, Register};
use linq_lang::{scan_of, Catalog, Function, Kind, ScalarOp};
use thiserror::Error;
use tracing::{debug, info};

/// Compilation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("empty program")]
    EmptyProgram,

    #[error("line {line}: defines register '{found}' but register '{expected}' is next")]
    RegisterMismatch {
        line: usize,
        expected: char,
        found: String,
    },

    #[error("line {line}: programs are limited to 26 registers")]
    TooManyRegisters { line: usize },

    #[error("line {line}: input declared after the first instruction")]
    InputAfterInstruction { line: usize },

    #[error("line {line}: missing function name")]
    MissingFunction { line: usize },

    #[error("line {line}: unknown function: {name}")]
    UnknownFunction { line: usize, name: String },

    #[error("line {line}: SCANL1 cannot fold with {op}, only with +, -, *, MIN, MAX")]
    UnsupportedScanSeed { line: usize, op: String },

    #[error("line {line}: invalid operand '{operand}', expected a register letter")]
    InvalidOperand { line: usize, operand: String },

    #[error("line {line}: operand '{operand}' is not defined before register '{register}'")]
    ForwardReference {
        line: usize,
        operand: char,
        register: char,
    },

    #[error("line {line}: wrong number of arguments for {function}: expected {expected}, found {found}")]
    ArityMismatch {
        line: usize,
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: {function} expects {expected} for argument {position}, but '{operand}' is {found}")]
    KindMismatch {
        line: usize,
        function: String,
        position: usize,
        operand: char,
        expected: Kind,
        found: Kind,
    },

    #[error(transparent)]
    NoValidInputs(#[from] NoValidInputs),
}

impl CompileError {
    /// Whether this is the expected "no valid inputs" outcome rather than a
    /// defect in the program text. Batch callers skip such programs.
    pub fn is_rejection(&self) -> bool {
        matches!(self, CompileError::NoValidInputs(_))
    }

    /// 1-based source line the error refers to.
    pub fn line(&self) -> Option<usize> {
        match self {
            CompileError::RegisterMismatch { line, .. }
            | CompileError::TooManyRegisters { line }
            | CompileError::InputAfterInstruction { line }
            | CompileError::MissingFunction { line }
            | CompileError::UnknownFunction { line, .. }
            | CompileError::UnsupportedScanSeed { line, .. }
            | CompileError::InvalidOperand { line, .. }
            | CompileError::ForwardReference { line, .. }
            | CompileError::ArityMismatch { line, .. }
            | CompileError::KindMismatch { line, .. } => Some(*line),
            CompileError::EmptyProgram | CompileError::NoValidInputs(_) => None,
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Knobs for [`compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Length of generated input lists. Input bounds are only computed when set.
    pub list_len: Option<usize>,
    /// Inputs whose legal range is this wide or narrower reject the program.
    pub min_input_range: i64,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            list_len: Some(10),
            min_input_range: 0,
        }
    }
}

impl CompileOptions {
    pub fn with_list_len(list_len: usize) -> Self {
        Self {
            list_len: Some(list_len),
            ..Self::default()
        }
    }

    /// Skip bound computation; the program can only be executed.
    pub fn unbounded() -> Self {
        Self {
            list_len: None,
            ..Self::default()
        }
    }
}

/// Compile program text against `catalog`.
pub fn compile(source: &str, catalog: &Catalog, options: &CompileOptions) -> CompileResult<Program> {
    let registers = parse_registers(source, catalog)?;

    let (input_bounds, register_bounds) = match options.list_len {
        Some(list_len) => {
            match propagate(&registers, catalog, list_len, options.min_input_range) {
                Ok(bounds) => (Some(bounds.inputs().to_vec()), Some(bounds.registers)),
                Err(rejection) => {
                    info!(%rejection, source = %source, "program with no valid inputs");
                    return Err(rejection.into());
                }
            }
        }
        None => (None, None),
    };

    debug!(
        registers = registers.len(),
        output = %registers.last().map_or(Kind::Int, |r| r.kind),
        "compiled program"
    );

    Ok(Program {
        source: source.to_string(),
        registers,
        value_bound: catalog.value_bound(),
        list_len: options.list_len,
        input_bounds,
        register_bounds,
    })
}

/// Turn the single-line form `a <- [int] | b <- SORT a` into line form.
pub fn pipe_to_lines(source: &str) -> String {
    source
        .split('|')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_registers(source: &str, catalog: &Catalog) -> CompileResult<Vec<Register>> {
    let mut registers: Vec<Register> = Vec::new();

    for (line_no, raw) in source.lines().enumerate() {
        let line = line_no + 1;
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }

        let index = registers.len();
        if index >= 26 {
            return Err(CompileError::TooManyRegisters { line });
        }

        let body = match text.split_once("<-") {
            Some((lhs, rhs)) => {
                let lhs = lhs.trim();
                if lhs.len() != 1 || lhs.chars().next() != Some(register_name(index)) {
                    return Err(CompileError::RegisterMismatch {
                        line,
                        expected: register_name(index),
                        found: lhs.to_string(),
                    });
                }
                rhs.trim()
            }
            None => text,
        };

        if let Ok(kind) = body.parse::<Kind>() {
            if registers.last().is_some_and(|r| !r.is_input()) {
                return Err(CompileError::InputAfterInstruction { line });
            }
            registers.push(Register {
                index,
                kind,
                instruction: Instruction::Input(kind),
            });
            continue;
        }

        let register = parse_instruction(body, line, index, &registers, catalog)?;
        registers.push(register);
    }

    if registers.is_empty() {
        return Err(CompileError::EmptyProgram);
    }
    Ok(registers)
}

fn is_operand_token(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_lowercase())
}

fn parse_instruction(
    body: &str,
    line: usize,
    index: usize,
    registers: &[Register],
    catalog: &Catalog,
) -> CompileResult<Register> {
    let tokens: Vec<&str> = body.split_whitespace().collect();
    let split = tokens
        .iter()
        .position(|t| is_operand_token(t))
        .unwrap_or(tokens.len());
    let (name_tokens, operand_tokens) = tokens.split_at(split);
    if name_tokens.is_empty() {
        return Err(CompileError::MissingFunction { line });
    }
    let name = name_tokens.join(" ");
    let function = resolve(&name, line, catalog)?;

    let mut operands = Vec::with_capacity(operand_tokens.len());
    for token in operand_tokens {
        let letter = token.chars().next().filter(|_| is_operand_token(token));
        let Some(letter) = letter else {
            return Err(CompileError::InvalidOperand {
                line,
                operand: token.to_string(),
            });
        };
        match register_index(letter) {
            Some(p) if p < index => operands.push(p),
            _ => {
                return Err(CompileError::ForwardReference {
                    line,
                    operand: letter,
                    register: register_name(index),
                })
            }
        }
    }

    let sig = function.signature();
    if operands.len() != sig.arity() {
        return Err(CompileError::ArityMismatch {
            line,
            function: function.name(),
            expected: sig.arity(),
            found: operands.len(),
        });
    }
    for (position, (&p, expected)) in operands.iter().zip(sig.args).enumerate() {
        let found = registers[p].kind;
        if found != *expected {
            return Err(CompileError::KindMismatch {
                line,
                function: function.name(),
                position: position + 1,
                operand: register_name(p),
                expected: *expected,
                found,
            });
        }
    }

    Ok(Register {
        index,
        kind: sig.result,
        instruction: Instruction::Apply { function, operands },
    })
}

fn resolve(name: &str, line: usize, catalog: &Catalog) -> CompileResult<Function> {
    if let Some(function) = catalog.get(name) {
        return Ok(function);
    }
    if let Some(op) = name
        .strip_prefix("SCANL1 ")
        .and_then(|rest| ScalarOp::from_name(rest.trim()))
    {
        if scan_of(op).is_none() {
            return Err(CompileError::UnsupportedScanSeed {
                line,
                op: op.name().to_string(),
            });
        }
    }
    Err(CompileError::UnknownFunction {
        line,
        name: name.to_string(),
    })
}
