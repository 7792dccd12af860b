//! Shared helpers for the cross-crate soundness tests.

use linq_eval::{generate_examples, Example, GenerateConfig};
use linq_ir::{compile, pipe_to_lines, CompileOptions, Program};
use linq_lang::{Catalog, Function, Interval, Kind, TransferContext, Value};
use rand::Rng;

/// Programs covering every family of combinator, in pipe form.
pub const REPRESENTATIVE_PROGRAMS: &[&str] = &[
    "a <- [int] | b <- int | c <- TAKE b a | d <- COUNT isEVEN c | e <- TAKE d a",
    "a <- [int] | b <- MAP SQR a | c <- SUM b",
    "a <- [int] | b <- [int] | c <- ZIPWITH * a b | d <- SCANL1 + c | e <- SORT d",
    "a <- [int] | b <- FILTER isPOS a | c <- MAP MUL4 b | d <- SUM c",
    "a <- [int] | b <- MAXIMUM a | c <- ACCESS b a",
    "a <- [int] | b <- SCANL1 * a",
    "a <- [int] | b <- REVERSE a | c <- SCANL1 - b | d <- HEAD c",
    "a <- [int] | b <- COUNT isODD a | c <- MAP doNEG a | d <- DROP b c",
    "a <- int | b <- [int] | c <- MAP SHR b | d <- ZIPWITH MIN b c | e <- ACCESS a d",
    "a <- [int] | b <- MAP DIV3 a | c <- MAP INC b | d <- SCANL1 MAX c | e <- LAST d",
    "a <- [int] | b <- [int] | c <- ZIPWITH - a b | d <- MAP MUL3 c | e <- MINIMUM d",
];

/// Compile pipe-form or line-form text with value bound `v` and list length `l`.
pub fn compile_str(source: &str, v: i64, l: usize) -> Result<Program, String> {
    compile(
        &pipe_to_lines(source),
        &Catalog::new(v),
        &CompileOptions::with_list_len(l),
    )
    .map_err(|e| e.to_string())
}

/// Compile and generate `count` seeded examples.
pub fn generate_str(source: &str, count: usize, seed: u64) -> Result<Vec<Example>, String> {
    let program = compile_str(source, 512, 10)?;
    let config = GenerateConfig {
        count,
        seed: Some(seed),
        ..GenerateConfig::default()
    };
    generate_examples(&program, &config).map_err(|e| e.to_string())
}

/// Whether a scalar, or every element of a list, lies in `target`.
pub fn value_in(value: &Value, target: Interval) -> bool {
    match value {
        Value::Int(n) => target.contains(*n),
        Value::List(xs) => xs.iter().all(|x| target.contains(*x)),
    }
}

/// Draw one argument of `kind` from a non-empty interval. Lists have
/// exactly `len` elements.
pub fn draw<R: Rng>(rng: &mut R, kind: Kind, bound: Interval, len: usize) -> Value {
    match kind {
        Kind::Int => Value::Int(rng.gen_range(bound.lo..=bound.hi)),
        Kind::List => Value::List((0..len).map(|_| rng.gen_range(bound.lo..=bound.hi)).collect()),
    }
}

/// Check the transfer law for one function and target: operands drawn from
/// the transferred intervals evaluate into `target`.
///
/// Returns the number of draws checked. Zero means some transferred interval
/// was empty.
pub fn check_transfer<R: Rng>(
    rng: &mut R,
    function: Function,
    target: Interval,
    ctx: &TransferContext,
    trials: usize,
) -> Result<usize, String> {
    let operands = function.transfer(target, ctx);
    let signature = function.signature();
    if operands.len() != signature.arity() {
        return Err(format!(
            "{}: transfer returned {} intervals for {} arguments",
            function,
            operands.len(),
            signature.arity()
        ));
    }
    if operands.iter().any(Interval::is_empty) {
        return Ok(0);
    }

    for _ in 0..trials {
        let args: Vec<Value> = signature
            .args
            .iter()
            .zip(&operands)
            .map(|(kind, bound)| draw(rng, *kind, *bound, ctx.list_len))
            .collect();
        let refs: Vec<&Value> = args.iter().collect();
        let result = function
            .apply(&refs, ctx.value_bound)
            .map_err(|e| e.to_string())?;
        if !value_in(&result, target) {
            return Err(format!(
                "{} on {:?} gave {} outside {} (operand bounds {:?})",
                function, args, result, target, operands
            ));
        }
    }
    Ok(trials)
}
