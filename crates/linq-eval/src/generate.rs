//! Randomized input/output example generation.
//!
//! Inputs are drawn uniformly from the intervals computed by bound
//! propagation, the program is executed on them, and the output is checked
//! against the value bound. Every example owns its RNG, seeded from the base
//! seed plus the example index, so serial and parallel runs agree.

use std::fmt;

use crate::exec::{execute, EvalError};
use linq_ir::{register_name, Program};
use linq_lang::{Interval, Kind, Value};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

/// Generation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("program was compiled without a list length; no input bounds available")]
    MissingBounds,

    #[error("program bounds were computed for list length {compiled}, not {requested}")]
    ListLenMismatch { compiled: usize, requested: usize },

    #[error("program was compiled for value bound {compiled}, not {requested}")]
    ValueBoundMismatch { compiled: i64, requested: i64 },

    #[error("input '{register}' has an empty bound")]
    EmptyBound { register: char },

    #[error("evaluation failed: {0}")]
    Eval(#[from] EvalError),

    #[error("example {index}: output {output} exceeds value bound {value_bound}")]
    BoundViolation {
        index: usize,
        output: Value,
        value_bound: i64,
    },
}

pub type GenerateResult<T> = Result<T, GenerateError>;

/// Generation configuration.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Number of examples to produce.
    pub count: usize,
    /// Length of every generated input list.
    pub list_len: usize,
    /// Value bound `V`; outputs must lie in `[-V, V]`.
    pub value_bound: i64,
    /// Base seed. `None` draws one from OS entropy.
    pub seed: Option<u64>,
    /// Generate examples on the rayon thread pool.
    pub parallel: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            count: 5,
            list_len: 10,
            value_bound: 512,
            seed: None,
            parallel: false,
        }
    }
}

/// One labeled example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Example {
    pub inputs: Vec<Value>,
    pub output: Value,
}

impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, input) in self.inputs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{input}")?;
        }
        write!(f, "] -> {}", self.output)
    }
}

/// Generate `config.count` examples for `program`.
pub fn generate_examples(program: &Program, config: &GenerateConfig) -> GenerateResult<Vec<Example>> {
    let bounds = input_bounds(program, config)?;
    let kinds = program.input_kinds();
    let base = config.seed.unwrap_or_else(rand::random);
    debug!(
        count = config.count,
        list_len = config.list_len,
        seed = base,
        parallel = config.parallel,
        "generating examples"
    );

    let one = |index: usize| -> GenerateResult<Example> {
        let mut rng = StdRng::seed_from_u64(base.wrapping_add(index as u64));
        let inputs = draw_inputs(&mut rng, &kinds, bounds, config.list_len);
        let output = execute(program, &inputs)?;
        if !output.within(config.value_bound) {
            error!(
                program = %program.source,
                index,
                %output,
                "generated output escaped the value bound"
            );
            return Err(GenerateError::BoundViolation {
                index,
                output,
                value_bound: config.value_bound,
            });
        }
        Ok(Example { inputs, output })
    };

    if config.parallel {
        (0..config.count).into_par_iter().map(one).collect()
    } else {
        (0..config.count).map(one).collect()
    }
}

/// Generate with an entropy seed, serially.
pub fn generate(
    program: &Program,
    count: usize,
    list_len: usize,
    value_bound: i64,
) -> GenerateResult<Vec<Example>> {
    let config = GenerateConfig {
        count,
        list_len,
        value_bound,
        ..GenerateConfig::default()
    };
    generate_examples(program, &config)
}

fn input_bounds<'p>(program: &'p Program, config: &GenerateConfig) -> GenerateResult<&'p [Interval]> {
    let (Some(bounds), Some(compiled)) = (&program.input_bounds, program.list_len) else {
        return Err(GenerateError::MissingBounds);
    };
    if compiled != config.list_len {
        return Err(GenerateError::ListLenMismatch {
            compiled,
            requested: config.list_len,
        });
    }
    if program.value_bound != config.value_bound {
        return Err(GenerateError::ValueBoundMismatch {
            compiled: program.value_bound,
            requested: config.value_bound,
        });
    }
    if let Some(i) = bounds.iter().position(Interval::is_empty) {
        return Err(GenerateError::EmptyBound {
            register: register_name(i),
        });
    }
    Ok(bounds)
}

/// Draw one value per input: a scalar, or `list_len` independent elements.
pub fn draw_inputs<R: Rng>(
    rng: &mut R,
    kinds: &[Kind],
    bounds: &[Interval],
    list_len: usize,
) -> Vec<Value> {
    kinds
        .iter()
        .zip(bounds)
        .map(|(kind, bound)| match kind {
            Kind::Int => Value::Int(rng.gen_range(bound.lo..=bound.hi)),
            Kind::List => Value::List(
                (0..list_len)
                    .map(|_| rng.gen_range(bound.lo..=bound.hi))
                    .collect(),
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use linq_ir::{compile, CompileOptions};
    use linq_lang::Catalog;

    fn program(source: &str) -> Program {
        compile(source, &Catalog::new(512), &CompileOptions::with_list_len(10)).unwrap()
    }

    fn seeded(count: usize, seed: u64) -> GenerateConfig {
        GenerateConfig {
            count,
            seed: Some(seed),
            ..GenerateConfig::default()
        }
    }

    #[test]
    fn inputs_respect_bounds() {
        let p = program("a <- [int]\nb <- MAP SQR a\nc <- SUM b");
        let bounds = p.input_bounds.clone().unwrap();
        let examples = generate_examples(&p, &seeded(200, 7)).unwrap();
        assert_eq!(examples.len(), 200);
        for ex in &examples {
            let xs = ex.inputs[0].as_list().unwrap();
            assert_eq!(xs.len(), 10);
            assert!(xs.iter().all(|x| bounds[0].contains(*x)));
            assert!(ex.output.within(512));
        }
    }

    #[test]
    fn same_seed_same_examples() {
        let p = program("a <- [int]\nb <- int\nc <- TAKE b a\nd <- MAP MUL3 c");
        let first = generate_examples(&p, &seeded(50, 42)).unwrap();
        let second = generate_examples(&p, &seeded(50, 42)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn parallel_matches_serial() {
        let p = program("a <- [int]\nb <- [int]\nc <- ZIPWITH * a b\nd <- SORT c");
        let serial = generate_examples(&p, &seeded(64, 3)).unwrap();
        let parallel = generate_examples(
            &p,
            &GenerateConfig {
                parallel: true,
                ..seeded(64, 3)
            },
        )
        .unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn scalar_input_stays_in_range() {
        let p = program("a <- int");
        for ex in generate_examples(&p, &seeded(100, 1)).unwrap() {
            let x = ex.inputs[0].as_int().unwrap();
            assert!((-512..=512).contains(&x));
            assert_eq!(ex.output, ex.inputs[0]);
        }
    }

    #[test]
    fn unbounded_program_is_refused() {
        let p = compile("a <- [int]\nb <- SORT a", &Catalog::new(512), &CompileOptions::unbounded())
            .unwrap();
        assert_eq!(
            generate_examples(&p, &seeded(1, 0)).unwrap_err(),
            GenerateError::MissingBounds
        );
    }

    #[test]
    fn list_len_must_match_compilation() {
        let p = program("a <- [int]\nb <- SUM a");
        let config = GenerateConfig {
            list_len: 20,
            ..seeded(1, 0)
        };
        assert_eq!(
            generate_examples(&p, &config).unwrap_err(),
            GenerateError::ListLenMismatch {
                compiled: 10,
                requested: 20
            }
        );
    }

    #[test]
    fn zero_count_is_empty() {
        let p = program("a <- [int]\nb <- REVERSE a");
        assert!(generate_examples(&p, &seeded(0, 0)).unwrap().is_empty());
    }

    #[test]
    fn entropy_wrapper_produces_count() {
        let p = program("a <- [int]\nb <- MAXIMUM a");
        assert_eq!(generate(&p, 3, 10, 512).unwrap().len(), 3);
    }

    #[test]
    fn example_display() {
        let ex = Example {
            inputs: vec![Value::List(vec![1, 2, 3]), Value::Int(3)],
            output: Value::List(vec![1, 2, 3]),
        };
        assert_eq!(ex.to_string(), "[[1, 2, 3], 3] -> [1, 2, 3]");
    }

    #[test]
    fn example_json() {
        let ex = Example {
            inputs: vec![Value::List(vec![4]), Value::Int(-1)],
            output: Value::Int(4),
        };
        assert_eq!(
            serde_json::to_string(&ex).unwrap(),
            r#"{"inputs":[[4],-1],"output":4}"#
        );
    }
}
