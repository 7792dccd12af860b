//! Backward interval propagation.
//!
//! Every register starts at `[-V, V]`. Walking from the last register to the
//! first, each instruction asks its function which operand intervals keep its
//! own candidate interval, and each operand is narrowed by intersection. The
//! input registers' final intervals are the legal input ranges.

use crate::ir::{register_name, Register};
use linq_lang::{Catalog, Interval};
use thiserror::Error;
use tracing::debug;

/// Propagation left an input register without a usable range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no valid inputs: register {register} narrowed to {bound}")]
pub struct NoValidInputs {
    pub register: char,
    pub bound: Interval,
}

/// Result of a successful propagation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounds {
    /// Candidate interval of every register.
    pub registers: Vec<Interval>,
    /// Number of leading input registers.
    pub num_inputs: usize,
}

impl Bounds {
    pub fn inputs(&self) -> &[Interval] {
        &self.registers[..self.num_inputs]
    }
}

/// Run the backward pass over `registers`.
///
/// An input whose interval width is at or below `min_input_range` rejects
/// the program. With the default threshold of zero this rejects empty and
/// single-value ranges.
pub fn propagate(
    registers: &[Register],
    catalog: &Catalog,
    list_len: usize,
    min_input_range: i64,
) -> Result<Bounds, NoValidInputs> {
    let ctx = catalog.transfer_context(list_len);
    let mut limits = vec![Interval::symmetric(catalog.value_bound()); registers.len()];

    for register in registers.iter().rev() {
        let t = register.index;
        let Some(function) = register.function() else {
            if limits[t].width() <= min_input_range {
                return Err(NoValidInputs {
                    register: register.name(),
                    bound: limits[t],
                });
            }
            continue;
        };

        let derived = function.transfer(limits[t], &ctx);
        for (&p, candidate) in register.operands().iter().zip(derived) {
            let narrowed = limits[p].intersect(&candidate);
            debug!(
                register = %register_name(t),
                function = %function,
                operand = %register_name(p),
                from = %limits[p],
                to = %narrowed,
                "narrowed operand bound"
            );
            limits[p] = narrowed;
        }
    }

    let num_inputs = registers.iter().take_while(|r| r.is_input()).count();
    Ok(Bounds {
        registers: limits,
        num_inputs,
    })
}
