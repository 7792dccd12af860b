//! The function catalog for a given value bound.

use crate::function::{Function, TransferContext};
use crate::ops::ScalarOp;
use std::collections::HashMap;

/// Every function a program may invoke, keyed by display name, for one value
/// bound `V`.
///
/// `V` doubles as the null value returned by reductions of empty lists and
/// out-of-range `ACCESS`. Legal generated values stay inside `[-V, V]`, so the
/// null value is only ambiguous when a legal result equals `V` exactly.
#[derive(Debug, Clone)]
pub struct Catalog {
    value_bound: i64,
    functions: Vec<Function>,
    by_name: HashMap<String, Function>,
}

impl Catalog {
    pub fn new(value_bound: i64) -> Self {
        let functions = Function::all();
        let by_name = functions.iter().map(|f| (f.name(), *f)).collect();
        Self {
            value_bound,
            functions,
            by_name,
        }
    }

    pub fn value_bound(&self) -> i64 {
        self.value_bound
    }

    /// Value returned for absent results.
    pub fn null(&self) -> i64 {
        self.value_bound
    }

    pub fn get(&self, name: &str) -> Option<Function> {
        self.by_name.get(name).copied()
    }

    /// Functions in catalog order.
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn transfer_context(&self, list_len: usize) -> TransferContext {
        TransferContext {
            value_bound: self.value_bound,
            list_len,
        }
    }
}

/// `SCANL1 <op>` for a seed operator, if it is one.
pub fn scan_of(op: ScalarOp) -> Option<Function> {
    match op {
        ScalarOp::Binary(b) => Some(Function::ScanL1(b)),
        ScalarOp::Unary(_) | ScalarOp::Predicate(_) => None,
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(512)
    }
}
