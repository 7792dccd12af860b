//! List combinators: the instructions a program is written in.

use crate::interval::Interval;
use crate::ops::{alternating_bounds, product_bounds, sum_bounds, BinaryOp, Predicate, UnaryOp};
use crate::value::{Kind, Value};
use std::fmt;
use thiserror::Error;

/// A catalog entry. Fixed combinators plus the ones generated per scalar
/// operator (`MAP INC`, `COUNT isEVEN`, `SCANL1 +`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Reverse,
    Sort,
    Take,
    Drop,
    Access,
    Head,
    Last,
    Minimum,
    Maximum,
    Sum,
    Map(UnaryOp),
    Filter(Predicate),
    Count(Predicate),
    ZipWith(BinaryOp),
    ScanL1(BinaryOp),
}

/// Argument kinds and result kind of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub args: &'static [Kind],
    pub result: Kind,
}

impl Signature {
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for arg in self.args {
            write!(f, "{} -> ", arg)?;
        }
        write!(f, "{}", self.result)
    }
}

const LIST_TO_LIST: Signature = Signature {
    args: &[Kind::List],
    result: Kind::List,
};
const LIST_TO_INT: Signature = Signature {
    args: &[Kind::List],
    result: Kind::Int,
};
const INT_LIST_TO_LIST: Signature = Signature {
    args: &[Kind::Int, Kind::List],
    result: Kind::List,
};
const INT_LIST_TO_INT: Signature = Signature {
    args: &[Kind::Int, Kind::List],
    result: Kind::Int,
};
const LIST_LIST_TO_LIST: Signature = Signature {
    args: &[Kind::List, Kind::List],
    result: Kind::List,
};

/// Values handed to a function did not match its signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("{function} takes {expected} arguments, got {found}")]
    Arity {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("{function} expects {expected} at argument {position}, got {actual}")]
    Kind {
        function: String,
        /// 1-based.
        position: usize,
        expected: Kind,
        actual: Kind,
    },
}

/// Context a bound transfer may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferContext {
    /// Global value bound `V`.
    pub value_bound: i64,
    /// Length of generated input lists.
    pub list_len: usize,
}

impl Function {
    /// The fixed combinators, in catalog order.
    pub const FIXED: [Function; 10] = [
        Function::Reverse,
        Function::Sort,
        Function::Take,
        Function::Drop,
        Function::Access,
        Function::Head,
        Function::Last,
        Function::Minimum,
        Function::Maximum,
        Function::Sum,
    ];

    /// Every function, fixed ones first, then the generated families.
    pub fn all() -> Vec<Function> {
        let mut all = Function::FIXED.to_vec();
        all.extend(UnaryOp::ALL.into_iter().map(Function::Map));
        all.extend(Predicate::ALL.into_iter().map(Function::Filter));
        all.extend(Predicate::ALL.into_iter().map(Function::Count));
        all.extend(BinaryOp::ALL.into_iter().map(Function::ZipWith));
        all.extend(BinaryOp::ALL.into_iter().map(Function::ScanL1));
        all
    }

    /// Display name, as written in program source.
    pub fn name(&self) -> String {
        match self {
            Function::Reverse => "REVERSE".to_string(),
            Function::Sort => "SORT".to_string(),
            Function::Take => "TAKE".to_string(),
            Function::Drop => "DROP".to_string(),
            Function::Access => "ACCESS".to_string(),
            Function::Head => "HEAD".to_string(),
            Function::Last => "LAST".to_string(),
            Function::Minimum => "MINIMUM".to_string(),
            Function::Maximum => "MAXIMUM".to_string(),
            Function::Sum => "SUM".to_string(),
            Function::Map(op) => format!("MAP {}", op.name()),
            Function::Filter(p) => format!("FILTER {}", p.name()),
            Function::Count(p) => format!("COUNT {}", p.name()),
            Function::ZipWith(op) => format!("ZIPWITH {}", op.name()),
            Function::ScanL1(op) => format!("SCANL1 {}", op.name()),
        }
    }

    pub fn signature(&self) -> Signature {
        match self {
            Function::Reverse
            | Function::Sort
            | Function::Map(_)
            | Function::Filter(_)
            | Function::ScanL1(_) => LIST_TO_LIST,
            Function::Head
            | Function::Last
            | Function::Minimum
            | Function::Maximum
            | Function::Sum
            | Function::Count(_) => LIST_TO_INT,
            Function::Take | Function::Drop => INT_LIST_TO_LIST,
            Function::Access => INT_LIST_TO_INT,
            Function::ZipWith(_) => LIST_LIST_TO_LIST,
        }
    }

    /// Evaluate on concrete arguments. `null` is returned for absent results
    /// (empty reductions, out-of-range access).
    pub fn apply(&self, args: &[&Value], null: i64) -> Result<Value, ApplyError> {
        let sig = self.signature();
        if args.len() != sig.arity() {
            return Err(ApplyError::Arity {
                function: self.name(),
                expected: sig.arity(),
                found: args.len(),
            });
        }
        for (position, (arg, expected)) in args.iter().zip(sig.args).enumerate() {
            if arg.kind() != *expected {
                return Err(ApplyError::Kind {
                    function: self.name(),
                    position: position + 1,
                    expected: *expected,
                    actual: arg.kind(),
                });
            }
        }

        let int = |i: usize| int_arg(args, i);
        let list = |i: usize| list_arg(args, i);

        let value = match self {
            Function::Reverse => Value::List(list(0).iter().rev().copied().collect()),
            Function::Sort => {
                let mut xs = list(0).to_vec();
                xs.sort_unstable();
                Value::List(xs)
            }
            Function::Take => {
                let xs = list(1);
                Value::List(xs[..slice_point(int(0), xs.len())].to_vec())
            }
            Function::Drop => {
                let xs = list(1);
                Value::List(xs[slice_point(int(0), xs.len())..].to_vec())
            }
            Function::Access => {
                let (n, xs) = (int(0), list(1));
                let value = usize::try_from(n)
                    .ok()
                    .and_then(|i| xs.get(i).copied())
                    .unwrap_or(null);
                Value::Int(value)
            }
            Function::Head => Value::Int(list(0).first().copied().unwrap_or(null)),
            Function::Last => Value::Int(list(0).last().copied().unwrap_or(null)),
            Function::Minimum => Value::Int(list(0).iter().copied().min().unwrap_or(null)),
            Function::Maximum => Value::Int(list(0).iter().copied().max().unwrap_or(null)),
            Function::Sum => Value::Int(list(0).iter().fold(0i64, |acc, x| acc.saturating_add(*x))),
            Function::Map(op) => Value::List(list(0).iter().map(|x| op.apply(*x)).collect()),
            Function::Filter(p) => {
                Value::List(list(0).iter().copied().filter(|x| p.test(*x)).collect())
            }
            Function::Count(p) => Value::Int(list(0).iter().filter(|x| p.test(**x)).count() as i64),
            Function::ZipWith(op) => Value::List(
                list(0)
                    .iter()
                    .zip(list(1))
                    .map(|(x, y)| op.apply(*x, *y))
                    .collect(),
            ),
            Function::ScanL1(op) => {
                let mut out = Vec::with_capacity(list(0).len());
                let mut acc: Option<i64> = None;
                for x in list(0) {
                    let next = match acc {
                        None => *x,
                        Some(prev) => op.apply(prev, *x),
                    };
                    out.push(next);
                    acc = Some(next);
                }
                Value::List(out)
            }
        };
        Ok(value)
    }

    /// One operand interval per argument such that drawing every argument
    /// (and every list element) from it keeps the result inside `target`.
    ///
    /// An empty interval in the result means no operand value can.
    pub fn transfer(&self, target: Interval, ctx: &TransferContext) -> Vec<Interval> {
        let len = ctx.list_len as i64;
        match self {
            Function::Reverse
            | Function::Sort
            | Function::Head
            | Function::Last
            | Function::Minimum
            | Function::Maximum => vec![target],
            Function::Take | Function::Drop => vec![Interval::new(0, len), target],
            Function::Access => vec![Interval::new(0, len - 1), target],
            Function::Sum => vec![sum_bounds(target, ctx.list_len)],
            Function::Map(op) => vec![op.transfer(target)],
            Function::Filter(p) => vec![p.transfer(target)],
            // A count lies in [0, L] whatever the elements are. Its only
            // consumers are index arguments, where an out-of-range count
            // reads the null value.
            Function::Count(_) => vec![Interval::symmetric(ctx.value_bound)],
            Function::ZipWith(op) => {
                let operand = op.transfer(target);
                vec![operand, operand]
            }
            Function::ScanL1(op) => vec![match op {
                BinaryOp::Add => sum_bounds(target, ctx.list_len),
                BinaryOp::Sub => alternating_bounds(target, ctx.list_len),
                BinaryOp::Mul => product_bounds(target, ctx.list_len),
                BinaryOp::Min | BinaryOp::Max => target,
            }],
        }
    }
}

fn int_arg(args: &[&Value], i: usize) -> i64 {
    args[i].as_int().unwrap_or_default()
}

fn list_arg<'a>(args: &[&'a Value], i: usize) -> &'a [i64] {
    args[i].as_list().unwrap_or_default()
}

/// Slice index: negative counts from the end, clamped to `[0, len]`.
fn slice_point(n: i64, len: usize) -> usize {
    if n >= 0 {
        usize::try_from(n).map_or(len, |n| n.min(len))
    } else {
        let back = usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX);
        len.saturating_sub(back)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.name())
    }
}
